//! Infrastructure layer: storage seam, in-memory store, application
//! services wiring domain logic to storage and notifications.

pub mod services;
pub mod store;


pub use services::{
    AcceptanceOutcome, AssemblyPlanner, CompletionSummary, DerivedPart, OfferLedger, OrderFlow,
    SpecificationTracker,
};
pub use store::{InMemoryStore, MarketStore};
