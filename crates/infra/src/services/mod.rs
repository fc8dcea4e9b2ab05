pub mod assembly_planner;
pub mod offer_ledger;
pub mod order_flow;
pub mod spec_tracker;

pub use assembly_planner::{AssemblyPlanner, DerivedPart};
pub use offer_ledger::{AcceptanceOutcome, OfferLedger};
pub use order_flow::OrderFlow;
pub use spec_tracker::{CompletionSummary, SpecificationTracker};
