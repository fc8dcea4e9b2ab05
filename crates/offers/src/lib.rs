//! Offers domain module.
//!
//! Business rules for competing manufacturing offers, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage). Single-winner
//! orchestration across an order's offers lives in `fablink-infra`.

pub mod offer;

pub use offer::{Offer, OfferDisposition, OfferEvent, OfferTerms};
