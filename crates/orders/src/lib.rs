//! Orders domain module.
//!
//! This crate contains the business rules for the order lifecycle,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage). Storage and notification wiring live in `fablink-infra`.

pub mod order;
pub mod status;

pub use order::{Order, OrderEvent, PriceSnapshot, ShippingInfo};
pub use status::OrderStatus;
