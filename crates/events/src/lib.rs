//! `fablink-events` — notification event plumbing.
//!
//! Domain crates define their typed events (implementing [`Event`]); this
//! crate provides the transport towards the notification dispatcher:
//! recipient-addressed [`Envelope`]s, the [`EventBus`] pub/sub seam, an
//! in-memory bus for tests/dev, and the fire-and-forget [`Notifier`].

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;
pub mod notifier;

pub use bus::{EventBus, Subscription};
pub use envelope::Envelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use notifier::Notifier;
