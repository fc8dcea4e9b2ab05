use chrono::{DateTime, Utc};

/// A domain-agnostic notification event.
///
/// Events are immutable facts, carried best-effort to the notification
/// dispatcher. The schema version travels with every instance so consumers
/// can handle payload evolution.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "order.created").
    fn event_type(&self) -> &'static str;

    /// Payload schema version for this event type.
    fn schema_version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
