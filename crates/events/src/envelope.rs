use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use fablink_core::UserId;

use crate::Event;

/// Envelope for a notification event, addressed to a recipient.
///
/// This is the unit handed to the notification dispatcher. The payload is
/// the serialized domain event (order/offer snapshot included), so the
/// dispatcher can format a message without reading the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    event_id: Uuid,
    recipient: UserId,

    event_type: String,
    event_version: u32,
    occurred_at: DateTime<Utc>,

    payload: JsonValue,
}

impl Envelope {
    /// Wrap a typed event for delivery to `recipient`.
    pub fn from_typed<E>(recipient: UserId, event: &E) -> Result<Self, serde_json::Error>
    where
        E: Event + Serialize,
    {
        Ok(Self {
            event_id: Uuid::now_v7(),
            recipient,
            event_type: event.event_type().to_string(),
            event_version: event.schema_version(),
            occurred_at: event.occurred_at(),
            payload: serde_json::to_value(event)?,
        })
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn recipient(&self) -> UserId {
        self.recipient
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_version(&self) -> u32 {
        self.event_version
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &JsonValue {
        &self.payload
    }
}
