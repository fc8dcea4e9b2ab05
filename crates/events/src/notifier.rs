//! Best-effort notification publishing.

use serde::Serialize;

use fablink_core::UserId;

use crate::{Envelope, Event, EventBus};

/// Fire-and-forget notification sender.
///
/// Wraps an [`EventBus`] carrying [`Envelope`]s. Delivery failure is logged
/// and swallowed: notifications sit outside the consistency boundary, so a
/// failed publish never rolls back the state mutation it followed.
#[derive(Debug, Clone)]
pub struct Notifier<B> {
    bus: B,
}

impl<B> Notifier<B>
where
    B: EventBus<Envelope>,
{
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Publish a typed event addressed to `recipient`. Never fails.
    pub fn notify<E>(&self, recipient: UserId, event: &E)
    where
        E: Event + Serialize,
    {
        let envelope = match Envelope::from_typed(recipient, event) {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!(
                    event_type = event.event_type(),
                    error = %e,
                    "failed to serialize notification, dropping"
                );
                return;
            }
        };

        if let Err(e) = self.bus.publish(envelope) {
            tracing::warn!(
                event_type = event.event_type(),
                recipient = %recipient,
                error = ?e,
                "notification delivery failed, dropping"
            );
        }
    }
}
