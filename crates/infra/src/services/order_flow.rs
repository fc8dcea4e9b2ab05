//! Order lifecycle service.

use std::sync::Arc;

use chrono::Utc;

use fablink_auth::Actor;
use fablink_core::{DomainResult, OrderId};
use fablink_events::{Envelope, EventBus, Notifier};
use fablink_orders::{Order, OrderEvent, OrderStatus, ShippingInfo};

use crate::store::MarketStore;

/// Drives an order through its status sequence.
///
/// The two negotiation transitions (`ManufacturerOffer`, `OrderAccepted`)
/// are normally driven by the offer ledger; this service is the generic
/// path for every other step.
pub struct OrderFlow<S, B> {
    store: Arc<S>,
    notifier: Notifier<B>,
}

impl<S, B> OrderFlow<S, B>
where
    S: MarketStore,
    B: EventBus<Envelope>,
{
    pub fn new(store: Arc<S>, notifier: Notifier<B>) -> Self {
        Self { store, notifier }
    }

    /// Submit a new order at `OrderCreated`. Emits `order.created`.
    pub fn create_order(
        &self,
        actor: &Actor,
        name: impl Into<String>,
        file_urls: Vec<String>,
    ) -> DomainResult<Order> {
        let now = Utc::now();
        let order = Order::create(actor, name, file_urls, now)?;
        self.store.insert_order(order.clone())?;

        tracing::info!(order_id = %order.id_typed(), "order created");
        self.notifier.notify(
            order.creator(),
            &OrderEvent::Created {
                order: order.clone(),
                occurred_at: now,
            },
        );
        Ok(order)
    }

    pub fn order(&self, order_id: OrderId) -> DomainResult<Order> {
        self.store.fetch_order(order_id)
    }

    /// Advance the order one status. The transition into `Shipped` must
    /// carry the shipping payload; emits `order.shipped` for that step and
    /// `order.updated` for every other.
    pub fn advance(
        &self,
        actor: &Actor,
        order_id: OrderId,
        shipping: Option<ShippingInfo>,
    ) -> DomainResult<Order> {
        let now = Utc::now();
        let mut order = self.store.fetch_order(order_id)?;
        let next = order.advance(actor, shipping, now)?;
        self.store.update_order(&order)?;

        tracing::info!(order_id = %order_id, status = %next, "order advanced");
        let event = if next == OrderStatus::Shipped {
            OrderEvent::Shipped {
                order: order.clone(),
                occurred_at: now,
            }
        } else {
            OrderEvent::Updated {
                order: order.clone(),
                occurred_at: now,
            }
        };
        self.notifier.notify(order.creator(), &event);
        Ok(order)
    }

    /// Archive a completed order (orthogonal flag, no status change).
    pub fn archive(&self, actor: &Actor, order_id: OrderId) -> DomainResult<Order> {
        let mut order = self.store.fetch_order(order_id)?;
        order.archive(actor, Utc::now())?;
        self.store.update_order(&order)?;
        tracing::info!(order_id = %order_id, "order archived");
        Ok(order)
    }
}
