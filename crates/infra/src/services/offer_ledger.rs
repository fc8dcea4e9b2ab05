//! Competing-offer ledger.

use std::sync::Arc;

use chrono::Utc;

use fablink_auth::Actor;
use fablink_core::{DomainResult, OfferId, OrderId};
use fablink_events::{Envelope, EventBus, Notifier};
use fablink_offers::{Offer, OfferEvent, OfferTerms};
use fablink_orders::Order;

use crate::store::MarketStore;

/// Outcome of accepting an offer: the winner, the declined siblings and
/// the updated order. Returned as a value; any navigation or rendering is
/// a presentation-layer decision.
#[derive(Debug, Clone)]
pub struct AcceptanceOutcome {
    pub order: Order,
    pub accepted: Offer,
    pub declined: Vec<Offer>,
}

/// Accepts competing offers against an order and enforces single-winner
/// selection.
pub struct OfferLedger<S, B> {
    store: Arc<S>,
    notifier: Notifier<B>,
}

impl<S, B> OfferLedger<S, B>
where
    S: MarketStore,
    B: EventBus<Envelope>,
{
    pub fn new(store: Arc<S>, notifier: Notifier<B>) -> Self {
        Self { store, notifier }
    }

    /// Submit a competing offer.
    ///
    /// Appends the offer to the order and advances `OrderCreated →
    /// ManufacturerOffer` on the first one; later offers leave the status
    /// alone. The append happens inside the store commit against the stored
    /// order, so simultaneous submissions all land. Emits `offer.created`
    /// to the order's creator.
    pub fn create_offer(
        &self,
        actor: &Actor,
        order_id: OrderId,
        terms: OfferTerms,
    ) -> DomainResult<Offer> {
        let now = Utc::now();
        let offer = Offer::submit(actor, order_id, terms, now)?;
        let order = self.store.insert_offer(&offer)?;

        tracing::info!(
            order_id = %order_id,
            offer_id = %offer.id_typed(),
            "offer submitted"
        );
        self.notifier.notify(
            order.creator(),
            &OfferEvent::Created {
                offer: offer.clone(),
                occurred_at: now,
            },
        );
        Ok(offer)
    }

    /// Accept the winning offer.
    ///
    /// Copies the pricing snapshot onto the order, assigns the
    /// manufacturer, advances to `OrderAccepted`, and declines every other
    /// outstanding offer — all in one store commit, so two racing
    /// acceptances cannot both win. Emits `offer.accepted` to the winning
    /// manufacturer.
    pub fn accept_offer(&self, actor: &Actor, offer_id: OfferId) -> DomainResult<AcceptanceOutcome> {
        let now = Utc::now();
        let offer = self.store.fetch_offer(offer_id)?;
        let order = self.store.fetch_order(offer.order_id())?;
        actor.require_user(order.creator(), "the order's creator")?;

        // Acceptance and sibling disqualification both run against the
        // stored rows inside the commit.
        let (order, accepted, declined) = self.store.commit_acceptance(offer_id, now)?;

        tracing::info!(
            order_id = %order.id_typed(),
            offer_id = %offer_id,
            declined = declined.len(),
            "offer accepted"
        );
        self.notifier.notify(
            accepted.offerer(),
            &OfferEvent::Accepted {
                offer: accepted.clone(),
                occurred_at: now,
            },
        );

        Ok(AcceptanceOutcome {
            order,
            accepted,
            declined,
        })
    }

    /// Decline an offer and drop its id from the order's list.
    ///
    /// The status deliberately stays at `ManufacturerOffer` even when the
    /// list empties; new offers re-enter negotiation.
    pub fn decline_offer(&self, actor: &Actor, offer_id: OfferId) -> DomainResult<Offer> {
        let now = Utc::now();
        let offer = self.store.fetch_offer(offer_id)?;
        let order = self.store.fetch_order(offer.order_id())?;
        actor.require_user(order.creator(), "the order's creator")?;

        let (order, offer) = self.store.commit_decline(offer_id, now)?;

        tracing::info!(
            order_id = %order.id_typed(),
            offer_id = %offer_id,
            "offer declined"
        );
        Ok(offer)
    }

    pub fn offers_for_order(&self, order_id: OrderId) -> DomainResult<Vec<Offer>> {
        self.store.offers_for_order(order_id)
    }
}
