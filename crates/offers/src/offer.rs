use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fablink_auth::{Actor, Role};
use fablink_core::{DomainError, DomainResult, Entity, OfferId, OrderId, UserId};
use fablink_events::Event;

use fablink_orders::PriceSnapshot;

/// Commercial terms of an offer. Costs in the smallest currency unit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferTerms {
    pub unit_cost: u64,
    pub projected_cost: u64,
    pub projected_units: u32,
    pub shipping_cost: u64,
    pub lead_time_days: u32,
}

impl OfferTerms {
    pub fn validate(&self) -> DomainResult<()> {
        if self.unit_cost == 0 {
            return Err(DomainError::validation("unit cost must be positive"));
        }
        if self.projected_units == 0 {
            return Err(DomainError::validation("projected units must be positive"));
        }
        if self.lead_time_days == 0 {
            return Err(DomainError::validation("lead time must be at least one day"));
        }
        Ok(())
    }

    /// The pricing snapshot copied onto the order at acceptance.
    pub fn to_price_snapshot(self) -> PriceSnapshot {
        PriceSnapshot {
            unit_cost: self.unit_cost,
            projected_cost: self.projected_cost,
            projected_units: self.projected_units,
            shipping_cost: self.shipping_cost,
        }
    }
}

/// Per-offer terminal state.
///
/// Modeled as one enum instead of two booleans so accepted/declined are
/// mutually exclusive by construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferDisposition {
    Open,
    Accepted,
    Declined,
}

/// Entity: a manufacturer's competing bid against an order.
///
/// Offers are never hard-deleted; accept/decline are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    id: OfferId,
    order_id: OrderId,
    offerer: UserId,
    offerer_name: String,
    terms: OfferTerms,
    disposition: OfferDisposition,
    created_at: DateTime<Utc>,
}

impl Offer {
    /// Submit a new offer against an order.
    ///
    /// Only actors holding the `manufacturer` role submit offers.
    pub fn submit(
        actor: &Actor,
        order_id: OrderId,
        terms: OfferTerms,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        actor.require_role(Role::Manufacturer)?;
        terms.validate()?;

        Ok(Self {
            id: OfferId::new(),
            order_id,
            offerer: actor.user_id,
            offerer_name: actor.name.clone(),
            terms,
            disposition: OfferDisposition::Open,
            created_at: now,
        })
    }

    pub fn id_typed(&self) -> OfferId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn offerer(&self) -> UserId {
        self.offerer
    }

    pub fn offerer_name(&self) -> &str {
        &self.offerer_name
    }

    pub fn terms(&self) -> &OfferTerms {
        &self.terms
    }

    pub fn disposition(&self) -> OfferDisposition {
        self.disposition
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_accepted(&self) -> bool {
        self.disposition == OfferDisposition::Accepted
    }

    pub fn is_declined(&self) -> bool {
        self.disposition == OfferDisposition::Declined
    }

    /// Still eligible for acceptance.
    pub fn is_open(&self) -> bool {
        self.disposition == OfferDisposition::Open
    }

    /// Mark this offer as the accepted winner.
    pub fn accept(&mut self) -> DomainResult<()> {
        match self.disposition {
            OfferDisposition::Open => {
                self.disposition = OfferDisposition::Accepted;
                Ok(())
            }
            OfferDisposition::Accepted => {
                Err(DomainError::conflict("offer is already accepted"))
            }
            OfferDisposition::Declined => {
                Err(DomainError::conflict("cannot accept a declined offer"))
            }
        }
    }

    /// Mark this offer declined (explicitly, or because a sibling won).
    ///
    /// Declining an already-declined offer is a no-op so sibling
    /// disqualification stays idempotent.
    pub fn decline(&mut self) -> DomainResult<()> {
        match self.disposition {
            OfferDisposition::Open | OfferDisposition::Declined => {
                self.disposition = OfferDisposition::Declined;
                Ok(())
            }
            OfferDisposition::Accepted => {
                Err(DomainError::conflict("cannot decline an accepted offer"))
            }
        }
    }
}

impl Entity for Offer {
    type Id = OfferId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Event: offer notifications, each carrying the offer snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferEvent {
    Created { offer: Offer, occurred_at: DateTime<Utc> },
    Accepted { offer: Offer, occurred_at: DateTime<Utc> },
}

impl Event for OfferEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OfferEvent::Created { .. } => "offer.created",
            OfferEvent::Accepted { .. } => "offer.accepted",
        }
    }

    fn schema_version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OfferEvent::Created { occurred_at, .. }
            | OfferEvent::Accepted { occurred_at, .. } => *occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manufacturer() -> Actor {
        Actor::new(UserId::new(), "mfg co", Role::Manufacturer)
    }

    fn terms() -> OfferTerms {
        OfferTerms {
            unit_cost: 250,
            projected_cost: 25_000,
            projected_units: 100,
            shipping_cost: 1_200,
            lead_time_days: 14,
        }
    }

    fn open_offer() -> Offer {
        Offer::submit(&manufacturer(), OrderId::new(), terms(), Utc::now()).unwrap()
    }

    #[test]
    fn creators_cannot_submit_offers() {
        let creator = Actor::new(UserId::new(), "alice", Role::Creator);
        let err = Offer::submit(&creator, OrderId::new(), terms(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn submit_starts_open() {
        let offer = open_offer();
        assert!(offer.is_open());
        assert!(!offer.is_accepted());
        assert!(!offer.is_declined());
    }

    #[test]
    fn zero_terms_fail_validation() {
        let mut t = terms();
        t.unit_cost = 0;
        assert!(matches!(
            t.validate().unwrap_err(),
            DomainError::Validation(_)
        ));

        let mut t = terms();
        t.projected_units = 0;
        assert!(t.validate().is_err());

        let mut t = terms();
        t.lead_time_days = 0;
        assert!(t.validate().is_err());
    }

    #[test]
    fn accept_then_decline_conflicts() {
        let mut offer = open_offer();
        offer.accept().unwrap();
        assert!(offer.is_accepted());

        let err = offer.decline().unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(offer.is_accepted());
    }

    #[test]
    fn decline_then_accept_conflicts() {
        let mut offer = open_offer();
        offer.decline().unwrap();
        let err = offer.accept().unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(offer.is_declined());
    }

    #[test]
    fn double_accept_conflicts() {
        let mut offer = open_offer();
        offer.accept().unwrap();
        assert!(offer.accept().is_err());
    }

    #[test]
    fn double_decline_is_idempotent() {
        let mut offer = open_offer();
        offer.decline().unwrap();
        offer.decline().unwrap();
        assert!(offer.is_declined());
    }

    #[test]
    fn accepted_and_declined_stay_mutually_exclusive() {
        let mut offer = open_offer();
        offer.accept().unwrap();
        assert!(!(offer.is_accepted() && offer.is_declined()));
    }

    #[test]
    fn price_snapshot_copies_the_four_pricing_fields() {
        let snap = terms().to_price_snapshot();
        assert_eq!(snap.unit_cost, 250);
        assert_eq!(snap.projected_cost, 25_000);
        assert_eq!(snap.projected_units, 100);
        assert_eq!(snap.shipping_cost, 1_200);
    }

    #[test]
    fn offer_events_carry_stable_type_names() {
        let offer = open_offer();
        let now = Utc::now();
        assert_eq!(
            OfferEvent::Created { offer: offer.clone(), occurred_at: now }.event_type(),
            "offer.created"
        );
        assert_eq!(
            OfferEvent::Accepted { offer, occurred_at: now }.event_type(),
            "offer.accepted"
        );
    }
}
