use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fablink_auth::{Actor, Role};
use fablink_core::{DomainError, DomainResult, Entity, OfferId, OrderId, UserId};
use fablink_events::Event;

use crate::OrderStatus;

/// Pricing snapshot copied from the winning offer at acceptance time.
///
/// Costs are in the smallest currency unit (e.g., cents).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub unit_cost: u64,
    pub projected_cost: u64,
    pub projected_units: u32,
    pub shipping_cost: u64,
}

/// Shipping data supplied with the transition into `Shipped`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub tracking_number: String,
    pub carrier: String,
}

impl ShippingInfo {
    pub fn new(tracking_number: impl Into<String>, carrier: impl Into<String>) -> DomainResult<Self> {
        let tracking_number = tracking_number.into();
        let carrier = carrier.into();
        if tracking_number.trim().is_empty() {
            return Err(DomainError::validation("tracking number cannot be empty"));
        }
        if carrier.trim().is_empty() {
            return Err(DomainError::validation("carrier cannot be empty"));
        }
        Ok(Self {
            tracking_number,
            carrier,
        })
    }
}

/// Entity: a manufacturing request tracked through the status sequence.
///
/// Invariant: `manufacturer` is set iff `selected_offer` is set; both are
/// populated together in [`Order::apply_acceptance`] and never cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    name: String,
    status: OrderStatus,

    creator: UserId,
    creator_name: String,
    manufacturer: Option<UserId>,
    manufacturer_name: Option<String>,

    offers: Vec<OfferId>,
    selected_offer: Option<OfferId>,

    price: Option<PriceSnapshot>,
    shipping: Option<ShippingInfo>,
    file_urls: Vec<String>,

    archived: bool,
    created_at: DateTime<Utc>,
    last_update: DateTime<Utc>,
}

impl Order {
    /// Create a new order at `OrderCreated`.
    ///
    /// Only actors holding the `creator` role submit orders.
    pub fn create(
        actor: &Actor,
        name: impl Into<String>,
        file_urls: Vec<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        actor.require_role(Role::Creator)?;

        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("order name cannot be empty"));
        }

        Ok(Self {
            id: OrderId::new(),
            name,
            status: OrderStatus::OrderCreated,
            creator: actor.user_id,
            creator_name: actor.name.clone(),
            manufacturer: None,
            manufacturer_name: None,
            offers: Vec::new(),
            selected_offer: None,
            price: None,
            shipping: None,
            file_urls,
            archived: false,
            created_at: now,
            last_update: now,
        })
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn creator(&self) -> UserId {
        self.creator
    }

    pub fn creator_name(&self) -> &str {
        &self.creator_name
    }

    pub fn manufacturer(&self) -> Option<UserId> {
        self.manufacturer
    }

    pub fn manufacturer_name(&self) -> Option<&str> {
        self.manufacturer_name.as_deref()
    }

    pub fn offers(&self) -> &[OfferId] {
        &self.offers
    }

    pub fn selected_offer(&self) -> Option<OfferId> {
        self.selected_offer
    }

    pub fn price(&self) -> Option<&PriceSnapshot> {
        self.price.as_ref()
    }

    pub fn shipping(&self) -> Option<&ShippingInfo> {
        self.shipping.as_ref()
    }

    pub fn file_urls(&self) -> &[String] {
        &self.file_urls
    }

    pub fn is_archived(&self) -> bool {
        self.archived
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }

    /// Negotiation is over once a winning offer has been selected.
    pub fn is_negotiable(&self) -> bool {
        self.selected_offer.is_none() && !self.archived
    }

    /// Append a freshly submitted offer id.
    ///
    /// Advances `OrderCreated → ManufacturerOffer` on the first offer;
    /// repeated submission of the same id is a no-op (safe retry).
    pub fn record_offer(&mut self, offer_id: OfferId, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_negotiable() {
            return Err(DomainError::conflict(
                "order already has a selected offer or is archived",
            ));
        }

        if !self.offers.contains(&offer_id) {
            self.offers.push(offer_id);
        }

        if self.status == OrderStatus::OrderCreated {
            self.status = OrderStatus::ManufacturerOffer;
        }
        self.last_update = now;
        Ok(())
    }

    /// Remove a declined offer id. Status stays at `ManufacturerOffer` even
    /// when the list empties; new offers re-enter negotiation.
    pub fn remove_offer(&mut self, offer_id: OfferId, now: DateTime<Utc>) {
        self.offers.retain(|id| *id != offer_id);
        self.last_update = now;
    }

    /// Select the winning offer: copy its pricing, assign the manufacturer,
    /// advance to `OrderAccepted`.
    pub fn apply_acceptance(
        &mut self,
        offer_id: OfferId,
        manufacturer: UserId,
        manufacturer_name: impl Into<String>,
        price: PriceSnapshot,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if self.selected_offer.is_some() {
            return Err(DomainError::conflict("order already has a selected offer"));
        }
        if self.status != OrderStatus::ManufacturerOffer {
            return Err(DomainError::conflict(format!(
                "cannot accept an offer while order is '{}'",
                self.status
            )));
        }
        if !self.offers.contains(&offer_id) {
            return Err(DomainError::validation(
                "offer does not belong to this order",
            ));
        }

        self.selected_offer = Some(offer_id);
        self.manufacturer = Some(manufacturer);
        self.manufacturer_name = Some(manufacturer_name.into());
        self.price = Some(price);
        self.status = OrderStatus::OrderAccepted;
        self.last_update = now;
        Ok(())
    }

    /// Advance to the next status in the sequence.
    ///
    /// Only the assigned manufacturer or an admin may advance. The
    /// transition into `Shipped` requires the shipping payload in the same
    /// call; without it nothing changes. Returns the new status.
    pub fn advance(
        &mut self,
        actor: &Actor,
        shipping: Option<ShippingInfo>,
        now: DateTime<Utc>,
    ) -> DomainResult<OrderStatus> {
        actor.require_role(Role::Manufacturer)?;
        if actor.role == Role::Manufacturer {
            match self.manufacturer {
                Some(assigned) => actor.require_user(assigned, "the assigned manufacturer")?,
                None => {
                    return Err(DomainError::forbidden(
                        "no manufacturer assigned to this order yet",
                    ));
                }
            }
        }

        let next = self.status.next().ok_or_else(|| {
            DomainError::validation("order is completed; no further transition")
        })?;

        if next == OrderStatus::Shipped {
            let shipping = shipping.ok_or_else(|| {
                DomainError::validation(
                    "tracking number and carrier are required to mark an order shipped",
                )
            })?;
            self.shipping = Some(shipping);
        }

        self.status = next;
        self.last_update = now;
        Ok(next)
    }

    /// Archive a completed order. Orthogonal to the status sequence.
    pub fn archive(&mut self, actor: &Actor, now: DateTime<Utc>) -> DomainResult<()> {
        actor.require_user(self.creator, "the order's creator")?;

        if self.status != OrderStatus::Completed {
            return Err(DomainError::validation(
                "only completed orders can be archived",
            ));
        }

        self.archived = true;
        self.last_update = now;
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Event: order lifecycle notifications, each carrying the order snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    Created { order: Order, occurred_at: DateTime<Utc> },
    Updated { order: Order, occurred_at: DateTime<Utc> },
    Shipped { order: Order, occurred_at: DateTime<Utc> },
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::Created { .. } => "order.created",
            OrderEvent::Updated { .. } => "order.updated",
            OrderEvent::Shipped { .. } => "order.shipped",
        }
    }

    fn schema_version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::Created { occurred_at, .. }
            | OrderEvent::Updated { occurred_at, .. }
            | OrderEvent::Shipped { occurred_at, .. } => *occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator() -> Actor {
        Actor::new(UserId::new(), "alice", Role::Creator)
    }

    fn admin() -> Actor {
        Actor::new(UserId::new(), "root", Role::Admin)
    }

    fn test_order(creator: &Actor) -> Order {
        Order::create(creator, "bracket batch", vec!["cad/bracket.step".into()], Utc::now())
            .unwrap()
    }

    fn price() -> PriceSnapshot {
        PriceSnapshot {
            unit_cost: 250,
            projected_cost: 25_000,
            projected_units: 100,
            shipping_cost: 1_200,
        }
    }

    /// Drive a fresh order to the given status via offer flow + advances.
    fn order_at(status: OrderStatus) -> (Order, Actor) {
        let creator = creator();
        let mut order = test_order(&creator);
        let maker_id = UserId::new();
        let maker = Actor::new(maker_id, "mfg", Role::Manufacturer);

        if order.status() == status {
            return (order, maker);
        }

        let offer_id = OfferId::new();
        order.record_offer(offer_id, Utc::now()).unwrap();
        if order.status() == status {
            return (order, maker);
        }

        order
            .apply_acceptance(offer_id, maker_id, "mfg", price(), Utc::now())
            .unwrap();

        while order.status() != status {
            let shipping = if order.status().next() == Some(OrderStatus::Shipped) {
                Some(ShippingInfo::new("TRK-1", "UPS").unwrap())
            } else {
                None
            };
            order.advance(&maker, shipping, Utc::now()).unwrap();
        }
        (order, maker)
    }

    #[test]
    fn create_requires_creator_role() {
        let maker = Actor::new(UserId::new(), "mfg", Role::Manufacturer);
        let err = Order::create(&maker, "x", vec![], Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn create_starts_at_order_created() {
        let actor = creator();
        let order = test_order(&actor);
        assert_eq!(order.status(), OrderStatus::OrderCreated);
        assert_eq!(order.creator(), actor.user_id);
        assert!(order.manufacturer().is_none());
        assert!(order.selected_offer().is_none());
        assert!(!order.is_archived());
    }

    #[test]
    fn first_offer_advances_to_manufacturer_offer() {
        let mut order = test_order(&creator());
        order.record_offer(OfferId::new(), Utc::now()).unwrap();
        assert_eq!(order.status(), OrderStatus::ManufacturerOffer);
    }

    #[test]
    fn later_offers_do_not_move_status() {
        let (mut order, _) = order_at(OrderStatus::ManufacturerOffer);
        order.record_offer(OfferId::new(), Utc::now()).unwrap();
        assert_eq!(order.status(), OrderStatus::ManufacturerOffer);
        assert_eq!(order.offers().len(), 2);
    }

    #[test]
    fn recording_same_offer_twice_is_a_noop() {
        let mut order = test_order(&creator());
        let offer_id = OfferId::new();
        order.record_offer(offer_id, Utc::now()).unwrap();
        order.record_offer(offer_id, Utc::now()).unwrap();
        assert_eq!(order.offers(), &[offer_id]);
    }

    #[test]
    fn acceptance_assigns_manufacturer_and_price_together() {
        let mut order = test_order(&creator());
        let offer_id = OfferId::new();
        let maker = UserId::new();
        order.record_offer(offer_id, Utc::now()).unwrap();

        order
            .apply_acceptance(offer_id, maker, "mfg co", price(), Utc::now())
            .unwrap();

        assert_eq!(order.status(), OrderStatus::OrderAccepted);
        assert_eq!(order.selected_offer(), Some(offer_id));
        assert_eq!(order.manufacturer(), Some(maker));
        assert_eq!(order.manufacturer_name(), Some("mfg co"));
        assert_eq!(order.price(), Some(&price()));
        // manufacturer iff selected_offer
        assert_eq!(
            order.manufacturer().is_some(),
            order.selected_offer().is_some()
        );
    }

    #[test]
    fn second_acceptance_conflicts() {
        let (mut order, _) = order_at(OrderStatus::OrderAccepted);
        let err = order
            .apply_acceptance(OfferId::new(), UserId::new(), "other", price(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn offers_are_rejected_once_one_is_selected() {
        let (mut order, _) = order_at(OrderStatus::OrderAccepted);
        let err = order.record_offer(OfferId::new(), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn creator_cannot_advance() {
        let actor = creator();
        let mut order = test_order(&actor);
        let err = order.advance(&actor, None, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        assert_eq!(order.status(), OrderStatus::OrderCreated);
    }

    #[test]
    fn unassigned_manufacturer_cannot_advance() {
        let mut order = test_order(&creator());
        let maker = Actor::new(UserId::new(), "mfg", Role::Manufacturer);
        let err = order.advance(&maker, None, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn foreign_manufacturer_cannot_advance() {
        let (mut order, _) = order_at(OrderStatus::OrderAccepted);
        let other = Actor::new(UserId::new(), "other mfg", Role::Manufacturer);
        let err = order.advance(&other, None, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn advance_walks_production_statuses() {
        let (mut order, maker) = order_at(OrderStatus::OrderAccepted);

        assert_eq!(
            order.advance(&maker, None, Utc::now()).unwrap(),
            OrderStatus::MachineSetup
        );
        assert_eq!(
            order.advance(&maker, None, Utc::now()).unwrap(),
            OrderStatus::StartedManufacturing
        );
        assert_eq!(
            order.advance(&maker, None, Utc::now()).unwrap(),
            OrderStatus::QualityCheck
        );
    }

    #[test]
    fn shipped_transition_requires_shipping_payload() {
        let (mut order, maker) = order_at(OrderStatus::QualityCheck);

        let err = order.advance(&maker, None, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        // no partial update
        assert_eq!(order.status(), OrderStatus::QualityCheck);
        assert!(order.shipping().is_none());

        let shipping = ShippingInfo::new("1Z999", "UPS").unwrap();
        let next = order
            .advance(&maker, Some(shipping.clone()), Utc::now())
            .unwrap();
        assert_eq!(next, OrderStatus::Shipped);
        assert_eq!(order.shipping(), Some(&shipping));
    }

    #[test]
    fn advance_past_completed_is_rejected() {
        let (mut order, maker) = order_at(OrderStatus::Completed);
        let err = order.advance(&maker, None, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(order.status(), OrderStatus::Completed);
    }

    #[test]
    fn admin_can_advance_without_assignment() {
        let mut order = test_order(&creator());
        assert_eq!(
            order.advance(&admin(), None, Utc::now()).unwrap(),
            OrderStatus::ManufacturerOffer
        );
    }

    #[test]
    fn archive_only_when_completed() {
        let actor = creator();
        let mut order = test_order(&actor);
        let err = order.archive(&actor, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let (mut order, _) = order_at(OrderStatus::Completed);
        order.archive(&admin(), Utc::now()).unwrap();
        assert!(order.is_archived());
        assert_eq!(order.status(), OrderStatus::Completed);
    }

    #[test]
    fn archive_is_owner_gated() {
        let (mut order, _) = order_at(OrderStatus::Completed);
        let stranger = Actor::new(UserId::new(), "other", Role::Creator);
        let err = order.archive(&stranger, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn empty_shipping_fields_are_rejected() {
        assert!(ShippingInfo::new("", "UPS").is_err());
        assert!(ShippingInfo::new("TRK", "  ").is_err());
    }

    #[test]
    fn order_events_carry_stable_type_names() {
        let order = test_order(&creator());
        let now = Utc::now();
        let ev = OrderEvent::Created {
            order: order.clone(),
            occurred_at: now,
        };
        assert_eq!(ev.event_type(), "order.created");
        assert_eq!(ev.occurred_at(), now);
        assert_eq!(
            OrderEvent::Shipped { order, occurred_at: now }.event_type(),
            "order.shipped"
        );
    }
}
