//! In-memory store for tests/dev.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use fablink_assemblies::{Assembly, Part, PartSpecification};
use fablink_core::{AssemblyId, DomainError, DomainResult, OfferId, OrderId, PartId};
use fablink_offers::Offer;
use fablink_orders::Order;

use super::market::MarketStore;

#[derive(Debug, Default)]
struct State {
    orders: HashMap<OrderId, Order>,
    offers: HashMap<OfferId, Offer>,
    parts: HashMap<PartId, Part>,
    assemblies: HashMap<AssemblyId, Assembly>,
    assembly_parts: HashMap<AssemblyId, Vec<PartId>>,
    specifications: HashMap<(AssemblyId, PartId), PartSpecification>,
}

impl State {
    fn order(&self, id: OrderId) -> DomainResult<&Order> {
        self.orders
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("order {id}")))
    }

    fn offer(&self, id: OfferId) -> DomainResult<&Offer> {
        self.offers
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("offer {id}")))
    }

    fn assembly(&self, id: AssemblyId) -> DomainResult<&Assembly> {
        self.assemblies
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("assembly {id}")))
    }

    /// Part ids claimed by any assembly of the order.
    fn assigned_parts(&self, order_id: OrderId) -> HashSet<PartId> {
        self.assemblies
            .values()
            .filter(|a| a.order_id() == order_id)
            .filter_map(|a| self.assembly_parts.get(&a.id_typed()))
            .flatten()
            .copied()
            .collect()
    }
}

/// In-memory relational-style store.
///
/// Every multi-row operation runs under one write guard, which is what
/// makes it atomic here. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| DomainError::persistence("store lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| DomainError::persistence("store lock poisoned"))
    }
}

impl MarketStore for InMemoryStore {
    fn insert_order(&self, order: Order) -> DomainResult<()> {
        let mut state = self.write()?;
        let id = order.id_typed();
        if state.orders.contains_key(&id) {
            return Err(DomainError::conflict(format!("order {id} already exists")));
        }
        state.orders.insert(id, order);
        Ok(())
    }

    fn fetch_order(&self, id: OrderId) -> DomainResult<Order> {
        Ok(self.read()?.order(id)?.clone())
    }

    fn update_order(&self, order: &Order) -> DomainResult<()> {
        let mut state = self.write()?;
        let id = order.id_typed();
        state.order(id)?;
        state.orders.insert(id, order.clone());
        Ok(())
    }

    fn insert_offer(&self, offer: &Offer) -> DomainResult<Order> {
        let mut state = self.write()?;
        let id = offer.id_typed();
        if state.offers.contains_key(&id) {
            return Err(DomainError::conflict(format!("offer {id} already exists")));
        }

        // Append to the stored row, not to whatever the caller last read:
        // two racing submissions must both land on `Order.offers`.
        let mut order = state.order(offer.order_id())?.clone();
        order.record_offer(id, offer.created_at())?;

        state.offers.insert(id, offer.clone());
        state.orders.insert(order.id_typed(), order.clone());
        Ok(order)
    }

    fn fetch_offer(&self, id: OfferId) -> DomainResult<Offer> {
        Ok(self.read()?.offer(id)?.clone())
    }

    fn offers_for_order(&self, order_id: OrderId) -> DomainResult<Vec<Offer>> {
        let state = self.read()?;
        let mut offers: Vec<Offer> = state
            .offers
            .values()
            .filter(|o| o.order_id() == order_id)
            .cloned()
            .collect();
        offers.sort_by_key(|o| (o.created_at(), o.id_typed().as_uuid().as_u128()));
        Ok(offers)
    }

    fn commit_decline(
        &self,
        offer_id: OfferId,
        now: DateTime<Utc>,
    ) -> DomainResult<(Order, Offer)> {
        let mut state = self.write()?;
        let mut offer = state.offer(offer_id)?.clone();
        let mut order = state.order(offer.order_id())?.clone();

        offer.decline()?;
        order.remove_offer(offer_id, now);

        state.offers.insert(offer_id, offer.clone());
        state.orders.insert(order.id_typed(), order.clone());
        Ok((order, offer))
    }

    fn commit_acceptance(
        &self,
        offer_id: OfferId,
        now: DateTime<Utc>,
    ) -> DomainResult<(Order, Offer, Vec<Offer>)> {
        let mut state = self.write()?;
        let mut accepted = state.offer(offer_id)?.clone();
        let mut order = state.order(accepted.order_id())?.clone();

        accepted.accept()?;
        order.apply_acceptance(
            offer_id,
            accepted.offerer(),
            accepted.offerer_name(),
            accepted.terms().to_price_snapshot(),
            now,
        )?;

        // Sibling disqualification derives from the stored rows, under the
        // same guard as the acceptance itself.
        let mut declined: Vec<Offer> = state
            .offers
            .values()
            .filter(|o| o.order_id() == order.id_typed() && o.id_typed() != offer_id && o.is_open())
            .cloned()
            .collect();
        declined.sort_by_key(|o| (o.created_at(), o.id_typed().as_uuid().as_u128()));
        for sibling in &mut declined {
            sibling.decline()?;
        }

        // Single commit: the order and every touched offer land together.
        state.orders.insert(order.id_typed(), order.clone());
        state.offers.insert(offer_id, accepted.clone());
        for sibling in &declined {
            state.offers.insert(sibling.id_typed(), sibling.clone());
        }
        Ok((order, accepted, declined))
    }

    fn upsert_parts(&self, parts: &[Part]) -> DomainResult<()> {
        let mut state = self.write()?;
        for part in parts {
            state.parts.insert(part.id_typed(), part.clone());
        }
        Ok(())
    }

    fn fetch_part(&self, id: PartId) -> DomainResult<Part> {
        self.read()?
            .parts
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("part {id}")))
    }

    fn parts_for_order(&self, order_id: OrderId) -> DomainResult<Vec<Part>> {
        let state = self.read()?;
        let mut parts: Vec<Part> = state
            .parts
            .values()
            .filter(|p| p.order_id() == order_id)
            .cloned()
            .collect();
        parts.sort_by(|a, b| a.storage_path().cmp(b.storage_path()));
        Ok(parts)
    }

    fn insert_assembly(&self, assembly: &Assembly, part_ids: &[PartId]) -> DomainResult<()> {
        let mut state = self.write()?;
        let id = assembly.id_typed();
        if state.assemblies.contains_key(&id) {
            return Err(DomainError::conflict(format!("assembly {id} already exists")));
        }

        // Partition invariant re-check under the write guard.
        let assigned = state.assigned_parts(assembly.order_id());
        if let Some(taken) = part_ids.iter().find(|p| assigned.contains(p)) {
            return Err(DomainError::conflict(format!(
                "part {taken} was assigned to another assembly concurrently"
            )));
        }

        state.assemblies.insert(id, assembly.clone());
        state.assembly_parts.insert(id, part_ids.to_vec());
        Ok(())
    }

    fn fetch_assembly(&self, id: AssemblyId) -> DomainResult<Assembly> {
        Ok(self.read()?.assembly(id)?.clone())
    }

    fn assemblies_for_order(&self, order_id: OrderId) -> DomainResult<Vec<Assembly>> {
        let state = self.read()?;
        let mut assemblies: Vec<Assembly> = state
            .assemblies
            .values()
            .filter(|a| a.order_id() == order_id)
            .cloned()
            .collect();
        // Sequenced assemblies first, then unsequenced by creation time.
        assemblies.sort_by_key(|a| (a.build_order().is_none(), a.build_order(), a.created_at()));
        Ok(assemblies)
    }

    fn update_assembly(&self, assembly: &Assembly) -> DomainResult<()> {
        let mut state = self.write()?;
        let id = assembly.id_typed();
        state.assembly(id)?;
        state.assemblies.insert(id, assembly.clone());
        Ok(())
    }

    fn assembly_parts(&self, assembly_id: AssemblyId) -> DomainResult<Vec<PartId>> {
        let state = self.read()?;
        state.assembly(assembly_id)?;
        Ok(state
            .assembly_parts
            .get(&assembly_id)
            .cloned()
            .unwrap_or_default())
    }

    fn assigned_part_ids(&self, order_id: OrderId) -> DomainResult<HashSet<PartId>> {
        Ok(self.read()?.assigned_parts(order_id))
    }

    fn set_build_orders(
        &self,
        order_id: OrderId,
        sequence: &[(AssemblyId, u32)],
    ) -> DomainResult<()> {
        let mut state = self.write()?;

        // Validate the whole batch before touching any row.
        let mut updated = Vec::with_capacity(sequence.len());
        for (assembly_id, position) in sequence {
            let assembly = state.assembly(*assembly_id)?;
            if assembly.order_id() != order_id {
                return Err(DomainError::validation(format!(
                    "assembly {assembly_id} does not belong to order {order_id}"
                )));
            }
            let mut assembly = assembly.clone();
            assembly.set_build_order(*position)?;
            updated.push(assembly);
        }

        for assembly in updated {
            state.assemblies.insert(assembly.id_typed(), assembly);
        }
        Ok(())
    }

    fn upsert_specification(&self, spec: &PartSpecification) -> DomainResult<()> {
        let mut state = self.write()?;
        state.specifications.insert(spec.key(), spec.clone());
        Ok(())
    }

    fn specification(
        &self,
        assembly_id: AssemblyId,
        part_id: PartId,
    ) -> DomainResult<Option<PartSpecification>> {
        Ok(self.read()?.specifications.get(&(assembly_id, part_id)).cloned())
    }

    fn specifications_for_assembly(
        &self,
        assembly_id: AssemblyId,
    ) -> DomainResult<Vec<PartSpecification>> {
        let state = self.read()?;
        let mut specs: Vec<PartSpecification> = state
            .specifications
            .values()
            .filter(|s| s.assembly_id == assembly_id)
            .cloned()
            .collect();
        specs.sort_by_key(|s| s.part_id);
        Ok(specs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fablink_assemblies::SpecSheet;

    #[test]
    fn fetch_missing_order_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.fetch_order(OrderId::new()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn duplicate_order_insert_conflicts() {
        use fablink_auth::{Actor, Role};
        use fablink_core::UserId;

        let store = InMemoryStore::new();
        let creator = Actor::new(UserId::new(), "alice", Role::Creator);
        let order = Order::create(&creator, "x", vec![], Utc::now()).unwrap();
        store.insert_order(order.clone()).unwrap();
        let err = store.insert_order(order).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn racing_offer_inserts_both_land_on_the_order() {
        use fablink_auth::{Actor, Role};
        use fablink_core::UserId;
        use fablink_offers::OfferTerms;

        let store = InMemoryStore::new();
        let creator = Actor::new(UserId::new(), "alice", Role::Creator);
        let maker = Actor::new(UserId::new(), "mfg", Role::Manufacturer);
        let order = Order::create(&creator, "x", vec![], Utc::now()).unwrap();
        store.insert_order(order.clone()).unwrap();

        let terms = OfferTerms {
            unit_cost: 100,
            projected_cost: 10_000,
            projected_units: 100,
            shipping_cost: 0,
            lead_time_days: 7,
        };
        // both built from the same initial view of the order, as two
        // concurrent submissions would be
        let first = Offer::submit(&maker, order.id_typed(), terms, Utc::now()).unwrap();
        let second = Offer::submit(&maker, order.id_typed(), terms, Utc::now()).unwrap();
        store.insert_offer(&first).unwrap();
        let stored = store.insert_offer(&second).unwrap();

        assert!(stored.offers().contains(&first.id_typed()));
        assert!(stored.offers().contains(&second.id_typed()));
        assert_eq!(stored.offers().len(), 2);
    }

    #[test]
    fn insert_assembly_rechecks_partition_under_lock() {
        let store = InMemoryStore::new();
        let order_id = OrderId::new();
        let part = Part::new(order_id, "base", "cad/base.step", vec![]);
        store.upsert_parts(&[part.clone()]).unwrap();

        let a = Assembly::new(order_id, "A", Utc::now()).unwrap();
        let b = Assembly::new(order_id, "B", Utc::now()).unwrap();
        store.insert_assembly(&a, &[part.id_typed()]).unwrap();

        let err = store.insert_assembly(&b, &[part.id_typed()]).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        // the conflicting assembly left no rows behind
        assert!(store.fetch_assembly(b.id_typed()).is_err());
    }

    #[test]
    fn set_build_orders_rejects_foreign_assembly_without_partial_write() {
        let store = InMemoryStore::new();
        let order_id = OrderId::new();
        let ours = Assembly::new(order_id, "ours", Utc::now()).unwrap();
        let foreign = Assembly::new(OrderId::new(), "foreign", Utc::now()).unwrap();
        store.insert_assembly(&ours, &[PartId::new()]).unwrap();
        store.insert_assembly(&foreign, &[PartId::new()]).unwrap();

        let err = store
            .set_build_orders(order_id, &[(ours.id_typed(), 1), (foreign.id_typed(), 2)])
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.fetch_assembly(ours.id_typed()).unwrap().build_order(), None);
    }

    #[test]
    fn specification_upsert_replaces_by_key() {
        let store = InMemoryStore::new();
        let order_id = OrderId::new();
        let assembly_id = AssemblyId::new();
        let part_id = PartId::new();

        let first =
            PartSpecification::new(order_id, assembly_id, part_id, 1, SpecSheet::default())
                .unwrap();
        let second =
            PartSpecification::new(order_id, assembly_id, part_id, 9, SpecSheet::default())
                .unwrap();

        store.upsert_specification(&first).unwrap();
        store.upsert_specification(&second).unwrap();

        let specs = store.specifications_for_assembly(assembly_id).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].quantity, 9);
    }
}
