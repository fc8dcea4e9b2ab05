//! Assembly planning: part registration, grouping, build sequencing.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use fablink_assemblies::{Assembly, Part, PartNode, build_part_tree};
use fablink_auth::Actor;
use fablink_core::{AssemblyId, DomainError, DomainResult, OrderId, PartId};

use crate::store::MarketStore;

/// A part as returned by the external CAD-splitting service: a name, the
/// storage path of the derived geometry, and the folder path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedPart {
    pub name: String,
    pub storage_path: String,
    pub hierarchy: Vec<String>,
}

/// Partitions an order's CAD-derived parts into named assemblies and
/// orders those assemblies into a build sequence.
pub struct AssemblyPlanner<S> {
    store: Arc<S>,
}

impl<S> AssemblyPlanner<S>
where
    S: MarketStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Register the flat part list produced by the external splitter.
    ///
    /// Part ids are derived from `(order_id, storage_path)`, so
    /// re-registering the same upload is an idempotent upsert.
    pub fn decompose(
        &self,
        actor: &Actor,
        order_id: OrderId,
        derived: Vec<DerivedPart>,
    ) -> DomainResult<Vec<Part>> {
        let order = self.store.fetch_order(order_id)?;
        actor.require_user(order.creator(), "the order's creator")?;

        let parts: Vec<Part> = derived
            .into_iter()
            .map(|d| Part::new(order_id, d.name, d.storage_path, d.hierarchy))
            .collect();
        self.store.upsert_parts(&parts)?;

        tracing::info!(order_id = %order_id, parts = parts.len(), "parts registered");
        Ok(parts)
    }

    /// The display hierarchy of an order's parts.
    pub fn part_tree(&self, order_id: OrderId) -> DomainResult<Vec<PartNode>> {
        let parts = self.store.parts_for_order(order_id)?;
        Ok(build_part_tree(parts))
    }

    /// Group parts into a new assembly.
    ///
    /// Rejects an empty part list and any part already claimed by another
    /// assembly of the order (assemblies partition the assigned parts).
    /// The assembly row and its links land as one commit.
    pub fn create_assembly(
        &self,
        actor: &Actor,
        order_id: OrderId,
        name: impl Into<String>,
        part_ids: Vec<PartId>,
    ) -> DomainResult<Assembly> {
        let order = self.store.fetch_order(order_id)?;
        actor.require_user(order.creator(), "the order's creator")?;

        if part_ids.is_empty() {
            return Err(DomainError::validation(
                "an assembly needs at least one part",
            ));
        }
        let unique: HashSet<PartId> = part_ids.iter().copied().collect();
        if unique.len() != part_ids.len() {
            return Err(DomainError::validation("duplicate part ids in assembly"));
        }

        for part_id in &part_ids {
            let part = self.store.fetch_part(*part_id)?;
            if part.order_id() != order_id {
                return Err(DomainError::validation(format!(
                    "part {part_id} does not belong to order {order_id}"
                )));
            }
        }

        let assigned = self.store.assigned_part_ids(order_id)?;
        if let Some(taken) = part_ids.iter().find(|p| assigned.contains(p)) {
            return Err(DomainError::validation(format!(
                "part {taken} is already assigned to another assembly"
            )));
        }

        let assembly = Assembly::new(order_id, name, Utc::now())?;
        self.store.insert_assembly(&assembly, &part_ids)?;

        tracing::info!(
            order_id = %order_id,
            assembly_id = %assembly.id_typed(),
            parts = part_ids.len(),
            "assembly created"
        );
        Ok(assembly)
    }

    /// Replace the full build sequence of an order.
    ///
    /// The caller submits the complete ordered id list — it must be a
    /// permutation of the order's assemblies. Positions are assigned
    /// `index + 1` in a single batch write.
    pub fn reorder_assemblies(
        &self,
        actor: &Actor,
        order_id: OrderId,
        ordered_ids: &[AssemblyId],
    ) -> DomainResult<Vec<Assembly>> {
        let order = self.store.fetch_order(order_id)?;
        actor.require_user(order.creator(), "the order's creator")?;

        let existing: HashSet<AssemblyId> = self
            .store
            .assemblies_for_order(order_id)?
            .iter()
            .map(|a| a.id_typed())
            .collect();
        let submitted: HashSet<AssemblyId> = ordered_ids.iter().copied().collect();
        if submitted.len() != ordered_ids.len() {
            return Err(DomainError::validation("duplicate assembly ids in sequence"));
        }
        if submitted != existing {
            return Err(DomainError::validation(
                "sequence must list every assembly of the order exactly once",
            ));
        }

        let sequence: Vec<(AssemblyId, u32)> = ordered_ids
            .iter()
            .enumerate()
            .map(|(idx, id)| (*id, idx as u32 + 1))
            .collect();
        self.store.set_build_orders(order_id, &sequence)?;

        tracing::info!(order_id = %order_id, assemblies = sequence.len(), "build sequence replaced");
        self.store.assemblies_for_order(order_id)
    }

    pub fn assemblies_for_order(&self, order_id: OrderId) -> DomainResult<Vec<Assembly>> {
        self.store.assemblies_for_order(order_id)
    }

    /// Parts of the order not yet claimed by any assembly.
    pub fn unassigned_parts(&self, order_id: OrderId) -> DomainResult<Vec<Part>> {
        let assigned = self.store.assigned_part_ids(order_id)?;
        Ok(self
            .store
            .parts_for_order(order_id)?
            .into_iter()
            .filter(|p| !assigned.contains(&p.id_typed()))
            .collect())
    }
}
