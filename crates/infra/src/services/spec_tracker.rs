//! Specification completeness tracking.

use std::sync::Arc;

use fablink_assemblies::{Assembly, PartSpecification, SpecSheet};
use fablink_auth::Actor;
use fablink_core::{AssemblyId, DomainError, DomainResult, OrderId, PartId};

use crate::store::MarketStore;

/// Advisory completion figures for display. Distinct from the persisted
/// `specifications_completed` flag that gates progression.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CompletionSummary {
    pub specified: usize,
    pub total: usize,
}

impl CompletionSummary {
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.specified * 100 / self.total) as u32
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.specified == self.total
    }
}

/// Records structured specifications per (assembly, part) pair and derives
/// assembly-level completeness.
pub struct SpecificationTracker<S> {
    store: Arc<S>,
}

impl<S> SpecificationTracker<S>
where
    S: MarketStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Upsert the specification for one part within one assembly.
    ///
    /// Re-saving the same `(assembly, part)` pair edits in place.
    pub fn save_part_specification(
        &self,
        actor: &Actor,
        order_id: OrderId,
        assembly_id: AssemblyId,
        part_id: PartId,
        quantity: u32,
        specs: SpecSheet,
    ) -> DomainResult<PartSpecification> {
        let order = self.store.fetch_order(order_id)?;
        actor.require_user(order.creator(), "the order's creator")?;

        let assembly = self.store.fetch_assembly(assembly_id)?;
        if assembly.order_id() != order_id {
            return Err(DomainError::validation(format!(
                "assembly {assembly_id} does not belong to order {order_id}"
            )));
        }
        if !self.store.assembly_parts(assembly_id)?.contains(&part_id) {
            return Err(DomainError::validation(format!(
                "part {part_id} is not linked to assembly {assembly_id}"
            )));
        }

        let spec = PartSpecification::new(order_id, assembly_id, part_id, quantity, specs)?;
        self.store.upsert_specification(&spec)?;

        tracing::info!(
            order_id = %order_id,
            assembly_id = %assembly_id,
            part_id = %part_id,
            "part specification saved"
        );
        Ok(spec)
    }

    /// Declare an assembly's specifications complete.
    ///
    /// Succeeds only when every linked part already has a specification
    /// record. Assembly membership is fixed at creation, so the declared
    /// flag cannot be invalidated by later membership changes.
    pub fn mark_assembly_complete(
        &self,
        actor: &Actor,
        assembly_id: AssemblyId,
    ) -> DomainResult<Assembly> {
        let mut assembly = self.store.fetch_assembly(assembly_id)?;
        let order = self.store.fetch_order(assembly.order_id())?;
        actor.require_user(order.creator(), "the order's creator")?;

        let summary = self.completion(assembly_id)?;
        if !summary.is_complete() {
            return Err(DomainError::validation(format!(
                "assembly has specifications for {} of {} parts",
                summary.specified, summary.total
            )));
        }

        assembly.mark_specifications_complete();
        self.store.update_assembly(&assembly)?;

        tracing::info!(assembly_id = %assembly_id, "assembly specifications complete");
        Ok(assembly)
    }

    /// Parts-with-specification over total parts for one assembly.
    pub fn completion(&self, assembly_id: AssemblyId) -> DomainResult<CompletionSummary> {
        let part_ids = self.store.assembly_parts(assembly_id)?;
        let mut specified = 0;
        for part_id in &part_ids {
            if self.store.specification(assembly_id, *part_id)?.is_some() {
                specified += 1;
            }
        }
        Ok(CompletionSummary {
            specified,
            total: part_ids.len(),
        })
    }
}
