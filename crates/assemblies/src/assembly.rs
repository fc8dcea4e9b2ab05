use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fablink_core::{AssemblyId, DomainError, DomainResult, Entity, OrderId, PartId};

/// Entity: a named grouping of parts slated for sequential manufacture.
///
/// Part membership is fixed at creation (the join rows live in the store);
/// afterwards an assembly only changes by taking a build-order slot or by
/// having its completeness flag declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assembly {
    id: AssemblyId,
    order_id: OrderId,
    name: String,
    build_order: Option<u32>,
    specifications_completed: bool,
    created_at: DateTime<Utc>,
}

impl Assembly {
    pub fn new(order_id: OrderId, name: impl Into<String>, now: DateTime<Utc>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("assembly name cannot be empty"));
        }
        Ok(Self {
            id: AssemblyId::new(),
            order_id,
            name,
            build_order: None,
            specifications_completed: false,
            created_at: now,
        })
    }

    pub fn id_typed(&self) -> AssemblyId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn build_order(&self) -> Option<u32> {
        self.build_order
    }

    pub fn specifications_completed(&self) -> bool {
        self.specifications_completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Assign the 1-based position in the manufacturing sequence.
    pub fn set_build_order(&mut self, position: u32) -> DomainResult<()> {
        if position == 0 {
            return Err(DomainError::validation("build order positions start at 1"));
        }
        self.build_order = Some(position);
        Ok(())
    }

    /// Declare the assembly's specifications complete.
    ///
    /// The caller (SpecificationTracker) verifies that every linked part
    /// has a specification record before flipping this flag.
    pub fn mark_specifications_complete(&mut self) {
        self.specifications_completed = true;
    }
}

impl Entity for Assembly {
    type Id = AssemblyId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Join row linking a part into an assembly.
///
/// Within one order a part appears in at most one assembly: assemblies
/// partition the assigned parts (unassigned parts may remain).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssemblyPart {
    pub assembly_id: AssemblyId,
    pub part_id: PartId,
}
