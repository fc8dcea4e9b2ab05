//! Per-part manufacturing specifications.
//!
//! The reference system carried these as an open-ended nested object; here
//! the sheet is a fixed struct with well-defined sub-sections so the
//! serialization boundary is explicit and versionable. Every field is
//! optional: a sheet exists as soon as the creator starts filling it in.

use serde::{Deserialize, Serialize};

use fablink_core::{AssemblyId, DomainError, DomainResult, OrderId, PartId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    /// e.g. "6061-T6", "PA12".
    pub designation: Option<String>,
    /// e.g. "bar stock", "sheet", "powder".
    pub stock_form: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// e.g. "CNC milling", "SLS".
    pub method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tolerances {
    /// General tolerance class, e.g. "ISO 2768-m".
    pub general: Option<String>,
    /// Callouts tighter than the general class.
    pub critical: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceFinish {
    /// e.g. "Ra 1.6".
    pub roughness: Option<String>,
    /// e.g. "anodize type II, black".
    pub coating: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatTreatment {
    /// e.g. "stress relieve", "case harden".
    pub process: Option<String>,
    /// e.g. "58-62 HRC".
    pub hardness: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryOperations {
    /// e.g. ["deburr", "tap M6", "press-fit insert"].
    pub operations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspection {
    /// e.g. "AQL 1.0", "100% dimensional".
    pub level: Option<String>,
    pub report_required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compliance {
    /// e.g. ["RoHS", "REACH"].
    pub standards: Vec<String>,
    /// e.g. ["material cert", "CoC"].
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marking {
    /// e.g. "laser engrave".
    pub method: Option<String>,
    /// e.g. part number + revision.
    pub content: Option<String>,
}

/// The full specification sheet for one part within one assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecSheet {
    pub material: Material,
    pub process: Process,
    pub tolerances: Tolerances,
    pub surface_finish: SurfaceFinish,
    pub heat_treatment: HeatTreatment,
    pub secondary_operations: SecondaryOperations,
    pub inspection: Inspection,
    pub compliance: Compliance,
    pub marking: Marking,
}

/// One specification record per `(order, assembly, part)`.
///
/// Upsert semantics: saving again replaces the record, never duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSpecification {
    pub order_id: OrderId,
    pub assembly_id: AssemblyId,
    pub part_id: PartId,
    pub quantity: u32,
    pub specs: SpecSheet,
}

impl PartSpecification {
    pub fn new(
        order_id: OrderId,
        assembly_id: AssemblyId,
        part_id: PartId,
        quantity: u32,
        specs: SpecSheet,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        Ok(Self {
            order_id,
            assembly_id,
            part_id,
            quantity,
            specs,
        })
    }

    /// The unique key a store upserts on.
    pub fn key(&self) -> (AssemblyId, PartId) {
        (self.assembly_id, self.part_id)
    }
}
