//! Assemblies domain module.
//!
//! CAD-derived parts, the display hierarchy built from their folder paths,
//! assemblies (named part groupings with a build sequence), and per-part
//! manufacturing specifications. Pure domain logic; the partition invariant
//! across an order's assemblies is enforced by the planner service in
//! `fablink-infra` against the stored join rows.

pub mod assembly;
pub mod part;
pub mod specification;
pub mod tree;

pub use assembly::{Assembly, AssemblyPart};
pub use part::{Part, derive_part_id};
pub use specification::{
    Compliance, HeatTreatment, Inspection, Marking, Material, PartSpecification, Process,
    SecondaryOperations, SpecSheet, SurfaceFinish, Tolerances,
};
pub use tree::{PartNode, build_part_tree};
