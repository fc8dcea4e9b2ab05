use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fablink_core::{Entity, OrderId, PartId};

/// Namespace for deriving part ids (uuid v5).
const PART_ID_NAMESPACE: Uuid = Uuid::from_u128(0x9f2c_1b44_7a3e_4d06_b58a_2e91_c0de_fab1);

/// Derive the id for a part from its order and storage path.
///
/// The id is a name-based uuid over `(order_id, storage_path)`, so
/// re-decomposing the same uploaded file yields the same part ids and
/// assembly assignments stay valid across re-uploads.
pub fn derive_part_id(order_id: OrderId, storage_path: &str) -> PartId {
    let name = format!("{order_id}/{storage_path}");
    PartId::from_uuid(Uuid::new_v5(&PART_ID_NAMESPACE, name.as_bytes()))
}

/// Entity: a single CAD-derived component.
///
/// Parts are created once per decomposition and never mutated. The
/// `hierarchy` path segments mirror the CAD folder structure and are used
/// for tree display only, not for assignment logic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    id: PartId,
    order_id: OrderId,
    name: String,
    storage_path: String,
    hierarchy: Vec<String>,
}

impl Part {
    pub fn new(
        order_id: OrderId,
        name: impl Into<String>,
        storage_path: impl Into<String>,
        hierarchy: Vec<String>,
    ) -> Self {
        let storage_path = storage_path.into();
        Self {
            id: derive_part_id(order_id, &storage_path),
            order_id,
            name: name.into(),
            storage_path,
            hierarchy,
        }
    }

    pub fn id_typed(&self) -> PartId {
        self.id
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage_path(&self) -> &str {
        &self.storage_path
    }

    pub fn hierarchy(&self) -> &[String] {
        &self.hierarchy
    }
}

impl Entity for Part {
    type Id = PartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
