use serde::{Deserialize, Serialize};

use partuniverse_core::{Entity, StoragePlaceId, StorageTypeId};

use crate::tree::TreeNode;

/// General kind of storage (e.g. "shelf", "drawer cabinet").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageType {
    pub id: StorageTypeId,
    pub name: String,
}

impl StorageType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: StorageTypeId::new(),
            name: name.into(),
        }
    }
}

impl Entity for StorageType {
    type Id = StorageTypeId;
    const KIND: &'static str = "storage type";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A storage, or a particular spot inside one (e.g. a shelf of a cabinet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoragePlace {
    pub id: StoragePlaceId,
    pub name: String,
    pub storage_type: StorageTypeId,
    /// The storage this place is part of.
    #[serde(default)]
    pub parent: Option<StoragePlaceId>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub description: Option<String>,
}

impl StoragePlace {
    pub fn new(name: impl Into<String>, storage_type: StorageTypeId) -> Self {
        Self {
            id: StoragePlaceId::new(),
            name: name.into(),
            storage_type,
            parent: None,
            disabled: false,
            description: None,
        }
    }

    pub fn with_parent(mut self, parent: StoragePlaceId) -> Self {
        self.parent = Some(parent);
        self
    }
}

impl Entity for StoragePlace {
    type Id = StoragePlaceId;
    const KIND: &'static str = "storage place";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl TreeNode for StoragePlace {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<StoragePlaceId> {
        self.parent
    }
}
