use serde::{Deserialize, Serialize};

use partuniverse_core::{CategoryId, Entity};

use crate::tree::TreeNode;

/// Classification tag for parts (e.g. "resistor"), optionally nested.
///
/// Unique on (`name`, `parent`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub parent: Option<CategoryId>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            parent: None,
            description: None,
        }
    }

    pub fn with_parent(mut self, parent: CategoryId) -> Self {
        self.parent = Some(parent);
        self
    }
}

impl Entity for Category {
    type Id = CategoryId;
    const KIND: &'static str = "category";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl TreeNode for Category {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent(&self) -> Option<CategoryId> {
        self.parent
    }
}
