use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use partuniverse_core::{CategoryId, DistributorId, Entity, ManufacturerId, PartId, UserId};

use crate::unit::Unit;

/// Manufacturer of a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    pub id: ManufacturerId,
    pub name: String,
    pub creation_time: DateTime<Utc>,
    pub created_by: UserId,
}

impl Manufacturer {
    pub fn new(name: impl Into<String>, created_by: UserId) -> Self {
        Self {
            id: ManufacturerId::new(),
            name: name.into(),
            creation_time: Utc::now(),
            created_by,
        }
    }
}

impl Entity for Manufacturer {
    type Id = ManufacturerId;
    const KIND: &'static str = "manufacturer";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A distributor selling parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distributor {
    pub id: DistributorId,
    pub name: String,
    pub creation_time: DateTime<Utc>,
    pub created_by: UserId,
}

impl Distributor {
    pub fn new(name: impl Into<String>, created_by: UserId) -> Self {
        Self {
            id: DistributorId::new(),
            name: name.into(),
            creation_time: Utc::now(),
            created_by,
        }
    }
}

impl Entity for Distributor {
    type Id = DistributorId;
    const KIND: &'static str = "distributor";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A kind of part, identified installation-wide by its SKU.
///
/// Quantities on hand are not stored here; they live on the part's
/// [`StorageItem`](crate::StorageItem)s and are summed by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Reorder threshold.
    #[serde(default)]
    pub min_stock: Option<Decimal>,
    /// `None` until a unit has been explicitly chosen.
    #[serde(default)]
    pub unit: Option<Unit>,
    #[serde(default)]
    pub manufacturer: Option<ManufacturerId>,
    #[serde(default)]
    pub distributor: Option<DistributorId>,
    #[serde(default)]
    pub categories: BTreeSet<CategoryId>,
    pub creation_time: DateTime<Utc>,
    pub created_by: UserId,
    #[serde(default)]
    pub disabled: bool,
}

impl Part {
    pub fn new(name: impl Into<String>, sku: impl Into<String>, created_by: UserId) -> Self {
        Self {
            id: PartId::new(),
            name: name.into(),
            sku: sku.into(),
            description: None,
            min_stock: None,
            unit: None,
            manufacturer: None,
            distributor: None,
            categories: BTreeSet::new(),
            creation_time: Utc::now(),
            created_by,
            disabled: false,
        }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_min_stock(mut self, min_stock: Decimal) -> Self {
        self.min_stock = Some(min_stock);
        self
    }

    pub fn in_category(mut self, category: CategoryId) -> Self {
        self.categories.insert(category);
        self
    }

    /// Whether `on_hand` is under this part's minimum. Always false without a minimum.
    pub fn is_below_minimum(&self, on_hand: Decimal) -> bool {
        matches!(self.min_stock, Some(min) if on_hand < min)
    }
}

impl Entity for Part {
    type Id = PartId;
    const KIND: &'static str = "part";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
