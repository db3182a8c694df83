use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value as JsonValue;

use partuniverse_core::{DomainResult, PartId};
use partuniverse_inventory::{InventoryLedger, InventoryStore};

use crate::error::DashboardError;
use crate::item::DashboardItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortageRow {
    pub part: PartId,
    pub sku: String,
    pub name: String,
    pub on_stock: Decimal,
    pub min_stock: Option<Decimal>,
}

/// Parts to reorder: stock on hand under their minimum.
pub struct PartsBelowMinimum<'a, S> {
    ledger: &'a InventoryLedger<S>,
}

impl<'a, S> PartsBelowMinimum<'a, S>
where
    S: InventoryStore,
{
    pub fn new(ledger: &'a InventoryLedger<S>) -> Self {
        Self { ledger }
    }

    pub fn rows(&self) -> DomainResult<Vec<ShortageRow>> {
        Ok(self
            .ledger
            .parts_below_minimum()?
            .into_iter()
            .map(|shortage| ShortageRow {
                part: shortage.part.id,
                sku: shortage.part.sku,
                name: shortage.part.name,
                on_stock: shortage.on_stock,
                min_stock: shortage.part.min_stock,
            })
            .collect())
    }
}

impl<S> DashboardItem for PartsBelowMinimum<'_, S>
where
    S: InventoryStore,
{
    fn id(&self) -> &'static str {
        "parts_below_minimum"
    }

    fn name(&self) -> &'static str {
        "Parts below minimum stock"
    }

    fn description(&self) -> &'static str {
        "Parts whose stock on hand is under their minimum."
    }

    fn render(&self) -> Result<JsonValue, DashboardError> {
        Ok(serde_json::to_value(self.rows()?)?)
    }
}
