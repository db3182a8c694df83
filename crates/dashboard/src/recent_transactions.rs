use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value as JsonValue;

use partuniverse_core::{DomainResult, StorageItemId, TransactionId};
use partuniverse_inventory::{InventoryLedger, InventoryStore};

use crate::error::DashboardError;
use crate::item::DashboardItem;

/// One line of the most-recent-transactions table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRow {
    pub id: TransactionId,
    pub date: DateTime<Utc>,
    pub subject: String,
    /// "<part>; <storage place path>", when the storage item still exists.
    pub storage_item: Option<String>,
    pub amount: Decimal,
    pub state: Option<&'static str>,
}

/// Table of the newest transactions, most recent first.
pub struct MostRecentTransactions<'a, S> {
    ledger: &'a InventoryLedger<S>,
}

impl<'a, S> MostRecentTransactions<'a, S>
where
    S: InventoryStore,
{
    pub fn new(ledger: &'a InventoryLedger<S>) -> Self {
        Self { ledger }
    }

    pub fn rows(&self) -> DomainResult<Vec<TransactionRow>> {
        self.ledger
            .recent_transactions()?
            .into_iter()
            .map(|tx| -> DomainResult<TransactionRow> {
                let storage_item = match tx.storage_item {
                    Some(id) => self.storage_item_label(id)?,
                    None => None,
                };
                Ok(TransactionRow {
                    id: tx.id,
                    date: tx.date,
                    subject: tx.subject,
                    storage_item,
                    amount: tx.amount,
                    state: tx.state.map(|s| s.label()),
                })
            })
            .collect()
    }

    fn storage_item_label(&self, id: StorageItemId) -> DomainResult<Option<String>> {
        let store = self.ledger.store();
        let Some(item) = store.storage_item(&id)? else {
            return Ok(None);
        };
        let part = store
            .part(&item.part)?
            .map(|p| p.name)
            .unwrap_or_else(|| item.part.to_string());
        let place = self.ledger.storage_place_path(item.storage)?;
        Ok(Some(format!("{part}; {place}")))
    }
}

impl<S> DashboardItem for MostRecentTransactions<'_, S>
where
    S: InventoryStore,
{
    fn id(&self) -> &'static str {
        "most_recent_transactions"
    }

    fn name(&self) -> &'static str {
        "Most recent transactions"
    }

    fn description(&self) -> &'static str {
        "A table with the most recent transactions."
    }

    fn render(&self) -> Result<JsonValue, DashboardError> {
        Ok(serde_json::to_value(self.rows()?)?)
    }
}
