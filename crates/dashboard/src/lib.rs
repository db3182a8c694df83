//! Read-only dashboard over the inventory ledger.
//!
//! Items render to JSON; turning that into HTML is left to the caller.

pub mod below_minimum;
pub mod error;
pub mod item;
pub mod recent_transactions;

pub use below_minimum::{PartsBelowMinimum, ShortageRow};
pub use error::DashboardError;
pub use item::{DashboardItem, DashboardRegistry, RenderedItem};
pub use recent_transactions::{MostRecentTransactions, TransactionRow};

use partuniverse_inventory::{
    InMemoryStore, InventoryLedger, InventorySnapshot, InventoryStore, LedgerConfig,
};

/// Registry with every built-in item.
pub fn default_registry<S>(ledger: &InventoryLedger<S>) -> DashboardRegistry<'_>
where
    S: InventoryStore,
{
    let mut registry = DashboardRegistry::new();
    registry
        .add(MostRecentTransactions::new(ledger))
        .add(PartsBelowMinimum::new(ledger));
    registry
}

/// Build a ledger over an in-memory store loaded from a JSON snapshot.
pub fn ledger_from_json(
    raw: &str,
    config: LedgerConfig,
) -> Result<InventoryLedger<InMemoryStore>, DashboardError> {
    let snapshot: InventorySnapshot = serde_json::from_str(raw)?;
    let store = InMemoryStore::from_snapshot(snapshot)?;
    Ok(InventoryLedger::with_config(store, config))
}
