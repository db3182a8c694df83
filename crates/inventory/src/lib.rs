//! Inventory domain module: parts, storage places, categories and the stock
//! ledger that keeps storage item balances consistent with their transactions.
//!
//! Persistence is a collaborator behind [`InventoryStore`]; this crate only
//! ships an in-memory implementation for tests, tooling and development.

pub mod category;
pub mod config;
pub mod ledger;
pub mod memory;
pub mod part;
pub mod storage;
pub mod storage_item;
pub mod store;
pub mod transaction;
pub mod tree;
pub mod unit;

pub use category::Category;
pub use config::LedgerConfig;
pub use ledger::{InventoryLedger, PartStock, Shortage};
pub use memory::{InMemoryStore, InventorySnapshot};
pub use part::{Distributor, Manufacturer, Part};
pub use storage::{StoragePlace, StorageType};
pub use storage_item::StorageItem;
pub use store::{Change, ChangeSet, InventoryStore, Record, RecordKey};
pub use transaction::{Transaction, TransactionState};
pub use tree::{TreeArena, TreeNode};
pub use unit::{Unit, UnitGroup};
