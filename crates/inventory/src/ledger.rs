//! Inventory ledger: tree integrity, stock computation, storage item merges and
//! transaction posting on top of an [`InventoryStore`].
//!
//! Every mutating operation holds the ledger's write lock across its whole
//! read-compute-commit sequence and writes through a single atomic
//! [`ChangeSet`], so balances are never half-updated and concurrent posts
//! against one storage item cannot lose an update.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use partuniverse_core::{
    CategoryId, DomainError, DomainResult, PartId, StorageItemId, StoragePlaceId, TransactionId,
};

use crate::category::Category;
use crate::config::LedgerConfig;
use crate::part::{Distributor, Manufacturer, Part};
use crate::storage::{StoragePlace, StorageType};
use crate::storage_item::{self, check_quantity, StorageItem};
use crate::store::{ChangeSet, InventoryStore};
use crate::transaction::Transaction;
use crate::tree;

/// Stock summary of one part that has storage items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartStock {
    pub part: PartId,
    /// Sum over the part's storage items; `None` when none of them is tracked.
    pub on_stock: Option<Decimal>,
    pub min_stock: Option<Decimal>,
    pub below_minimum: bool,
}

/// A part whose stock on hand is under its minimum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shortage {
    pub part: Part,
    pub on_stock: Decimal,
}

#[derive(Debug)]
pub struct InventoryLedger<S> {
    store: S,
    config: LedgerConfig,
    write_lock: Mutex<()>,
}

impl<S> InventoryLedger<S>
where
    S: InventoryStore,
{
    pub fn new(store: S) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        Self {
            store,
            config,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn write_guard(&self) -> DomainResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| DomainError::store("ledger write lock poisoned"))
    }

    fn commit(&self, changes: ChangeSet) -> DomainResult<()> {
        debug!(changes = changes.len(), "committing change set");
        self.store.commit(changes)
    }

    // ---------------------------------------------------------------------
    // Master data
    // ---------------------------------------------------------------------

    pub fn save_storage_type(&self, storage_type: StorageType) -> DomainResult<()> {
        let _guard = self.write_guard()?;
        require_text("name", &storage_type.name)?;

        let mut changes = ChangeSet::new();
        changes.upsert(storage_type);
        self.commit(changes)
    }

    /// Validate and store a storage place. Re-parenting that would make the
    /// place its own ancestor is rejected with a field error on `parent`.
    pub fn save_storage_place(&self, place: StoragePlace) -> DomainResult<()> {
        let _guard = self.write_guard()?;
        require_text("name", &place.name)?;
        require(
            self.store.storage_type(&place.storage_type)?,
            "storage type",
            place.storage_type,
        )?;

        let exists = self.store.storage_place(&place.id)?.is_some();
        tree::validate_parent(&place, exists, |id| self.store.storage_place(id))?;

        info!(storage_place = %place.id, parent = ?place.parent, "saving storage place");
        let mut changes = ChangeSet::new();
        changes.upsert(place);
        self.commit(changes)
    }

    /// Validate and store a category; (`name`, `parent`) must be unique.
    pub fn save_category(&self, category: Category) -> DomainResult<()> {
        let _guard = self.write_guard()?;
        require_text("name", &category.name)?;

        let exists = self.store.category(&category.id)?.is_some();
        tree::validate_parent(&category, exists, |id| self.store.category(id))?;

        let duplicate = self.store.categories()?.into_iter().any(|c| {
            c.id != category.id && c.name == category.name && c.parent == category.parent
        });
        if duplicate {
            return Err(DomainError::field(
                "name",
                format!("a category named '{}' already exists here", category.name),
            ));
        }

        info!(category = %category.id, parent = ?category.parent, "saving category");
        let mut changes = ChangeSet::new();
        changes.upsert(category);
        self.commit(changes)
    }

    pub fn save_manufacturer(&self, manufacturer: Manufacturer) -> DomainResult<()> {
        let _guard = self.write_guard()?;
        require_text("name", &manufacturer.name)?;

        let mut changes = ChangeSet::new();
        changes.upsert(manufacturer);
        self.commit(changes)
    }

    pub fn save_distributor(&self, distributor: Distributor) -> DomainResult<()> {
        let _guard = self.write_guard()?;
        require_text("name", &distributor.name)?;

        let mut changes = ChangeSet::new();
        changes.upsert(distributor);
        self.commit(changes)
    }

    /// Validate and store a part. The SKU must be unique and a unit chosen.
    pub fn save_part(&self, part: Part) -> DomainResult<()> {
        let _guard = self.write_guard()?;
        require_text("name", &part.name)?;
        require_text("sku", &part.sku)?;
        if part.unit.is_none() {
            return Err(DomainError::field("unit", "a unit must be selected"));
        }
        if let Some(min_stock) = part.min_stock {
            check_quantity("min_stock", min_stock)?;
        }

        let sku_taken = self
            .store
            .parts()?
            .into_iter()
            .any(|p| p.id != part.id && p.sku == part.sku);
        if sku_taken {
            return Err(DomainError::field(
                "sku",
                format!("a part with SKU '{}' already exists", part.sku),
            ));
        }

        if let Some(id) = part.manufacturer {
            require(self.store.manufacturer(&id)?, "manufacturer", id)?;
        }
        if let Some(id) = part.distributor {
            require(self.store.distributor(&id)?, "distributor", id)?;
        }
        for id in &part.categories {
            require(self.store.category(id)?, "category", id)?;
        }

        info!(part = %part.id, sku = %part.sku, "saving part");
        let mut changes = ChangeSet::new();
        changes.upsert(part);
        self.commit(changes)
    }

    /// Validate and store a storage item; (`part`, `storage`) must be unique.
    pub fn save_storage_item(&self, item: StorageItem) -> DomainResult<()> {
        let _guard = self.write_guard()?;
        if let Some(on_stock) = item.on_stock {
            check_quantity("on_stock", on_stock)?;
        }
        require(self.store.part(&item.part)?, "part", item.part)?;
        require(
            self.store.storage_place(&item.storage)?,
            "storage place",
            item.storage,
        )?;

        let duplicate = self
            .store
            .storage_items_for_part(&item.part)?
            .into_iter()
            .any(|si| si.id != item.id && si.storage == item.storage);
        if duplicate {
            return Err(DomainError::validation(format!(
                "part {} already has a storage item at {}",
                item.part, item.storage
            )));
        }

        info!(storage_item = %item.id, on_stock = ?item.on_stock, "saving storage item");
        let mut changes = ChangeSet::new();
        changes.upsert(item);
        self.commit(changes)
    }

    // ---------------------------------------------------------------------
    // Trees
    // ---------------------------------------------------------------------

    /// The place itself followed by its ancestors up to the root.
    pub fn storage_place_ancestors(&self, id: StoragePlaceId) -> DomainResult<Vec<StoragePlaceId>> {
        tree::ancestor_chain::<StoragePlace, _>(id, |id| self.store.storage_place(id))
    }

    /// The category itself followed by its ancestors up to the root.
    pub fn category_ancestors(&self, id: CategoryId) -> DomainResult<Vec<CategoryId>> {
        tree::ancestor_chain::<Category, _>(id, |id| self.store.category(id))
    }

    /// e.g. `Workshop > Cabinet 2 > Drawer 7`
    pub fn storage_place_path(&self, id: StoragePlaceId) -> DomainResult<String> {
        tree::qualified_name::<StoragePlace, _>(id, &self.config.parent_delimiter, |id| {
            self.store.storage_place(id)
        })
    }

    pub fn category_path(&self, id: CategoryId) -> DomainResult<String> {
        tree::qualified_name::<Category, _>(id, &self.config.parent_delimiter, |id| {
            self.store.category(id)
        })
    }

    // ---------------------------------------------------------------------
    // Stock levels
    // ---------------------------------------------------------------------

    /// Quantity of `part` on hand over all storages; untracked items count as 0.
    pub fn total_on_stock(&self, part: &PartId) -> DomainResult<Decimal> {
        let items = self.store.storage_items_for_part(part)?;
        storage_item::total_on_stock(&items)
    }

    pub fn is_below_minimum(&self, part: &PartId) -> DomainResult<bool> {
        let p = require(self.store.part(part)?, "part", part)?;
        if p.min_stock.is_none() {
            return Ok(false);
        }
        Ok(p.is_below_minimum(self.total_on_stock(part)?))
    }

    pub fn has_stock(&self, part: &PartId) -> DomainResult<bool> {
        Ok(self.total_on_stock(part)? > Decimal::ZERO)
    }

    /// One row per part that has storage items, ordered by part id.
    pub fn stock_report(&self) -> DomainResult<Vec<PartStock>> {
        let mut sums: BTreeMap<PartId, Option<Decimal>> = BTreeMap::new();
        for si in self.store.storage_items()? {
            let sum = sums.entry(si.part).or_insert(None);
            if let Some(q) = si.on_stock {
                *sum = Some(checked_sum(sum.unwrap_or_default(), q)?);
            }
        }

        sums.into_iter()
            .map(|(part_id, on_stock)| -> DomainResult<PartStock> {
                let part = require(self.store.part(&part_id)?, "part", part_id)?;
                Ok(PartStock {
                    part: part_id,
                    on_stock,
                    min_stock: part.min_stock,
                    below_minimum: part.is_below_minimum(on_stock.unwrap_or_default()),
                })
            })
            .collect()
    }

    /// Parts whose stock on hand is under their minimum, ordered by name,
    /// each with the total it was compared against.
    pub fn parts_below_minimum(&self) -> DomainResult<Vec<Shortage>> {
        let mut totals: HashMap<PartId, Decimal> = HashMap::new();
        for si in self.store.storage_items()? {
            if let Some(q) = si.on_stock {
                let total = totals.entry(si.part).or_default();
                *total = checked_sum(*total, q)?;
            }
        }

        Ok(self
            .store
            .parts()?
            .into_iter()
            .filter_map(|part| {
                let on_stock = totals.get(&part.id).copied().unwrap_or_default();
                part.is_below_minimum(on_stock)
                    .then_some(Shortage { part, on_stock })
            })
            .collect())
    }

    // ---------------------------------------------------------------------
    // Merge
    // ---------------------------------------------------------------------

    /// Fold `source` into `target` (both storage items of `part`) and delete
    /// `source`. Returns the merged target.
    pub fn merge_storage_items(
        &self,
        part: &PartId,
        target: Option<StorageItemId>,
        source: Option<StorageItemId>,
    ) -> DomainResult<StorageItem> {
        let _guard = self.write_guard()?;

        let load = |id: Option<StorageItemId>| -> DomainResult<Option<StorageItem>> {
            Ok(match id {
                Some(id) => self.store.storage_item(&id)?,
                None => None,
            })
        };
        let (Some(mut target_item), Some(source_item)) = (load(target)?, load(source)?) else {
            return Err(DomainError::invalid_operation(format!(
                "one of the storage items seems to not exist: {target:?}, {source:?}"
            )));
        };

        if target_item.part != source_item.part || target_item.part != *part {
            return Err(DomainError::parts_mismatch(format!(
                "cannot merge storage items of different parts ({} and {}) into part {}",
                target_item.part, source_item.part, part
            )));
        }

        if target_item.id == source_item.id {
            return Err(DomainError::invalid_operation(
                "storage items are identical; nothing to merge",
            ));
        }

        let merged = storage_item::merged_on_stock(target_item.on_stock, source_item.on_stock)?;

        let mut changes = ChangeSet::new();
        if merged != target_item.on_stock {
            target_item.on_stock = merged;
            changes.upsert(target_item.clone());
        }
        changes.delete(source_item.id);
        self.commit(changes)?;

        info!(
            part = %part,
            target = %target_item.id,
            source = %source_item.id,
            on_stock = ?target_item.on_stock,
            "merged storage items"
        );
        Ok(target_item)
    }

    // ---------------------------------------------------------------------
    // Transactions
    // ---------------------------------------------------------------------

    /// Record a new transaction or an edit of an existing one, and move the
    /// referenced storage item's balance by the net amount.
    ///
    /// An edit first takes back the previously posted amount, so changing an
    /// amount from 10 to 15 moves the balance by +5. Untracked storage items
    /// stay untracked. Returns the storage item's balance after posting.
    pub fn post_transaction(&self, mut transaction: Transaction) -> DomainResult<Option<Decimal>> {
        let _guard = self.write_guard()?;
        require_text("subject", &transaction.subject)?;
        check_quantity("amount", transaction.amount)?;

        let item_id = transaction.storage_item.ok_or_else(|| {
            DomainError::ReferenceNotFound(format!(
                "transaction {} has no storage item",
                transaction.id
            ))
        })?;
        let mut item = require(self.store.storage_item(&item_id)?, "storage item", item_id)?;

        let mut changes = ChangeSet::new();
        let mut delta = transaction.amount;
        if let Some(prior) = self.store.transaction(&transaction.id)? {
            transaction.created_date = prior.created_date;
            match prior.storage_item {
                // net change only, so an edit near the limit is judged on its outcome
                Some(prior_item) if prior_item == item_id => {
                    delta = transaction.amount.checked_sub(prior.amount).ok_or_else(|| {
                        DomainError::validation("amount change overflows")
                    })?;
                }
                Some(prior_item) => match self.store.storage_item(&prior_item)? {
                    Some(mut old) => {
                        old.reverse(prior.amount)?;
                        if old.is_tracked() {
                            changes.upsert(old);
                        }
                    }
                    None => warn!(
                        transaction = %transaction.id,
                        storage_item = %prior_item,
                        "previous storage item is gone; nothing to take back"
                    ),
                },
                None => {}
            }
        }

        item.post(delta)?;
        let balance = item.on_stock;

        info!(
            transaction = %transaction.id,
            storage_item = %item_id,
            amount = %transaction.amount,
            on_stock = ?balance,
            "posting transaction"
        );
        changes.upsert(item);
        changes.upsert(transaction);
        self.commit(changes)?;

        Ok(balance)
    }

    /// Remove a transaction and take its amount back from its storage item.
    /// Returns the storage item's balance afterwards (`None` if untracked or
    /// the item no longer exists).
    pub fn delete_transaction(&self, id: &TransactionId) -> DomainResult<Option<Decimal>> {
        let _guard = self.write_guard()?;
        let transaction = require(self.store.transaction(id)?, "transaction", id)?;

        let mut changes = ChangeSet::new();
        let mut balance = None;
        if let Some(item_id) = transaction.storage_item {
            match self.store.storage_item(&item_id)? {
                Some(mut item) => {
                    item.reverse(transaction.amount)?;
                    balance = item.on_stock;
                    if item.is_tracked() {
                        changes.upsert(item);
                    }
                }
                None => warn!(
                    transaction = %id,
                    storage_item = %item_id,
                    "storage item is gone; deleting transaction only"
                ),
            }
        }
        changes.delete(*id);
        self.commit(changes)?;

        info!(transaction = %id, on_stock = ?balance, "deleted transaction");
        Ok(balance)
    }

    /// The configured number of most recent transactions, newest first.
    pub fn recent_transactions(&self) -> DomainResult<Vec<Transaction>> {
        self.store
            .recent_transactions(self.config.recent_transactions_limit)
    }
}

fn checked_sum(total: Decimal, quantity: Decimal) -> DomainResult<Decimal> {
    total
        .checked_add(quantity)
        .ok_or_else(|| DomainError::validation("total on stock overflows"))
}

fn require_text(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::field(field, "cannot be empty"));
    }
    Ok(())
}

fn require<T>(found: Option<T>, kind: &str, id: impl core::fmt::Display) -> DomainResult<T> {
    found.ok_or_else(|| DomainError::reference_not_found(kind, id))
}
