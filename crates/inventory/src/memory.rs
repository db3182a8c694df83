use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;
use std::sync::{RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};

use partuniverse_core::{
    CategoryId, DistributorId, DomainError, DomainResult, ManufacturerId, PartId, StorageItemId,
    StoragePlaceId, StorageTypeId, TransactionId,
};

use crate::category::Category;
use crate::part::{Distributor, Manufacturer, Part};
use crate::storage::{StoragePlace, StorageType};
use crate::storage_item::{check_quantity, StorageItem};
use crate::store::{Change, ChangeSet, InventoryStore, Record, RecordKey};
use crate::transaction::Transaction;
use crate::tree::TreeArena;

#[derive(Debug, Default)]
struct Tables {
    storage_types: HashMap<StorageTypeId, StorageType>,
    storage_places: HashMap<StoragePlaceId, StoragePlace>,
    categories: HashMap<CategoryId, Category>,
    manufacturers: HashMap<ManufacturerId, Manufacturer>,
    distributors: HashMap<DistributorId, Distributor>,
    parts: HashMap<PartId, Part>,
    storage_items: HashMap<StorageItemId, StorageItem>,
    transactions: HashMap<TransactionId, Transaction>,
}

impl Tables {
    fn contains(&self, key: &RecordKey) -> bool {
        match key {
            RecordKey::StorageType(id) => self.storage_types.contains_key(id),
            RecordKey::StoragePlace(id) => self.storage_places.contains_key(id),
            RecordKey::Category(id) => self.categories.contains_key(id),
            RecordKey::Manufacturer(id) => self.manufacturers.contains_key(id),
            RecordKey::Distributor(id) => self.distributors.contains_key(id),
            RecordKey::Part(id) => self.parts.contains_key(id),
            RecordKey::StorageItem(id) => self.storage_items.contains_key(id),
            RecordKey::Transaction(id) => self.transactions.contains_key(id),
        }
    }

    fn upsert(&mut self, record: Record) {
        match record {
            Record::StorageType(r) => {
                self.storage_types.insert(r.id, r);
            }
            Record::StoragePlace(r) => {
                self.storage_places.insert(r.id, r);
            }
            Record::Category(r) => {
                self.categories.insert(r.id, r);
            }
            Record::Manufacturer(r) => {
                self.manufacturers.insert(r.id, r);
            }
            Record::Distributor(r) => {
                self.distributors.insert(r.id, r);
            }
            Record::Part(r) => {
                self.parts.insert(r.id, r);
            }
            Record::StorageItem(r) => {
                self.storage_items.insert(r.id, r);
            }
            Record::Transaction(r) => {
                self.transactions.insert(r.id, r);
            }
        }
    }

    fn delete(&mut self, key: &RecordKey) {
        match key {
            RecordKey::StorageType(id) => {
                self.storage_types.remove(id);
            }
            RecordKey::StoragePlace(id) => {
                self.storage_places.remove(id);
            }
            RecordKey::Category(id) => {
                self.categories.remove(id);
            }
            RecordKey::Manufacturer(id) => {
                self.manufacturers.remove(id);
            }
            RecordKey::Distributor(id) => {
                self.distributors.remove(id);
            }
            RecordKey::Part(id) => {
                self.parts.remove(id);
            }
            RecordKey::StorageItem(id) => {
                self.storage_items.remove(id);
            }
            RecordKey::Transaction(id) => {
                self.transactions.remove(id);
            }
        }
    }
}

/// Serializable dump of a whole inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventorySnapshot {
    pub storage_types: Vec<StorageType>,
    pub storage_places: Vec<StoragePlace>,
    pub categories: Vec<Category>,
    pub manufacturers: Vec<Manufacturer>,
    pub distributors: Vec<Distributor>,
    pub parts: Vec<Part>,
    pub storage_items: Vec<StorageItem>,
    pub transactions: Vec<Transaction>,
}

impl InventorySnapshot {
    /// Reject a snapshot the ledger could not have written: trees that loop or
    /// dangle, dangling references of places, parts and storage items,
    /// duplicate SKUs, category names or (part, storage) pairs, and quantities
    /// outside the storable range.
    ///
    /// Transactions may point at storage items that were merged away or
    /// deleted since they were posted.
    pub fn validate(&self) -> DomainResult<()> {
        self.storage_places
            .iter()
            .cloned()
            .collect::<TreeArena<StoragePlace>>()
            .ensure_acyclic()?;
        self.categories
            .iter()
            .cloned()
            .collect::<TreeArena<Category>>()
            .ensure_acyclic()?;

        let storage_types: HashSet<_> = self.storage_types.iter().map(|r| r.id).collect();
        let places: HashSet<_> = self.storage_places.iter().map(|r| r.id).collect();
        let categories: HashSet<_> = self.categories.iter().map(|r| r.id).collect();
        let manufacturers: HashSet<_> = self.manufacturers.iter().map(|r| r.id).collect();
        let distributors: HashSet<_> = self.distributors.iter().map(|r| r.id).collect();
        let parts: HashSet<_> = self.parts.iter().map(|r| r.id).collect();

        for place in &self.storage_places {
            present(&storage_types, &place.storage_type, "storage type")?;
        }

        let mut category_names = HashSet::new();
        for category in &self.categories {
            if !category_names.insert((category.parent, category.name.as_str())) {
                return Err(DomainError::field(
                    "name",
                    format!("category '{}' appears twice under one parent", category.name),
                ));
            }
        }

        let mut skus = HashSet::new();
        for part in &self.parts {
            if !skus.insert(part.sku.as_str()) {
                return Err(DomainError::field(
                    "sku",
                    format!("SKU '{}' is used by more than one part", part.sku),
                ));
            }
            if let Some(min_stock) = part.min_stock {
                check_quantity("min_stock", min_stock)?;
            }
            if let Some(id) = &part.manufacturer {
                present(&manufacturers, id, "manufacturer")?;
            }
            if let Some(id) = &part.distributor {
                present(&distributors, id, "distributor")?;
            }
            for id in &part.categories {
                present(&categories, id, "category")?;
            }
        }

        let mut pairs = HashSet::new();
        for item in &self.storage_items {
            present(&parts, &item.part, "part")?;
            present(&places, &item.storage, "storage place")?;
            if !pairs.insert((item.part, item.storage)) {
                return Err(DomainError::validation(format!(
                    "part {} has more than one storage item at {}",
                    item.part, item.storage
                )));
            }
            if let Some(on_stock) = item.on_stock {
                check_quantity("on_stock", on_stock)?;
            }
        }

        for transaction in &self.transactions {
            check_quantity("amount", transaction.amount)?;
        }

        Ok(())
    }
}

fn present<Id>(ids: &HashSet<Id>, id: &Id, kind: &str) -> DomainResult<()>
where
    Id: Eq + Hash + Display,
{
    if ids.contains(id) {
        Ok(())
    } else {
        Err(DomainError::reference_not_found(kind, id))
    }
}

/// In-memory inventory store.
///
/// Intended for tests/dev and snapshot tooling. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot that passes [`InventorySnapshot::validate`].
    pub fn from_snapshot(snapshot: InventorySnapshot) -> DomainResult<Self> {
        snapshot.validate()?;

        let mut tables = Tables::default();
        let records = snapshot
            .storage_types
            .into_iter()
            .map(Record::from)
            .chain(snapshot.storage_places.into_iter().map(Record::from))
            .chain(snapshot.categories.into_iter().map(Record::from))
            .chain(snapshot.manufacturers.into_iter().map(Record::from))
            .chain(snapshot.distributors.into_iter().map(Record::from))
            .chain(snapshot.parts.into_iter().map(Record::from))
            .chain(snapshot.storage_items.into_iter().map(Record::from))
            .chain(snapshot.transactions.into_iter().map(Record::from));
        for record in records {
            tables.upsert(record);
        }

        Ok(Self {
            inner: RwLock::new(tables),
        })
    }

    /// Dump every record, each kind sorted by id.
    pub fn snapshot(&self) -> DomainResult<InventorySnapshot> {
        let t = self.read()?;
        Ok(InventorySnapshot {
            storage_types: sorted_by_id(t.storage_types.values(), |r| r.id),
            storage_places: sorted_by_id(t.storage_places.values(), |r| r.id),
            categories: sorted_by_id(t.categories.values(), |r| r.id),
            manufacturers: sorted_by_id(t.manufacturers.values(), |r| r.id),
            distributors: sorted_by_id(t.distributors.values(), |r| r.id),
            parts: sorted_by_id(t.parts.values(), |r| r.id),
            storage_items: sorted_by_id(t.storage_items.values(), |r| r.id),
            transactions: sorted_by_id(t.transactions.values(), |r| r.id),
        })
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, Tables>> {
        self.inner
            .read()
            .map_err(|_| DomainError::store("lock poisoned"))
    }
}

fn sorted_by_id<'a, T, K, F>(values: impl Iterator<Item = &'a T>, key: F) -> Vec<T>
where
    T: Clone + 'a,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut out: Vec<T> = values.cloned().collect();
    out.sort_by_key(|r| key(r));
    out
}

impl InventoryStore for InMemoryStore {
    fn storage_type(&self, id: &StorageTypeId) -> DomainResult<Option<StorageType>> {
        Ok(self.read()?.storage_types.get(id).cloned())
    }

    fn storage_place(&self, id: &StoragePlaceId) -> DomainResult<Option<StoragePlace>> {
        Ok(self.read()?.storage_places.get(id).cloned())
    }

    fn category(&self, id: &CategoryId) -> DomainResult<Option<Category>> {
        Ok(self.read()?.categories.get(id).cloned())
    }

    fn manufacturer(&self, id: &ManufacturerId) -> DomainResult<Option<Manufacturer>> {
        Ok(self.read()?.manufacturers.get(id).cloned())
    }

    fn distributor(&self, id: &DistributorId) -> DomainResult<Option<Distributor>> {
        Ok(self.read()?.distributors.get(id).cloned())
    }

    fn part(&self, id: &PartId) -> DomainResult<Option<Part>> {
        Ok(self.read()?.parts.get(id).cloned())
    }

    fn storage_item(&self, id: &StorageItemId) -> DomainResult<Option<StorageItem>> {
        Ok(self.read()?.storage_items.get(id).cloned())
    }

    fn transaction(&self, id: &TransactionId) -> DomainResult<Option<Transaction>> {
        Ok(self.read()?.transactions.get(id).cloned())
    }

    fn parts(&self) -> DomainResult<Vec<Part>> {
        let mut parts: Vec<_> = self.read()?.parts.values().cloned().collect();
        parts.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(parts)
    }

    fn storage_places(&self) -> DomainResult<Vec<StoragePlace>> {
        let mut places: Vec<_> = self.read()?.storage_places.values().cloned().collect();
        places.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(places)
    }

    fn categories(&self) -> DomainResult<Vec<Category>> {
        let mut categories: Vec<_> = self.read()?.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    fn storage_items(&self) -> DomainResult<Vec<StorageItem>> {
        let mut items: Vec<_> = self.read()?.storage_items.values().cloned().collect();
        items.sort_by_key(|si| (si.storage, si.part));
        Ok(items)
    }

    fn storage_items_for_part(&self, part: &PartId) -> DomainResult<Vec<StorageItem>> {
        let mut items: Vec<_> = self
            .read()?
            .storage_items
            .values()
            .filter(|si| si.part == *part)
            .cloned()
            .collect();
        items.sort_by_key(|si| si.storage);
        Ok(items)
    }

    fn recent_transactions(&self, limit: usize) -> DomainResult<Vec<Transaction>> {
        let mut txs: Vec<_> = self.read()?.transactions.values().cloned().collect();
        // Ties on `date` fall back to the time-ordered id, newest first.
        txs.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        txs.truncate(limit);
        Ok(txs)
    }

    fn commit(&self, changes: ChangeSet) -> DomainResult<()> {
        let mut tables = self
            .inner
            .write()
            .map_err(|_| DomainError::store("lock poisoned"))?;

        // Reject the whole set before touching anything.
        for change in changes.iter() {
            if let Change::Delete(key) = change {
                if !tables.contains(key) {
                    return Err(DomainError::ReferenceNotFound(key.to_string()));
                }
            }
        }

        for change in changes {
            match change {
                Change::Upsert(record) => tables.upsert(record),
                Change::Delete(key) => tables.delete(&key),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use partuniverse_core::UserId;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn seeded() -> (InMemoryStore, StorageItem) {
        let store = InMemoryStore::new();
        let st = StorageType::new("shelf");
        let place = StoragePlace::new("A1", st.id);
        let part = Part::new("Capacitor", "C-100N", UserId::new());
        let item = StorageItem::tracked(part.id, place.id, dec!(1));

        let mut changes = ChangeSet::new();
        changes
            .upsert(st)
            .upsert(place)
            .upsert(part)
            .upsert(item.clone());
        store.commit(changes).unwrap();
        (store, item)
    }

    #[test]
    fn commit_applies_upserts_and_deletes() {
        let (store, item) = seeded();
        assert_eq!(store.storage_item(&item.id).unwrap(), Some(item.clone()));

        let mut changes = ChangeSet::new();
        changes.delete(item.id);
        store.commit(changes).unwrap();
        assert_eq!(store.storage_item(&item.id).unwrap(), None);
    }

    #[test]
    fn failed_commit_leaves_store_untouched() {
        let (store, item) = seeded();
        let mut updated = item.clone();
        updated.on_stock = Some(dec!(99));

        let mut changes = ChangeSet::new();
        changes.upsert(updated).delete(StorageItemId::new());
        let err = store.commit(changes).unwrap_err();
        assert!(matches!(err, DomainError::ReferenceNotFound(_)));
        assert_eq!(store.storage_item(&item.id).unwrap(), Some(item));
    }

    #[test]
    fn recent_transactions_are_newest_first_and_limited() {
        let (store, item) = seeded();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let user = UserId::new();

        let mut changes = ChangeSet::new();
        for day in [3, 0, 7, 1, 5, 6, 2, 4] {
            changes.upsert(
                Transaction::new(format!("day {day}"), item.id, dec!(1), user)
                    .dated(base + Duration::days(day)),
            );
        }
        store.commit(changes).unwrap();

        let recent = store.recent_transactions(5).unwrap();
        let subjects: Vec<_> = recent.iter().map(|t| t.subject.as_str()).collect();
        assert_eq!(subjects, vec!["day 7", "day 6", "day 5", "day 4", "day 3"]);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let (store, _) = seeded();
        let snapshot = store.snapshot().unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: InventorySnapshot = serde_json::from_str(&json).unwrap();
        let reloaded = InMemoryStore::from_snapshot(back).unwrap();
        assert_eq!(reloaded.snapshot().unwrap(), snapshot);
    }

    #[test]
    fn snapshot_with_cyclic_places_is_rejected() {
        let st = StorageType::new("cabinet");
        let mut a = StoragePlace::new("a", st.id);
        let b = StoragePlace::new("b", st.id).with_parent(a.id);
        a.parent = Some(b.id);

        let snapshot = InventorySnapshot {
            storage_types: vec![st],
            storage_places: vec![a, b],
            ..InventorySnapshot::default()
        };
        let err = InMemoryStore::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, DomainError::CircleDetected(_)));
    }

    #[test]
    fn snapshot_with_duplicate_sku_is_rejected() {
        let (store, _) = seeded();
        let mut snapshot = store.snapshot().unwrap();
        let twin = Part::new("Capacitor 2", "C-100N", UserId::new());
        snapshot.parts.push(twin);

        let err = InMemoryStore::from_snapshot(snapshot).unwrap_err();
        assert_eq!(err.field_name(), Some("sku"));
    }

    #[test]
    fn snapshot_with_dangling_storage_item_is_rejected() {
        let (store, item) = seeded();
        let mut snapshot = store.snapshot().unwrap();
        snapshot.storage_items.push(StorageItem::untracked(PartId::new(), item.storage));

        let err = InMemoryStore::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, DomainError::ReferenceNotFound(_)));
    }

    #[test]
    fn snapshot_with_duplicate_pair_is_rejected() {
        let (store, item) = seeded();
        let mut snapshot = store.snapshot().unwrap();
        snapshot
            .storage_items
            .push(StorageItem::untracked(item.part, item.storage));

        let err = InMemoryStore::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn snapshot_with_out_of_range_quantity_is_rejected() {
        let (store, _) = seeded();
        let mut snapshot = store.snapshot().unwrap();
        snapshot.storage_items[0].on_stock = Some(Decimal::MAX);

        let err = InMemoryStore::from_snapshot(snapshot).unwrap_err();
        assert_eq!(err.field_name(), Some("on_stock"));
    }

    #[test]
    fn snapshot_keeps_transactions_of_removed_items() {
        let (store, _) = seeded();
        let mut snapshot = store.snapshot().unwrap();
        let orphan = Transaction::new("before merge", StorageItemId::new(), dec!(2), UserId::new());
        snapshot.transactions.push(orphan.clone());

        let reloaded = InMemoryStore::from_snapshot(snapshot).unwrap();
        assert_eq!(reloaded.transaction(&orphan.id).unwrap(), Some(orphan));
    }

    #[test]
    fn listings_are_ordered_by_name() {
        let st = StorageType::new("drawer");
        let mut changes = ChangeSet::new();
        for name in ["C3", "A1", "B2"] {
            changes.upsert(StoragePlace::new(name, st.id));
        }
        changes.upsert(st);
        let store = InMemoryStore::new();
        store.commit(changes).unwrap();

        let names: Vec<_> = store
            .storage_places()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["A1", "B2", "C3"]);
    }
}
