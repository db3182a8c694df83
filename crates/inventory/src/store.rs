//! Persistence boundary of the inventory ledger.
//!
//! The ledger only reads through typed getters and queries, and only writes by
//! handing a [`ChangeSet`] to [`InventoryStore::commit`], which must apply it
//! atomically (every change or none).

use std::sync::Arc;

use partuniverse_core::{
    CategoryId, DistributorId, DomainResult, Entity, ManufacturerId, PartId, StorageItemId,
    StoragePlaceId, StorageTypeId, TransactionId,
};

use crate::category::Category;
use crate::part::{Distributor, Manufacturer, Part};
use crate::storage::{StoragePlace, StorageType};
use crate::storage_item::StorageItem;
use crate::transaction::Transaction;

/// Any persisted inventory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    StorageType(StorageType),
    StoragePlace(StoragePlace),
    Category(Category),
    Manufacturer(Manufacturer),
    Distributor(Distributor),
    Part(Part),
    StorageItem(StorageItem),
    Transaction(Transaction),
}

/// Key of any persisted inventory record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    StorageType(StorageTypeId),
    StoragePlace(StoragePlaceId),
    Category(CategoryId),
    Manufacturer(ManufacturerId),
    Distributor(DistributorId),
    Part(PartId),
    StorageItem(StorageItemId),
    Transaction(TransactionId),
}

macro_rules! record_conversions {
    ($($variant:ident => $record:ty, $id:ty;)*) => {
        $(
            impl From<$record> for Record {
                fn from(value: $record) -> Self {
                    Record::$variant(value)
                }
            }

            impl From<$id> for RecordKey {
                fn from(value: $id) -> Self {
                    RecordKey::$variant(value)
                }
            }
        )*

        impl Record {
            pub fn key(&self) -> RecordKey {
                match self {
                    $(Record::$variant(r) => RecordKey::$variant(*r.id()),)*
                }
            }
        }

        impl core::fmt::Display for RecordKey {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $(RecordKey::$variant(id) => write!(f, "{} {}", <$record>::KIND, id),)*
                }
            }
        }
    };
}

record_conversions! {
    StorageType => StorageType, StorageTypeId;
    StoragePlace => StoragePlace, StoragePlaceId;
    Category => Category, CategoryId;
    Manufacturer => Manufacturer, ManufacturerId;
    Distributor => Distributor, DistributorId;
    Part => Part, PartId;
    StorageItem => StorageItem, StorageItemId;
    Transaction => Transaction, TransactionId;
}

/// A single write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Insert or replace the record with the same key.
    Upsert(Record),
    /// Remove an existing record.
    Delete(RecordKey),
}

/// Ordered writes that must land together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, record: impl Into<Record>) -> &mut Self {
        self.changes.push(Change::Upsert(record.into()));
        self
    }

    pub fn delete(&mut self, key: impl Into<RecordKey>) -> &mut Self {
        self.changes.push(Change::Delete(key.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }
}

impl IntoIterator for ChangeSet {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

/// Data-store collaborator used by the ledger.
pub trait InventoryStore: Send + Sync {
    fn storage_type(&self, id: &StorageTypeId) -> DomainResult<Option<StorageType>>;
    fn storage_place(&self, id: &StoragePlaceId) -> DomainResult<Option<StoragePlace>>;
    fn category(&self, id: &CategoryId) -> DomainResult<Option<Category>>;
    fn manufacturer(&self, id: &ManufacturerId) -> DomainResult<Option<Manufacturer>>;
    fn distributor(&self, id: &DistributorId) -> DomainResult<Option<Distributor>>;
    fn part(&self, id: &PartId) -> DomainResult<Option<Part>>;
    fn storage_item(&self, id: &StorageItemId) -> DomainResult<Option<StorageItem>>;
    fn transaction(&self, id: &TransactionId) -> DomainResult<Option<Transaction>>;

    /// All parts, ordered by name.
    fn parts(&self) -> DomainResult<Vec<Part>>;
    /// All storage places, ordered by name.
    fn storage_places(&self) -> DomainResult<Vec<StoragePlace>>;
    /// All categories, ordered by name.
    fn categories(&self) -> DomainResult<Vec<Category>>;
    /// All storage items, ordered by (storage, part).
    fn storage_items(&self) -> DomainResult<Vec<StorageItem>>;
    /// Storage items holding `part`.
    fn storage_items_for_part(&self, part: &PartId) -> DomainResult<Vec<StorageItem>>;
    /// Up to `limit` transactions, most recent `date` first.
    fn recent_transactions(&self, limit: usize) -> DomainResult<Vec<Transaction>>;

    /// Apply every change of `changes`, or none of them.
    fn commit(&self, changes: ChangeSet) -> DomainResult<()>;
}

impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    fn storage_type(&self, id: &StorageTypeId) -> DomainResult<Option<StorageType>> {
        (**self).storage_type(id)
    }

    fn storage_place(&self, id: &StoragePlaceId) -> DomainResult<Option<StoragePlace>> {
        (**self).storage_place(id)
    }

    fn category(&self, id: &CategoryId) -> DomainResult<Option<Category>> {
        (**self).category(id)
    }

    fn manufacturer(&self, id: &ManufacturerId) -> DomainResult<Option<Manufacturer>> {
        (**self).manufacturer(id)
    }

    fn distributor(&self, id: &DistributorId) -> DomainResult<Option<Distributor>> {
        (**self).distributor(id)
    }

    fn part(&self, id: &PartId) -> DomainResult<Option<Part>> {
        (**self).part(id)
    }

    fn storage_item(&self, id: &StorageItemId) -> DomainResult<Option<StorageItem>> {
        (**self).storage_item(id)
    }

    fn transaction(&self, id: &TransactionId) -> DomainResult<Option<Transaction>> {
        (**self).transaction(id)
    }

    fn parts(&self) -> DomainResult<Vec<Part>> {
        (**self).parts()
    }

    fn storage_places(&self) -> DomainResult<Vec<StoragePlace>> {
        (**self).storage_places()
    }

    fn categories(&self) -> DomainResult<Vec<Category>> {
        (**self).categories()
    }

    fn storage_items(&self) -> DomainResult<Vec<StorageItem>> {
        (**self).storage_items()
    }

    fn storage_items_for_part(&self, part: &PartId) -> DomainResult<Vec<StorageItem>> {
        (**self).storage_items_for_part(part)
    }

    fn recent_transactions(&self, limit: usize) -> DomainResult<Vec<Transaction>> {
        (**self).recent_transactions(limit)
    }

    fn commit(&self, changes: ChangeSet) -> DomainResult<()> {
        (**self).commit(changes)
    }
}
