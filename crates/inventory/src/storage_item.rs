use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use partuniverse_core::{DomainError, DomainResult, Entity, PartId, StorageItemId, StoragePlaceId};

/// Digits kept after the decimal point of any stored quantity.
pub const QUANTITY_SCALE: u32 = 4;

/// Largest magnitude of a stored quantity (ten digits, four of them decimals).
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, QUANTITY_SCALE);

/// Accept `value` as a stored quantity for `field`, or reject it with a field
/// error when it is out of range or too precise.
pub fn check_quantity(field: &'static str, value: Decimal) -> DomainResult<Decimal> {
    if value.abs() > MAX_QUANTITY {
        return Err(DomainError::field(
            field,
            format!("{value} is outside the range of ±{MAX_QUANTITY}"),
        ));
    }
    if value.normalize().scale() > QUANTITY_SCALE {
        return Err(DomainError::field(
            field,
            format!("{value} has more than {QUANTITY_SCALE} decimal places"),
        ));
    }
    Ok(value)
}

fn overflow(what: &str) -> DomainError {
    DomainError::validation(format!("{what} overflows"))
}

/// How much of one part is held at one storage place.
///
/// Unique on (`part`, `storage`). `on_stock == None` means the quantity is not
/// tracked, which is different from a tracked quantity of zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageItem {
    pub id: StorageItemId,
    pub part: PartId,
    pub storage: StoragePlaceId,
    #[serde(default)]
    pub on_stock: Option<Decimal>,
    #[serde(default)]
    pub disabled: bool,
}

impl StorageItem {
    /// A pairing whose quantity is not tracked.
    pub fn untracked(part: PartId, storage: StoragePlaceId) -> Self {
        Self {
            id: StorageItemId::new(),
            part,
            storage,
            on_stock: None,
            disabled: false,
        }
    }

    pub fn tracked(part: PartId, storage: StoragePlaceId, on_stock: Decimal) -> Self {
        Self {
            on_stock: Some(on_stock),
            ..Self::untracked(part, storage)
        }
    }

    pub fn is_tracked(&self) -> bool {
        self.on_stock.is_some()
    }

    /// Add `amount` to the balance. Untracked items stay untracked.
    ///
    /// A balance that would leave the storable range is rejected and the item
    /// is left as it was.
    pub fn post(&mut self, amount: Decimal) -> DomainResult<()> {
        if let Some(on_stock) = self.on_stock {
            let next = on_stock
                .checked_add(amount)
                .ok_or_else(|| overflow("on_stock"))?;
            self.on_stock = Some(check_quantity("on_stock", next)?);
        }
        Ok(())
    }

    /// Take back a previously posted `amount`. Untracked items stay untracked.
    pub fn reverse(&mut self, amount: Decimal) -> DomainResult<()> {
        if let Some(on_stock) = self.on_stock {
            let next = on_stock
                .checked_sub(amount)
                .ok_or_else(|| overflow("on_stock"))?;
            self.on_stock = Some(check_quantity("on_stock", next)?);
        }
        Ok(())
    }
}

impl Entity for StorageItem {
    type Id = StorageItemId;
    const KIND: &'static str = "storage item";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Quantity a merge target ends up with after absorbing `source`.
///
/// Untracked sides do not contribute: two untracked items stay untracked, one
/// tracked side wins, two tracked sides add up.
pub fn merged_on_stock(
    target: Option<Decimal>,
    source: Option<Decimal>,
) -> DomainResult<Option<Decimal>> {
    Ok(match (target, source) {
        (None, None) => None,
        (Some(t), Some(s)) => {
            let sum = t.checked_add(s).ok_or_else(|| overflow("on_stock"))?;
            Some(check_quantity("on_stock", sum)?)
        }
        (Some(t), None) => Some(t),
        (None, Some(s)) => Some(s),
    })
}

/// Sum of all tracked quantities; untracked items count as zero.
pub fn total_on_stock<'a>(
    items: impl IntoIterator<Item = &'a StorageItem>,
) -> DomainResult<Decimal> {
    items
        .into_iter()
        .filter_map(|si| si.on_stock)
        .try_fold(Decimal::ZERO, |total, q| {
            total.checked_add(q).ok_or_else(|| overflow("total on stock"))
        })
}
