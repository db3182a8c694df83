use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use partuniverse_core::{DomainError, Entity, StorageItemId, TransactionId, UserId};

use crate::unit::UNSET_CHOICE;

/// Settlement state of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionState {
    #[serde(rename = "paid")]
    Paid,
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "res")]
    Reserved,
}

impl TransactionState {
    pub const ALL: [TransactionState; 3] = [
        TransactionState::Paid,
        TransactionState::Open,
        TransactionState::Reserved,
    ];

    pub fn code(self) -> &'static str {
        match self {
            TransactionState::Paid => "paid",
            TransactionState::Open => "open",
            TransactionState::Reserved => "res",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionState::Paid => "Paid",
            TransactionState::Open => "Open",
            TransactionState::Reserved => "Reserved",
        }
    }
}

impl core::fmt::Display for TransactionState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TransactionState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code == UNSET_CHOICE || code.is_empty() {
            return Err(DomainError::field("state", "a state must be selected"));
        }
        TransactionState::ALL
            .into_iter()
            .find(|st| st.code() == code)
            .ok_or_else(|| DomainError::field("state", format!("unknown state '{code}'")))
    }
}

/// A dated movement of stock into (positive amount) or out of (negative
/// amount) one storage item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub subject: String,
    /// Required when the transaction is posted.
    #[serde(default)]
    pub storage_item: Option<StorageItemId>,
    pub amount: Decimal,
    #[serde(default)]
    pub comment: Option<String>,
    /// Business date of the movement.
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub state: Option<TransactionState>,
    pub created_by: UserId,
    /// When the transaction was first entered; kept across edits.
    pub created_date: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        subject: impl Into<String>,
        storage_item: StorageItemId,
        amount: Decimal,
        created_by: UserId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            subject: subject.into(),
            storage_item: Some(storage_item),
            amount,
            comment: None,
            date: now,
            state: None,
            created_by,
            created_date: now,
        }
    }

    pub fn dated(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn with_state(mut self, state: TransactionState) -> Self {
        self.state = Some(state);
        self
    }
}

impl Entity for Transaction {
    type Id = TransactionId;
    const KIND: &'static str = "transaction";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
