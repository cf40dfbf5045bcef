use crate::domain::money::Money;
use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};
use std::fmt;

/// Placeholder shown in the card column when no card was involved.
pub const NO_CARD: &str = "N/A";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What kind of money movement a ledger entry records.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TransactionKind {
    Withdrawal,
    Deposit,
    /// Outgoing transfer, labelled with the receiving account's owner.
    TransferOut { recipient: String },
    TransferIn,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Withdrawal => f.write_str("withdrawal"),
            TransactionKind::Deposit => f.write_str("deposit"),
            TransactionKind::TransferOut { recipient } => write!(f, "transfer → {recipient}"),
            TransactionKind::TransferIn => f.write_str("received"),
        }
    }
}

impl Serialize for TransactionKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Immutable log entry of a completed money movement.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct Transaction {
    #[serde(serialize_with = "serialize_time")]
    time: DateTime<Local>,
    #[serde(rename = "type")]
    kind: TransactionKind,
    /// Signed delta, negative for debits.
    amount: Money,
    /// Account balance right after this entry was applied.
    #[serde(rename = "balance")]
    balance_after: Money,
    #[serde(serialize_with = "serialize_card")]
    card: Option<String>,
    note: String,
}

fn serialize_time<S>(time: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&time.format(TIME_FORMAT))
}

fn serialize_card<S>(card: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(card.as_deref().unwrap_or(NO_CARD))
}

impl Transaction {
    pub(crate) fn new(
        kind: TransactionKind,
        amount: Money,
        balance_after: Money,
        card: Option<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            time: Local::now(),
            kind,
            amount,
            balance_after,
            card,
            note: note.into(),
        }
    }

    pub fn time(&self) -> DateTime<Local> {
        self.time
    }

    pub fn kind(&self) -> &TransactionKind {
        &self.kind
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn balance_after(&self) -> Money {
        self.balance_after
    }

    /// Masked card number, or [`NO_CARD`].
    pub fn card(&self) -> &str {
        self.card.as_deref().unwrap_or(NO_CARD)
    }

    pub fn note(&self) -> &str {
        &self.note
    }
}
