//! Transaction details embedded in an alert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Amount;

/// Kind of payment transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Cash deposit.
    CashIn,
    /// Cash withdrawal.
    CashOut,
    /// Debit.
    Debit,
    /// Merchant payment.
    Payment,
    /// Account-to-account transfer.
    Transfer,
}

impl TransactionType {
    /// All transaction types.
    pub const ALL: [Self; 5] = [
        Self::CashIn,
        Self::CashOut,
        Self::Debit,
        Self::Payment,
        Self::Transfer,
    ];
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CashIn => "CASH_IN",
            Self::CashOut => "CASH_OUT",
            Self::Debit => "DEBIT",
            Self::Payment => "PAYMENT",
            Self::Transfer => "TRANSFER",
        };
        f.write_str(s)
    }
}

/// The transaction that raised an alert.
///
/// Field names on the wire follow the upstream dataset (`type`, `nameOrig`,
/// `nameDest`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetails {
    /// Transaction kind.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Amount moved.
    pub amount: Amount,
    /// Simulation step (hour index) of the transaction.
    pub step: u32,
    /// When the transaction happened.
    pub timestamp: DateTime<Utc>,
    /// Originating account.
    #[serde(rename = "nameOrig")]
    pub name_orig: String,
    /// Destination account.
    #[serde(rename = "nameDest")]
    pub name_dest: String,
}
