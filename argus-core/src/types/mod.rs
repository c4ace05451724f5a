//! Alert domain types.
//!
//! # Types
//!
//! - [`AlertRecord`] - one fraud alert with its scoring explanation
//! - [`TransactionDetails`] - the transaction embedded in an alert
//! - [`Amount`] - monetary amount, a plain JSON number on the wire
//! - [`Priority`], [`RiskBand`], [`AlertStatus`], [`TransactionType`] - closed vocabularies

mod alert;
mod amount;
mod transaction;

pub use alert::{
    AlertRecord, AlertStatus, MAX_ASSIGNEE_LEN, MAX_NOTES_LEN, Priority, RiskBand, RuleTriggered,
    ShapValue,
};
pub use amount::Amount;
pub use transaction::{TransactionDetails, TransactionType};
