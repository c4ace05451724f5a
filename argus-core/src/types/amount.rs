//! Amount type for representing monetary transaction amounts.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Monetary amount of a transaction.
///
/// Wraps a `Decimal` so arithmetic stays exact, but serializes as a plain
/// JSON number because upstream payloads carry amounts that way.
///
/// # Examples
///
/// ```
/// use argus_core::types::Amount;
/// use rust_decimal_macros::dec;
///
/// let amount = Amount::new(dec!(181000.50)).unwrap();
/// assert_eq!(serde_json::to_string(&amount).unwrap(), "181000.5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Amount(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Amount {
    /// Zero amount constant.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new non-negative `Amount`.
    ///
    /// # Errors
    ///
    /// Returns `DataError::ValidationFailed` if the value is negative.
    pub fn new(value: Decimal) -> Result<Self, DataError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DataError::validation_error(
                "amount",
                format!("cannot be negative: {value}"),
            ));
        }
        Ok(Self(value))
    }

    /// Creates a new `Amount` without validation.
    #[must_use]
    pub const fn new_unchecked(value: Decimal) -> Self {
        Self(value)
    }

    /// Creates an `Amount` from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Returns the underlying `Decimal` value.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Returns the amount as `f64`, for display and thresholds.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal =
            Decimal::from_str(s).map_err(|e| DataError::parse_error("amount", e.to_string()))?;
        Self::new(decimal)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}
