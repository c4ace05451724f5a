//! Fraud alert record carried by feed events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::transaction::TransactionDetails;
use crate::error::DataError;

/// Maximum length of the `assigned_to` field.
pub const MAX_ASSIGNEE_LEN: usize = 100;

/// Maximum length of the `notes` field.
pub const MAX_NOTES_LEN: usize = 5000;

/// Review lifecycle status of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    /// Not yet looked at.
    #[default]
    New,
    /// An analyst is reviewing it.
    InReview,
    /// Waiting on information from outside the team.
    PendingInfo,
    /// Escalated to a case or a senior analyst.
    Escalated,
    /// Review finished.
    Closed,
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::New => "new",
            Self::InReview => "in_review",
            Self::PendingInfo => "pending_info",
            Self::Escalated => "escalated",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Triage priority band of an alert.
///
/// Variants are declared from least to most urgent so the derived ordering
/// matches urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
    /// Critical priority.
    Critical,
}

impl Priority {
    /// All priorities, least urgent first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Numeric rank, 0 for low up to 3 for critical.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        *self as u8
    }

    /// The model risk band that pairs with this priority.
    #[must_use]
    pub const fn risk_band(&self) -> RiskBand {
        match self {
            Self::Low => RiskBand::Low,
            Self::Medium => RiskBand::Medium,
            Self::High => RiskBand::High,
            Self::Critical => RiskBand::Critical,
        }
    }

    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(DataError::parse_error(
                "priority",
                format!("unknown priority '{other}'"),
            )),
        }
    }
}

/// Discrete band of the model score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    /// Low risk.
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
    /// Critical risk.
    Critical,
}

/// Signed contribution of one model feature to the score.
///
/// Positive values push towards fraud, negative values away from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapValue {
    /// Feature name, e.g. `amount_zscore`.
    pub feature: String,
    /// Signed contribution.
    pub value: f64,
}

impl ShapValue {
    /// Creates a new feature contribution.
    #[must_use]
    pub fn new(feature: impl Into<String>, value: f64) -> Self {
        Self {
            feature: feature.into(),
            value,
        }
    }
}

/// A detection rule that fired for the alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTriggered {
    /// Stable rule identifier.
    pub rule_id: String,
    /// Display name.
    pub rule_name: String,
    /// Human-readable reason.
    pub reason: String,
}

/// One fraud alert as published by the monitoring backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Alert identifier.
    pub id: String,
    /// Identifier of the transaction that raised the alert.
    pub transaction_id: String,
    /// Review status.
    pub status: AlertStatus,
    /// Triage priority.
    pub priority: Priority,
    /// Embedded transaction details.
    pub transaction: TransactionDetails,
    /// Model fraud score in `[0, 1]`.
    pub ml_score: f64,
    /// Discrete band of `ml_score`.
    pub ml_risk_band: RiskBand,
    /// Textual reason codes from the model.
    #[serde(default)]
    pub ml_reason_codes: Vec<String>,
    /// Per-feature contributions.
    #[serde(default)]
    pub shap_values: Vec<ShapValue>,
    /// Rules that fired.
    #[serde(default)]
    pub rules_triggered: Vec<RuleTriggered>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
    /// Analyst the alert is assigned to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Free-form analyst notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AlertRecord {
    /// Checks the invariants an inbound alert must satisfy.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a `DataError`.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.id.trim().is_empty() {
            return Err(DataError::validation_error("id", "must not be empty"));
        }
        if !self.ml_score.is_finite() || !(0.0..=1.0).contains(&self.ml_score) {
            return Err(DataError::out_of_range("ml_score", self.ml_score, 0, 1));
        }
        if self.transaction.amount.is_negative() {
            return Err(DataError::validation_error(
                "transaction.amount",
                "cannot be negative",
            ));
        }
        if let Some(assignee) = &self.assigned_to
            && assignee.chars().count() > MAX_ASSIGNEE_LEN
        {
            return Err(DataError::validation_error(
                "assigned_to",
                format!("must not exceed {MAX_ASSIGNEE_LEN} characters"),
            ));
        }
        if let Some(notes) = &self.notes
            && notes.chars().count() > MAX_NOTES_LEN
        {
            return Err(DataError::validation_error(
                "notes",
                format!("must not exceed {MAX_NOTES_LEN} characters"),
            ));
        }
        Ok(())
    }

    /// Returns true for high and critical alerts.
    #[must_use]
    pub fn is_high_risk(&self) -> bool {
        self.priority >= Priority::High
    }

    /// Score scaled to 0-100, the way analysts read it.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn score_percent(&self) -> u8 {
        (self.ml_score.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::types::{Amount, TransactionType};
    use chrono::TimeZone;

    pub fn alert(id: &str, priority: Priority) -> AlertRecord {
        let ts = Utc.with_ymd_and_hms(2024, 3, 14, 9, 26, 53).unwrap();
        AlertRecord {
            id: id.to_string(),
            transaction_id: format!("TXN-{id}"),
            status: AlertStatus::New,
            priority,
            transaction: TransactionDetails {
                kind: TransactionType::Transfer,
                amount: Amount::from_units(181_000),
                step: 1,
                timestamp: ts,
                name_orig: "C1305486145".to_string(),
                name_dest: "C553264065".to_string(),
            },
            ml_score: 0.93,
            ml_risk_band: priority.risk_band(),
            ml_reason_codes: vec!["HIGH_VALUE_TRANSFER".to_string()],
            shap_values: vec![ShapValue::new("amount_zscore", 0.35)],
            rules_triggered: vec![],
            created_at: ts,
            updated_at: ts,
            assigned_to: None,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::alert;
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::Medium > Priority::Low);
        assert_eq!(Priority::Critical.rank(), 3);
        assert_eq!(Priority::Low.rank(), 0);
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("CRITICAL".parse::<Priority>().unwrap(), Priority::Critical);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&AlertStatus::PendingInfo).unwrap();
        assert_eq!(json, "\"pending_info\"");
        let json = serde_json::to_string(&Priority::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }

    #[test]
    fn test_validate_accepts_fixture() {
        assert!(alert("ALT-1", Priority::High).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_score_out_of_range() {
        let mut a = alert("ALT-1", Priority::High);
        a.ml_score = 1.2;
        assert!(matches!(a.validate(), Err(DataError::OutOfRange { .. })));

        a.ml_score = f64::NAN;
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_id_and_long_notes() {
        let mut a = alert(" ", Priority::Low);
        assert!(a.validate().is_err());

        a.id = "ALT-2".to_string();
        a.notes = Some("x".repeat(MAX_NOTES_LEN + 1));
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let json = serde_json::to_value(alert("ALT-1", Priority::Low)).unwrap();
        assert!(json.get("assigned_to").is_none());
        assert!(json.get("notes").is_none());
        assert_eq!(json["created_at"], "2024-03-14T09:26:53Z");
    }

    #[test]
    fn test_json_roundtrip_preserves_record() {
        let mut original = alert("ALT-9", Priority::Critical);
        original.assigned_to = Some("analyst.kim".to_string());
        let json = serde_json::to_string(&original).unwrap();
        let parsed: AlertRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_score_percent_and_high_risk() {
        let a = alert("ALT-1", Priority::Critical);
        assert_eq!(a.score_percent(), 93);
        assert!(a.is_high_risk());
        assert!(!alert("ALT-2", Priority::Medium).is_high_risk());
    }
}
