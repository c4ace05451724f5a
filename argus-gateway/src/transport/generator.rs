//! Synthetic alert generator for the simulated transport.

use argus_core::types::{
    AlertRecord, AlertStatus, Amount, Priority, RuleTriggered, ShapValue, TransactionDetails,
    TransactionType,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Produces random but internally consistent alerts.
///
/// Scores are drawn from the band matching the priority and the risk band
/// always equals the priority. Seed it for reproducible output.
#[derive(Debug, Clone)]
pub struct AlertGenerator {
    rng: StdRng,
}

impl Default for AlertGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertGenerator {
    /// Creates a generator seeded from the OS.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a deterministic generator.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns true with the given probability.
    pub fn should_emit(&mut self, probability: f64) -> bool {
        if !probability.is_finite() {
            return false;
        }
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    /// Generates an alert with a random priority.
    pub fn next_alert(&mut self) -> AlertRecord {
        let priority = Priority::ALL[self.rng.random_range(0..Priority::ALL.len())];
        self.next_alert_with_priority(priority)
    }

    /// Generates an alert with the given priority.
    pub fn next_alert_with_priority(&mut self, priority: Priority) -> AlertRecord {
        let now = Utc::now();
        let millis = now.timestamp_millis();

        let kind = TransactionType::ALL[self.rng.random_range(0..TransactionType::ALL.len())];
        let suffix: String = (0..9)
            .map(|_| char::from(BASE36[self.rng.random_range(0..BASE36.len())]))
            .collect();

        let rules_triggered = if priority >= Priority::High {
            vec![RuleTriggered {
                rule_id: "HIGH_VALUE_TRANSFER".to_string(),
                rule_name: "High Value Transfer Rule".to_string(),
                reason: "Transfer amount exceeds $200,000".to_string(),
            }]
        } else {
            Vec::new()
        };

        AlertRecord {
            id: format!("ALT-{millis}-{suffix}"),
            transaction_id: format!("TXN-{millis}"),
            status: AlertStatus::New,
            priority,
            transaction: TransactionDetails {
                kind,
                amount: Amount::from_units(self.rng.random_range(1_000..=500_999)),
                step: self.rng.random_range(0..1_000),
                timestamp: now,
                name_orig: self.account_id(),
                name_dest: self.account_id(),
            },
            ml_score: self.score_for(priority),
            ml_risk_band: priority.risk_band(),
            ml_reason_codes: vec![
                "HIGH_VALUE_TRANSFER".to_string(),
                "NEW_COUNTERPARTY".to_string(),
            ],
            shap_values: vec![
                ShapValue::new("amount_zscore", 0.35),
                ShapValue::new("new_counterparty_7d", 0.28),
                ShapValue::new("velocity_1h", 0.15),
            ],
            rules_triggered,
            created_at: now,
            updated_at: now,
            assigned_to: None,
            notes: None,
        }
    }

    fn score_for(&mut self, priority: Priority) -> f64 {
        match priority {
            Priority::Critical => self.rng.random_range(0.90..1.0),
            Priority::High => self.rng.random_range(0.75..0.90),
            Priority::Medium => self.rng.random_range(0.60..0.75),
            Priority::Low => self.rng.random_range(0.0..0.60),
        }
    }

    fn account_id(&mut self) -> String {
        format!("C{}", self.rng.random_range(1_000_000_000_u64..10_000_000_000))
    }
}
