use serde_json::Value;

/// Auxiliary eligibility flags read from a record when no claim transaction
/// is present. They only feed failure diagnostics, never selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EligibilitySignals {
    pub submitted: Option<bool>,
    pub poh_passed: Option<bool>,
    pub eligible_wallets: usize,
}

impl EligibilitySignals {
    pub fn from_record(record: &Value) -> Self {
        let eligible_wallets = record
            .get("accounts")
            .and_then(Value::as_array)
            .map(|accounts| {
                accounts
                    .iter()
                    .filter(|account| {
                        account.get("type").and_then(Value::as_str) == Some("WALLET")
                            && account.get("isEligible").and_then(Value::as_bool) == Some(true)
                    })
                    .count()
            })
            .unwrap_or(0);

        Self {
            submitted: record.get("submitted").and_then(Value::as_bool),
            poh_passed: record.get("pohPassed").and_then(Value::as_bool),
            eligible_wallets,
        }
    }

    /// Render the hints attached to an extraction failure.
    pub fn describe(&self) -> String {
        let mut hints = Vec::new();
        if self.submitted == Some(true) {
            hints.push("submitted=true".to_string());
        }
        if self.poh_passed == Some(false) {
            hints.push("pohPassed=false (complete proof-of-humanity first)".to_string());
        }
        hints.push(format!("eligibleWallets={}", self.eligible_wallets));
        hints.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counts_eligible_wallet_accounts() {
        let record = json!({
            "accounts": [
                { "type": "WALLET", "isEligible": true },
                { "type": "WALLET", "isEligible": false },
                { "type": "SOCIAL", "isEligible": true },
                { "type": "WALLET", "isEligible": true }
            ],
            "submitted": false,
            "pohPassed": true
        });

        let signals = EligibilitySignals::from_record(&record);
        assert_eq!(signals.eligible_wallets, 2);
        assert_eq!(signals.submitted, Some(false));
        assert_eq!(signals.poh_passed, Some(true));
        assert_eq!(signals.describe(), "eligibleWallets=2");
    }

    #[test]
    fn test_describe_includes_blocking_flags() {
        let record = json!({ "submitted": true, "pohPassed": false });
        let signals = EligibilitySignals::from_record(&record);
        assert_eq!(
            signals.describe(),
            "submitted=true, pohPassed=false (complete proof-of-humanity first), eligibleWallets=0"
        );
    }

    #[test]
    fn test_partial_records_do_not_panic() {
        let signals = EligibilitySignals::from_record(&json!({ "accounts": "not-a-list" }));
        assert_eq!(signals, EligibilitySignals::default());
        assert_eq!(signals.describe(), "eligibleWallets=0");
    }
}
