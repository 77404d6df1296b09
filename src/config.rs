use crate::model::{
    Account, FixedAsset, LedgerSnapshot, LoanObligation, Member, RateQuote, ValuationRecord,
};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// The ledger file: an immutable-per-run snapshot of every record
/// collection. All editing happens outside this program; the engine only
/// reads what is loaded here.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Ledger {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub fixed_assets: Vec<FixedAsset>,
    #[serde(default)]
    pub account_valuations: Vec<ValuationRecord>,
    #[serde(default)]
    pub asset_valuations: Vec<ValuationRecord>,
    #[serde(default)]
    pub quotes: Vec<RateQuote>,
    #[serde(default)]
    pub loans: Vec<LoanObligation>,
    pub base_currency: String,
}

impl Ledger {
    pub fn load() -> Result<Self> {
        debug!("Loading default ledger");
        let ledger_path = Self::default_ledger_path()?;
        Self::load_from_path(&ledger_path)
    }

    pub fn default_ledger_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "nestworth")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("ledger.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let ledger_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read ledger file: {}", path.as_ref().display()))?;

        let ledger: Self = serde_yaml::from_str(&ledger_str)
            .with_context(|| format!("Failed to parse ledger file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded ledger");
        Ok(ledger)
    }

    /// Borrowed view handed to the engine. Display names stay behind;
    /// the engine works on identifiers only.
    pub fn snapshot(&self) -> LedgerSnapshot<'_> {
        LedgerSnapshot {
            accounts: &self.accounts,
            fixed_assets: &self.fixed_assets,
            account_valuations: &self.account_valuations,
            asset_valuations: &self.asset_valuations,
            quotes: &self.quotes,
            loans: &self.loans,
            base_currency: &self.base_currency,
        }
    }

    /// Display name for a member id, falling back to the id itself.
    pub fn member_name<'a>(&'a self, member_id: &'a str) -> &'a str {
        self.members
            .iter()
            .find(|m| m.id == member_id)
            .map_or(member_id, |m| m.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LoanDirection;

    #[test]
    fn test_ledger_deserialization() {
        let yaml_str = r#"
members:
  - id: "alice"
    name: "Alice"
  - id: "bob"
    name: "Bob"
accounts:
  - id: "a1"
    name: "Checking"
    member_id: "alice"
fixed_assets:
  - id: "f1"
    name: "Apartment"
    member_id: "bob"
    acquisition_price: 1800000.0
    acquisition_currency: "CNY"
account_valuations:
  - entity_id: "a1"
    timestamp: "2024-06-01T10:00:00Z"
    currency: "USD"
    amount: 12500.0
    note: "after bonus"
quotes:
  - timestamp: "2024-06-01"
    base_currency: "CNY"
    quote_currency: "USD"
    rate: 7.21
loans:
  - member_id: "alice"
    counterparty_id: "cousin"
    direction: lend
    currency: "CNY"
    amount: 20000.0
    timestamp: "2024-05-01"
base_currency: "CNY"
"#;

        let ledger: Ledger = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(ledger.members.len(), 2);
        assert_eq!(ledger.accounts.len(), 1);
        assert_eq!(ledger.accounts[0].member_id, "alice");
        assert_eq!(ledger.fixed_assets[0].acquisition_price, 1800000.0);
        assert_eq!(ledger.account_valuations[0].amount, 12500.0);
        assert_eq!(
            ledger.account_valuations[0].note,
            Some("after bonus".to_string())
        );
        assert_eq!(ledger.quotes[0].rate, 7.21);
        assert_eq!(ledger.loans[0].direction, LoanDirection::Lend);
        assert!(!ledger.loans[0].settled);
        assert_eq!(ledger.base_currency, "CNY");
        assert!(ledger.asset_valuations.is_empty());
    }

    #[test]
    fn test_member_name_lookup() {
        let yaml_str = r#"
members:
  - id: "alice"
    name: "Alice"
base_currency: "USD"
"#;
        let ledger: Ledger = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(ledger.member_name("alice"), "Alice");
        assert_eq!(ledger.member_name("unknown"), "unknown");
    }
}
