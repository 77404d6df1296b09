//! Domain records held in the ledger file

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Member {
    pub id: String,
    pub name: String,
}

/// A liquid account (bank, brokerage cash, wallet). Its current worth is
/// whatever the latest valuation record says; with no history it counts as
/// zero.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub member_id: String,
}

/// A fixed asset (property, vehicle, collectible). With no valuation
/// history it falls back to its acquisition price, unlike an account.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FixedAsset {
    pub id: String,
    pub name: String,
    pub member_id: String,
    pub acquisition_price: f64,
    pub acquisition_currency: String,
}

/// One observation of an entity's worth at a point in time. Records are
/// append-only: a newer observation supersedes, never overwrites.
///
/// Timestamps stay as strings here; the engine parses them leniently so a
/// malformed record degrades instead of failing the whole ledger load.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ValuationRecord {
    pub entity_id: String,
    pub timestamp: String,
    pub currency: String,
    pub amount: f64,
    #[serde(default)]
    pub note: Option<String>,
}

/// An exchange rate observation: 1 unit of `quote_currency` equals `rate`
/// units of `base_currency`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RateQuote {
    pub timestamp: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub rate: f64,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoanDirection {
    Lend,
    Borrow,
}

impl Display for LoanDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoanDirection::Lend => write!(f, "lend"),
            LoanDirection::Borrow => write!(f, "borrow"),
        }
    }
}

/// A loan ledger entry. The ledger is append-only: updating an obligation
/// means adding a new record with the same `(member_id, counterparty_id,
/// direction)` key and a later timestamp.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoanObligation {
    pub member_id: String,
    pub counterparty_id: String,
    pub direction: LoanDirection,
    pub currency: String,
    pub amount: f64,
    pub timestamp: String,
    #[serde(default)]
    pub settled: bool,
}

impl LoanObligation {
    /// Identity of the ongoing obligation this record belongs to.
    pub fn key(&self) -> (&str, &str, LoanDirection) {
        (&self.member_id, &self.counterparty_id, self.direction)
    }

    /// Stable identifier used when flagging the obligation in results.
    pub fn display_key(&self) -> String {
        format!(
            "{}->{}:{}",
            self.member_id, self.counterparty_id, self.direction
        )
    }
}

/// Borrowed view of every collection the engine reads. One aggregation
/// call is a pure function of this snapshot; the engine never mutates it.
#[derive(Debug, Clone, Copy)]
pub struct LedgerSnapshot<'a> {
    pub accounts: &'a [Account],
    pub fixed_assets: &'a [FixedAsset],
    pub account_valuations: &'a [ValuationRecord],
    pub asset_valuations: &'a [ValuationRecord],
    pub quotes: &'a [RateQuote],
    pub loans: &'a [LoanObligation],
    pub base_currency: &'a str,
}
