//! Household-wide aggregation into a single base currency

use crate::engine::loans::current_obligations;
use crate::engine::rates::{RateGraph, RateResolver};
use crate::engine::snapshot::latest_valuation;
use crate::model::{LedgerSnapshot, LoanDirection};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Consolidated totals in the base currency, plus the identifiers of
/// entities whose currency had no conversion path. Flagged entities
/// contribute zero to every total but are never silently dropped; the
/// presentation layer surfaces them.
#[derive(Debug, Clone, Default)]
pub struct AggregateResult {
    pub net_worth: f64,
    pub liquid_total: f64,
    pub fixed_total: f64,
    pub lending_total: f64,
    pub borrowing_total: f64,
    pub per_member: BTreeMap<String, f64>,
    pub inconvertible: BTreeSet<String>,
}

/// Rolls the full ledger snapshot into per-member and household totals.
/// Pure function of the snapshot: no mutation, no I/O, nothing fatal.
pub fn aggregate(snapshot: &LedgerSnapshot) -> AggregateResult {
    let graph = RateGraph::build(snapshot.quotes);
    let mut resolver = RateResolver::new(&graph, snapshot.base_currency);
    let mut result = AggregateResult::default();

    for account in snapshot.accounts {
        // No history: an account counts as zero, never inconvertible.
        let converted = match latest_valuation(&account.id, snapshot.account_valuations) {
            Some(valuation) => match resolver.rate_to_base(&valuation.currency) {
                Some(rate) => valuation.amount * rate,
                None => {
                    result.inconvertible.insert(account.id.clone());
                    0.0
                }
            },
            None => 0.0,
        };
        result.liquid_total += converted;
        *result
            .per_member
            .entry(account.member_id.clone())
            .or_insert(0.0) += converted;
    }

    for asset in snapshot.fixed_assets {
        // No history: a fixed asset falls back to its acquisition pair,
        // which still goes through rate resolution.
        let (amount, currency) = match latest_valuation(&asset.id, snapshot.asset_valuations) {
            Some(valuation) => (valuation.amount, valuation.currency.as_str()),
            None => (asset.acquisition_price, asset.acquisition_currency.as_str()),
        };
        let converted = match resolver.rate_to_base(currency) {
            Some(rate) => amount * rate,
            None => {
                result.inconvertible.insert(asset.id.clone());
                0.0
            }
        };
        result.fixed_total += converted;
        *result
            .per_member
            .entry(asset.member_id.clone())
            .or_insert(0.0) += converted;
    }

    for loan in current_obligations(snapshot.loans) {
        let converted = match resolver.rate_to_base(&loan.currency) {
            Some(rate) => loan.amount * rate,
            None => {
                result.inconvertible.insert(loan.display_key());
                0.0
            }
        };
        match loan.direction {
            LoanDirection::Lend => result.lending_total += converted,
            LoanDirection::Borrow => result.borrowing_total += converted,
        }
    }

    // Computed from the sub-totals so the sum identity holds exactly.
    result.net_worth =
        result.liquid_total + result.fixed_total + result.lending_total - result.borrowing_total;

    debug!(
        net_worth = result.net_worth,
        inconvertible = result.inconvertible.len(),
        "Aggregation complete"
    );
    result
}
