//! Loan ledger deduplication

use crate::engine::parse_instant;
use crate::model::{LoanDirection, LoanObligation};
use chrono::{DateTime, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Collapses an append-only loan ledger into the currently open
/// obligations: the latest record per `(member, counterparty, direction)`
/// key, unless that latest record is settled, in which case the whole
/// key is closed even if older unsettled records exist for it.
///
/// Ties on timestamp are broken by arrival order (last inserted wins),
/// matching valuation resolution. Output preserves the first-appearance
/// order of keys.
pub fn current_obligations(loans: &[LoanObligation]) -> Vec<&LoanObligation> {
    let mut latest: HashMap<(&str, &str, LoanDirection), (usize, DateTime<Utc>)> = HashMap::new();
    let mut key_order: Vec<(&str, &str, LoanDirection)> = Vec::new();

    for (idx, loan) in loans.iter().enumerate() {
        let ts = parse_instant(&loan.timestamp);
        match latest.entry(loan.key()) {
            Entry::Occupied(mut entry) => {
                if ts >= entry.get().1 {
                    *entry.get_mut() = (idx, ts);
                }
            }
            Entry::Vacant(entry) => {
                entry.insert((idx, ts));
                key_order.push(loan.key());
            }
        }
    }

    key_order
        .into_iter()
        .map(|key| &loans[latest[&key].0])
        .filter(|loan| !loan.settled)
        .collect()
}
