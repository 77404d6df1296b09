//! Latest-snapshot resolution for valuation histories

use crate::engine::parse_instant;
use crate::model::ValuationRecord;

/// Picks the most recent valuation for an entity out of an unordered
/// history. Returns `None` when the entity has no records; callers apply
/// the per-kind fallback (zero for accounts, acquisition price for fixed
/// assets).
///
/// Ties on timestamp are broken by arrival order, last inserted wins, so
/// results are reproducible for any input ordering.
pub fn latest_valuation<'a>(
    entity_id: &str,
    valuations: &'a [ValuationRecord],
) -> Option<&'a ValuationRecord> {
    let mut best: Option<(&ValuationRecord, chrono::DateTime<chrono::Utc>)> = None;

    for record in valuations.iter().filter(|v| v.entity_id == entity_id) {
        let ts = parse_instant(&record.timestamp);
        match &best {
            Some((_, best_ts)) if ts < *best_ts => {}
            _ => best = Some((record, ts)),
        }
    }

    best.map(|(record, _)| record)
}
