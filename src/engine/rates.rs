//! Currency rate graph and path resolution
//!
//! Known quotes form edges of a graph over currency codes; a conversion
//! factor between two currencies is the product of edge weights along
//! the first path found by breadth-first search (fewest hops, not best
//! rate). `None` is the unconvertible sentinel; callers must branch on
//! it rather than multiply by a fake rate.

use crate::engine::parse_instant;
use crate::model::RateQuote;
use chrono::{DateTime, Utc};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, warn};

/// Adjacency list over currency codes, rebuilt per aggregation pass from
/// the current quote set. Codes are compared case-sensitively, no
/// normalization.
pub struct RateGraph {
    edges: HashMap<String, Vec<(String, f64)>>,
}

impl RateGraph {
    /// Builds the graph from an unordered quote history.
    ///
    /// Quotes with a non-positive or non-finite rate are dropped with a
    /// log. Per unordered currency pair only the latest quote survives
    /// (ties: later arrival), so an older quote can never shadow a newer
    /// one. Each surviving quote `(base=B, quote=Q, rate=r)` yields two
    /// directed edges: `Q -> B` weight `r` and `B -> Q` weight `1/r`.
    pub fn build(quotes: &[RateQuote]) -> Self {
        let mut winners: HashMap<(&str, &str), (usize, DateTime<Utc>)> = HashMap::new();

        for (idx, quote) in quotes.iter().enumerate() {
            if !quote.rate.is_finite() || quote.rate <= 0.0 {
                warn!(
                    base = %quote.base_currency,
                    quote = %quote.quote_currency,
                    rate = quote.rate,
                    "Invalid rate quote, excluded from graph"
                );
                continue;
            }
            if quote.base_currency == quote.quote_currency {
                continue;
            }

            let pair = if quote.base_currency < quote.quote_currency {
                (quote.base_currency.as_str(), quote.quote_currency.as_str())
            } else {
                (quote.quote_currency.as_str(), quote.base_currency.as_str())
            };
            let ts = parse_instant(&quote.timestamp);

            match winners.entry(pair) {
                Entry::Occupied(mut entry) => {
                    // Same timestamp: the later arrival supersedes.
                    if ts >= entry.get().1 {
                        *entry.get_mut() = (idx, ts);
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert((idx, ts));
                }
            }
        }

        // Insert edges in input order so traversal is deterministic.
        let mut retained: Vec<usize> = winners.into_values().map(|(idx, _)| idx).collect();
        retained.sort_unstable();

        let mut edges: HashMap<String, Vec<(String, f64)>> = HashMap::new();
        for idx in retained {
            let quote = &quotes[idx];
            edges
                .entry(quote.quote_currency.clone())
                .or_default()
                .push((quote.base_currency.clone(), quote.rate));
            edges
                .entry(quote.base_currency.clone())
                .or_default()
                .push((quote.quote_currency.clone(), 1.0 / quote.rate));
        }

        RateGraph { edges }
    }

    /// Resolves "1 unit of `from` = ? units of `to`", or `None` when no
    /// quote path connects the two codes.
    pub fn resolve(&self, from: &str, to: &str) -> Option<f64> {
        if from == to {
            return Some(1.0);
        }

        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(from);
        let mut queue: VecDeque<(&str, f64)> = VecDeque::new();
        queue.push_back((from, 1.0));

        while let Some((current, factor)) = queue.pop_front() {
            let Some(neighbors) = self.edges.get(current) else {
                continue;
            };
            for (neighbor, weight) in neighbors {
                let neighbor = neighbor.as_str();
                if neighbor == to {
                    return Some(factor * weight);
                }
                if visited.insert(neighbor) {
                    queue.push_back((neighbor, factor * weight));
                }
            }
        }

        debug!(from, to, "No conversion path");
        None
    }
}

/// Memoized resolution toward a fixed base currency, scoped to a single
/// aggregation pass. Quotes cannot change mid-computation, so caching is
/// safe for the lifetime of the pass and discarded with it.
pub struct RateResolver<'a> {
    graph: &'a RateGraph,
    base_currency: &'a str,
    memo: HashMap<String, Option<f64>>,
}

impl<'a> RateResolver<'a> {
    pub fn new(graph: &'a RateGraph, base_currency: &'a str) -> Self {
        Self {
            graph,
            base_currency,
            memo: HashMap::new(),
        }
    }

    /// Conversion factor from `currency` into the base currency.
    pub fn rate_to_base(&mut self, currency: &str) -> Option<f64> {
        if let Some(cached) = self.memo.get(currency) {
            return *cached;
        }
        let resolved = self.graph.resolve(currency, self.base_currency);
        self.memo.insert(currency.to_string(), resolved);
        resolved
    }
}
