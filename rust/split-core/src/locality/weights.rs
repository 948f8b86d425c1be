// rust/split-core/src/locality/weights.rs

use std::collections::HashMap;

/// Minimum number of hosts reported for a split when that many hold data.
pub const MIN_LOCATION_NAMES: usize = 3;

/// Share of the total bytes at which a host is always reported.
pub const LOCALITY_THRESHOLD: f64 = 0.75;

/// Bytes accumulated per host across a set of descriptors.
///
/// Hosts are kept in the order they first received bytes, which is the
/// order exact ties keep after ranking.
#[derive(Debug, Clone, Default)]
pub struct HostWeights {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
    total_length: u64,
}

impl HostWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `bytes` to `host`.
    pub fn add(&mut self, host: &str, bytes: u64) {
        match self.index.get(host) {
            Some(&slot) => self.entries[slot].1 += bytes,
            None => {
                self.index.insert(host.to_string(), self.entries.len());
                self.entries.push((host.to_string(), bytes));
            }
        }
    }

    /// Adds the length of one descriptor's byte range to the total.
    pub fn add_range(&mut self, length: u64) {
        self.total_length += length;
    }

    /// Combined length of every range considered.
    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    pub fn get(&self, host: &str) -> Option<u64> {
        self.index.get(host).map(|&slot| self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hosts sorted by bytes, largest first. Ties keep insertion order.
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .entries
            .iter()
            .map(|(host, bytes)| (host.as_str(), *bytes))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Picks the hosts to report from ranked weights.
///
/// Walking down the ranking, a host is kept while any of these hold:
/// fewer than `min_location_names` hosts are kept so far, its weight equals
/// the previously kept one (a plateau is never cut), or it alone holds at
/// least `locality_threshold` of the total. The walk stops at the first host
/// failing all three.
pub fn select_top_hosts(
    weights: &HostWeights,
    min_location_names: usize,
    locality_threshold: f64,
) -> Vec<String> {
    let ranked = weights.ranked();
    let total = weights.total_length() as f64;

    let mut previous: Option<u64> = None;
    let mut end = 0;
    while end < ranked.len() {
        let value = ranked[end].1;
        let dominant = total > 0.0 && value as f64 / total >= locality_threshold;
        if !(end < min_location_names || previous == Some(value) || dominant) {
            break;
        }
        previous = Some(value);
        end += 1;
    }

    ranked[..end]
        .iter()
        .map(|(host, _)| host.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(entries: &[(&str, u64)], total: u64) -> HostWeights {
        let mut weights = HostWeights::new();
        for (host, bytes) in entries {
            weights.add(host, *bytes);
        }
        weights.add_range(total);
        weights
    }

    fn select(weights: &HostWeights) -> Vec<String> {
        select_top_hosts(weights, MIN_LOCATION_NAMES, LOCALITY_THRESHOLD)
    }

    #[test]
    fn test_add_accumulates() {
        let mut w = HostWeights::new();
        w.add("a", 10);
        w.add("b", 5);
        w.add("a", 7);

        assert_eq!(w.get("a"), Some(17));
        assert_eq!(w.get("b"), Some(5));
        assert_eq!(w.get("c"), None);
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn test_ranked_descending_ties_in_insertion_order() {
        let w = weights(&[("x", 5), ("y", 9), ("z", 5), ("w", 9)], 28);
        let ranked = w.ranked();
        assert_eq!(ranked, vec![("y", 9), ("w", 9), ("x", 5), ("z", 5)]);
    }

    #[test]
    fn test_plateau_at_top_includes_three() {
        let w = weights(&[("A", 100), ("B", 100), ("C", 50)], 250);
        let hosts = select(&w);
        assert_eq!(hosts, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_single_host_full_share() {
        let w = weights(&[("only", 400)], 400);
        assert_eq!(select(&w), vec!["only"]);
    }

    #[test]
    fn test_fewer_than_min_hosts() {
        let w = weights(&[("a", 60), ("b", 40)], 100);
        assert_eq!(select(&w), vec!["a", "b"]);
    }

    #[test]
    fn test_stops_after_min_when_values_differ() {
        let w = weights(&[("a", 50), ("b", 40), ("c", 30), ("d", 20), ("e", 10)], 100);
        assert_eq!(select(&w), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_plateau_extends_past_min() {
        let w = weights(
            &[("a", 40), ("b", 30), ("c", 20), ("d", 20), ("e", 20), ("f", 10)],
            100,
        );
        assert_eq!(select(&w), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_many_hosts_tied() {
        let entries: Vec<(String, u64)> = (0..10).map(|i| (format!("h{i}"), 100)).collect();
        let mut w = HostWeights::new();
        for (host, bytes) in &entries {
            w.add(host, *bytes);
        }
        w.add_range(100);

        assert_eq!(select(&w).len(), 10);
    }

    #[test]
    fn test_dominant_host_beyond_min() {
        // Replicated blocks credit every replica, so shares can exceed the
        // threshold for several hosts at once.
        let w = weights(&[("a", 100), ("b", 100), ("c", 100), ("d", 90), ("e", 10)], 100);
        assert_eq!(select(&w), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_empty_weights() {
        let w = HostWeights::new();
        assert!(select(&w).is_empty());
    }

    #[test]
    fn test_custom_minimum() {
        let w = weights(&[("a", 50), ("b", 40), ("c", 30)], 120);
        assert_eq!(select_top_hosts(&w, 1, LOCALITY_THRESHOLD), vec!["a"]);
    }
}
