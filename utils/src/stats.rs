//! Named counters for operation statistics.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A fixed set of named, thread-safe counters.
///
/// The set of names is decided at construction; bumping an unknown name is a
/// no-op so a typo cannot grow the map at runtime.
#[derive(Debug)]
pub struct StatsCounter {
    counters: BTreeMap<&'static str, AtomicU64>,
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        let counters = names.iter().map(|&name| (name, AtomicU64::new(0))).collect();
        Self { counters }
    }

    pub fn increment(&self, name: &str) {
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Current values, ordered by name.
    pub fn snapshot(&self) -> BTreeMap<&'static str, u64> {
        self.counters
            .iter()
            .map(|(&k, v)| (k, v.load(Ordering::Relaxed)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_known_names_only() {
        let stats = StatsCounter::new(&["votes", "failures"]);
        stats.increment("votes");
        stats.increment("votes");
        stats.increment("unknown");
        assert_eq!(stats.get("votes"), 2);
        assert_eq!(stats.get("failures"), 0);
        assert_eq!(stats.get("unknown"), 0);
        assert_eq!(stats.snapshot().len(), 2);
    }

    #[test]
    fn snapshot_is_sorted() {
        let stats = StatsCounter::new(&["b", "a", "c"]);
        let names: Vec<_> = stats.snapshot().keys().copied().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
