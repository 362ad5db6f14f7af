// src/crawl/state.rs
// =============================================================================
// Per-invocation crawl bookkeeping.
//
// Three collections, all created empty for every crawl and dropped with it:
// - visited:    URLs already taken off the frontier (marked before fetching)
// - discovered: every in-scope URL ever found; this becomes the result
// - frontier:   discovered URLs still waiting for a fetch attempt
//
// Invariants kept by this type:
// - a URL enters the frontier only together with its insertion into
//   discovered, and only if it is neither visited nor already discovered
// - a URL is marked visited exactly once
// =============================================================================

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::config::FrontierOrder;

/// A URL waiting in the frontier, with its hop distance from the seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: usize,
}

#[derive(Debug)]
pub struct CrawlState {
    frontier: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    discovered: BTreeSet<String>,
    order: FrontierOrder,
}

impl CrawlState {
    /// Starts a crawl with the seed as the only frontier entry.
    ///
    /// The seed never ends up in `discovered`: it is visited first, so links
    /// pointing back at it are rejected by `record`.
    pub fn new(seed: String, order: FrontierOrder) -> Self {
        let mut frontier = VecDeque::new();
        frontier.push_back(FrontierEntry { url: seed, depth: 0 });

        Self {
            frontier,
            visited: HashSet::new(),
            discovered: BTreeSet::new(),
            order,
        }
    }

    /// Takes the next unvisited URL off the frontier and marks it visited.
    pub fn next(&mut self) -> Option<FrontierEntry> {
        loop {
            let entry = match self.order {
                FrontierOrder::Lifo => self.frontier.pop_back(),
                FrontierOrder::Fifo => self.frontier.pop_front(),
            }?;

            // Cannot trigger given record()'s checks, kept as a guard.
            if self.visited.contains(&entry.url) {
                continue;
            }

            self.visited.insert(entry.url.clone());
            return Some(entry);
        }
    }

    /// Records a URL found on a page. Returns true if it was new and has been
    /// queued for a visit.
    pub fn record(&mut self, url: &str, depth: usize) -> bool {
        if self.visited.contains(url) || self.discovered.contains(url) {
            return false;
        }

        self.discovered.insert(url.to_string());
        self.frontier.push_back(FrontierEntry {
            url: url.to_string(),
            depth,
        });
        true
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    /// Consumes the state, yielding the discovered URLs in sorted order.
    pub fn into_discovered(self) -> Vec<String> {
        self.discovered.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_first_and_not_discovered() {
        let mut state = CrawlState::new("https://example.com/".into(), FrontierOrder::Lifo);
        let first = state.next().unwrap();
        assert_eq!(first.url, "https://example.com/");
        assert_eq!(first.depth, 0);
        assert_eq!(state.discovered_count(), 0);
        assert_eq!(state.visited_count(), 1);
        assert!(state.next().is_none());
    }

    #[test]
    fn test_record_rejects_visited_and_duplicates() {
        let mut state = CrawlState::new("https://example.com/".into(), FrontierOrder::Lifo);
        state.next();

        assert!(!state.record("https://example.com/", 1));
        assert!(state.record("https://example.com/a", 1));
        assert!(!state.record("https://example.com/a", 2));
        assert_eq!(state.discovered_count(), 1);
    }

    #[test]
    fn test_lifo_order() {
        let mut state = CrawlState::new("s".into(), FrontierOrder::Lifo);
        state.next();
        state.record("a", 1);
        state.record("b", 1);
        assert_eq!(state.next().unwrap().url, "b");
        assert_eq!(state.next().unwrap().url, "a");
    }

    #[test]
    fn test_fifo_order() {
        let mut state = CrawlState::new("s".into(), FrontierOrder::Fifo);
        state.next();
        state.record("a", 1);
        state.record("b", 1);
        assert_eq!(state.next().unwrap().url, "a");
        assert_eq!(state.next().unwrap().url, "b");
    }

    #[test]
    fn test_each_url_visited_once() {
        let mut state = CrawlState::new("s".into(), FrontierOrder::Fifo);
        state.next();
        state.record("a", 1);
        let a = state.next().unwrap();
        assert_eq!(a.url, "a");
        assert!(!state.record("a", 2));
        assert!(state.next().is_none());
        assert_eq!(state.visited_count(), 2);
    }

    #[test]
    fn test_discovered_is_sorted() {
        let mut state = CrawlState::new("s".into(), FrontierOrder::Lifo);
        state.record("c", 1);
        state.record("a", 1);
        state.record("b", 1);
        assert_eq!(state.into_discovered(), vec!["a", "b", "c"]);
    }
}
