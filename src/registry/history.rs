//! Bounded supersede history.

use std::collections::VecDeque;

use crate::registry::descriptor::HistoryEntry;

/// Maximum number of superseded URLs retained.
pub const HISTORY_CAPACITY: usize = 5;

/// Oldest-first FIFO of superseded backends. Never exceeds [`HISTORY_CAPACITY`].
#[derive(Debug, Clone, Default)]
pub struct UrlHistory {
    entries: VecDeque<HistoryEntry>,
}

impl UrlHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    /// Append and evict in one step. Returns the evicted entry, if any.
    pub fn push(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        self.entries.push_back(entry);
        if self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest-first copy.
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry {
            url: format!("https://b{}.example", n),
            last_used: None,
        }
    }

    #[test]
    fn test_evicts_oldest_beyond_capacity() {
        let mut history = UrlHistory::new();
        for n in 0..HISTORY_CAPACITY {
            assert!(history.push(entry(n)).is_none());
        }

        let evicted = history.push(entry(99));
        assert_eq!(evicted.map(|e| e.url), Some("https://b0.example".to_string()));
        assert_eq!(history.len(), HISTORY_CAPACITY);

        let urls: Vec<_> = history.to_vec().into_iter().map(|e| e.url).collect();
        assert_eq!(urls.first().map(String::as_str), Some("https://b1.example"));
        assert_eq!(urls.last().map(String::as_str), Some("https://b99.example"));
    }
}
