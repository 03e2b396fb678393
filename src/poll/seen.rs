use std::collections::{HashSet, VecDeque};

/// Insertion-ordered set of already-notified texts with a fixed capacity.
/// When full, the oldest entry is evicted to make room.
#[derive(Debug)]
pub struct SeenSet {
    members: HashSet<String>,
    order: VecDeque<String>,
    capacity: usize,
}

impl SeenSet {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            members: HashSet::with_capacity(capacity.min(1024)),
            order: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.members.contains(key)
    }

    /// Returns `false` if `key` was already present.
    pub fn insert(&mut self, key: String) -> bool {
        if self.members.contains(&key) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.members.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.members.insert(key);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_duplicates() {
        let mut seen = SeenSet::new(4);
        assert!(seen.insert("a".into()));
        assert!(!seen.insert("a".into()));
        assert_eq!(seen.len(), 1);
        assert!(seen.contains("a"));
    }

    #[test]
    fn oldest_entry_is_evicted_at_capacity() {
        let mut seen = SeenSet::new(2);
        seen.insert("a".into());
        seen.insert("b".into());
        seen.insert("c".into());
        assert_eq!(seen.len(), 2);
        assert!(!seen.contains("a"));
        assert!(seen.contains("b"));
        assert!(seen.contains("c"));
    }

    #[test]
    fn duplicate_insert_does_not_refresh_or_evict() {
        let mut seen = SeenSet::new(2);
        seen.insert("a".into());
        seen.insert("b".into());
        seen.insert("a".into());
        seen.insert("c".into());
        assert!(!seen.contains("a"));
        assert!(seen.contains("b"));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut seen = SeenSet::new(0);
        assert_eq!(seen.capacity(), 1);
        seen.insert("a".into());
        assert!(seen.contains("a"));
    }
}
