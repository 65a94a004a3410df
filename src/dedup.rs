//! Multiset-to-set collapse.
//!
//! `find` assembles candidates from many tables, so the same fingerprint
//! (and later the same document) can surface several times. Both indexes
//! funnel their results through [`unique`] before returning them.

use std::collections::HashSet;
use std::hash::Hash;

/// Collapse `items` to its distinct values.
///
/// Output order is unspecified.
#[must_use]
pub fn unique<T: Eq + Hash>(items: Vec<T>) -> Vec<T> {
    let set: HashSet<T> = items.into_iter().collect();
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_collapses_duplicates() {
        let mut out = unique(vec![3u64, 1, 3, 2, 1, 3]);
        out.sort_unstable();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn test_unique_empty() {
        assert!(unique(Vec::<u64>::new()).is_empty());
    }

    #[test]
    fn test_unique_on_strings() {
        let mut out = unique(vec!["a", "b", "a"]);
        out.sort_unstable();
        assert_eq!(out, vec!["a", "b"]);
    }
}
