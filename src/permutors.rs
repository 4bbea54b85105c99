//! Permutation generators used to enumerate contestant pick orders.
//!
//! Both permutors are plain [`Iterator`]s over `Vec<usize>`, replacing the
//! channel-fed generators of the original with ordinary Rust iterator state
//! objects: restart by constructing a fresh one, no background goroutine to
//! manage.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Lexicographic permutations of `0..n` via the standard iterative (non-
/// recursive) variant of Heap's algorithm.
pub struct IndexPermutor {
    indices: Vec<usize>,
    c: Vec<usize>,
    i: usize,
    done: bool,
    started: bool,
}

impl IndexPermutor {
    pub fn new(n: usize) -> Self {
        IndexPermutor {
            indices: (0..n).collect(),
            c: vec![0; n],
            i: 0,
            done: n == 0,
            started: false,
        }
    }

    /// `n!`, the total number of permutations this iterator will yield.
    pub fn count_total(n: usize) -> u128 {
        (1..=n as u128).product()
    }
}

impl Iterator for IndexPermutor {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }
        let n = self.indices.len();
        while self.i < n {
            if self.c[self.i] < self.i {
                if self.i % 2 == 0 {
                    self.indices.swap(0, self.i);
                } else {
                    self.indices.swap(self.c[self.i], self.i);
                }
                self.c[self.i] += 1;
                self.i = 0;
                return Some(self.indices.clone());
            } else {
                self.c[self.i] = 0;
                self.i += 1;
            }
        }
        self.done = true;
        None
    }
}

/// Permutations of a multiset, described as group sizes (e.g. `[2, 3]` is a
/// 5-element multiset with two kinds of item, one repeated twice and one
/// repeated three times). Yields the *type sequence* for each distinct
/// arrangement — permutations that only swap within a group are suppressed
/// via a seen-hash set, mirroring the original's `visited` map.
pub struct IdenticalPermutor {
    inner: IndexPermutor,
    types: Vec<usize>,
    seen: HashSet<u64>,
}

impl IdenticalPermutor {
    pub fn new(set_sizes: &[usize]) -> Self {
        let mut types = Vec::new();
        for (group, &size) in set_sizes.iter().enumerate() {
            types.extend(std::iter::repeat(group).take(size));
        }
        let n = types.len();
        IdenticalPermutor { inner: IndexPermutor::new(n), types, seen: HashSet::new() }
    }

    /// `n! / (n1! * n2! * ...)`, the number of *distinct* arrangements.
    pub fn count_total(set_sizes: &[usize]) -> u128 {
        let n: usize = set_sizes.iter().sum();
        let mut total = IndexPermutor::count_total(n);
        for &size in set_sizes {
            total /= IndexPermutor::count_total(size).max(1);
        }
        total
    }

    fn hash_of(sequence: &[usize]) -> u64 {
        let mut hasher = DefaultHasher::new();
        sequence.hash(&mut hasher);
        hasher.finish()
    }
}

impl Iterator for IdenticalPermutor {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        loop {
            let indices = self.inner.next()?;
            let sequence: Vec<usize> = indices.iter().map(|&idx| self.types[idx]).collect();
            let hash = Self::hash_of(&sequence);
            if self.seen.insert(hash) {
                return Some(sequence);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_permutor_yields_n_factorial_distinct_permutations() {
        let perms: Vec<_> = IndexPermutor::new(4).collect();
        assert_eq!(perms.len(), 24);
        assert_eq!(IndexPermutor::count_total(4), 24);
        let unique: HashSet<_> = perms.into_iter().collect();
        assert_eq!(unique.len(), 24);
    }

    #[test]
    fn index_permutor_of_empty_set_yields_nothing() {
        assert_eq!(IndexPermutor::new(0).count(), 0);
    }

    #[test]
    fn index_permutor_of_singleton_yields_one() {
        let perms: Vec<_> = IndexPermutor::new(1).collect();
        assert_eq!(perms, vec![vec![0]]);
    }

    #[test]
    fn identical_permutor_dedups_within_groups() {
        // Two groups of size 2 each: 4!/(2!*2!) = 6 distinct type sequences.
        let perms: Vec<_> = IdenticalPermutor::new(&[2, 2]).collect();
        assert_eq!(perms.len(), 6);
        assert_eq!(IdenticalPermutor::count_total(&[2, 2]), 6);
        let unique: HashSet<_> = perms.into_iter().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn identical_permutor_all_distinct_matches_index_permutor() {
        let perms: Vec<_> = IdenticalPermutor::new(&[1, 1, 1]).collect();
        assert_eq!(perms.len(), 6);
    }

    #[test]
    fn identical_permutor_single_group_yields_one_sequence() {
        let perms: Vec<_> = IdenticalPermutor::new(&[5]).collect();
        assert_eq!(perms.len(), 1);
        assert_eq!(IdenticalPermutor::count_total(&[5]), 1);
    }
}
