//! Sorted Set Module
//!
//! Score-ordered member set backing the leaderboard and timeline keys.

use std::collections::{BTreeSet, HashMap};

// == Add Outcome ==
/// Result of adding a member to a sorted set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Member was not present before
    Added,
    /// Member existed with a different score
    Updated,
    /// Member existed with the same score; nothing changed
    Unchanged,
}

impl AddOutcome {
    /// Returns true if the set was modified.
    pub fn changed(self) -> bool {
        !matches!(self, AddOutcome::Unchanged)
    }
}

// == Sorted Set ==
/// A set of unique members, each carrying an integer score.
///
/// Ranks are assigned in descending score order. Members with equal scores
/// are ordered by member string, descending, so ranks are stable across reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortedSet {
    /// Member -> score lookup
    scores: HashMap<String, i64>,
    /// Ascending (score, member) index; iterated in reverse for ranking
    index: BTreeSet<(i64, String)>,
}

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    // == Add ==
    /// Inserts `member` with `score`, or moves it if its score changed.
    pub fn add(&mut self, member: &str, score: i64) -> AddOutcome {
        match self.scores.get(member).copied() {
            Some(existing) if existing == score => AddOutcome::Unchanged,
            Some(existing) => {
                self.index.remove(&(existing, member.to_string()));
                self.index.insert((score, member.to_string()));
                self.scores.insert(member.to_string(), score);
                AddOutcome::Updated
            }
            None => {
                self.index.insert((score, member.to_string()));
                self.scores.insert(member.to_string(), score);
                AddOutcome::Added
            }
        }
    }

    // == Reverse Range ==
    /// Returns members ranked `start..=stop` (rank 0 = highest score).
    ///
    /// Out-of-range bounds are clamped; an empty vector is returned when
    /// `start` is past the end or `start > stop`.
    pub fn rev_range(&self, start: usize, stop: usize) -> Vec<(String, i64)> {
        if start > stop {
            return Vec::new();
        }

        self.index
            .iter()
            .rev()
            .skip(start)
            .take((stop - start).saturating_add(1))
            .map(|(score, member)| (member.clone(), *score))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
