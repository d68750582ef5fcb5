//! Weighted recall selection.
//!
//! One algorithm serves two callers: spaced-repetition concept selection in
//! the tracker (due = flagged for repeat and stale enough) and
//! anti-repetition media playback (due = caller's flag). Preference order is
//! due items, then items never picked this session, then the whole pool,
//! always avoiding a back-to-back repeat when more than one candidate
//! remains.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// One selectable item with its "due" flag already evaluated by the caller.
#[derive(Debug, Clone)]
pub struct RecallCandidate {
    pub id: String,
    pub due: bool,
}

impl RecallCandidate {
    pub fn new(id: impl Into<String>, due: bool) -> Self {
        Self { id: id.into(), due }
    }
}

/// Pool selector with per-session pick history.
pub struct RecallSelector {
    seen: HashSet<String>,
    last_pick: Option<String>,
    rng: ChaCha8Rng,
}

impl RecallSelector {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            last_pick: None,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Deterministic selector for tests and replayable sessions.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seen: HashSet::new(),
            last_pick: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Picks the next item from `pool`.
    ///
    /// The pool must be non-empty; an empty pool is a caller precondition
    /// violation and yields `None`.
    pub fn pick(&mut self, pool: &[RecallCandidate]) -> Option<String> {
        if pool.is_empty() {
            tracing::warn!("recall pick called with empty pool");
            return None;
        }

        let due: Vec<&RecallCandidate> = pool.iter().filter(|c| c.due).collect();
        let unseen: Vec<&RecallCandidate> = pool
            .iter()
            .filter(|c| !self.seen.contains(&c.id))
            .collect();

        let mut candidates = if !due.is_empty() {
            due
        } else if !unseen.is_empty() {
            unseen
        } else {
            pool.iter().collect()
        };

        // Avoid back-to-back repeats unless that would leave nothing.
        if candidates.len() > 1 {
            if let Some(ref last) = self.last_pick {
                let without_last: Vec<&RecallCandidate> = candidates
                    .iter()
                    .filter(|c| &c.id != last)
                    .copied()
                    .collect();
                if !without_last.is_empty() {
                    candidates = without_last;
                }
            }
        }

        let choice = candidates.choose(&mut self.rng)?.id.clone();
        self.seen.insert(choice.clone());
        self.last_pick = Some(choice.clone());
        Some(choice)
    }

    pub fn last_pick(&self) -> Option<&str> {
        self.last_pick.as_deref()
    }

    pub fn reset(&mut self) {
        self.seen.clear();
        self.last_pick = None;
    }
}

impl Default for RecallSelector {
    fn default() -> Self {
        Self::new()
    }
}
