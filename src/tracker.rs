//! Per-concept performance tracking and spaced repetition.
//!
//! The tracker owns one record per (domain, concept) pair seen this session,
//! a rolling window of recent correctness, and a global prompt counter used
//! to measure how stale a flagged concept is before it may be re-drilled.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

use crate::config::TrackerConfig;
use crate::recall::{RecallCandidate, RecallSelector};
use crate::types::DifficultyAdjustment;

/// Cumulative performance for one (domain, concept) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptRecord {
    pub domain: String,
    pub concept: String,
    pub attempts: u32,
    pub misses: u32,
    /// Global prompt counter value at last presentation.
    pub last_seen_index: u64,
    /// Set on any miss; cleared only by an explicit `mark_repeated`.
    pub needs_repeat: bool,
}

pub struct ConceptTracker {
    config: TrackerConfig,
    records: HashMap<(String, String), ConceptRecord>,
    window: VecDeque<bool>,
    prompt_counter: u64,
    selector: RecallSelector,
}

impl ConceptTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            records: HashMap::new(),
            window: VecDeque::with_capacity(8),
            prompt_counter: 0,
            selector: RecallSelector::new(),
        }
    }

    /// Tracker with a deterministic selection seed, for tests.
    pub fn with_seed(config: TrackerConfig, seed: u64) -> Self {
        Self {
            selector: RecallSelector::with_seed(seed),
            ..Self::new(config)
        }
    }

    /// Records the outcome of one prompt for `concept` in `domain`.
    pub fn record_answer(&mut self, domain: &str, concept: &str, correct: bool) {
        self.window.push_back(correct);
        if self.window.len() > self.config.window_size {
            self.window.pop_front();
        }

        let key = (domain.to_string(), concept.to_string());
        let record = self
            .records
            .entry(key)
            .or_insert_with(|| ConceptRecord {
                domain: domain.to_string(),
                concept: concept.to_string(),
                attempts: 0,
                misses: 0,
                last_seen_index: 0,
                needs_repeat: false,
            });

        record.attempts += 1;
        if !correct {
            record.misses += 1;
            record.needs_repeat = true;
            tracing::debug!(domain, concept, "concept flagged for repeat");
        }
        record.last_seen_index = self.prompt_counter;
        self.prompt_counter += 1;
    }

    /// Rolling-window difficulty signal.
    ///
    /// Stays at Maintain until enough answers have been recorded to mean
    /// anything.
    pub fn difficulty_adjustment(&self) -> DifficultyAdjustment {
        if self.window.len() < self.config.min_samples {
            return DifficultyAdjustment::Maintain;
        }

        let correct = self.window.iter().filter(|&&c| c).count();
        if correct >= self.config.harder_correct {
            DifficultyAdjustment::Harder
        } else if correct <= self.config.easier_correct {
            DifficultyAdjustment::Easier
        } else {
            DifficultyAdjustment::Maintain
        }
    }

    /// Concepts in `domain` flagged for repeat and stale enough to re-serve.
    pub fn repeat_concepts(&self, domain: &str) -> Vec<String> {
        self.records
            .values()
            .filter(|r| {
                r.domain == domain
                    && r.needs_repeat
                    && self.prompt_counter >= r.last_seen_index + self.config.repeat_gap
            })
            .map(|r| r.concept.clone())
            .collect()
    }

    /// Clears the repeat flag after the caller has deliberately re-served
    /// `concept`. Distinct from a fresh answer report: the counter does not
    /// advance.
    pub fn mark_repeated(&mut self, domain: &str, concept: &str) {
        let key = (domain.to_string(), concept.to_string());
        if let Some(record) = self.records.get_mut(&key) {
            record.needs_repeat = false;
            record.last_seen_index = self.prompt_counter;
            tracing::debug!(domain, concept, "repeat flag cleared");
        }
    }

    /// Picks the next concept to show from `pool`, preferring flagged-stale
    /// concepts via the recall selector.
    pub fn next_concept(&mut self, domain: &str, pool: &[String]) -> Option<String> {
        let due: Vec<String> = self.repeat_concepts(domain);
        let candidates: Vec<RecallCandidate> = pool
            .iter()
            .map(|c| RecallCandidate::new(c.clone(), due.contains(c)))
            .collect();
        self.selector.pick(&candidates)
    }

    pub fn record(&self, domain: &str, concept: &str) -> Option<&ConceptRecord> {
        self.records
            .get(&(domain.to_string(), concept.to_string()))
    }

    pub fn prompt_count(&self) -> u64 {
        self.prompt_counter
    }

    /// Clears all state at a session boundary.
    pub fn reset(&mut self) {
        self.records.clear();
        self.window.clear();
        self.prompt_counter = 0;
        self.selector.reset();
    }
}

impl Default for ConceptTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
