//! Per-prompt hint escalation.
//!
//! Two independent tracks feed the same level, taking the maximum: elapsed
//! time walks the level up to Point, and consecutive misses can jump
//! straight to AutoComplete. The terminal state is the engine's primary
//! failure-recovery mechanism: it bounds total wait time per prompt even
//! when the learner cannot answer correctly.

use crate::config::{HintConfig, HintProfile};
use crate::types::{HintLevel, Learner};

pub struct HintLadder {
    config: HintConfig,
    profile: HintProfile,
    level: HintLevel,
    miss_count: u32,
    elapsed: f64,
    auto_completed: bool,
}

impl HintLadder {
    pub fn new(config: HintConfig) -> Self {
        let profile = config.younger.clone();
        Self {
            config,
            profile,
            level: HintLevel::None,
            miss_count: 0,
            elapsed: 0.0,
            auto_completed: false,
        }
    }

    /// Resets all per-prompt state and fixes the profile for `learner`.
    pub fn start_prompt(&mut self, learner: Learner) {
        self.profile = self.config.profile(learner).clone();
        self.level = HintLevel::None;
        self.miss_count = 0;
        self.elapsed = 0.0;
        self.auto_completed = false;
    }

    /// Advances the time track by `dt` seconds. Returns whether the level
    /// changed this call, so a caller can react exactly once per transition.
    pub fn update(&mut self, dt: f64) -> bool {
        if self.auto_completed {
            return false;
        }

        self.elapsed += dt;
        let time_level = self.time_track_level();
        if time_level > self.level {
            tracing::debug!(
                from = self.level.as_index(),
                to = time_level.as_index(),
                elapsed = self.elapsed,
                "hint escalated by time"
            );
            self.level = time_level;
            return true;
        }
        false
    }

    /// Registers a wrong answer. Returns whether the level changed.
    pub fn on_miss(&mut self) -> bool {
        if self.auto_completed {
            return false;
        }

        self.miss_count += 1;

        if self.miss_count >= self.profile.auto_complete_after {
            self.level = HintLevel::AutoComplete;
            self.auto_completed = true;
            tracing::debug!(misses = self.miss_count, "prompt auto-completed");
            return true;
        }

        let floor = if self.miss_count >= 2 {
            HintLevel::Point
        } else {
            HintLevel::Emphasis
        };
        if floor > self.level {
            tracing::debug!(
                from = self.level.as_index(),
                to = floor.as_index(),
                misses = self.miss_count,
                "hint escalated by miss"
            );
            self.level = floor;
            return true;
        }
        false
    }

    pub fn level(&self) -> HintLevel {
        self.level
    }

    pub fn auto_completed(&self) -> bool {
        self.auto_completed
    }

    pub fn miss_count(&self) -> u32 {
        self.miss_count
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    // The time track never reaches AutoComplete on its own.
    fn time_track_level(&self) -> HintLevel {
        let first = self.profile.timeout_delay;
        let second = first + self.profile.escalate_delay;
        let third = second + self.profile.escalate_delay;

        if self.elapsed >= third {
            HintLevel::Point
        } else if self.elapsed >= second {
            HintLevel::Emphasis
        } else if self.elapsed >= first {
            HintLevel::Repeat
        } else {
            HintLevel::None
        }
    }
}

impl Default for HintLadder {
    fn default() -> Self {
        Self::new(HintConfig::default())
    }
}
