use serde::{Deserialize, Serialize};

use crate::types::{Learner, Stage};

/// Escalation timings for one learner profile. Selected at prompt start and
/// held fixed for the prompt's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintProfile {
    /// Seconds with no answer before the first (passive) hint.
    pub timeout_delay: f64,
    /// Seconds between each subsequent time-driven escalation.
    pub escalate_delay: f64,
    /// Consecutive misses that trigger auto-completion of the prompt.
    pub auto_complete_after: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintConfig {
    pub younger: HintProfile,
    pub older: HintProfile,
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            younger: HintProfile {
                timeout_delay: 5.0,
                escalate_delay: 5.0,
                auto_complete_after: 3,
            },
            older: HintProfile {
                timeout_delay: 8.0,
                escalate_delay: 7.0,
                auto_complete_after: 4,
            },
        }
    }
}

impl HintConfig {
    pub fn profile(&self, learner: Learner) -> &HintProfile {
        match learner {
            Learner::Younger => &self.younger,
            Learner::Older => &self.older,
        }
    }
}

/// Tunables for the rolling-window difficulty signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerConfig {
    /// Answers kept in the rolling correctness window.
    pub window_size: usize,
    /// Below this many samples the signal stays at Maintain.
    pub min_samples: usize,
    /// At least this many correct of the window means Harder.
    pub harder_correct: usize,
    /// At most this many correct of the window means Easier.
    pub easier_correct: usize,
    /// Prompts a flagged concept must sit out before re-drilling.
    pub repeat_gap: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            min_samples: 3,
            harder_correct: 4,
            easier_correct: 1,
            repeat_gap: 2,
        }
    }
}

/// Thresholds for the transient per-session reward meter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardMeterConfig {
    pub max_charge: f64,
    /// (percent, event tag), strictly increasing by percent.
    pub thresholds: Vec<(f64, RewardEvent)>,
    /// Per-second easing factor for the display value.
    pub display_smoothing: f64,
}

/// One-shot celebration cues fired by the reward meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RewardEvent {
    Sparkle,
    Shower,
    Fanfare,
    GrandFinale,
}

impl Default for RewardMeterConfig {
    fn default() -> Self {
        Self {
            max_charge: 100.0,
            thresholds: vec![
                (25.0, RewardEvent::Sparkle),
                (50.0, RewardEvent::Shower),
                (75.0, RewardEvent::Fanfare),
                (100.0, RewardEvent::GrandFinale),
            ],
            display_smoothing: 4.0,
        }
    }
}

/// Thresholds for the persistent progression meter; each crossing advances
/// the identity stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionConfig {
    pub max_charge: f64,
    pub thresholds: Vec<(f64, Stage)>,
    pub display_smoothing: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            max_charge: 100.0,
            thresholds: vec![
                (25.0, Stage::Sprout),
                (50.0, Stage::Sapling),
                (75.0, Stage::Blossom),
                (100.0, Stage::Bloom),
            ],
            display_smoothing: 4.0,
        }
    }
}

/// Daily/cooldown limits for starting a play session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateConfig {
    pub max_sessions_per_day: u32,
    /// Minimum gap between the end of one session and the start of the next.
    pub cooldown_secs: i64,
    /// Local hour after which the daily session count resets on a new day.
    pub daily_reset_hour: u32,
    /// Seconds both override inputs must stay held to clear the gate.
    pub override_hold_secs: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_sessions_per_day: 4,
            cooldown_secs: 2 * 60 * 60,
            daily_reset_hour: 6,
            override_hold_secs: 3.0,
        }
    }
}

/// Aggregate engine configuration. Fixed at construction; not editable by
/// the engine itself at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacingConfig {
    pub hints: HintConfig,
    pub tracker: TrackerConfig,
    pub reward_meter: RewardMeterConfig,
    pub progression: ProgressionConfig,
    pub gate: GateConfig,
}

impl PacingConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("PACING_MAX_SESSIONS_PER_DAY") {
            if let Ok(parsed) = val.parse() {
                config.gate.max_sessions_per_day = parsed;
            }
        }
        if let Ok(val) = std::env::var("PACING_COOLDOWN_SECS") {
            if let Ok(parsed) = val.parse() {
                config.gate.cooldown_secs = parsed;
            }
        }
        if let Ok(val) = std::env::var("PACING_DAILY_RESET_HOUR") {
            if let Ok(parsed) = val.parse() {
                config.gate.daily_reset_hour = parsed;
            }
        }
        if let Ok(val) = std::env::var("PACING_OVERRIDE_HOLD_SECS") {
            if let Ok(parsed) = val.parse() {
                config.gate.override_hold_secs = parsed;
            }
        }

        config
    }
}
