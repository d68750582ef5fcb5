//! Session access gating.
//!
//! Tracks sessions-per-day and end-of-session timestamps against wall-clock
//! time. Every decision takes `now` explicitly so tests construct instants
//! instead of sleeping; thin wrappers read `Utc::now()` for callers on the
//! real clock. The gate fails open: a fresh state with nothing recorded is
//! always Allowed.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::config::GateConfig;
use crate::types::{BlockReason, GateDecision};

/// The only engine state that survives process restarts (see
/// [`crate::persistence::GateStore`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateState {
    pub sessions_today: u32,
    pub last_reset_date: Option<NaiveDate>,
    pub last_session_end: Option<DateTime<Utc>>,
}

pub struct SessionGate {
    config: GateConfig,
    state: GateState,
}

impl SessionGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            state: GateState::default(),
        }
    }

    /// Restores a gate from persisted state.
    pub fn with_state(config: GateConfig, state: GateState) -> Self {
        Self { config, state }
    }

    /// Whether a new session may start at `now`.
    ///
    /// Runs the daily-reset check first: once the clock passes the
    /// configured reset hour on a new calendar day, the daily count clears.
    pub fn can_start_at(&mut self, now: DateTime<Utc>) -> GateDecision {
        self.apply_daily_reset(now);

        if self.state.sessions_today >= self.config.max_sessions_per_day {
            tracing::info!(
                sessions_today = self.state.sessions_today,
                "session blocked: daily limit"
            );
            return GateDecision::Blocked {
                reason: BlockReason::DailyLimit,
                wait_until: None,
            };
        }

        if let Some(last_end) = self.state.last_session_end {
            let cooldown = Duration::seconds(self.config.cooldown_secs);
            if now - last_end < cooldown {
                let wait_until = last_end + cooldown;
                tracing::info!(%wait_until, "session blocked: cooldown");
                return GateDecision::Blocked {
                    reason: BlockReason::Cooldown,
                    wait_until: Some(wait_until),
                };
            }
        }

        GateDecision::Allowed
    }

    pub fn can_start(&mut self) -> GateDecision {
        self.can_start_at(Utc::now())
    }

    /// Records the end of a session at `now`.
    pub fn record_session_end_at(&mut self, now: DateTime<Utc>) {
        self.state.sessions_today += 1;
        self.state.last_session_end = Some(now);
        tracing::debug!(
            sessions_today = self.state.sessions_today,
            "session end recorded"
        );
    }

    pub fn record_session_end(&mut self) {
        self.record_session_end_at(Utc::now());
    }

    /// Caregiver escape hatch: clears any active block.
    pub fn override_reset(&mut self) {
        self.state.sessions_today = 0;
        self.state.last_session_end = None;
        tracing::info!("session gate cleared by caregiver override");
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    fn apply_daily_reset(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        if now.hour() >= self.config.daily_reset_hour && self.state.last_reset_date != Some(today) {
            self.state.sessions_today = 0;
            self.state.last_reset_date = Some(today);
        }
    }
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}

/// Debounced long-press timer for the caregiver override: accumulates only
/// while both designated inputs remain held and resets to zero the instant
/// either is released.
pub struct OverrideHold {
    required_secs: f64,
    held_secs: f64,
    completed: bool,
}

impl OverrideHold {
    pub fn new(required_secs: f64) -> Self {
        Self {
            required_secs,
            held_secs: 0.0,
            completed: false,
        }
    }

    /// Advances the timer. Returns true exactly once, on the frame the hold
    /// completes; `reset()` re-arms it.
    pub fn update(&mut self, dt: f64, both_held: bool) -> bool {
        if !both_held {
            self.held_secs = 0.0;
            return false;
        }
        if self.completed {
            return false;
        }

        self.held_secs += dt;
        if self.held_secs >= self.required_secs {
            self.completed = true;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.held_secs = 0.0;
        self.completed = false;
    }

    pub fn progress(&self) -> f64 {
        (self.held_secs / self.required_secs).clamp(0.0, 1.0)
    }
}
