//! # sprout-pacing
//!
//! Adaptive pacing and progression engine for the Sprout early-learning
//! activities. Every activity shares this logic: how much help to give and
//! when, which concepts to re-show after a struggle, how small units of
//! progress charge become visible reward and identity-stage transitions, and
//! whether a new play session may start at all given elapsed time and daily
//! limits.
//!
//! The crate is policy only. Rendering, audio, per-activity rules, and
//! narration live in the embedding app and consume this engine's decisions
//! through plain method calls; the engine performs no I/O of its own beyond
//! reading the wall clock for the session gate and the explicit
//! [`persistence::GateStore`] calls.
//!
//! ## Modules
//!
//! - [`recall`] - weighted recall selection (spaced repetition and
//!   anti-repetition media choice share one algorithm)
//! - [`tracker`] - per-concept performance records and the rolling
//!   difficulty signal
//! - [`hints`] - per-prompt hint escalation with terminal auto-complete
//! - [`meter`] - one-shot threshold meters (session rewards, identity
//!   progression)
//! - [`gate`] - sessions-per-day and cooldown gating with caregiver override
//! - [`persistence`] - durable JSON storage for the gate state
//! - [`engine`] - the composition root owning one of each
//!
//! ## Example
//!
//! ```rust
//! use sprout_pacing::{Learner, PacingConfig, PacingEngine};
//!
//! let mut engine = PacingEngine::new(PacingConfig::default());
//! if engine.can_start_session().is_allowed() {
//!     engine.start_prompt(Learner::Younger);
//!     engine.record_answer("color", "red", true);
//!     engine.add_reward_charge(10.0);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod gate;
pub mod hints;
pub mod meter;
pub mod persistence;
pub mod recall;
pub mod tracker;
pub mod types;

pub use config::{GateConfig, HintConfig, HintProfile, PacingConfig, RewardEvent};
pub use engine::PacingEngine;
pub use gate::{GateState, OverrideHold, SessionGate};
pub use hints::HintLadder;
pub use meter::{ProgressionMeter, RewardMeter, ThresholdMeter};
pub use persistence::{GateStore, StoreError};
pub use recall::{RecallCandidate, RecallSelector};
pub use tracker::{ConceptRecord, ConceptTracker};
pub use types::{
    BlockReason, DifficultyAdjustment, GateDecision, HintLevel, Learner, Stage,
};
