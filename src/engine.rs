//! Engine composition root.
//!
//! One `PacingEngine` instance owns every component and is mutated only from
//! a single cooperative update loop: a per-frame `update(dt)` advances
//! time-based state, and discrete events (answers, charge, session
//! boundaries) are delivered synchronously between frames. Consumers get an
//! explicitly constructed engine, never an ambient global, so tests build
//! fresh isolated instances.

use chrono::{DateTime, Utc};

use crate::config::{PacingConfig, RewardEvent};
use crate::gate::{OverrideHold, SessionGate};
use crate::hints::HintLadder;
use crate::meter::{ProgressionMeter, RewardMeter};
use crate::persistence::{GateStore, StoreResult};
use crate::tracker::{ConceptRecord, ConceptTracker};
use crate::types::{DifficultyAdjustment, GateDecision, HintLevel, Learner, Stage};

pub struct PacingEngine {
    tracker: ConceptTracker,
    hints: HintLadder,
    reward_meter: RewardMeter,
    progression: ProgressionMeter,
    gate: SessionGate,
    override_hold: OverrideHold,
    override_inputs: (bool, bool),
    store: Option<GateStore>,
}

impl PacingEngine {
    pub fn new(config: PacingConfig) -> Self {
        Self {
            tracker: ConceptTracker::new(config.tracker.clone()),
            hints: HintLadder::new(config.hints.clone()),
            reward_meter: RewardMeter::from_config(&config.reward_meter),
            progression: ProgressionMeter::from_config(&config.progression),
            override_hold: OverrideHold::new(config.gate.override_hold_secs),
            gate: SessionGate::new(config.gate),
            override_inputs: (false, false),
            store: None,
        }
    }

    /// Engine with durable gate state: loads what the store has (if
    /// anything) and persists gate changes from then on.
    pub fn with_store(config: PacingConfig, store: GateStore) -> StoreResult<Self> {
        let mut engine = Self::new(config.clone());
        if let Some(state) = store.load()? {
            engine.gate = SessionGate::with_state(config.gate, state);
        }
        engine.store = Some(store);
        Ok(engine)
    }

    // ---- per-frame tick ----

    /// Advances all time-based state by `dt` seconds. Returns whether the
    /// hint level escalated this frame, so the caller can voice the new hint
    /// exactly once.
    pub fn update(&mut self, dt: f64) -> bool {
        self.reward_meter.update(dt);
        self.progression.update(dt);

        let (a_held, b_held) = self.override_inputs;
        if self.override_hold.update(dt, a_held && b_held) {
            self.gate.override_reset();
            self.persist_gate();
            self.override_hold.reset();
        }

        self.hints.update(dt)
    }

    /// Feeds the current held-state of the two caregiver override inputs.
    pub fn set_override_inputs(&mut self, a_held: bool, b_held: bool) {
        self.override_inputs = (a_held, b_held);
    }

    // ---- prompt lifecycle ----

    /// Starting a new prompt discards any in-flight hint state for the
    /// previous prompt.
    pub fn start_prompt(&mut self, learner: Learner) {
        self.hints.start_prompt(learner);
    }

    pub fn record_answer(&mut self, domain: &str, concept: &str, correct: bool) {
        self.tracker.record_answer(domain, concept, correct);
        if !correct {
            self.hints.on_miss();
        }
    }

    /// Registers a miss with the hint ladder only, for misses that are not
    /// concept answers (e.g. tapping empty space). Returns whether the level
    /// changed.
    pub fn report_miss(&mut self) -> bool {
        self.hints.on_miss()
    }

    pub fn next_concept(&mut self, domain: &str, pool: &[String]) -> Option<String> {
        self.tracker.next_concept(domain, pool)
    }

    pub fn mark_repeated(&mut self, domain: &str, concept: &str) {
        self.tracker.mark_repeated(domain, concept);
    }

    // ---- charge ----

    pub fn add_reward_charge(&mut self, amount: f64) -> Option<RewardEvent> {
        self.reward_meter.add_charge(amount)
    }

    pub fn add_progress_charge(&mut self, amount: f64) -> Option<Stage> {
        self.progression.add_charge(amount)
    }

    // ---- session boundaries ----

    pub fn can_start_session_at(&mut self, now: DateTime<Utc>) -> GateDecision {
        let decision = self.gate.can_start_at(now);
        self.persist_gate();
        decision
    }

    pub fn can_start_session(&mut self) -> GateDecision {
        self.can_start_session_at(Utc::now())
    }

    /// Ends the current session: updates the gate, clears per-session state
    /// (tracker and reward meter), and persists the gate.
    pub fn end_session_at(&mut self, now: DateTime<Utc>) {
        self.gate.record_session_end_at(now);
        self.tracker.reset();
        self.reward_meter.reset_charge();
        self.persist_gate();
        tracing::info!("session ended");
    }

    pub fn end_session(&mut self) {
        self.end_session_at(Utc::now());
    }

    // ---- read-only queries for renderers/voice ----

    pub fn hint_level(&self) -> HintLevel {
        self.hints.level()
    }

    pub fn auto_completed(&self) -> bool {
        self.hints.auto_completed()
    }

    pub fn difficulty_adjustment(&self) -> DifficultyAdjustment {
        self.tracker.difficulty_adjustment()
    }

    pub fn repeat_concepts(&self, domain: &str) -> Vec<String> {
        self.tracker.repeat_concepts(domain)
    }

    pub fn concept_record(&self, domain: &str, concept: &str) -> Option<&ConceptRecord> {
        self.tracker.record(domain, concept)
    }

    pub fn reward_percent(&self) -> f64 {
        self.reward_meter.percent()
    }

    pub fn reward_display_charge(&self) -> f64 {
        self.reward_meter.display_charge()
    }

    pub fn progress_percent(&self) -> f64 {
        self.progression.percent()
    }

    pub fn stage(&self) -> Stage {
        self.progression.stage()
    }

    pub fn override_progress(&self) -> f64 {
        self.override_hold.progress()
    }

    pub fn gate_state(&self) -> &crate::gate::GateState {
        self.gate.state()
    }

    fn persist_gate(&self) {
        if let Some(ref store) = self.store {
            if let Err(err) = store.save(self.gate.state()) {
                tracing::warn!(error = %err, "failed to persist gate state");
            }
        }
    }
}

impl Default for PacingEngine {
    fn default() -> Self {
        Self::new(PacingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_answer_feeds_both_tracker_and_ladder() {
        let mut engine = PacingEngine::default();
        engine.start_prompt(Learner::Younger);
        engine.record_answer("color", "red", false);

        assert_eq!(engine.hint_level(), HintLevel::Emphasis);
        let record = engine
            .concept_record("color", "red")
            .expect("Record not found");
        assert_eq!(record.misses, 1);
        assert!(record.needs_repeat);
    }

    #[test]
    fn test_update_reports_hint_escalation_once() {
        let mut engine = PacingEngine::default();
        engine.start_prompt(Learner::Younger);
        assert!(!engine.update(4.0));
        assert!(engine.update(1.5));
        assert_eq!(engine.hint_level(), HintLevel::Repeat);
        assert!(!engine.update(0.1));
    }

    #[test]
    fn test_end_session_clears_transient_state_only() {
        let mut engine = PacingEngine::default();
        engine.record_answer("color", "red", true);
        engine.add_reward_charge(30.0);
        engine.add_progress_charge(30.0);

        engine.end_session_at(chrono::Utc::now());

        assert!(engine.concept_record("color", "red").is_none());
        assert_eq!(engine.reward_percent(), 0.0);
        // Progression survives session boundaries.
        assert_eq!(engine.stage(), Stage::Sprout);
        assert_eq!(engine.gate_state().sessions_today, 1);
    }

    #[test]
    fn test_override_hold_clears_gate() {
        use chrono::TimeZone;
        let mut engine = PacingEngine::default();
        let now = chrono::Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        // Stamp today's daily reset before recording sessions.
        engine.can_start_session_at(now);
        for _ in 0..4 {
            engine.end_session_at(now);
        }
        assert!(!engine.can_start_session_at(now).is_allowed());

        engine.set_override_inputs(true, true);
        engine.update(1.5);
        // Released early: the hold starts over.
        engine.set_override_inputs(true, false);
        engine.update(0.1);
        assert_eq!(engine.gate_state().sessions_today, 4);

        engine.set_override_inputs(true, true);
        engine.update(3.1);
        assert_eq!(engine.gate_state().sessions_today, 0);
        assert!(engine.can_start_session_at(now).is_allowed());
    }
}
