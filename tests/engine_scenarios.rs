//! End-to-end scenarios exercising the pacing engine the way an activity
//! drives it: prompt lifecycle, answer reporting, charge, and session
//! boundaries against a simulated clock.

use chrono::{Duration, TimeZone, Utc};

use sprout_pacing::{
    BlockReason, DifficultyAdjustment, GateDecision, HintLevel, Learner, PacingConfig,
    PacingEngine, RewardEvent, Stage,
};

fn at(day: u32, hour: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
}

#[test]
fn struggling_learner_gets_re_drilled_and_easier_prompts() {
    let mut engine = PacingEngine::default();

    // A shaky run on colors: "red" missed, then recovered.
    for (concept, correct) in [
        ("red", false),
        ("blue", true),
        ("green", true),
        ("red", true),
        ("yellow", true),
    ] {
        engine.record_answer("color", concept, correct);
    }

    assert_eq!(
        engine.difficulty_adjustment(),
        DifficultyAdjustment::Harder
    );

    let record = engine
        .concept_record("color", "red")
        .expect("Record not found");
    assert_eq!(record.attempts, 2);
    assert_eq!(record.misses, 1);
    // The flag stays up across a correct answer until explicitly cleared.
    assert!(record.needs_repeat);

    assert_eq!(engine.repeat_concepts("color"), vec!["red".to_string()]);
    engine.mark_repeated("color", "red");
    assert!(engine.repeat_concepts("color").is_empty());
}

#[test]
fn difficulty_signal_follows_spec_bands() {
    let mut engine = PacingEngine::default();
    engine.record_answer("number", "1", true);
    engine.record_answer("number", "2", true);
    // Two answers: not enough signal yet.
    assert_eq!(
        engine.difficulty_adjustment(),
        DifficultyAdjustment::Maintain
    );

    let mut engine = PacingEngine::default();
    for correct in [false, false, false, false, true] {
        engine.record_answer("number", "3", correct);
    }
    assert_eq!(
        engine.difficulty_adjustment(),
        DifficultyAdjustment::Easier
    );
}

#[test]
fn hint_ladder_full_prompt_walkthrough() {
    let mut engine = PacingEngine::default();
    engine.start_prompt(Learner::Younger);

    assert!(engine.update(5.1));
    assert_eq!(engine.hint_level(), HintLevel::Repeat);

    engine.report_miss();
    engine.report_miss();
    assert_eq!(engine.hint_level(), HintLevel::Point);
    assert!(!engine.auto_completed());

    engine.report_miss();
    assert_eq!(engine.hint_level(), HintLevel::AutoComplete);
    assert!(engine.auto_completed());

    // The next prompt starts clean.
    engine.start_prompt(Learner::Older);
    assert_eq!(engine.hint_level(), HintLevel::None);
    assert!(!engine.auto_completed());
}

#[test]
fn reward_meter_fires_each_threshold_once() {
    let mut engine = PacingEngine::default();
    assert_eq!(engine.add_reward_charge(30.0), Some(RewardEvent::Sparkle));
    assert_eq!(engine.add_reward_charge(30.0), Some(RewardEvent::Shower));
    assert_eq!(engine.add_reward_charge(10.0), None);
    assert_eq!(engine.add_reward_charge(10.0), Some(RewardEvent::Fanfare));
    assert_eq!(
        engine.add_reward_charge(50.0),
        Some(RewardEvent::GrandFinale)
    );
    assert_eq!(engine.reward_percent(), 100.0);
    assert_eq!(engine.add_reward_charge(10.0), None);
}

#[test]
fn stage_progression_survives_session_resets() {
    let mut engine = PacingEngine::default();
    assert_eq!(engine.add_progress_charge(55.0), Some(Stage::Sapling));

    // Session boundary clears the reward meter and tracker, not the stage.
    engine.end_session_at(at(10, 9));
    assert_eq!(engine.stage(), Stage::Sapling);

    assert_eq!(engine.add_progress_charge(45.0), Some(Stage::Bloom));
    assert_eq!(engine.stage(), Stage::Bloom);
}

#[test]
fn session_gate_daily_cycle() {
    let mut engine = PacingEngine::default();

    assert!(engine.can_start_session_at(at(10, 8)).is_allowed());

    // Four sessions spread across day 10, each outside the previous
    // cooldown.
    for hour in [8, 11, 14, 17] {
        assert!(engine.can_start_session_at(at(10, hour)).is_allowed());
        engine.end_session_at(at(10, hour));
    }

    match engine.can_start_session_at(at(10, 20)) {
        GateDecision::Blocked { reason, .. } => assert_eq!(reason, BlockReason::DailyLimit),
        GateDecision::Allowed => panic!("expected daily limit block"),
    }

    // Next day, before the 06:00 reset hour: still blocked.
    assert!(!engine.can_start_session_at(at(11, 5)).is_allowed());

    // Past the reset hour the day count clears.
    assert!(engine.can_start_session_at(at(11, 7)).is_allowed());
    assert_eq!(engine.gate_state().sessions_today, 0);
}

#[test]
fn session_gate_cooldown_reports_wait_until() {
    let mut engine = PacingEngine::default();
    let end = at(10, 9);
    engine.can_start_session_at(end);
    engine.end_session_at(end);

    match engine.can_start_session_at(end + Duration::minutes(45)) {
        GateDecision::Blocked { reason, wait_until } => {
            assert_eq!(reason, BlockReason::Cooldown);
            assert_eq!(wait_until, Some(end + Duration::hours(2)));
        }
        GateDecision::Allowed => panic!("expected cooldown block"),
    }

    assert!(engine
        .can_start_session_at(end + Duration::hours(2))
        .is_allowed());
}

#[test]
fn caregiver_override_unblocks_mid_cooldown() {
    let mut engine = PacingEngine::default();
    let end = at(10, 9);
    engine.can_start_session_at(end);
    engine.end_session_at(end);
    assert!(!engine
        .can_start_session_at(end + Duration::minutes(5))
        .is_allowed());

    engine.set_override_inputs(true, true);
    // 3s hold at 60fps.
    for _ in 0..200 {
        engine.update(1.0 / 60.0);
    }
    assert!(engine
        .can_start_session_at(end + Duration::minutes(6))
        .is_allowed());
}

#[test]
fn gate_state_survives_restart_via_store() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("gate.json");
    let end = at(10, 9);

    {
        let store = sprout_pacing::GateStore::new(&path);
        let mut engine =
            PacingEngine::with_store(PacingConfig::default(), store).expect("Failed to build");
        engine.can_start_session_at(end);
        engine.end_session_at(end);
    }

    // "Restart": a new engine over the same store sees the cooldown.
    let store = sprout_pacing::GateStore::new(&path);
    let mut engine =
        PacingEngine::with_store(PacingConfig::default(), store).expect("Failed to build");
    assert!(matches!(
        engine.can_start_session_at(end + Duration::minutes(10)),
        GateDecision::Blocked {
            reason: BlockReason::Cooldown,
            ..
        }
    ));
}
