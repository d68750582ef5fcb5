//! Bounded charge accumulators with one-shot threshold events.
//!
//! Two instances exist in the engine: a transient per-session reward meter
//! and a persistent progression meter whose crossings also advance the
//! identity [`Stage`]. Crossing detection scans thresholds from highest to
//! lowest and fires only the single highest newly-crossed tag per call; a
//! large jump leaves lower tags skipped, not queued.

use crate::config::{ProgressionConfig, RewardEvent, RewardMeterConfig};
use crate::types::Stage;

/// Generic bounded accumulator. Charge never decreases except at explicit
/// reset; each configured threshold fires at most once per charge history.
pub struct ThresholdMeter<E: Copy> {
    max: f64,
    thresholds: Vec<(f64, E)>,
    charge: f64,
    display_charge: f64,
    display_smoothing: f64,
    last_threshold_crossed: f64,
}

impl<E: Copy> ThresholdMeter<E> {
    /// `thresholds` are (percent, tag) pairs, strictly increasing by percent.
    pub fn new(max: f64, thresholds: Vec<(f64, E)>, display_smoothing: f64) -> Self {
        debug_assert!(max > 0.0);
        debug_assert!(thresholds.windows(2).all(|w| w[0].0 < w[1].0));
        Self {
            max,
            thresholds,
            charge: 0.0,
            display_charge: 0.0,
            display_smoothing,
            last_threshold_crossed: 0.0,
        }
    }

    /// Adds charge and returns the highest newly-crossed threshold tag, if
    /// any. `amount <= 0` is a no-op: charge cannot decrease, so no event is
    /// possible.
    pub fn add_charge(&mut self, amount: f64) -> Option<E> {
        if amount <= 0.0 {
            return None;
        }

        self.charge = (self.charge + amount).min(self.max);
        let percent = self.percent();

        for &(threshold, tag) in self.thresholds.iter().rev() {
            if threshold <= percent && threshold > self.last_threshold_crossed {
                self.last_threshold_crossed = threshold;
                return Some(tag);
            }
        }
        None
    }

    /// Eases the display value toward the true charge. Animation only; no
    /// crossing logic reads it.
    pub fn update(&mut self, dt: f64) {
        let alpha = (self.display_smoothing * dt).clamp(0.0, 1.0);
        self.display_charge += (self.charge - self.display_charge) * alpha;
    }

    pub fn reset_charge(&mut self) {
        self.charge = 0.0;
        self.display_charge = 0.0;
        self.last_threshold_crossed = 0.0;
    }

    pub fn charge(&self) -> f64 {
        self.charge
    }

    pub fn percent(&self) -> f64 {
        self.charge / self.max * 100.0
    }

    pub fn display_charge(&self) -> f64 {
        self.display_charge
    }
}

/// The transient per-session celebration meter.
pub type RewardMeter = ThresholdMeter<RewardEvent>;

impl RewardMeter {
    pub fn from_config(config: &RewardMeterConfig) -> Self {
        Self::new(
            config.max_charge,
            config.thresholds.clone(),
            config.display_smoothing,
        )
    }
}

/// Progression meter: threshold crossings advance the identity stage, and
/// the stage never regresses even when raw charge is reset.
pub struct ProgressionMeter {
    meter: ThresholdMeter<Stage>,
    stage: Stage,
}

impl ProgressionMeter {
    pub fn from_config(config: &ProgressionConfig) -> Self {
        Self {
            meter: ThresholdMeter::new(
                config.max_charge,
                config.thresholds.clone(),
                config.display_smoothing,
            ),
            stage: Stage::Seed,
        }
    }

    /// Adds charge; returns the newly reached stage when one is crossed and
    /// it is strictly later than the current stage.
    pub fn add_charge(&mut self, amount: f64) -> Option<Stage> {
        let crossed = self.meter.add_charge(amount)?;
        if crossed > self.stage {
            tracing::info!(from = self.stage.as_str(), to = crossed.as_str(), "stage advanced");
            self.stage = crossed;
            return Some(crossed);
        }
        None
    }

    pub fn update(&mut self, dt: f64) {
        self.meter.update(dt);
    }

    /// Clears raw charge only. The stored stage is independent of charge
    /// once advanced.
    pub fn reset_charge(&mut self) {
        self.meter.reset_charge();
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn charge(&self) -> f64 {
        self.meter.charge()
    }

    pub fn percent(&self) -> f64 {
        self.meter.percent()
    }

    pub fn display_charge(&self) -> f64 {
        self.meter.display_charge()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProgressionConfig, RewardMeterConfig};

    fn reward_meter() -> RewardMeter {
        RewardMeter::from_config(&RewardMeterConfig::default())
    }

    #[test]
    fn test_charge_clamped_at_max() {
        let mut meter = reward_meter();
        meter.add_charge(80.0);
        meter.add_charge(80.0);
        assert_eq!(meter.charge(), 100.0);
        assert_eq!(meter.percent(), 100.0);
    }

    #[test]
    fn test_non_positive_amount_is_noop() {
        let mut meter = reward_meter();
        assert_eq!(meter.add_charge(0.0), None);
        assert_eq!(meter.add_charge(-5.0), None);
        assert_eq!(meter.charge(), 0.0);
    }

    #[test]
    fn test_thresholds_fire_in_sequence() {
        let mut meter = reward_meter();
        assert_eq!(meter.add_charge(30.0), Some(RewardEvent::Sparkle));
        // Charge now 60: the 50% event fires, not 25 again.
        assert_eq!(meter.add_charge(30.0), Some(RewardEvent::Shower));
        assert_eq!(meter.add_charge(5.0), None);
        assert_eq!(meter.add_charge(20.0), Some(RewardEvent::Fanfare));
        assert_eq!(meter.add_charge(50.0), Some(RewardEvent::GrandFinale));
        assert_eq!(meter.add_charge(50.0), None);
    }

    #[test]
    fn test_large_jump_skips_lower_thresholds() {
        let mut meter = reward_meter();
        // One call through 25/50/75: only the highest fires, the others are
        // skipped for good.
        assert_eq!(meter.add_charge(80.0), Some(RewardEvent::Fanfare));
        assert_eq!(meter.add_charge(1.0), None);
        assert_eq!(meter.add_charge(19.0), Some(RewardEvent::GrandFinale));
    }

    #[test]
    fn test_reset_rearms_thresholds() {
        let mut meter = reward_meter();
        meter.add_charge(30.0);
        meter.reset_charge();
        assert_eq!(meter.charge(), 0.0);
        assert_eq!(meter.add_charge(30.0), Some(RewardEvent::Sparkle));
    }

    #[test]
    fn test_display_charge_tracks_true_charge() {
        let mut meter = reward_meter();
        meter.add_charge(40.0);
        assert_eq!(meter.display_charge(), 0.0);
        for _ in 0..100 {
            meter.update(0.1);
        }
        assert!((meter.display_charge() - 40.0).abs() < 1.0);
    }

    #[test]
    fn test_stage_advances_with_crossings() {
        let mut meter = ProgressionMeter::from_config(&ProgressionConfig::default());
        assert_eq!(meter.stage(), Stage::Seed);
        assert_eq!(meter.add_charge(30.0), Some(Stage::Sprout));
        assert_eq!(meter.add_charge(30.0), Some(Stage::Sapling));
        assert_eq!(meter.stage(), Stage::Sapling);
    }

    #[test]
    fn test_stage_survives_charge_reset() {
        let mut meter = ProgressionMeter::from_config(&ProgressionConfig::default());
        meter.add_charge(60.0);
        assert_eq!(meter.stage(), Stage::Sapling);

        meter.reset_charge();
        assert_eq!(meter.charge(), 0.0);
        assert_eq!(meter.stage(), Stage::Sapling);

        // Re-crossing an earlier threshold must not regress the stage.
        assert_eq!(meter.add_charge(30.0), None);
        assert_eq!(meter.stage(), Stage::Sapling);
    }
}
