use serde::{Deserialize, Serialize};

/// Which learner profile is active for the current prompt.
///
/// Passed explicitly to [`crate::hints::HintLadder::start_prompt`] so the
/// ladder's behavior is fully determined by its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Learner {
    #[default]
    Younger,
    Older,
}

impl Learner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Younger => "younger",
            Self::Older => "older",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "older" => Self::Older,
            _ => Self::Younger,
        }
    }
}

/// Difficulty signal derived from the rolling correctness window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum DifficultyAdjustment {
    Harder,
    #[default]
    Maintain,
    Easier,
}

impl DifficultyAdjustment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Harder => "harder",
            Self::Maintain => "maintain",
            Self::Easier => "easier",
        }
    }
}

/// Degree of assistance shown for the active prompt.
///
/// `AutoComplete` is terminal: the prompt is resolved on the learner's
/// behalf and no further escalation is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[derive(Default)]
pub enum HintLevel {
    #[default]
    None,
    Repeat,
    Emphasis,
    Point,
    AutoComplete,
}

impl HintLevel {
    pub fn as_index(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Repeat => 1,
            Self::Emphasis => 2,
            Self::Point => 3,
            Self::AutoComplete => 4,
        }
    }
}

/// Persisted identity/progress tier driven by the progression meter.
///
/// Ordering matters: stage transitions are monotonic and a later stage never
/// regresses to an earlier one, even if raw charge is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Stage {
    #[default]
    Seed,
    Sprout,
    Sapling,
    Blossom,
    Bloom,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::Sprout => "sprout",
            Self::Sapling => "sapling",
            Self::Blossom => "blossom",
            Self::Bloom => "bloom",
        }
    }
}

/// Why a session start was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockReason {
    DailyLimit,
    Cooldown,
}

impl BlockReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DailyLimit => "dailyLimit",
            Self::Cooldown => "cooldown",
        }
    }
}

/// Outcome of asking the session gate whether play may begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "decision")]
pub enum GateDecision {
    Allowed,
    Blocked {
        reason: BlockReason,
        #[serde(skip_serializing_if = "Option::is_none")]
        wait_until: Option<chrono::DateTime<chrono::Utc>>,
    },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}
