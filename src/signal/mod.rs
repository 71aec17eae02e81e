// =============================================================================
// Signal Module — Directional decision value objects and the rule combiner
// =============================================================================
//
// A signal is the engine's final verdict for one evaluation: a direction, a
// bounded confidence score and an ordered trail of the rules that fired.
// Signals are constructed once by the combiner and never mutated.

pub mod combiner;
pub mod snapshot;

pub use combiner::combine_rules;
pub use snapshot::{FeatureSnapshot, Thresholds};

use serde::{Deserialize, Serialize};

/// Directional action recommended for the asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Neutral,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Scored decision produced by the rule combiner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// BUY / SELL / NEUTRAL classification of the final score.
    pub action: Action,

    /// Accumulated rule score, clamped to [-1.0, +1.0].
    pub score: f64,

    /// One human-readable entry per rule that fired, in evaluation order.
    pub reasons: Vec<String>,
}
