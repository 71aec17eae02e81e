// =============================================================================
// Feature Snapshot — Immutable per-evaluation feature set
// =============================================================================
//
// One snapshot is built per evaluation cycle from the latest indicator values
// and cross-market scalars, handed to the rule combiner by reference, and
// discarded. Nothing here persists across evaluations.

use serde::{Deserialize, Serialize};

/// The flat set of scalar features the rule combiner consumes.
///
/// Construction guarantees every field is present and numeric; the combiner
/// performs no completeness validation of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    /// Latest spot close.
    pub spot_last: f64,
    /// Spot close of the bar before the latest.
    pub spot_prev: f64,
    /// Latest futures close.
    pub fut_last: f64,
    /// Latest RSI value.
    pub rsi: f64,
    /// Latest MFI value.
    pub mfi: f64,
    /// Smoothed first difference of OBV (5-bar partial-window mean).
    pub obv_slope: f64,
    /// Whether the latest volume exceeded its moving average by the
    /// configured multiplier.
    pub vol_spike: bool,
    /// Futures close minus spot close, latest bar.
    pub basis: f64,
    /// Z-score of the basis series over its trailing window.
    pub basis_z: f64,
    /// Latest perpetual funding rate (decimal).
    pub funding: f64,
    /// Latest open interest in contracts.
    pub open_interest: f64,
    /// Open-interest change. Currently a fixed placeholder (0.0): a real
    /// delta would require state carried across polls.
    pub oi_change: f64,
}

// -----------------------------------------------------------------------------
// Thresholds
// -----------------------------------------------------------------------------

fn default_rsi_overbought() -> f64 {
    70.0
}

fn default_rsi_oversold() -> f64 {
    30.0
}

fn default_mfi_overbought() -> f64 {
    80.0
}

fn default_mfi_oversold() -> f64 {
    20.0
}

fn default_basis_enter() -> f64 {
    1.5
}

fn default_basis_exit() -> f64 {
    0.5
}

/// Rule thresholds, read-only for the duration of an evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    /// RSI above this is overbought.
    #[serde(default = "default_rsi_overbought")]
    pub rsi_overbought: f64,

    /// RSI below this is oversold.
    #[serde(default = "default_rsi_oversold")]
    pub rsi_oversold: f64,

    /// MFI above this is overbought.
    #[serde(default = "default_mfi_overbought")]
    pub mfi_overbought: f64,

    /// MFI below this is oversold.
    #[serde(default = "default_mfi_oversold")]
    pub mfi_oversold: f64,

    /// |basis z-score| at or above this arms the basis/funding rule.
    #[serde(default = "default_basis_enter")]
    pub basis_enter: f64,

    /// Reserved hook for a future mean-reversion exit rule. Accepted from
    /// configuration, consumed by no current rule.
    #[serde(default = "default_basis_exit")]
    pub basis_exit: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            rsi_overbought: default_rsi_overbought(),
            rsi_oversold: default_rsi_oversold(),
            mfi_overbought: default_mfi_overbought(),
            mfi_oversold: default_mfi_oversold(),
            basis_enter: default_basis_enter(),
            basis_exit: default_basis_exit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_defaults() {
        let t = Thresholds::default();
        assert_eq!(t.rsi_overbought, 70.0);
        assert_eq!(t.rsi_oversold, 30.0);
        assert_eq!(t.mfi_overbought, 80.0);
        assert_eq!(t.mfi_oversold, 20.0);
        assert_eq!(t.basis_enter, 1.5);
        assert_eq!(t.basis_exit, 0.5);
    }

    #[test]
    fn thresholds_deserialize_empty_json_uses_defaults() {
        let t: Thresholds = serde_json::from_str("{}").unwrap();
        assert_eq!(t.rsi_oversold, 30.0);
        assert_eq!(t.basis_enter, 1.5);
    }

    #[test]
    fn thresholds_partial_json_fills_defaults() {
        let t: Thresholds = serde_json::from_str(r#"{ "rsi_oversold": 25.0 }"#).unwrap();
        assert_eq!(t.rsi_oversold, 25.0);
        assert_eq!(t.rsi_overbought, 70.0);
        assert_eq!(t.basis_exit, 0.5);
    }
}
