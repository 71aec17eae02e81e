// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free transforms from raw OHLCV series to derived series.
// Each function runs in O(n) using an incremental/rolling formulation.
//
// Two output conventions are in use:
//   * RSI, OBV and SMA produce a value for every input position (their seed
//     policies are documented per function).
//   * MFI and the rolling z-score are gated on a full window: they return a
//     typed `IndicatorError::InsufficientHistory` instead of silently
//     computing on a short window, and their output vectors are aligned to
//     the tail of the input (first element = first fully-windowed position).

pub mod mfi;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod zscore;

use thiserror::Error;

/// Failure modes of the window-gated indicators.
#[derive(Debug, Error, PartialEq)]
pub enum IndicatorError {
    /// The input series is shorter than the indicator's required window.
    #[error("insufficient history: need at least {required} samples, got {got}")]
    InsufficientHistory { required: usize, got: usize },

    /// A zero-length window or period makes the indicator undefined.
    #[error("indicator window/period must be at least 1")]
    ZeroWindow,

    /// Input series that must share a length do not.
    #[error("input series lengths differ: {0:?}")]
    LengthMismatch(Vec<usize>),
}
