// =============================================================================
// On-Balance Volume (OBV) — Cumulative signed-volume flow
// =============================================================================
//
// OBV adds each bar's volume when the close rose versus the prior bar and
// subtracts it when the close fell:
//
//   OBV_t = OBV_{t-1} + sign(close_t - close_{t-1}) * volume_t
//
// The first bar has no prior close and contributes nothing (OBV starts at
// zero). The running total is unbounded and monotonic only in the direction
// of flow.

use super::IndicatorError;

/// Compute the OBV series. One value per input bar, starting at 0.0.
pub fn obv(close: &[f64], volume: &[f64]) -> Result<Vec<f64>, IndicatorError> {
    if close.len() != volume.len() {
        return Err(IndicatorError::LengthMismatch(vec![
            close.len(),
            volume.len(),
        ]));
    }
    if close.is_empty() {
        return Ok(Vec::new());
    }

    let mut result = Vec::with_capacity(close.len());
    let mut total = 0.0_f64;
    result.push(total);

    for i in 1..close.len() {
        let delta = close[i] - close[i - 1];
        if delta > 0.0 {
            total += volume[i];
        } else if delta < 0.0 {
            total -= volume[i];
        }
        result.push(total);
    }

    Ok(result)
}
