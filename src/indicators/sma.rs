// =============================================================================
// Simple Moving Average (SMA) — Trailing mean with partial-window seeding
// =============================================================================
//
// Unlike the window-gated indicators, this SMA produces a value from the very
// first sample: for positions before the window fills it averages over the
// shrinking partial window ([0..=i]), and from position `window - 1` onward
// over the full trailing window.

/// Compute the trailing mean of `series` with the partial-window policy.
/// One output value per input position; `window == 0` yields an empty vec.
pub fn sma(series: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(series.len());
    let mut sum = 0.0_f64;

    for (i, &x) in series.iter().enumerate() {
        sum += x;
        if i >= window {
            sum -= series[i - window];
        }
        let count = (i + 1).min(window) as f64;
        result.push(sum / count);
    }

    result
}
