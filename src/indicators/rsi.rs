// =============================================================================
// Relative Strength Index (RSI) — Exponentially Weighted Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Smooth clipped gains and clipped losses independently with an
//          exponential moving average, alpha = 1 / period, seeded from the
//          first delta:
//            avg = avg + alpha * (x - avg)
// Step 3 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Wherever the smoothed loss is exactly zero the ratio is undefined; those
// positions take the neutral value 50 instead of propagating an infinity.
// The same substitution covers the very first bar, which has no delta.
// =============================================================================

/// Smoothing-seed neutral value used wherever RSI is undefined.
const NEUTRAL: f64 = 50.0;

/// Compute the full RSI series for the given `closes` and `period`.
///
/// The output has exactly one value per close. Position 0 is the neutral 50
/// (no delta exists yet); positions before `period` samples have accumulated
/// are defined but statistically weak, and callers should only treat
/// positions >= `period` as reliable.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - zero smoothed loss (flat or gain-only stretches) => 50 at that position
pub fn rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.is_empty() {
        return Vec::new();
    }

    let alpha = 1.0 / period as f64;

    let mut result = Vec::with_capacity(closes.len());
    result.push(NEUTRAL); // first bar has no delta

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    let mut seeded = false;

    for w in closes.windows(2) {
        let delta = w[1] - w[0];
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { -delta } else { 0.0 };

        if seeded {
            avg_gain += alpha * (gain - avg_gain);
            avg_loss += alpha * (loss - avg_loss);
        } else {
            // The exponential mean is seeded with the first observation.
            avg_gain = gain;
            avg_loss = loss;
            seeded = true;
        }

        result.push(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

/// Convert smoothed gain / smoothed loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        NEUTRAL
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}
