// =============================================================================
// Rolling Z-Score — Standardized deviation from a trailing mean
// =============================================================================
//
// z_t = (x_t - mean(window)) / stddev(window)
//
// over a trailing window of exactly `window` samples, using the sample
// standard deviation (n - 1 denominator). The window must be full: shorter
// inputs are a typed failure.
//
// A zero trailing standard deviation leaves the z-score undefined at that
// position; it is surfaced as NaN and the caller substitutes its own neutral
// fallback (the engine uses 0).

use super::IndicatorError;

/// Compute the rolling z-score over a trailing window of exactly `window`
/// samples.
///
/// The output is tail-aligned: element `k` corresponds to input position
/// `window - 1 + k`. Undefined positions (zero variance, or `window == 1`
/// where the sample deviation has no degrees of freedom) carry NaN.
pub fn zscore(series: &[f64], window: usize) -> Result<Vec<f64>, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::ZeroWindow);
    }
    if series.len() < window {
        return Err(IndicatorError::InsufficientHistory {
            required: window,
            got: series.len(),
        });
    }

    let w = window as f64;
    let mut sum: f64 = series[..window].iter().sum();
    let mut sum_sq: f64 = series[..window].iter().map(|x| x * x).sum();

    let mut result = Vec::with_capacity(series.len() - window + 1);
    result.push(standardize(series[window - 1], sum, sum_sq, w));

    for i in window..series.len() {
        let incoming = series[i];
        let outgoing = series[i - window];
        sum += incoming - outgoing;
        sum_sq += incoming * incoming - outgoing * outgoing;
        result.push(standardize(incoming, sum, sum_sq, w));
    }

    Ok(result)
}

/// Standardize `value` against the windowed sum / sum-of-squares.
fn standardize(value: f64, sum: f64, sum_sq: f64, w: f64) -> f64 {
    if w < 2.0 {
        return f64::NAN; // sample stddev needs at least two observations
    }
    let mean = sum / w;
    // Rolling cancellation can push a zero variance slightly negative;
    // anything non-positive is a degenerate (zero-deviation) window.
    let var = (sum_sq - sum * sum / w) / (w - 1.0);
    if var <= 0.0 {
        return f64::NAN;
    }
    (value - mean) / var.sqrt()
}
