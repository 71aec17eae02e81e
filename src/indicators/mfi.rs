// =============================================================================
// Money Flow Index (MFI) — Volume-weighted overbought/oversold oscillator
// =============================================================================
//
// MFI is the volume-weighted analogue of RSI built on "typical price" flow:
//
//   typical price  tp = (high + low + close) / 3
//   raw money flow mf = tp * volume
//
// Each bar's flow is positive when tp rose versus the prior bar, negative
// when it fell, and contributes nothing when unchanged (the first bar has no
// prior tp and contributes nothing either). Positive and negative flows are
// summed over a trailing window of exactly `period` bars:
//
//   MFI = 100 - 100 / (1 + pos_sum / neg_sum)
//
// A zero negative sum makes the ratio undefined; those positions take the
// neutral value 50.
// =============================================================================

use super::IndicatorError;

/// Compute the MFI series over a trailing window of exactly `period` bars.
///
/// The output is tail-aligned: element `k` corresponds to input position
/// `period - 1 + k`, so the result has `len - period + 1` values. Shorter
/// inputs are a typed failure, never a silent partial-window computation.
pub fn mfi(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
    period: usize,
) -> Result<Vec<f64>, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::ZeroWindow);
    }

    let n = close.len();
    if high.len() != n || low.len() != n || volume.len() != n {
        return Err(IndicatorError::LengthMismatch(vec![
            high.len(),
            low.len(),
            close.len(),
            volume.len(),
        ]));
    }
    if n < period {
        return Err(IndicatorError::InsufficientHistory {
            required: period,
            got: n,
        });
    }

    // Signed flow per bar: (positive_flow, negative_flow), at most one nonzero.
    let mut pos_flow = vec![0.0_f64; n];
    let mut neg_flow = vec![0.0_f64; n];
    let mut prev_tp = (high[0] + low[0] + close[0]) / 3.0;

    for i in 1..n {
        let tp = (high[i] + low[i] + close[i]) / 3.0;
        let mf = tp * volume[i];
        if tp > prev_tp {
            pos_flow[i] = mf;
        } else if tp < prev_tp {
            neg_flow[i] = mf;
        }
        prev_tp = tp;
    }

    // Rolling window sums, maintained incrementally.
    let mut pos_sum: f64 = pos_flow[..period].iter().sum();
    let mut neg_sum: f64 = neg_flow[..period].iter().sum();

    let mut result = Vec::with_capacity(n - period + 1);
    result.push(mfi_from_sums(pos_sum, neg_sum));

    for i in period..n {
        pos_sum += pos_flow[i] - pos_flow[i - period];
        neg_sum += neg_flow[i] - neg_flow[i - period];
        result.push(mfi_from_sums(pos_sum, neg_sum));
    }

    Ok(result)
}

/// Convert windowed flow sums into an MFI value in [0, 100].
fn mfi_from_sums(pos_sum: f64, neg_sum: f64) -> f64 {
    if neg_sum == 0.0 {
        50.0
    } else {
        let ratio = pos_sum / neg_sum;
        100.0 - 100.0 / (1.0 + ratio)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn flat_bars(n: usize, price: f64, vol: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
        (vec![price; n], vec![price; n], vec![price; n], vec![vol; n])
    }

    #[test]
    fn mfi_period_zero_is_error() {
        let (h, l, c, v) = flat_bars(20, 100.0, 1.0);
        assert_eq!(mfi(&h, &l, &c, &v, 0), Err(IndicatorError::ZeroWindow));
    }

    #[test]
    fn mfi_insufficient_history_is_typed_failure() {
        let (h, l, c, v) = flat_bars(10, 100.0, 1.0);
        assert_eq!(
            mfi(&h, &l, &c, &v, 14),
            Err(IndicatorError::InsufficientHistory {
                required: 14,
                got: 10
            })
        );
    }

    #[test]
    fn mfi_length_mismatch_is_rejected() {
        let (h, l, c, mut v) = flat_bars(20, 100.0, 1.0);
        v.pop();
        assert!(matches!(
            mfi(&h, &l, &c, &v, 14),
            Err(IndicatorError::LengthMismatch(_))
        ));
    }

    #[test]
    fn mfi_output_is_tail_aligned() {
        let (h, l, c, v) = flat_bars(20, 100.0, 1.0);
        let series = mfi(&h, &l, &c, &v, 14).unwrap();
        assert_eq!(series.len(), 20 - 14 + 1);
    }

    #[test]
    fn mfi_flat_market_is_neutral() {
        // No typical-price movement: both flow sums are zero, the
        // zero-negative-sum substitution yields 50 everywhere.
        let (h, l, c, v) = flat_bars(30, 100.0, 5.0);
        for &x in &mfi(&h, &l, &c, &v, 14).unwrap() {
            assert!((x - 50.0).abs() < 1e-12, "expected 50.0, got {x}");
        }
    }

    #[test]
    fn mfi_rising_prices_substitute_neutral() {
        // All positive flow, zero negative sum => the defined fallback, 50.
        let c: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let h: Vec<f64> = c.iter().map(|x| x + 0.5).collect();
        let l: Vec<f64> = c.iter().map(|x| x - 0.5).collect();
        let v = vec![10.0; 30];
        for &x in &mfi(&h, &l, &c, &v, 14).unwrap() {
            assert!((x - 50.0).abs() < 1e-12);
        }
    }

    #[test]
    fn mfi_falling_prices_pin_to_zero() {
        // All negative flow: ratio is 0 => MFI = 0.
        let c: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let h: Vec<f64> = c.iter().map(|x| x + 0.5).collect();
        let l: Vec<f64> = c.iter().map(|x| x - 0.5).collect();
        let v = vec![10.0; 30];
        for &x in &mfi(&h, &l, &c, &v, 14).unwrap() {
            assert!(x.abs() < 1e-12, "expected 0.0, got {x}");
        }
    }

    #[test]
    fn mfi_balanced_flow_is_fifty() {
        // Alternate up/down by the same amount with equal volume inside the
        // window: positive and negative sums nearly cancel => MFI near 50.
        let mut c = Vec::new();
        for i in 0..24 {
            c.push(if i % 2 == 0 { 100.0 } else { 101.0 });
        }
        let h: Vec<f64> = c.iter().map(|x| x + 1.0).collect();
        let l: Vec<f64> = c.iter().map(|x| x - 1.0).collect();
        let v = vec![3.0; 24];
        // Even window so ups and downs pair off. The first window spans the
        // flow-less first bar and holds an odd flow count; skip it.
        let series = mfi(&h, &l, &c, &v, 14).unwrap();
        for &x in &series[1..] {
            assert!((x - 50.0).abs() < 1.0, "expected ~50, got {x}");
        }
    }

    #[test]
    fn mfi_range_check() {
        let c = vec![
            10.0, 10.4, 10.2, 10.8, 10.5, 10.9, 11.2, 11.0, 11.5, 11.3, 11.8,
            11.6, 12.0, 11.7, 12.1, 12.4, 12.2, 12.6,
        ];
        let h: Vec<f64> = c.iter().map(|x| x + 0.3).collect();
        let l: Vec<f64> = c.iter().map(|x| x - 0.3).collect();
        let v: Vec<f64> = (1..=18).map(|x| x as f64).collect();
        for &x in &mfi(&h, &l, &c, &v, 14).unwrap() {
            assert!((0.0..=100.0).contains(&x), "MFI {x} out of range");
        }
    }
}
