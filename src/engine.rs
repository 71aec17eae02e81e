// =============================================================================
// Evaluation Engine — OHLCV + derivatives context -> FeatureSnapshot -> Signal
// =============================================================================
//
// One evaluation is a pure pipeline: compute the indicator series from the
// spot OHLCV, extract their latest values together with the cross-market
// scalars (basis, funding, open interest) into an immutable snapshot, and
// hand that to the rule combiner. No state survives between evaluations.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Settings;
use crate::exchange::{to_contract_symbol, MarketDataClient};
use crate::indicators::{mfi::mfi, obv::obv, rsi::rsi, sma::sma, zscore::zscore};
use crate::signal::{combine_rules, FeatureSnapshot, Signal};
use crate::types::{closes, highs, lows, volumes, Candle};

/// Look-back period for RSI and MFI.
const OSCILLATOR_PERIOD: usize = 14;

/// Smoothing window for the OBV first difference.
const OBV_SLOPE_WINDOW: usize = 5;

/// Moving-average window for the volume-spike baseline.
const VOLUME_MA_WINDOW: usize = 50;

/// Maximum trailing window for the basis z-score (shrinks with history).
const BASIS_Z_WINDOW: usize = 50;

/// Outcome of one full evaluation, ready for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub symbol: String,
    pub timeframe: String,
    /// Open time of the latest spot bar.
    pub timestamp: DateTime<Utc>,
    /// The feature set this evaluation scored.
    pub features: FeatureSnapshot,
    /// The combiner's verdict.
    pub signal: Signal,
}

/// Build the per-evaluation feature snapshot from raw market data.
///
/// Pure given its inputs; every fallible step surfaces a failure instead of
/// computing on degenerate history. The basis z-score is the one documented
/// exception: an undefined value (zero variance, or a window too short for a
/// sample deviation) substitutes the neutral 0.
pub fn build_snapshot(
    spot: &[Candle],
    futures: &[Candle],
    funding: f64,
    open_interest: f64,
    settings: &Settings,
) -> Result<FeatureSnapshot> {
    if spot.len() < 2 {
        anyhow::bail!(
            "need at least 2 spot bars for last/previous close, got {}",
            spot.len()
        );
    }
    if futures.is_empty() {
        anyhow::bail!("futures series is empty");
    }

    let spot_close = closes(spot);
    let spot_volume = volumes(spot);

    // Oscillators on the spot series.
    let rsi_series = rsi(&spot_close, OSCILLATOR_PERIOD);
    let rsi_last = *rsi_series
        .last()
        .context("RSI series is empty")?;

    let mfi_series = mfi(
        &highs(spot),
        &lows(spot),
        &spot_close,
        &spot_volume,
        OSCILLATOR_PERIOD,
    )
    .context("MFI computation failed")?;
    let mfi_last = *mfi_series.last().context("MFI series is empty")?;

    // OBV slope: smoothed first difference of the running total.
    let obv_series = obv(&spot_close, &spot_volume).context("OBV computation failed")?;
    let obv_diffs: Vec<f64> = obv_series.windows(2).map(|w| w[1] - w[0]).collect();
    let obv_slope = sma(&obv_diffs, OBV_SLOPE_WINDOW)
        .last()
        .copied()
        .unwrap_or(0.0);

    // Volume spike: latest volume versus its trailing moving average.
    let vol_ma_last = *sma(&spot_volume, VOLUME_MA_WINDOW)
        .last()
        .context("volume series is empty")?;
    let vol_last = *spot_volume.last().context("volume series is empty")?;
    let vol_spike = vol_last > vol_ma_last * settings.volume_spike_multiplier;

    // Basis over the common trailing length of both series.
    let common = spot.len().min(futures.len());
    let spot_tail = &spot[spot.len() - common..];
    let fut_tail = &futures[futures.len() - common..];
    let basis_series: Vec<f64> = fut_tail
        .iter()
        .zip(spot_tail)
        .map(|(f, s)| f.close - s.close)
        .collect();
    let basis = *basis_series.last().context("basis series is empty")?;

    let z_window = BASIS_Z_WINDOW.min(basis_series.len());
    let basis_z_raw = zscore(&basis_series, z_window)
        .context("basis z-score computation failed")?
        .last()
        .copied()
        .unwrap_or(f64::NAN);
    // Undefined z (zero variance / no degrees of freedom) -> neutral 0.
    let basis_z = if basis_z_raw.is_finite() { basis_z_raw } else { 0.0 };

    let spot_last = spot_close[spot_close.len() - 1];
    let spot_prev = spot_close[spot_close.len() - 2];
    let fut_last = fut_tail[fut_tail.len() - 1].close;

    Ok(FeatureSnapshot {
        spot_last,
        spot_prev,
        fut_last,
        rsi: rsi_last,
        mfi: mfi_last,
        obv_slope,
        vol_spike,
        basis,
        basis_z,
        funding,
        open_interest,
        // Placeholder: a real delta would need state across polls.
        oi_change: 0.0,
    })
}

/// Run one full evaluation: fetch market data, build the snapshot, score it.
pub async fn analyze(client: &MarketDataClient, settings: &Settings) -> Result<Analysis> {
    let spot = client
        .fetch_klines(
            settings.spot_venue,
            &settings.symbol,
            &settings.timeframe,
            settings.lookback,
        )
        .await
        .context("fetching spot OHLCV")?;

    let futures = client
        .fetch_klines(
            settings.futures_venue,
            &settings.symbol,
            &settings.timeframe,
            settings.lookback,
        )
        .await
        .context("fetching futures OHLCV")?;

    let contract = to_contract_symbol(&settings.symbol);
    let funding = client
        .fetch_funding_rate(&contract)
        .await
        .context("fetching funding rate")?;
    let open_interest = client
        .fetch_open_interest(&contract)
        .await
        .context("fetching open interest")?;

    debug!(
        spot_bars = spot.len(),
        futures_bars = futures.len(),
        funding,
        open_interest,
        "market data fetched"
    );

    let features = build_snapshot(&spot, &futures, funding, open_interest, settings)?;
    let signal = combine_rules(&features, &settings.thresholds);

    let last_open_ms = spot.last().map(|c| c.open_time).unwrap_or_default();
    let timestamp = Utc
        .timestamp_millis_opt(last_open_ms)
        .single()
        .unwrap_or_else(Utc::now);

    info!(
        symbol = %settings.symbol,
        action = %signal.action,
        score = format!("{:+.2}", signal.score),
        reasons = signal.reasons.len(),
        "evaluation complete"
    );

    Ok(Analysis {
        symbol: settings.symbol.clone(),
        timeframe: settings.timeframe.clone(),
        timestamp,
        features,
        signal,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::IndicatorError;
    use crate::signal::Action;

    /// Flat synthetic series: `n` bars at a constant price and volume.
    fn flat_candles(n: usize, price: f64, volume: f64) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                Candle::new(
                    i as i64 * 60_000,
                    price,
                    price,
                    price,
                    price,
                    volume,
                )
            })
            .collect()
    }

    #[test]
    fn snapshot_requires_two_spot_bars() {
        let spot = flat_candles(1, 100.0, 10.0);
        let fut = flat_candles(1, 100.0, 10.0);
        let err = build_snapshot(&spot, &fut, 0.0, 0.0, &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("at least 2 spot bars"));
    }

    #[test]
    fn snapshot_surfaces_short_window_as_typed_failure() {
        // 10 bars is enough for RSI (defined from the first sample) but not
        // for the window-gated MFI.
        let spot = flat_candles(10, 100.0, 10.0);
        let fut = flat_candles(10, 100.0, 10.0);
        let err = build_snapshot(&spot, &fut, 0.0, 0.0, &Settings::default()).unwrap_err();
        let indicator_err = err.downcast_ref::<IndicatorError>().unwrap();
        assert_eq!(
            *indicator_err,
            IndicatorError::InsufficientHistory {
                required: 14,
                got: 10
            }
        );
    }

    #[test]
    fn flat_market_snapshot_is_fully_neutral() {
        let spot = flat_candles(60, 100.0, 10.0);
        let fut = flat_candles(60, 100.5, 10.0);
        let snap = build_snapshot(&spot, &fut, 0.0, 1_000.0, &Settings::default()).unwrap();

        assert_eq!(snap.spot_last, 100.0);
        assert_eq!(snap.spot_prev, 100.0);
        assert_eq!(snap.fut_last, 100.5);
        assert!((snap.rsi - 50.0).abs() < 1e-12);
        assert!((snap.mfi - 50.0).abs() < 1e-12);
        assert_eq!(snap.obv_slope, 0.0);
        assert!(!snap.vol_spike);
        assert!((snap.basis - 0.5).abs() < 1e-12);
        // Constant basis: zero variance, neutral substitution.
        assert_eq!(snap.basis_z, 0.0);
        assert_eq!(snap.oi_change, 0.0);

        let sig = combine_rules(&snap, &Settings::default().thresholds);
        assert_eq!(sig.action, Action::Neutral);
        assert_eq!(sig.score, 0.0);
    }

    #[test]
    fn volume_spike_flag_trips_on_the_last_bar() {
        let mut spot = flat_candles(60, 100.0, 10.0);
        // Last bar: 3x the average volume against a 2.0 multiplier.
        spot.last_mut().unwrap().volume = 30.0;
        let fut = flat_candles(60, 100.0, 10.0);
        let snap = build_snapshot(&spot, &fut, 0.0, 0.0, &Settings::default()).unwrap();
        assert!(snap.vol_spike);
    }

    #[test]
    fn basis_aligns_by_common_trailing_length() {
        // Futures history shorter than spot: basis must pair the trailing
        // bars of each, and the latest basis uses the final closes.
        let spot = flat_candles(60, 100.0, 10.0);
        let mut fut = flat_candles(40, 102.0, 10.0);
        fut.last_mut().unwrap().close = 103.0;
        let snap = build_snapshot(&spot, &fut, 0.0, 0.0, &Settings::default()).unwrap();
        assert!((snap.basis - 3.0).abs() < 1e-12);
        assert_eq!(snap.fut_last, 103.0);
    }

    #[test]
    fn obv_slope_reflects_recent_accumulation() {
        // Rising closes with constant volume: positive OBV differences.
        let mut spot = Vec::new();
        for i in 0..60 {
            let price = 100.0 + i as f64 * 0.5;
            spot.push(Candle::new(i * 60_000, price, price + 0.2, price - 0.2, price, 10.0));
        }
        let fut = spot.clone();
        let snap = build_snapshot(&spot, &fut, 0.0, 0.0, &Settings::default()).unwrap();
        assert!(snap.obv_slope > 0.0);
    }

    #[test]
    fn divergent_basis_produces_a_large_zscore() {
        // Basis flat for 59 bars then jumps: the final z-score is extreme.
        let spot = flat_candles(60, 100.0, 10.0);
        let mut fut = flat_candles(60, 100.2, 10.0);
        fut.last_mut().unwrap().close = 108.0;
        let snap = build_snapshot(&spot, &fut, 0.0, 0.0, &Settings::default()).unwrap();
        assert!(snap.basis_z > 1.5, "expected a large z, got {}", snap.basis_z);
    }
}
