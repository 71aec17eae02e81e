// =============================================================================
// Settings — Env-driven configuration with defined numeric defaults
// =============================================================================
//
// Every tunable has a defined default so the scout runs with no environment
// at all. `from_env` overlays the defaults with whatever env vars are set
// (typically via `.env`, loaded by the driver before this runs). CLI flags
// are applied on top by the driver.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::exchange::Venue;
use crate::signal::Thresholds;

/// Full runtime settings for one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Market symbol in `BASE/QUOTE` form, e.g. "BTC/USDT".
    pub symbol: String,

    /// Kline timeframe, e.g. "5m", "1h".
    pub timeframe: String,

    /// Number of bars of history to request per series.
    pub lookback: u32,

    /// Venue serving the spot OHLCV series.
    pub spot_venue: Venue,

    /// Venue serving the futures OHLCV series.
    pub futures_venue: Venue,

    /// Volume counts as a spike when it exceeds its 50-bar moving average
    /// times this multiplier.
    pub volume_spike_multiplier: f64,

    /// Rule thresholds handed to the combiner.
    pub thresholds: Thresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            symbol: "BTC/USDT".to_string(),
            timeframe: "5m".to_string(),
            lookback: 500,
            spot_venue: Venue::BinanceSpot,
            futures_venue: Venue::BinanceUsdm,
            volume_spike_multiplier: 2.0,
            thresholds: Thresholds::default(),
        }
    }
}

impl Settings {
    /// Build settings from defaults overlaid with environment variables.
    ///
    /// Unparseable values are ignored with a warning rather than aborting:
    /// a typo in `.env` should not take the scout down.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(v) = std::env::var("SYMBOL") {
            if !v.trim().is_empty() {
                settings.symbol = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var("TIMEFRAME") {
            if !v.trim().is_empty() {
                settings.timeframe = v.trim().to_string();
            }
        }
        overlay_parsed("LOOKBACK", &mut settings.lookback);
        overlay_venue("EXCHANGE_SPOT", &mut settings.spot_venue);
        overlay_venue("EXCHANGE_FUTURES", &mut settings.futures_venue);
        overlay_parsed(
            "VOLUME_SPIKE_MULTIPLIER",
            &mut settings.volume_spike_multiplier,
        );
        overlay_parsed("RSI_OVERBOUGHT", &mut settings.thresholds.rsi_overbought);
        overlay_parsed("RSI_OVERSOLD", &mut settings.thresholds.rsi_oversold);
        overlay_parsed("MFI_OVERBOUGHT", &mut settings.thresholds.mfi_overbought);
        overlay_parsed("MFI_OVERSOLD", &mut settings.thresholds.mfi_oversold);
        overlay_parsed("BASIS_ZSCORE_ENTER", &mut settings.thresholds.basis_enter);
        overlay_parsed("BASIS_ZSCORE_EXIT", &mut settings.thresholds.basis_exit);

        settings
    }
}

/// Overwrite `target` with the parsed value of env var `key`, if present.
fn overlay_parsed<T: std::str::FromStr>(key: &str, target: &mut T) {
    if let Ok(raw) = std::env::var(key) {
        match raw.trim().parse::<T>() {
            Ok(v) => *target = v,
            Err(_) => warn!(key, value = %raw, "ignoring unparseable env override"),
        }
    }
}

/// Overwrite `target` with the venue named by env var `key`, if present.
fn overlay_venue(key: &str, target: &mut Venue) {
    if let Ok(raw) = std::env::var(key) {
        match raw.trim().parse::<Venue>() {
            Ok(v) => *target = v,
            Err(e) => warn!(key, value = %raw, error = %e, "ignoring unknown venue"),
        }
    }
}
