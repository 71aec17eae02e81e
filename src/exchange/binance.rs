// =============================================================================
// Binance REST Market-Data Client — Public (unsigned) endpoints only
// =============================================================================
//
// Supplies the three inputs one evaluation needs beyond configuration:
// OHLCV klines (spot and USD-M futures), the latest perpetual funding rate
// (premium index) and the current open interest. No order endpoints, no
// request signing.

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

use super::{to_contract_symbol, Venue};
use crate::types::Candle;

/// HTTP client over the public Binance market-data endpoints.
#[derive(Debug, Clone)]
pub struct MarketDataClient {
    client: reqwest::Client,
}

impl MarketDataClient {
    /// Wrap an existing `reqwest::Client`. The driver builds one HTTP client
    /// for the whole process and shares it with the notification sink.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    // -------------------------------------------------------------------------
    // Klines
    // -------------------------------------------------------------------------

    /// Fetch up to `limit` OHLCV bars for `symbol` on `venue`.
    ///
    /// `symbol` is the `BASE/QUOTE` form; the exchange-native concatenated
    /// form is derived here. Bars arrive oldest-first.
    #[instrument(skip(self), name = "exchange::fetch_klines")]
    pub async fn fetch_klines(
        &self,
        venue: Venue,
        symbol: &str,
        timeframe: &str,
        limit: u32,
    ) -> Result<Vec<Candle>> {
        let url = format!(
            "{}{}?symbol={}&interval={}&limit={}",
            venue.base_url(),
            venue.klines_path(),
            to_contract_symbol(symbol),
            timeframe,
            limit
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET klines for {symbol} on {venue}"))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse klines response body")?;

        if !status.is_success() {
            anyhow::bail!("{venue} klines API returned {status}: {body}");
        }

        let raw = body.as_array().context("klines response is not an array")?;

        let mut candles = Vec::with_capacity(raw.len());
        for entry in raw {
            let arr = entry.as_array().context("kline entry is not an array")?;
            if arr.len() < 6 {
                warn!("skipping malformed kline entry with {} elements", arr.len());
                continue;
            }

            let open_time = arr[0].as_i64().unwrap_or(0);
            let open = parse_str_f64(&arr[1])?;
            let high = parse_str_f64(&arr[2])?;
            let low = parse_str_f64(&arr[3])?;
            let close = parse_str_f64(&arr[4])?;
            let volume = parse_str_f64(&arr[5])?;

            candles.push(Candle::new(open_time, open, high, low, close, volume));
        }

        debug!(symbol, timeframe, count = candles.len(), "klines fetched");
        Ok(candles)
    }

    // -------------------------------------------------------------------------
    // Derivatives context
    // -------------------------------------------------------------------------

    /// Fetch the latest funding rate for the USD-M perpetual of `symbol`
    /// (premium index endpoint, field `lastFundingRate`).
    #[instrument(skip(self), name = "exchange::fetch_funding_rate")]
    pub async fn fetch_funding_rate(&self, symbol: &str) -> Result<f64> {
        let url = format!(
            "{}/fapi/v1/premiumIndex?symbol={}",
            Venue::BinanceUsdm.base_url(),
            to_contract_symbol(symbol)
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET premium index for {symbol}"))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse premium index response")?;

        if !status.is_success() {
            anyhow::bail!("premium index API returned {status}: {body}");
        }

        let rate = optional_field_f64(&body, "lastFundingRate")
            .context("premium index response")?;

        debug!(symbol, rate, "funding rate fetched");
        Ok(rate)
    }

    /// Fetch the current open interest for the USD-M perpetual of `symbol`.
    #[instrument(skip(self), name = "exchange::fetch_open_interest")]
    pub async fn fetch_open_interest(&self, symbol: &str) -> Result<f64> {
        let url = format!(
            "{}/fapi/v1/openInterest?symbol={}",
            Venue::BinanceUsdm.base_url(),
            to_contract_symbol(symbol)
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET open interest for {symbol}"))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse open interest response")?;

        if !status.is_success() {
            anyhow::bail!("open interest API returned {status}: {body}");
        }

        let oi = optional_field_f64(&body, "openInterest")
            .context("open interest response")?;

        debug!(symbol, open_interest = oi, "open interest fetched");
        Ok(oi)
    }
}

/// Extract a numeric field the exchange may omit: an absent (or null) key
/// falls back to 0.0, but a present value that fails to parse is an upstream
/// data error and must propagate, never be fabricated away.
fn optional_field_f64(body: &serde_json::Value, key: &str) -> Result<f64> {
    match body.get(key) {
        None | Some(serde_json::Value::Null) => Ok(0.0),
        Some(val) => parse_str_f64(val).with_context(|| format!("field '{key}'")),
    }
}

/// Parse a JSON value that may be either a string or a number into `f64`.
fn parse_str_f64(val: &serde_json::Value) -> Result<f64> {
    if let Some(s) = val.as_str() {
        s.parse::<f64>()
            .with_context(|| format!("failed to parse '{s}' as f64"))
    } else if let Some(n) = val.as_f64() {
        Ok(n)
    } else {
        anyhow::bail!("expected string or number, got: {val}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_str_f64_accepts_strings_and_numbers() {
        assert_eq!(parse_str_f64(&serde_json::json!("42.5")).unwrap(), 42.5);
        assert_eq!(parse_str_f64(&serde_json::json!(7)).unwrap(), 7.0);
        assert!(parse_str_f64(&serde_json::json!(null)).is_err());
        assert!(parse_str_f64(&serde_json::json!("not-a-number")).is_err());
    }

    #[test]
    fn optional_field_defaults_only_when_absent() {
        let body = serde_json::json!({ "lastFundingRate": "0.0001" });
        assert_eq!(
            optional_field_f64(&body, "lastFundingRate").unwrap(),
            0.0001
        );
        // Missing or null key: the documented 0.0 default.
        assert_eq!(optional_field_f64(&body, "openInterest").unwrap(), 0.0);
        let body = serde_json::json!({ "openInterest": null });
        assert_eq!(optional_field_f64(&body, "openInterest").unwrap(), 0.0);
    }

    #[test]
    fn malformed_field_propagates_instead_of_fabricating_zero() {
        // A present-but-unparseable value is an upstream data error; it must
        // never collapse to 0.0, which would silently disarm the
        // basis/funding rule downstream.
        let body = serde_json::json!({ "lastFundingRate": "N/A" });
        let err = optional_field_f64(&body, "lastFundingRate").unwrap_err();
        assert!(err.to_string().contains("lastFundingRate"));

        let body = serde_json::json!({ "openInterest": [1, 2] });
        assert!(optional_field_f64(&body, "openInterest").is_err());
    }

    #[test]
    fn client_wraps_a_shared_http_client() {
        let http = reqwest::Client::new();
        let _market = MarketDataClient::with_client(http.clone());
        let _other = MarketDataClient::with_client(http);
    }
}
