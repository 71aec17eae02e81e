// =============================================================================
// Exchange Module — Market-data provider collaborators
// =============================================================================
//
// Venue selection is a closed mapping over a fixed enumeration: a config
// string resolves to a known venue or fails loudly. There is no open-ended
// lookup of exchange implementations by name.

pub mod binance;

pub use binance::MarketDataClient;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed set of supported market-data venues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Venue {
    /// Binance spot market (api.binance.com).
    #[serde(rename = "binance")]
    BinanceSpot,

    /// Binance USD-M perpetual futures (fapi.binance.com).
    #[serde(rename = "binanceusdm")]
    BinanceUsdm,
}

impl Venue {
    /// REST base URL for this venue.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::BinanceSpot => "https://api.binance.com",
            Self::BinanceUsdm => "https://fapi.binance.com",
        }
    }

    /// Kline endpoint path for this venue.
    pub fn klines_path(&self) -> &'static str {
        match self {
            Self::BinanceSpot => "/api/v3/klines",
            Self::BinanceUsdm => "/fapi/v1/klines",
        }
    }
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BinanceSpot => write!(f, "binance"),
            Self::BinanceUsdm => write!(f, "binanceusdm"),
        }
    }
}

/// A venue name that is not in the supported set.
#[derive(Debug, Error, PartialEq)]
#[error("unsupported venue '{0}' (supported: binance, binanceusdm)")]
pub struct UnknownVenue(pub String);

impl std::str::FromStr for Venue {
    type Err = UnknownVenue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binance" => Ok(Self::BinanceSpot),
            "binanceusdm" => Ok(Self::BinanceUsdm),
            other => Err(UnknownVenue(other.to_string())),
        }
    }
}

/// Map a `BASE/QUOTE` market symbol to the USD-M contract form,
/// e.g. "BTC/USDT" -> "BTCUSDT".
pub fn to_contract_symbol(symbol: &str) -> String {
    symbol.replace('/', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn venue_parses_canonical_names() {
        assert_eq!("binance".parse::<Venue>().unwrap(), Venue::BinanceSpot);
        assert_eq!("binanceusdm".parse::<Venue>().unwrap(), Venue::BinanceUsdm);
        assert_eq!("BinanceUSDM".parse::<Venue>().unwrap(), Venue::BinanceUsdm);
    }

    #[test]
    fn unknown_venue_is_rejected() {
        let err = "kraken".parse::<Venue>().unwrap_err();
        assert_eq!(err, UnknownVenue("kraken".to_string()));
    }

    #[test]
    fn venue_display_roundtrips() {
        for venue in [Venue::BinanceSpot, Venue::BinanceUsdm] {
            assert_eq!(venue.to_string().parse::<Venue>().unwrap(), venue);
        }
    }

    #[test]
    fn contract_symbol_strips_separator() {
        assert_eq!(to_contract_symbol("BTC/USDT"), "BTCUSDT");
        assert_eq!(to_contract_symbol("ETHUSDT"), "ETHUSDT");
    }
}
