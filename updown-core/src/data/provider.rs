//! Data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over data sources (Alpha Vantage over
//! HTTP, JSON fixtures on disk) so the game can be played offline and tested
//! without a network.

use thiserror::Error;

use crate::domain::Series;

/// Why a fetch for one symbol failed.
///
/// The `Display` text is the message shown to the player, so it is written
/// for them rather than for a log file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Network error {0}")]
    Network(String),

    #[error("Invalid ticker symbol. Please try another.")]
    InvalidSymbol { symbol: String },

    #[error("API limit reached. Please wait a minute and try again.")]
    RateLimited { detail: String },

    #[error("No daily data available for this symbol.")]
    EmptyData { symbol: String },
}

impl FetchError {
    /// Short category tag for logs and the status bar.
    pub fn category(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::InvalidSymbol { .. } => "symbol",
            FetchError::RateLimited { .. } => "rate-limit",
            FetchError::EmptyData { .. } => "data",
        }
    }
}

/// Source of daily closing prices.
///
/// One call is one request: implementations do not retry and do not cache.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the recent daily closes for an upper-cased symbol.
    fn fetch_daily(&self, symbol: &str) -> Result<Series, FetchError>;
}
