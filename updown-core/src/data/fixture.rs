//! Offline provider backed by saved Alpha Vantage responses.
//!
//! Looks up `{dir}/{SYMBOL}.json` and classifies it exactly like a live
//! response, so a recorded error body behaves like the real thing.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use super::alpha_vantage::interpret_payload;
use super::provider::{FetchError, MarketDataProvider};
use crate::domain::Series;

pub struct FixtureProvider {
    dir: PathBuf,
}

impl FixtureProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.json"))
    }
}

impl MarketDataProvider for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    fn fetch_daily(&self, symbol: &str) -> Result<Series, FetchError> {
        // Reject anything that could escape the fixture directory.
        if symbol.is_empty() || symbol.contains(['/', '\\']) || symbol.contains("..") {
            return Err(FetchError::InvalidSymbol {
                symbol: symbol.to_string(),
            });
        }

        let path = self.path_for(symbol);
        info!(symbol, path = %path.display(), "reading fixture");

        let content = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::InvalidSymbol {
                symbol: symbol.to_string(),
            },
            _ => FetchError::Network(format!("{}: {e}", path.display())),
        })?;

        let payload: Value = serde_json::from_str(&content)
            .map_err(|e| FetchError::Network(format!("{}: {e}", path.display())))?;

        interpret_payload(symbol, &payload)
    }
}
