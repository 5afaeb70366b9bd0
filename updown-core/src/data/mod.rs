//! Market data: provider trait, Alpha Vantage client, fixture provider, payload parsing.

pub mod alpha_vantage;
pub mod fixture;
pub mod parse;
pub mod provider;

pub use alpha_vantage::AlphaVantageProvider;
pub use fixture::FixtureProvider;
pub use parse::parse_daily_series;
pub use provider::{FetchError, MarketDataProvider};

use crate::config::ProviderConfig;

/// Build the provider a configuration asks for: the fixture directory when
/// one is set, otherwise the live Alpha Vantage client.
pub fn provider_from_config(
    config: &ProviderConfig,
) -> Result<Box<dyn MarketDataProvider>, reqwest::Error> {
    match &config.fixture_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "serving market data from fixtures");
            Ok(Box::new(FixtureProvider::new(dir.clone())))
        }
        None => Ok(Box::new(AlphaVantageProvider::new(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_dir_selects_fixture_provider() {
        let config = ProviderConfig {
            fixture_dir: Some("fixtures".into()),
            ..ProviderConfig::default()
        };
        let provider = provider_from_config(&config).unwrap();
        assert_eq!(provider.name(), "fixture");
    }

    #[test]
    fn default_selects_alpha_vantage() {
        let provider = provider_from_config(&ProviderConfig::default()).unwrap();
        assert_eq!(provider.name(), "alpha_vantage");
    }
}
