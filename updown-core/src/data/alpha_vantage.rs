//! Alpha Vantage data provider.
//!
//! Fetches `TIME_SERIES_DAILY` with `outputsize=compact`, which the API caps at
//! roughly the last 100 trading days. A single request per call: no retries,
//! no caching.
//!
//! Alpha Vantage reports most failures with HTTP 200 and a JSON body carrying
//! one of a few well-known keys, so classification happens on the payload.

use std::time::Duration;

use reqwest::Url;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::parse::{parse_daily_series, raw_day_count};
use super::provider::{FetchError, MarketDataProvider};
use crate::config::ProviderConfig;
use crate::domain::Series;

const ERROR_MESSAGE_KEY: &str = "Error Message";
const NOTE_KEY: &str = "Note";
const INFORMATION_KEY: &str = "Information";

/// Alpha Vantage HTTP client.
pub struct AlphaVantageProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("updown/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Build the query URL for a symbol. The symbol is percent-encoded.
    pub fn query_url(&self, symbol: &str) -> Result<Url, FetchError> {
        Url::parse_with_params(
            &format!("{}/query", self.base_url),
            &[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "compact"),
                ("apikey", self.api_key.as_str()),
            ],
        )
        .map_err(|e| FetchError::Network(format!("invalid provider URL: {e}")))
    }
}

impl MarketDataProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        "alpha_vantage"
    }

    fn fetch_daily(&self, symbol: &str) -> Result<Series, FetchError> {
        let url = self.query_url(symbol)?;
        info!(symbol, "fetching daily series");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(symbol, %status, "provider returned non-success status");
            return Err(FetchError::Network(status.as_u16().to_string()));
        }

        let payload: Value = resp.json().map_err(|e| {
            FetchError::Network(format!("unreadable response for {symbol}: {e}"))
        })?;

        interpret_payload(symbol, &payload)
    }
}

/// Classify a decoded payload: provider-reported failure, or a parsed series.
///
/// `"Error Message"` wins over the usage-limit keys when both are present.
pub fn interpret_payload(symbol: &str, payload: &Value) -> Result<Series, FetchError> {
    if payload.get(ERROR_MESSAGE_KEY).is_some() {
        warn!(symbol, "provider rejected symbol");
        return Err(FetchError::InvalidSymbol {
            symbol: symbol.to_string(),
        });
    }

    if let Some(note) = payload.get(NOTE_KEY).or_else(|| payload.get(INFORMATION_KEY)) {
        let detail = note.as_str().unwrap_or_default().to_string();
        warn!(symbol, %detail, "provider usage limit");
        return Err(FetchError::RateLimited { detail });
    }

    let series = parse_daily_series(payload);
    let raw = raw_day_count(payload);
    if raw > series.len() {
        debug!(symbol, dropped = raw - series.len(), "skipped days without a usable close");
    }

    if series.is_empty() {
        return Err(FetchError::EmptyData {
            symbol: symbol.to_string(),
        });
    }

    info!(symbol, bars = series.len(), "daily series ready");
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    fn provider() -> AlphaVantageProvider {
        let config = ProviderConfig {
            api_key: "KEY123".into(),
            base_url: "https://www.alphavantage.co/".into(),
            ..ProviderConfig::default()
        };
        AlphaVantageProvider::new(&config).unwrap()
    }

    /// Serve one canned HTTP response on loopback and return its base URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
        });
        format!("http://{addr}")
    }

    fn local_provider(base_url: String) -> AlphaVantageProvider {
        let config = ProviderConfig {
            base_url,
            timeout_secs: 5,
            ..ProviderConfig::default()
        };
        AlphaVantageProvider::new(&config).unwrap()
    }

    #[test]
    fn query_url_has_all_params() {
        let url = provider().query_url("BRK.B").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.alphavantage.co/query?function=TIME_SERIES_DAILY&symbol=BRK.B&outputsize=compact&apikey=KEY123"
        );
    }

    #[test]
    fn query_url_encodes_symbol() {
        let url = provider().query_url("A&B C").unwrap();
        assert!(url.as_str().contains("symbol=A%26B+C"));
    }

    #[test]
    fn error_message_is_invalid_symbol() {
        let payload = json!({ "Error Message": "Invalid API call." });
        assert_eq!(
            interpret_payload("ZZZZ", &payload),
            Err(FetchError::InvalidSymbol { symbol: "ZZZZ".into() })
        );
    }

    #[test]
    fn note_and_information_are_rate_limits() {
        let note = json!({ "Note": "Thank you for using Alpha Vantage!" });
        assert!(matches!(
            interpret_payload("IBM", &note),
            Err(FetchError::RateLimited { detail }) if detail.starts_with("Thank you")
        ));

        let info = json!({ "Information": "rate limit is 25 requests per day" });
        assert!(matches!(
            interpret_payload("IBM", &info),
            Err(FetchError::RateLimited { .. })
        ));
    }

    #[test]
    fn error_message_takes_precedence() {
        let payload = json!({ "Error Message": "bad", "Note": "slow down" });
        assert!(matches!(
            interpret_payload("IBM", &payload),
            Err(FetchError::InvalidSymbol { .. })
        ));
    }

    #[test]
    fn no_usable_bars_is_empty_data() {
        let missing = json!({ "Meta Data": {} });
        assert_eq!(
            interpret_payload("IBM", &missing),
            Err(FetchError::EmptyData { symbol: "IBM".into() })
        );

        let unusable = json!({
            "Time Series (Daily)": { "2024-03-01": { "4. close": "x" } }
        });
        assert!(matches!(
            interpret_payload("IBM", &unusable),
            Err(FetchError::EmptyData { .. })
        ));
    }

    #[test]
    fn valid_payload_parses() {
        let payload = json!({
            "Meta Data": { "2. Symbol": "IBM" },
            "Time Series (Daily)": {
                "2024-03-01": { "4. close": "185.0300" },
                "2024-03-04": { "4. close": "187.4000" }
            }
        });
        let series = interpret_payload("IBM", &payload).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].close, 187.4);
    }

    #[test]
    fn non_success_status_is_network_error_with_code() {
        let base = serve_once("503 Service Unavailable", "{}");
        assert_eq!(
            local_provider(base).fetch_daily("IBM"),
            Err(FetchError::Network("503".into()))
        );
    }

    #[test]
    fn non_json_body_is_network_error() {
        let base = serve_once("200 OK", "hello");
        assert!(matches!(
            local_provider(base).fetch_daily("IBM"),
            Err(FetchError::Network(_))
        ));
    }

    #[test]
    fn success_body_is_classified() {
        let base = serve_once("200 OK", r#"{"Note": "slow down"}"#);
        assert!(matches!(
            local_provider(base).fetch_daily("IBM"),
            Err(FetchError::RateLimited { detail }) if detail == "slow down"
        ));
    }
}
