//! CoinGecko market listing provider.
//!
//! Fetches `/coins/markets` once per call: top-N by market cap, descending,
//! one page, no sparkline. Any transport failure, timeout, or non-2xx status
//! is a `DataError::Network`; a body that doesn't decode is a `DataError::Parse`.
//! There are no retries; the cache decides what to show on failure.

use std::time::Duration;

use reqwest::blocking::{Client, Request};
use tracing::debug;

use super::provider::{DataError, MarketDataProvider};
use crate::config::ApiConfig;
use crate::domain::{FetchKey, MarketEntry};

/// Public API root.
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Upper bound on a single request, connect through body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_USER_AGENT: &str = concat!("coinboard/", env!("CARGO_PKG_VERSION"));

/// Header CoinGecko reads demo-plan keys from.
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// CoinGecko `coins/markets` provider.
#[derive(Debug, Clone)]
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoProvider {
    /// Provider against `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DataError> {
        Self::build(base_url.into(), timeout, DEFAULT_USER_AGENT, None)
    }

    /// Provider configured from the `[api]` config section.
    pub fn from_config(api: &ApiConfig) -> Result<Self, DataError> {
        Self::build(
            api.base_url.clone(),
            api.timeout(),
            api.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT),
            api.api_key.clone(),
        )
    }

    fn build(
        base_url: String,
        timeout: Duration,
        user_agent: &str,
        api_key: Option<String>,
    ) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| DataError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the markets listing request for a fetch key.
    fn markets_request(&self, key: &FetchKey) -> Result<Request, DataError> {
        let url = format!("{}/coins/markets", self.base_url);
        let per_page = key.count.to_string();
        let mut builder = self.client.get(url).query(&[
            ("vs_currency", key.currency.code()),
            ("order", "market_cap_desc"),
            ("per_page", per_page.as_str()),
            ("page", "1"),
            ("sparkline", "false"),
        ]);
        if let Some(api_key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, api_key);
        }
        builder
            .build()
            .map_err(|e| DataError::Network(format!("invalid request: {e}")))
    }
}

impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "coingecko"
    }

    fn fetch_markets(&self, key: &FetchKey) -> Result<Vec<MarketEntry>, DataError> {
        let request = self.markets_request(key)?;
        debug!(url = %request.url(), "requesting markets listing");

        let resp = self.client.execute(request).map_err(describe_transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::Network(format!("HTTP {status} for {key}")));
        }

        let body = resp.text().map_err(describe_transport)?;
        let entries = parse_markets(&body)?;
        debug!(key = %key, rows = entries.len(), "markets listing decoded");
        Ok(entries)
    }
}

fn describe_transport(e: reqwest::Error) -> DataError {
    if e.is_timeout() {
        DataError::Network(format!("request timed out: {e}"))
    } else if e.is_connect() {
        DataError::Network(format!("connection failed: {e}"))
    } else {
        DataError::Network(e.to_string())
    }
}

/// Decode a markets listing body (a JSON array of market objects).
pub fn parse_markets(body: &str) -> Result<Vec<MarketEntry>, DataError> {
    serde_json::from_str(body).map_err(|e| DataError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Currency;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    const TWO_ROWS: &str = r#"[
        {"id":"bitcoin","symbol":"btc","name":"Bitcoin","current_price":67000.5,
         "market_cap":1300000000000,"total_volume":25000000000,"price_change_percentage_24h":1.5},
        {"id":"ethereum","symbol":"eth","name":"Ethereum","current_price":3100.25,
         "market_cap":370000000000,"total_volume":12000000000,"price_change_percentage_24h":-0.75}
    ]"#;

    /// Serve exactly one canned HTTP response on a loopback port.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });
        format!("http://{addr}")
    }

    fn key(count: u32) -> FetchKey {
        FetchKey {
            currency: Currency::Usd,
            count,
        }
    }

    #[test]
    fn request_carries_listing_params() {
        let provider = CoinGeckoProvider::new("https://example.invalid/api/v3/", DEFAULT_TIMEOUT).unwrap();
        let request = provider
            .markets_request(&FetchKey {
                currency: Currency::Eur,
                count: 15,
            })
            .unwrap();

        assert_eq!(request.url().path(), "/api/v3/coins/markets");
        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("vs_currency".into(), "eur".into())));
        assert!(pairs.contains(&("order".into(), "market_cap_desc".into())));
        assert!(pairs.contains(&("per_page".into(), "15".into())));
        assert!(pairs.contains(&("page".into(), "1".into())));
        assert!(pairs.contains(&("sparkline".into(), "false".into())));
        assert!(request.headers().get(API_KEY_HEADER).is_none());
    }

    #[test]
    fn api_key_is_sent_as_header() {
        let api = ApiConfig {
            api_key: Some("demo-key".into()),
            ..ApiConfig::default()
        };
        let provider = CoinGeckoProvider::from_config(&api).unwrap();
        let request = provider.markets_request(&key(5)).unwrap();
        assert_eq!(request.headers().get(API_KEY_HEADER).unwrap(), "demo-key");
    }

    #[test]
    fn decodes_successful_listing_in_order() {
        let base = serve_once("200 OK", TWO_ROWS);
        let provider = CoinGeckoProvider::new(base, Duration::from_secs(5)).unwrap();
        let entries = provider.fetch_markets(&key(2)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "bitcoin");
        assert_eq!(entries[1].current_price, 3100.25);
    }

    #[test]
    fn empty_array_is_not_an_error() {
        let base = serve_once("200 OK", "[]");
        let provider = CoinGeckoProvider::new(base, Duration::from_secs(5)).unwrap();
        assert!(provider.fetch_markets(&key(5)).unwrap().is_empty());
    }

    #[test]
    fn non_success_status_is_network_error() {
        let base = serve_once("429 Too Many Requests", r#"{"status":{"error_code":429}}"#);
        let provider = CoinGeckoProvider::new(base, Duration::from_secs(5)).unwrap();
        match provider.fetch_markets(&key(5)) {
            Err(DataError::Network(msg)) => assert!(msg.contains("429")),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let base = serve_once("200 OK", r#"{"unexpected":"object"}"#);
        let provider = CoinGeckoProvider::new(base, Duration::from_secs(5)).unwrap();
        assert!(matches!(
            provider.fetch_markets(&key(5)),
            Err(DataError::Parse(_))
        ));
    }

    #[test]
    fn refused_connection_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider =
            CoinGeckoProvider::new(format!("http://{addr}"), Duration::from_secs(2)).unwrap();
        assert!(matches!(
            provider.fetch_markets(&key(5)),
            Err(DataError::Network(_))
        ));
    }

    #[test]
    fn slow_server_times_out_as_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((stream, _)) = listener.accept() {
                thread::sleep(Duration::from_secs(2));
                drop(stream);
            }
        });

        let provider =
            CoinGeckoProvider::new(format!("http://{addr}"), Duration::from_millis(200)).unwrap();
        assert!(matches!(
            provider.fetch_markets(&key(5)),
            Err(DataError::Network(_))
        ));
    }

    #[test]
    fn parse_markets_rejects_wrong_shape() {
        assert!(parse_markets("not json").is_err());
        assert!(parse_markets(r#"[{"id":"x"}]"#).is_err());
        assert_eq!(parse_markets(TWO_ROWS).unwrap().len(), 2);
    }
}
