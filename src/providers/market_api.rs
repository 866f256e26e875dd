use crate::core::error::FetchError;
use crate::core::market::{MarketDataProvider, MarketSnapshot, MetalPrice};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Fetches snapshots from a JSON market data endpoint.
pub struct MarketApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl MarketApiProvider {
    /// `timeout` bounds each request; an expired request is cancelled.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("tola/1.0")
            .timeout(timeout)
            .build()?;
        Ok(MarketApiProvider {
            base_url: base_url.to_string(),
            client,
        })
    }

    fn request_url(&self) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{}action=getCurrentData", self.base_url, separator)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RateValue {
    Plain(f64),
    Detailed { rate: f64 },
}

impl RateValue {
    fn rate(&self) -> f64 {
        match self {
            RateValue::Plain(rate) => *rate,
            RateValue::Detailed { rate } => *rate,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MetalQuote {
    #[serde(alias = "pricePerTola", alias = "price_pkr_tola")]
    price_per_tola: f64,
    #[serde(default, alias = "changePercent24h", alias = "change24h")]
    change_percent_24h: f64,
}

#[derive(Debug, Deserialize)]
struct GoldSilver {
    gold: MetalQuote,
    silver: MetalQuote,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketResponse {
    #[serde(default)]
    currencies: HashMap<String, RateValue>,
    gold_silver: Option<GoldSilver>,
    last_update: Option<String>,
    error: Option<String>,
}

fn metal_price(name: &str, quote: &MetalQuote) -> Result<MetalPrice, FetchError> {
    if !quote.price_per_tola.is_finite() || quote.price_per_tola <= 0.0 {
        return Err(FetchError::Parse(format!(
            "{name} price must be positive, got {}",
            quote.price_per_tola
        )));
    }
    Ok(MetalPrice {
        price_per_tola: quote.price_per_tola,
        change_percent_24h: quote.change_percent_24h,
    })
}

/// Converts a decoded response into a snapshot, dropping unusable rates.
fn into_snapshot(response: MarketResponse) -> Result<MarketSnapshot, FetchError> {
    if let Some(error) = response.error {
        return Err(FetchError::Api(error));
    }

    let mut currency_rates = BTreeMap::new();
    for (code, value) in &response.currencies {
        let rate = value.rate();
        if rate.is_finite() && rate > 0.0 {
            currency_rates.insert(code.to_uppercase(), rate);
        } else {
            warn!("Ignoring non-positive rate {} for {}", rate, code);
        }
    }
    if currency_rates.is_empty() {
        return Err(FetchError::Parse("no currency rates in response".to_string()));
    }

    let gold_silver = response
        .gold_silver
        .ok_or_else(|| FetchError::Parse("no gold/silver prices in response".to_string()))?;

    let timestamp = response
        .last_update
        .as_deref()
        .and_then(|ts| match DateTime::parse_from_rfc3339(ts) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(e) => {
                debug!("Could not parse lastUpdate '{}': {}. Using now.", ts, e);
                None
            }
        })
        .unwrap_or_else(Utc::now);

    Ok(MarketSnapshot {
        currency_rates,
        gold: metal_price("gold", &gold_silver.gold)?,
        silver: metal_price("silver", &gold_silver.silver)?,
        timestamp,
    })
}

#[async_trait]
impl MarketDataProvider for MarketApiProvider {
    #[instrument(name = "MarketFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch_snapshot(&self) -> Result<MarketSnapshot, FetchError> {
        let url = self.request_url();
        debug!("Requesting market data from {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!("API Response: {}", status);
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));
        if !is_json {
            return Err(FetchError::InvalidFormat);
        }

        let text = response.text().await?;
        let data: MarketResponse =
            serde_json::from_str(&text).map_err(|e| FetchError::Parse(e.to_string()))?;

        let snapshot = into_snapshot(data)?;
        debug!(
            "Processed {} currencies, gold {}/tola",
            snapshot.currency_rates.len(),
            snapshot.gold.price_per_tola
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MOCK_JSON: &str = r#"{
        "currencies": {"PKR": 280.25, "EUR": {"rate": 0.9}, "XXX": 0},
        "goldSilver": {
            "gold": {"pricePerTola": 190000, "changePercent24h": 1.2},
            "silver": {"price_pkr_tola": 2200, "change24h": -0.5}
        },
        "lastUpdate": "2025-01-15T10:30:00Z"
    }"#;

    async fn create_mock_server(response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("action", "getCurrentData"))
            .respond_with(response)
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn json_response(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json")
    }

    fn provider(uri: &str) -> MarketApiProvider {
        MarketApiProvider::new(uri, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_successful_snapshot_fetch() {
        let mock_server = create_mock_server(json_response(MOCK_JSON)).await;
        let snapshot = provider(&mock_server.uri()).fetch_snapshot().await.unwrap();

        assert_eq!(snapshot.rate("PKR"), Some(280.25));
        assert_eq!(snapshot.rate("EUR"), Some(0.9));
        assert!(!snapshot.currency_rates.contains_key("XXX"));
        assert_eq!(snapshot.gold.price_per_tola, 190000.0);
        assert_eq!(snapshot.gold.change_percent_24h, 1.2);
        assert_eq!(snapshot.silver.price_per_tola, 2200.0);
        assert_eq!(snapshot.silver.change_percent_24h, -0.5);
        assert_eq!(snapshot.timestamp.to_rfc3339(), "2025-01-15T10:30:00+00:00");
    }

    #[tokio::test]
    async fn test_http_error_response() {
        let mock_server = create_mock_server(ResponseTemplate::new(404)).await;
        let result = provider(&mock_server.uri()).fetch_snapshot().await;

        match result {
            Err(FetchError::Http { status, .. }) => assert_eq!(status, 404),
            other => panic!("Expected HTTP error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_response() {
        let mock_server = create_mock_server(
            ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"),
        )
        .await;
        let result = provider(&mock_server.uri()).fetch_snapshot().await;
        assert!(matches!(result, Err(FetchError::InvalidFormat)));
    }

    #[tokio::test]
    async fn test_api_reported_error() {
        let mock_server =
            create_mock_server(json_response(r#"{"error": "quota exceeded"}"#)).await;
        let result = provider(&mock_server.uri()).fetch_snapshot().await;
        assert_eq!(result.unwrap_err().to_string(), "API error: quota exceeded");
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server(json_response(r#"{"currencies": "oops"}"#)).await;
        let result = provider(&mock_server.uri()).fetch_snapshot().await;
        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[tokio::test]
    async fn test_missing_metal_prices() {
        let mock_server =
            create_mock_server(json_response(r#"{"currencies": {"PKR": 280}}"#)).await;
        let result = provider(&mock_server.uri()).fetch_snapshot().await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("no gold/silver prices")
        );
    }

    #[tokio::test]
    async fn test_request_timeout() {
        let mock_server = create_mock_server(
            json_response(MOCK_JSON).set_delay(Duration::from_millis(500)),
        )
        .await;
        let provider = MarketApiProvider::new(&mock_server.uri(), Duration::from_millis(50)).unwrap();
        let result = provider.fetch_snapshot().await;
        assert!(matches!(result, Err(FetchError::Timeout)));
    }
}
