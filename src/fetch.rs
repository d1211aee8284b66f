//! Reading fetcher: one HTTP GET per entity against the Home Assistant API.
//!
//! The fetcher comes in two variants selected once at startup: `Dummy`
//! returns fixed synthetic data without touching the network, `Live`
//! talks to the real backend. Callers get a `Result<Reading, FetchError>`;
//! the aggregator is responsible for turning failures into the external
//! "absent means N/A" contract.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Fixed timeout for every upstream request.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One fetched sensor reading plus its metadata.
///
/// `value_c` is `None` when the upstream state was present but not numeric
/// (sentinels like "unavailable" or "unknown"); metadata still flows so the
/// dashboard can keep showing the entity's name and icon.
#[derive(Debug, Clone)]
pub struct Reading {
    pub value_c: Option<f64>,
    pub last_updated: Option<String>,
    pub attributes: HashMap<String, String>,
}

impl Reading {
    /// Attribute lookup with a fallback for absent keys.
    pub fn attribute_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.attributes.get(key).map(String::as_str).unwrap_or(default)
    }
}

/// Closed set of recoverable fetch failures.
///
/// None of these ever reach the end user as an error page; they are logged
/// and normalized to an absent reading.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("unparsable upstream body: {0}")]
    Parse(#[source] reqwest::Error),
}

/// Wire shape of `GET {base_url}/api/states/{entity_id}`.
#[derive(Debug, Deserialize)]
struct StateBody {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    last_updated: Option<String>,
    #[serde(default)]
    attributes: HashMap<String, serde_json::Value>,
}

/// Fetcher variant, chosen at startup from configuration.
#[derive(Debug, Clone)]
pub enum Fetcher {
    /// Fixed deterministic data for testing and demos without a backend.
    Dummy,
    /// Real requests against the configured backend.
    Live(LiveFetcher),
}

impl Fetcher {
    /// Fetch one reading for `entity_id`.
    pub async fn fetch(&self, entity_id: &str) -> Result<Reading, FetchError> {
        match self {
            Fetcher::Dummy => Ok(dummy_reading(entity_id)),
            Fetcher::Live(live) => live.fetch(entity_id).await,
        }
    }
}

fn dummy_reading(entity_id: &str) -> Reading {
    info!("Using dummy data for {}", entity_id);
    let mut attributes = HashMap::new();
    attributes.insert("friendly_name".to_string(), friendly_from_id(entity_id));
    attributes.insert("unit_of_measurement".to_string(), "°C".to_string());
    attributes.insert("icon".to_string(), "mdi:thermometer".to_string());
    Reading {
        value_c: Some(25.0),
        last_updated: Some("N/A".to_string()),
        attributes,
    }
}

/// "sensor.backyard_temperature" -> "Backyard Temperature"
fn friendly_from_id(entity_id: &str) -> String {
    let name = entity_id.split_once('.').map(|(_, n)| n).unwrap_or(entity_id);
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fetcher backed by the real Home Assistant REST API.
#[derive(Debug, Clone)]
pub struct LiveFetcher {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl LiveFetcher {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn state_url(&self, entity_id: &str) -> String {
        format!("{}/api/states/{}", self.base_url, entity_id)
    }

    async fn fetch(&self, entity_id: &str) -> Result<Reading, FetchError> {
        let url = self.state_url(entity_id);
        info!("Requesting {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        info!("Upstream status for {}: {}", entity_id, status);
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body: StateBody = response.json().await.map_err(FetchError::Parse)?;

        let value_c = match body.state.as_deref() {
            Some(raw) => match parse_state(raw) {
                Some(v) => Some(v),
                None => {
                    warn!("Non-numeric state {:?} for {}", raw, entity_id);
                    None
                }
            },
            None => None,
        };

        // Only string-valued attributes are meaningful to the dashboard.
        let attributes = body
            .attributes
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect();

        Ok(Reading {
            value_c,
            last_updated: body.last_updated,
            attributes,
        })
    }
}

/// Parse the raw entity state into a float.
///
/// Home Assistant reports sentinel strings ("unavailable", "unknown",
/// "error") and sometimes an empty state; all of those mean "no value".
fn parse_state(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dummy_fetch_is_deterministic() {
        let reading = Fetcher::Dummy.fetch("sensor.backyard_temperature").await.unwrap();
        assert_eq!(reading.value_c, Some(25.0));
        assert_eq!(reading.last_updated.as_deref(), Some("N/A"));
        assert_eq!(
            reading.attribute_or("friendly_name", ""),
            "Backyard Temperature"
        );
        assert_eq!(reading.attribute_or("unit_of_measurement", ""), "°C");
    }

    #[test]
    fn numeric_states_parse() {
        assert_eq!(parse_state("21.5"), Some(21.5));
        assert_eq!(parse_state(" -3.25 "), Some(-3.25));
        assert_eq!(parse_state("30"), Some(30.0));
    }

    #[test]
    fn sentinel_states_are_absent() {
        for raw in ["", "  ", "unavailable", "unknown", "error", "NaN"] {
            assert_eq!(parse_state(raw), None, "state {:?} should be absent", raw);
        }
    }

    #[test]
    fn state_url_tolerates_trailing_slash() {
        let with = LiveFetcher::new("http://ha.local:8123/", "token");
        let without = LiveFetcher::new("http://ha.local:8123", "token");
        assert_eq!(
            with.state_url("sensor.a"),
            "http://ha.local:8123/api/states/sensor.a"
        );
        assert_eq!(with.state_url("sensor.a"), without.state_url("sensor.a"));
    }

    #[test]
    fn attribute_fallback_applies_when_missing() {
        let reading = Reading {
            value_c: None,
            last_updated: None,
            attributes: HashMap::new(),
        };
        assert_eq!(reading.attribute_or("icon", "mdi:thermometer"), "mdi:thermometer");
    }
}
