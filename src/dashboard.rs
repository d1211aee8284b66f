//! Aggregator: turns per-entity fetches into the dashboard payload.
//!
//! Entities are fetched serially in configured order; accepted values are
//! recorded into the history store before the response is assembled.

use crate::fetch::Fetcher;
use crate::history::HistoryStore;
use crate::units::to_fahrenheit;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Marker reported in the `errors` map for entities without a value.
pub const UNAVAILABLE: &str = "unavailable";

const DEFAULT_UNIT: &str = "°C";
const DEFAULT_ICON: &str = "mdi:thermometer";

/// Current state of one entity as shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ReadingRecord {
    pub entity_id: String,
    pub friendly_name: String,
    pub icon: String,
    pub value_c: Option<f64>,
    pub value_f: Option<f64>,
    pub unit: String,
    pub last_updated: Option<String>,
}

/// Payload of `GET /api/sensors`.
#[derive(Debug, Clone, Serialize)]
pub struct SensorsResponse {
    pub current: Vec<ReadingRecord>,
    /// Per entity: `[[epoch_seconds, value_c], ...]`, oldest first.
    pub history: BTreeMap<String, Vec<(i64, f64)>>,
    pub errors: BTreeMap<String, String>,
    pub refresh_seconds: u64,
}

/// Fetch every configured entity once, record accepted values, and merge
/// current readings, errors, and history into one response.
pub async fn assemble(
    fetcher: &Fetcher,
    history: &HistoryStore,
    entities: &[String],
    refresh_seconds: u64,
) -> SensorsResponse {
    let mut current = Vec::with_capacity(entities.len());
    let mut errors = BTreeMap::new();

    for entity_id in entities {
        let record = match fetcher.fetch(entity_id).await {
            Ok(reading) => {
                let captured_at = chrono::Utc::now().timestamp();
                history.record(entity_id, reading.value_c, captured_at).await;
                ReadingRecord {
                    entity_id: entity_id.clone(),
                    friendly_name: reading
                        .attribute_or("friendly_name", entity_id)
                        .to_string(),
                    icon: reading.attribute_or("icon", DEFAULT_ICON).to_string(),
                    value_c: reading.value_c,
                    value_f: reading.value_c.map(to_fahrenheit),
                    unit: reading
                        .attribute_or("unit_of_measurement", DEFAULT_UNIT)
                        .to_string(),
                    last_updated: reading.last_updated,
                }
            }
            Err(e) => {
                warn!("Fetch failed for {}: {}", entity_id, e);
                ReadingRecord {
                    entity_id: entity_id.clone(),
                    friendly_name: entity_id.clone(),
                    icon: DEFAULT_ICON.to_string(),
                    value_c: None,
                    value_f: None,
                    unit: DEFAULT_UNIT.to_string(),
                    last_updated: None,
                }
            }
        };

        match (record.value_c, record.value_f) {
            (Some(c), Some(f)) => info!("{}: {}°C / {}°F", entity_id, c, f),
            _ => {
                errors.insert(entity_id.clone(), UNAVAILABLE.to_string());
            }
        }
        current.push(record);
    }

    let mut history_map = BTreeMap::new();
    for entity_id in entities {
        let points = history
            .snapshot(entity_id)
            .await
            .into_iter()
            .map(|p| (p.captured_at, p.value_c))
            .collect();
        history_map.insert(entity_id.clone(), points);
    }

    SensorsResponse {
        current,
        history: history_map,
        errors,
        refresh_seconds,
    }
}
