//! HTTP handlers for the dashboard.
//!
//! Handlers never fail: absent data renders as "N/A" on the pages and as
//! null values plus an `errors` entry in the JSON API.

use crate::dashboard::{self, SensorsResponse};
use crate::server::AppState;
use axum::{
    extract::State,
    response::Html,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::info;

type AppStateArc = Arc<AppState>;

pub fn routes() -> Router<AppStateArc> {
    Router::new()
        .route("/", get(index))
        .route("/api/sensors", get(api_sensors))
        .route("/dashboard", get(dashboard_page))
}

// ============================================================================
// Single-entity page
// ============================================================================

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{title}}</title>
    <link href="https://fonts.googleapis.com/css2?family=Roboto:wght@400;700&display=swap" rel="stylesheet">
    <style>
        body {
            font-family: 'Roboto', sans-serif;
            background-color: #1e1e2f;
            display: flex;
            flex-direction: column;
            align-items: center;
            justify-content: center;
            height: 100vh;
            margin: 0;
            color: #f0f0f0;
        }
        .card {
            background: #282a36;
            padding: 2rem;
            border-radius: 10px;
            box-shadow: 0 8px 16px rgba(0, 0, 0, 0.4);
            text-align: center;
            max-width: 400px;
            width: 100%;
        }
        .temperature {
            font-size: 3rem;
            font-weight: 700;
            color: #ff79c6;
        }
        h1 {
            color: #8be9fd;
        }
    </style>
</head>
<body>
    <div class="card">
        <h1>{{title}}</h1>
        <p class="temperature">{{temperature_c}}&deg;C / {{temperature_f}}&deg;F</p>
    </div>
    <p style="font-size: 0.8rem; font-style: italic;">Last updated: {{last_updated}}</p>
</body>
</html>
"#;

async fn index(State(state): State<AppStateArc>) -> Html<String> {
    info!("Handling request to '/'");

    // Legacy single-sensor view: first configured entity only.
    let entity = &state.entities[..state.entities.len().min(1)];
    let response = dashboard::assemble(
        &state.fetcher,
        &state.history,
        entity,
        state.refresh_seconds,
    )
    .await;

    let (title, temperature_c, temperature_f, last_updated) = match response.current.first() {
        Some(record) => (
            record.friendly_name.clone(),
            record.value_c.map_or_else(|| "N/A".to_string(), fmt_temp),
            record.value_f.map_or_else(|| "N/A".to_string(), fmt_temp),
            record.last_updated.clone().unwrap_or_else(|| "N/A".to_string()),
        ),
        None => (
            "Sensor".to_string(),
            "N/A".to_string(),
            "N/A".to_string(),
            "N/A".to_string(),
        ),
    };

    Html(
        INDEX_TEMPLATE
            .replace("{{title}}", &escape(&title))
            .replace("{{temperature_c}}", &temperature_c)
            .replace("{{temperature_f}}", &temperature_f)
            .replace("{{last_updated}}", &escape(&last_updated)),
    )
}

/// 25.0 -> "25", 70.7 -> "70.7", 97.88 -> "97.88"
fn fmt_temp(value: f64) -> String {
    value.to_string()
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

// ============================================================================
// JSON API
// ============================================================================

async fn api_sensors(State(state): State<AppStateArc>) -> Json<SensorsResponse> {
    info!("Handling request to '/api/sensors'");
    let response = dashboard::assemble(
        &state.fetcher,
        &state.history,
        &state.entities,
        state.refresh_seconds,
    )
    .await;
    Json(response)
}

// ============================================================================
// Multi-entity dashboard shell
// ============================================================================

const DASHBOARD_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Sensor Dashboard</title>
    <link href="https://fonts.googleapis.com/css2?family=Roboto:wght@400;700&display=swap" rel="stylesheet">
    <style>
        body {
            font-family: 'Roboto', sans-serif;
            background-color: #1e1e2f;
            margin: 0;
            padding: 2rem;
            color: #f0f0f0;
        }
        h1 { color: #8be9fd; text-align: center; }
        #cards {
            display: flex;
            flex-wrap: wrap;
            gap: 1.5rem;
            justify-content: center;
        }
        .card {
            background: #282a36;
            padding: 1.5rem;
            border-radius: 10px;
            box-shadow: 0 8px 16px rgba(0, 0, 0, 0.4);
            text-align: center;
            width: 260px;
        }
        .card h2 { color: #8be9fd; font-size: 1.1rem; margin: 0 0 0.5rem; }
        .temperature { font-size: 2rem; font-weight: 700; color: #ff79c6; }
        .unavailable { color: #6272a4; }
        .updated { font-size: 0.75rem; font-style: italic; color: #6272a4; }
        svg polyline { fill: none; stroke: #50fa7b; stroke-width: 2; }
    </style>
</head>
<body>
    <h1>Sensor Dashboard</h1>
    <div id="cards"></div>
    <script>
        function sparkline(points) {
            if (!points || points.length < 2) {
                return '';
            }
            const w = 220, h = 40;
            const values = points.map(p => p[1]);
            const min = Math.min(...values), max = Math.max(...values);
            const span = (max - min) || 1;
            const coords = points.map((p, i) => {
                const x = (i / (points.length - 1)) * w;
                const y = h - ((p[1] - min) / span) * h;
                return x.toFixed(1) + ',' + y.toFixed(1);
            }).join(' ');
            return '<svg width="' + w + '" height="' + h + '"><polyline points="' + coords + '"/></svg>';
        }

        function card(record, history, error) {
            const value = error
                ? '<p class="temperature unavailable">N/A</p>'
                : '<p class="temperature">' + record.value_c + '&deg;' + 'C / ' + record.value_f + '&deg;F</p>';
            return '<div class="card">'
                + '<h2>' + record.friendly_name + '</h2>'
                + value
                + sparkline(history)
                + '<p class="updated">Last updated: ' + (record.last_updated || 'N/A') + '</p>'
                + '</div>';
        }

        async function poll() {
            let delay = 30;
            try {
                const response = await fetch('/api/sensors');
                const data = await response.json();
                delay = data.refresh_seconds || delay;
                document.getElementById('cards').innerHTML = data.current
                    .map(r => card(r, data.history[r.entity_id], data.errors[r.entity_id]))
                    .join('');
            } catch (e) {
                console.error('poll failed', e);
            }
            setTimeout(poll, delay * 1000);
        }

        poll();
    </script>
</body>
</html>
"#;

async fn dashboard_page() -> Html<&'static str> {
    info!("Handling request to '/dashboard'");
    Html(DASHBOARD_PAGE)
}
