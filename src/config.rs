//! Configuration for sensordash.
//!
//! Everything comes from the environment (or matching CLI flags). Live mode
//! requires the backend URL, token, and at least one entity id; dummy mode
//! needs nothing.

use anyhow::{bail, Result};
use clap::Parser;

pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_BIND_PORT: u16 = 5000;

#[derive(Debug, Clone, Parser)]
#[command(name = "sensordash", version, about = "Home Assistant sensor dashboard")]
pub struct Config {
    /// Base URL of the Home Assistant instance.
    #[arg(long, env = "HOME_ASSISTANT_URL")]
    pub home_assistant_url: Option<String>,

    /// Long-lived access token for the Home Assistant API.
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Sensor entity id, or a comma-separated list of them.
    #[arg(long, env = "ENTITY_ID", value_delimiter = ',')]
    pub entity_id: Vec<String>,

    /// Serve fixed synthetic readings instead of querying the backend.
    #[arg(
        long,
        env = "USE_DUMMY_DATA",
        action = clap::ArgAction::Set,
        value_parser = parse_bool,
        default_value = "false",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub use_dummy_data: bool,

    /// Client-side poll interval for the dashboard, in seconds.
    #[arg(long, env = "REFRESH_SECONDS", default_value_t = 30)]
    pub refresh_seconds: u64,

    /// Points retained per entity for sparklines.
    #[arg(long, env = "HISTORY_CAPACITY", default_value_t = 100)]
    pub history_capacity: usize,

    /// Address to bind the web server on.
    #[arg(long, env = "BIND_HOST")]
    pub bind_host: Option<String>,

    /// Port to bind the web server on.
    #[arg(long, env = "BIND_PORT")]
    pub bind_port: Option<u16>,
}

/// Accepts the usual truthy/falsy spellings. A plain boolean env flag would
/// treat `USE_DUMMY_DATA=false` as set; this parser reads the value instead.
fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(format!("expected true/false, got {:?}", other)),
    }
}

impl Config {
    /// Configured entities, trimmed, empty items dropped.
    pub fn entities(&self) -> Vec<String> {
        self.entity_id
            .iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect()
    }

    pub fn bind_addr(&self) -> String {
        format!(
            "{}:{}",
            self.bind_host.as_deref().unwrap_or(DEFAULT_BIND_HOST),
            self.bind_port.unwrap_or(DEFAULT_BIND_PORT)
        )
    }

    /// Check that live mode has everything it needs. Failures here are
    /// fatal at startup; nothing degrades at request time.
    pub fn validate(&self) -> Result<()> {
        if self.use_dummy_data {
            return Ok(());
        }
        if self.home_assistant_url.as_deref().unwrap_or("").is_empty() {
            bail!("HOME_ASSISTANT_URL is not set. Please set the environment variable.");
        }
        if self.api_token.as_deref().unwrap_or("").is_empty() {
            bail!("API_TOKEN is not set. Please set the environment variable.");
        }
        if self.entities().is_empty() {
            bail!("ENTITY_ID is not set. Please set the environment variable.");
        }
        Ok(())
    }
}
