//! sensordash - Home Assistant sensor dashboard.
//!
//! Polls one or more sensor entities on demand, keeps a bounded rolling
//! history per entity, and serves the readings as an HTML page, a JSON
//! API, and a multi-entity dashboard with sparklines.

pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod history;
pub mod routes;
pub mod server;
pub mod units;
