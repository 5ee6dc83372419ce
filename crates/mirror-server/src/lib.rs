//! HTTP and command-line surface of the ERP mirror
//!
//! - `config` - YAML + environment configuration
//! - `logging` - tracing-subscriber setup
//! - `telemetry` - W3C trace-context propagation
//! - `routes` - axum router: sync, entity catalogue, record listing, health
//! - `error` - mapping of sync failures onto HTTP responses
//! - `cli` - argument parsing for the `mirror-server` binary
//! - `app` - wiring of config into a running server or a one-shot sync

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod telemetry;

pub use config::MirrorConfig;
pub use error::ApiError;
pub use routes::{router, AppState};
