pub mod app;
pub mod config;
mod error;
pub mod subscriber_client;
pub mod templ_manager;
pub mod web;

pub use app::{serve, App, AppState};
pub use error::{Error, Result};
pub use subscriber_client::SubscriberClient;

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Human readable tracing for local development.
/// Honors `RUST_LOG`, falls back to `debug` for this crate.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(env_filter("event_landing=debug,tower_http=debug,info"))
        .compact()
        .init();
}

/// JSON lines tracing for production.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_env_filter(env_filter("info"))
        .init();
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
