//! Structured logging setup and span constructors.
//!
//! Handlers are short-lived and stateless, so every log line carries the
//! identifying fields (arc, dataset, lot) in span context rather than in
//! message text. This module provides the one-time subscriber setup and the
//! span constructors shared by the manifest and arc-state components.

use std::sync::Once;
use tracing::Span;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON structured logs (for deployed handlers).
    Json,
    /// Pretty-printed logs (for development).
    #[default]
    Pretty,
}

/// Initializes the logging subsystem.
///
/// Call once at handler startup. Safe to call multiple times; subsequent
/// calls are no-ops.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log levels (e.g., `info`, `lotic_state=debug`)
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json())
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().pretty())
                    .init();
            }
        }
    });
}

/// Creates a span for manifest lifecycle operations.
#[must_use]
pub fn manifest_span(operation: &str, dataset: &str, lot: &str) -> Span {
    tracing::info_span!(
        "manifest",
        op = operation,
        dataset = dataset,
        lot = lot,
    )
}

/// Creates a span for arc state transitions.
#[must_use]
pub fn arc_span(operation: &str, arc: &str, lot: &str) -> Span {
    tracing::info_span!(
        "arc",
        op = operation,
        arc = arc,
        lot = lot,
    )
}
