//! Telemetry and structured logging setup.
//!
//! Every binary calls [`init_tracing`] once at startup; the JSON layer is
//! meant for deployed environments, the pretty layer for local development.

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Initialize the tracing subscriber.
///
/// The `RUST_LOG` environment variable takes precedence over `log_level`.
///
/// # Examples
///
/// ```no_run
/// use caseflow_common::telemetry::init_tracing;
///
/// init_tracing("caseflow-worker", false, "info").expect("Failed to initialize tracing");
/// ```
pub fn init_tracing(_service_name: &str, json_format: bool, log_level: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = Registry::default().with(env_filter);

    if json_format {
        registry
            .with(json_layer())
            .try_init()
            .context("Failed to initialize tracing subscriber")?;
    } else {
        registry
            .with(pretty_layer())
            .try_init()
            .context("Failed to initialize tracing subscriber")?;
    }

    Ok(())
}

/// Create a JSON logging layer
fn json_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
}

/// Create a pretty-formatted logging layer
fn pretty_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .pretty()
        .with_thread_ids(true)
        .with_target(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
}
