//! Logging subscriber initialisation.

use thiserror::Error;
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

use crate::config::{LogFormat, LoggingConfig};

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber is already installed.
    #[error(transparent)]
    Init(#[from] TryInitError),
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG`, when set, takes precedence over the configured level.
///
/// # Errors
///
/// Returns a [`LoggingError`] if a subscriber is already installed.
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), LoggingError> {
    build_subscriber(config).try_init()?;

    Ok(())
}

/// Build the subscriber [`init_subscriber`] installs, without installing it.
///
/// `RUST_LOG`, when set, takes precedence over the configured level.
pub fn build_subscriber(config: &LoggingConfig) -> Box<dyn Subscriber + Send + Sync> {
    match config.log_format {
        LogFormat::Compact => with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        ),
        LogFormat::Json => with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
        ),
    }
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

fn with_layer<L>(config: &LoggingConfig, fmt_layer: L) -> Box<dyn Subscriber + Send + Sync>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    Box::new(
        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(build_env_filter(config)),
    )
}
