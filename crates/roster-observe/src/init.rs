use tracing::Subscriber;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::clock::Rfc3339Timer;
use crate::config::LogConfig;
use crate::error::ObserveError;
use crate::format::LogFormat;

/// Install the global tracing subscriber described by `cfg`.
///
/// Fails with [`ObserveError::AlreadyInitialized`] when a subscriber is
/// already installed.
pub fn init_logging(cfg: &LogConfig) -> Result<(), ObserveError> {
    match cfg.format {
        LogFormat::Text => init_text(cfg),
        LogFormat::Json => init_json(cfg),
        LogFormat::Journald => init_journald(cfg),
    }
}

fn init_text(cfg: &LogConfig) -> Result<(), ObserveError> {
    let filter = cfg.level.to_env_filter();
    let layer = fmt::layer()
        .with_ansi(cfg.should_use_color())
        .with_target(cfg.with_targets)
        .with_timer(Rfc3339Timer::new(cfg.timezone));

    install(tracing_subscriber::registry().with(filter).with(layer))
}

fn init_json(cfg: &LogConfig) -> Result<(), ObserveError> {
    let filter = cfg.level.to_env_filter();
    let layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(cfg.with_targets)
        .with_timer(Rfc3339Timer::new(cfg.timezone));

    install(tracing_subscriber::registry().with(filter).with(layer))
}

#[cfg(target_os = "linux")]
fn init_journald(cfg: &LogConfig) -> Result<(), ObserveError> {
    let filter = cfg.level.to_env_filter();
    let journald =
        tracing_journald::layer().map_err(|e| ObserveError::JournaldInit(e.to_string()))?;

    install(tracing_subscriber::registry().with(filter).with(journald))
}

#[cfg(not(target_os = "linux"))]
fn init_journald(_cfg: &LogConfig) -> Result<(), ObserveError> {
    Err(ObserveError::JournaldNotSupported)
}

fn install<S>(subscriber: S) -> Result<(), ObserveError>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber
        .try_init()
        .map_err(|_| ObserveError::AlreadyInitialized)
}
