use crate::config::TelemetryConfig;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': unable to build EnvFilter",
                    value
                )
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

pub(crate) fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|source| {
            TelemetryError::EnvFilter {
                value: config.log_level.clone(),
                source,
            }
        }),
    }
}

/// Installs the global subscriber. Logs go to stderr so quiz output on
/// stdout stays clean for piping.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_builds_a_filter() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = TelemetryConfig {
            log_level: "safety_quiz=debug,warn".to_string(),
        };
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn malformed_level_is_reported_with_its_value() {
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = TelemetryConfig {
            log_level: "safety_quiz=loudest".to_string(),
        };
        let err = build_filter(&config).expect_err("filter directive is malformed");
        assert!(err.to_string().contains("safety_quiz=loudest"));
    }
}
