//! Tracing subscriber setup
//!
//! Diagnostics go to stderr so they never interleave with the advice printed
//! on stdout. `RUST_LOG` takes precedence over the configured level.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_config(config: &LoggingConfig) -> Self {
        match config.format.as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

fn default_directive(config: &LoggingConfig, verbose: bool) -> String {
    let level = if verbose { "debug" } else { config.level.as_str() };
    format!("what_to_wear={level}")
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config, verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = match LogFormat::from_config(config) {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    if let Err(e) = result {
        tracing::debug!("Tracing subscriber already installed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_uses_config_level() {
        let config = LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        };
        assert_eq!(default_directive(&config, false), "what_to_wear=info");
    }

    #[test]
    fn test_verbose_forces_debug() {
        let config = LoggingConfig::default();
        assert_eq!(default_directive(&config, true), "what_to_wear=debug");
    }

    #[test]
    fn test_log_format_selection() {
        let mut config = LoggingConfig::default();
        assert_eq!(LogFormat::from_config(&config), LogFormat::Pretty);

        config.format = "json".to_string();
        assert_eq!(LogFormat::from_config(&config), LogFormat::Json);

        config.format = "pretty".to_string();
        assert_eq!(LogFormat::from_config(&config), LogFormat::Pretty);
    }
}
