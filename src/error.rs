//! Error types and handling for `WhatToWear` application

use thiserror::Error;

/// Main error type for the `WhatToWear` application
#[derive(Error, Debug)]
pub enum WearError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Weather provider communication errors (transport or HTTP status)
    #[error("API error: {message}")]
    Api { message: String },

    /// Weather provider returned a body we could not decode
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Model loading or generation errors
    #[error("Inference error: {message}")]
    Inference { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WearError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new inference error
    pub fn inference<S: Into<String>>(message: S) -> Self {
        Self::Inference {
            message: message.into(),
        }
    }

    /// Underlying message without the category prefix
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            WearError::Config { message }
            | WearError::Api { message }
            | WearError::Parse { message }
            | WearError::Inference { message } => message.clone(),
            WearError::Io { source } => source.to_string(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WearError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file and environment.")
            }
            WearError::Api { .. } => {
                "Unable to reach the weather service. Please check your internet connection and API key."
                    .to_string()
            }
            WearError::Parse { .. } => {
                "The weather service returned unexpected data. Please check the city name."
                    .to_string()
            }
            WearError::Inference { message } => {
                format!("The local model failed to produce a suggestion: {message}")
            }
            WearError::Io { .. } => {
                "Console operation failed.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for WearError {
    fn from(err: reqwest::Error) -> Self {
        // request URLs carry the API key
        let err = err.without_url();
        if err.is_decode() {
            WearError::parse(err.to_string())
        } else {
            WearError::api(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = WearError::config("missing API key");
        assert!(matches!(config_err, WearError::Config { .. }));

        let api_err = WearError::api("connection refused");
        assert!(matches!(api_err, WearError::Api { .. }));

        let parse_err = WearError::parse("missing field `temp_c`");
        assert!(matches!(parse_err, WearError::Parse { .. }));

        let inference_err = WearError::inference("unable to load model");
        assert!(matches!(inference_err, WearError::Inference { .. }));
    }

    #[test]
    fn test_display_carries_underlying_message() {
        let err = WearError::api("HTTP status 404 Not Found");
        assert_eq!(err.to_string(), "API error: HTTP status 404 Not Found");
    }

    #[test]
    fn test_detail_drops_category_prefix() {
        assert_eq!(WearError::api("HTTP status 404 Not Found").detail(), "HTTP status 404 Not Found");
        assert_eq!(WearError::parse("expected value").detail(), "expected value");
    }

    #[test]
    fn test_user_messages() {
        let config_err = WearError::config("weather.api_key is not set");
        assert!(config_err.user_message().contains("weather.api_key is not set"));

        let api_err = WearError::api("test");
        assert!(api_err.user_message().contains("Unable to reach"));

        let inference_err = WearError::inference("out of memory");
        assert!(inference_err.user_message().contains("out of memory"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdin closed");
        let wear_err: WearError = io_err.into();
        assert!(matches!(wear_err, WearError::Io { .. }));
    }
}
