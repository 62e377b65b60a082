//! `WhatToWear` - weather-based clothing advice from a local LLM
//!
//! This library fetches current conditions for a city, turns them into a
//! one-sentence summary and asks a locally loaded model what to wear.

pub mod advisor;
pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod models;
pub mod weather;

// Re-export core types for public API
pub use advisor::{ClothingAdvisor, LlamaAdvisor};
pub use app::{App, Outcome};
pub use config::WearConfig;
pub use error::WearError;
pub use models::{WeatherResult, WeatherSummary};
pub use weather::WeatherClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WearError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
