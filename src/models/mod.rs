//! Data models for the WhatToWear application
//!
//! This module contains the two values that flow through a run:
//! - Weather: the current conditions returned by the provider
//! - Summary: the sentence derived from them and handed to the advisor

pub mod summary;
pub mod weather;

// Re-export all public types for convenient access
pub use summary::WeatherSummary;
pub use weather::WeatherResult;
