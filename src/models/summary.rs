//! Natural-language weather summary handed to the advisor

use super::WeatherResult;
use std::fmt;

/// Single-sentence description of a [`WeatherResult`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherSummary(String);

impl WeatherSummary {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// User-role message sent to the model
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("Here is the weather: {}\nWhat should I wear today?", self.0)
    }
}

impl From<&WeatherResult> for WeatherSummary {
    fn from(weather: &WeatherResult) -> Self {
        Self(format!(
            "Current weather in {}: {}, {}°C, feels like {}°C, humidity {}%, wind {} kph.",
            weather.location(),
            weather.condition(),
            weather.temp_c(),
            weather.feels_like_c(),
            weather.humidity(),
            weather.wind_kph(),
        ))
    }
}

impl fmt::Display for WeatherSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
