//! WeatherAPI.com response structures and conversion utilities

use crate::models::WeatherResult;
use serde::Deserialize;

/// Response of `GET /v1/current.json`
#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    pub location: LocationData,
    pub current: CurrentData,
}

#[derive(Debug, Deserialize)]
pub struct LocationData {
    pub name: Option<String>,
}

/// Current conditions block; every field here is mandatory
#[derive(Debug, Deserialize)]
pub struct CurrentData {
    pub condition: ConditionData,
    pub temp_c: f64,
    pub feelslike_c: f64,
    pub humidity: u8,
    pub wind_kph: f64,
}

#[derive(Debug, Deserialize)]
pub struct ConditionData {
    // present but possibly null
    #[serde(deserialize_with = "Option::deserialize")]
    pub text: Option<String>,
}

impl CurrentResponse {
    /// Convert to the internal model, falling back to `city` when the
    /// provider omits the location name
    #[must_use]
    pub fn into_result(self, city: &str) -> WeatherResult {
        let location = self.location.name.unwrap_or_else(|| city.to_string());
        WeatherResult::new(
            location,
            self.current.condition.text.unwrap_or_default(),
            self.current.temp_c,
            self.current.feelslike_c,
            self.current.humidity,
            self.current.wind_kph,
        )
    }
}
