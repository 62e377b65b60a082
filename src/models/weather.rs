//! Current weather model

/// Current conditions for one location, created once per successful lookup
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherResult {
    location: String,
    condition: String,
    temp_c: f64,
    feels_like_c: f64,
    humidity: u8,
    wind_kph: f64,
}

impl WeatherResult {
    #[must_use]
    pub fn new(
        location: impl Into<String>,
        condition: impl Into<String>,
        temp_c: f64,
        feels_like_c: f64,
        humidity: u8,
        wind_kph: f64,
    ) -> Self {
        Self {
            location: location.into(),
            condition: condition.into(),
            temp_c,
            feels_like_c,
            humidity,
            wind_kph,
        }
    }

    /// Location name as reported by the provider (or the city that was asked for)
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Human-readable condition, e.g. "Partly cloudy"
    #[must_use]
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Temperature in Celsius
    #[must_use]
    pub fn temp_c(&self) -> f64 {
        self.temp_c
    }

    /// Feels-like temperature in Celsius
    #[must_use]
    pub fn feels_like_c(&self) -> f64 {
        self.feels_like_c
    }

    /// Relative humidity percentage (0-100)
    #[must_use]
    pub fn humidity(&self) -> u8 {
        self.humidity
    }

    /// Wind speed in km/h
    #[must_use]
    pub fn wind_kph(&self) -> f64 {
        self.wind_kph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let weather = WeatherResult::new("Oslo", "Light snow", -3.5, -8.0, 86, 14.4);

        assert_eq!(weather.location(), "Oslo");
        assert_eq!(weather.condition(), "Light snow");
        assert_eq!(weather.temp_c(), -3.5);
        assert_eq!(weather.feels_like_c(), -8.0);
        assert_eq!(weather.humidity(), 86);
        assert_eq!(weather.wind_kph(), 14.4);
    }
}
