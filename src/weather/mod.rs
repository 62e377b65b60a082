//! Weather API client for WeatherAPI.com
//!
//! One lookup is one fresh GET against `/current.json`; there is no caching
//! and no retry. The HTTP client lives only for the duration of the call.

use crate::config::WeatherConfig;
use crate::models::WeatherResult;
use crate::{Result, WearError};
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

pub mod weatherapi;

/// Client for the current-conditions endpoint
#[derive(Debug, Clone)]
pub struct WeatherClient {
    base_url: String,
    api_key: String,
    timeout: Option<Duration>,
}

impl WeatherClient {
    /// Create a new weather API client
    #[must_use]
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: config.timeout_seconds.map(Duration::from_secs),
        }
    }

    fn request_url(&self, city: &str) -> String {
        format!(
            "{}/current.json?key={}&q={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(city)
        )
    }

    fn http_client(&self) -> Result<Client> {
        let mut builder = Client::builder().user_agent(concat!("what-to-wear/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| WearError::api(format!("Failed to create HTTP client: {e}")))
    }

    /// Fetch current conditions for `city`.
    ///
    /// Transport failures and any status other than 200 are `WearError::Api`;
    /// a body that does not match the expected shape is `WearError::Parse`.
    #[instrument(skip(self))]
    pub async fn current(&self, city: &str) -> Result<WeatherResult> {
        let client = self.http_client()?;
        let url = self.request_url(city);
        debug!(
            "Weather API request URL: {}",
            url.replace(&urlencoding::encode(&self.api_key).into_owned(), "***")
        );

        let start_time = Instant::now();
        let response = client.get(&url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Weather API responded with {}", status);
            return Err(WearError::api(format!("HTTP status {status}")));
        }

        let body = response.text().await?;
        let parsed: weatherapi::CurrentResponse =
            serde_json::from_str(&body).map_err(|e| WearError::parse(e.to_string()))?;

        info!(
            "Retrieved current weather in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );

        Ok(parsed.into_result(city))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> WeatherClient {
        WeatherClient::new(&WeatherConfig {
            api_key: "test_key".to_string(),
            base_url: server.uri(),
            timeout_seconds: None,
        })
    }

    fn sample_body() -> serde_json::Value {
        json!({
            "location": { "name": "San Francisco", "region": "California" },
            "current": {
                "temp_c": 14.4,
                "feelslike_c": 13.1,
                "humidity": 77,
                "wind_kph": 24.1,
                "condition": { "text": "Fog" }
            }
        })
    }

    #[test]
    fn test_request_url_escapes_city() {
        let client = WeatherClient::new(&WeatherConfig {
            api_key: "abc".to_string(),
            base_url: "http://api.weatherapi.com/v1/".to_string(),
            timeout_seconds: None,
        });

        assert_eq!(
            client.request_url("San José & Co"),
            "http://api.weatherapi.com/v1/current.json?key=abc&q=San%20Jos%C3%A9%20%26%20Co"
        );
    }

    #[tokio::test]
    async fn test_current_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current.json"))
            .and(query_param("key", "test_key"))
            .and(query_param("q", "San Francisco"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let weather = client_for(&mock_server).current("San Francisco").await.unwrap();

        assert_eq!(weather.location(), "San Francisco");
        assert_eq!(weather.condition(), "Fog");
        assert_eq!(weather.temp_c(), 14.4);
        assert_eq!(weather.feels_like_c(), 13.1);
        assert_eq!(weather.humidity(), 77);
        assert_eq!(weather.wind_kph(), 24.1);
    }

    #[tokio::test]
    async fn test_current_not_found_is_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "code": 1006, "message": "No matching location found." }
            })))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).current("Atlantis").await.unwrap_err();
        assert!(matches!(err, WearError::Api { .. }));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_current_malformed_json_is_parse_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/current.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{ not json"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).current("Paris").await.unwrap_err();
        assert!(matches!(err, WearError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_current_connection_refused_is_api_error() {
        let mock_server = MockServer::start().await;
        let client = client_for(&mock_server);
        drop(mock_server);

        let err = client.current("Paris").await.unwrap_err();
        assert!(matches!(err, WearError::Api { .. }));
        assert!(!err.to_string().contains("test_key"));
    }
}
