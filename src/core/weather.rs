use crate::core::{Coordinates, WindForecast};
use crate::utils::error::{ForecastError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const SERVICE: &str = "marine forecast";

pub const MS_TO_KNOTS: f64 = 1.94384;
/// Hourly samples considered, i.e. the next three days.
pub const FORECAST_WINDOW_HOURS: usize = 72;

#[derive(Debug, Deserialize)]
struct MarineResponse {
    hourly: Option<MarineHourly>,
}

#[derive(Debug, Deserialize)]
struct MarineHourly {
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
}

/// Open-Meteo marine API client.
pub struct MarineClient {
    client: Client,
    endpoint: String,
}

impl MarineClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl WindForecast for MarineClient {
    async fn max_wind_kts(&self, at: Coordinates) -> Result<f64> {
        tracing::debug!("Requesting marine wind forecast at ({}, {})", at.lat, at.lon);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("latitude", at.lat.to_string()),
                ("longitude", at.lon.to_string()),
                ("hourly", "wind_speed_10m".to_string()),
                ("timezone", "UTC".to_string()),
                ("wind_speed_unit", "ms".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::upstream(SERVICE, format!("HTTP {}", status)));
        }

        let body = response.bytes().await?;
        let parsed: MarineResponse = serde_json::from_slice(&body)
            .map_err(|e| ForecastError::parse(format!("{} returned malformed JSON: {}", SERVICE, e)))?;
        let speeds = parsed
            .hourly
            .map(|h| h.wind_speed_10m)
            .unwrap_or_default();

        peak_wind_kts(&speeds)
            .ok_or_else(|| ForecastError::upstream(SERVICE, "no wind_speed_10m samples"))
    }
}

/// Worst wind over the forecast window in knots, one decimal; nulls are skipped.
pub fn peak_wind_kts(speeds_ms: &[Option<f64>]) -> Option<f64> {
    let max_ms = speeds_ms
        .iter()
        .take(FORECAST_WINDOW_HOURS)
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))?;
    Some((max_ms * MS_TO_KNOTS * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_peak_wind_conversion() {
        assert_eq!(peak_wind_kts(&[Some(3.0), Some(7.0), Some(5.5)]), Some(13.6));
        assert_eq!(peak_wind_kts(&[Some(0.0)]), Some(0.0));
    }

    #[test]
    fn test_peak_wind_only_first_72_hours() {
        let mut speeds = vec![Some(5.0); FORECAST_WINDOW_HOURS];
        speeds.push(Some(40.0));
        assert_eq!(peak_wind_kts(&speeds), Some(9.7));
    }

    #[test]
    fn test_peak_wind_empty_or_all_null() {
        assert_eq!(peak_wind_kts(&[]), None);
        assert_eq!(peak_wind_kts(&[None, None]), None);
        assert_eq!(peak_wind_kts(&[None, Some(2.0)]), Some(3.9));
    }

    #[tokio::test]
    async fn test_fetch_sends_expected_query() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/marine")
                .query_param("latitude", "28.5")
                .query_param("longitude", "-74.5")
                .query_param("hourly", "wind_speed_10m")
                .query_param("wind_speed_unit", "ms");
            then.status(200).json_body(serde_json::json!({
                "latitude": 28.5,
                "longitude": -74.5,
                "hourly": {
                    "time": ["2025-06-01T00:00", "2025-06-01T01:00"],
                    "wind_speed_10m": [4.2, 7.87]
                }
            }));
        });

        let client = MarineClient::new(server.url("/v1/marine"), Duration::from_secs(2)).unwrap();
        let kts = client.max_wind_kts(Coordinates::new(28.5, -74.5)).await.unwrap();

        api_mock.assert();
        assert_eq!(kts, 15.3);
    }

    #[tokio::test]
    async fn test_fetch_failures_are_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/marine");
            then.status(200).json_body(serde_json::json!({ "hourly": { "wind_speed_10m": [] } }));
        });
        let client = MarineClient::new(server.url("/v1/marine"), Duration::from_secs(2)).unwrap();
        assert!(client.max_wind_kts(Coordinates::new(0.0, 0.0)).await.is_err());

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/marine");
            then.status(400).json_body(serde_json::json!({ "error": true, "reason": "bad latitude" }));
        });
        let client = MarineClient::new(server.url("/v1/marine"), Duration::from_secs(2)).unwrap();
        let err = client.max_wind_kts(Coordinates::new(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, ForecastError::UpstreamUnavailable { .. }));

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/marine");
            then.status(200).body("{\"hourly\": ");
        });
        let client = MarineClient::new(server.url("/v1/marine"), Duration::from_secs(2)).unwrap();
        let err = client.max_wind_kts(Coordinates::new(0.0, 0.0)).await.unwrap_err();
        assert!(matches!(err, ForecastError::ParseFailure { .. }));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/marine");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(serde_json::json!({ "hourly": { "wind_speed_10m": [4.0] } }));
        });

        let client = MarineClient::new(server.url("/v1/marine"), Duration::from_secs(1)).unwrap();
        let started = std::time::Instant::now();
        let err = client.max_wind_kts(Coordinates::new(28.5, -74.5)).await.unwrap_err();

        assert!(matches!(err, ForecastError::HttpError(ref e) if e.is_timeout()));
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
