use crate::core::{LaunchInfo, LaunchSchedule};
use crate::utils::error::{ForecastError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const SERVICE: &str = "launch schedule";

#[derive(Debug, Deserialize)]
struct UpcomingResponse {
    #[serde(default)]
    results: Option<Vec<LaunchEntry>>,
}

#[derive(Debug, Deserialize)]
struct LaunchEntry {
    name: Option<String>,
    net: Option<String>,
    pad: Option<Pad>,
}

#[derive(Debug, Deserialize)]
struct Pad {
    name: Option<String>,
    location: Option<PadLocation>,
}

#[derive(Debug, Deserialize)]
struct PadLocation {
    name: Option<String>,
    #[serde(default)]
    latitude: Option<serde_json::Value>,
    #[serde(default)]
    longitude: Option<serde_json::Value>,
}

/// Launch Library client for the next upcoming launch.
pub struct LaunchClient {
    client: Client,
    endpoint: String,
}

impl LaunchClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl LaunchSchedule for LaunchClient {
    async fn next_launch(&self) -> Result<Option<LaunchInfo>> {
        tracing::debug!("Requesting next launch from {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::upstream(SERVICE, format!("HTTP {}", status)));
        }

        let body = response.bytes().await?;
        let parsed: UpcomingResponse = serde_json::from_slice(&body)
            .map_err(|e| ForecastError::parse(format!("{} returned malformed JSON: {}", SERVICE, e)))?;

        Ok(parsed
            .results
            .and_then(|results| results.into_iter().next())
            .map(LaunchEntry::into_launch_info))
    }
}

impl LaunchEntry {
    fn into_launch_info(self) -> LaunchInfo {
        let (pad_name, location) = match self.pad {
            Some(pad) => (pad.name, pad.location),
            None => (None, None),
        };
        let (location_name, latitude, longitude) = match location {
            Some(loc) => (
                loc.name,
                loc.latitude.as_ref().and_then(coordinate),
                loc.longitude.as_ref().and_then(coordinate),
            ),
            None => (None, None, None),
        };

        LaunchInfo {
            mission: non_empty(self.name).unwrap_or_else(|| "SpaceX Launch".to_string()),
            net: non_empty(self.net),
            pad_name: non_empty(pad_name)
                .or_else(|| non_empty(location_name))
                .unwrap_or_else(|| "Launch Site".to_string()),
            latitude,
            longitude,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Coordinates arrive as numbers or as numeric strings depending on API version.
fn coordinate(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}
