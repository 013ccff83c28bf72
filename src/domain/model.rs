use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the historical launch dataset as served by `/api/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    #[serde(rename = "FlightNumber")]
    pub flight_number: Option<i64>,
    #[serde(rename = "Date")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "PayloadMass")]
    pub payload_mass: Option<f64>,
    #[serde(rename = "Outcome")]
    pub outcome: Option<String>,
    /// `None` when the source row carries no usable landing label.
    pub success: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchInfo {
    pub mission: String,
    /// Raw NET timestamp as published upstream.
    pub net: Option<String>,
    pub pad_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl LaunchInfo {
    /// Pad coordinates, only when both are present and non-zero.
    pub fn pad_coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Some(Coordinates { lat, lon }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandingType {
    #[serde(rename = "ASDS")]
    Asds,
    #[serde(rename = "RTLS")]
    Rtls,
}

impl fmt::Display for LandingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LandingType::Asds => write!(f, "ASDS"),
            LandingType::Rtls => write!(f, "RTLS"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingProfile {
    pub landing_type: LandingType,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub mission: String,
    pub date: String,
    pub probability: f64,
    pub booster: String,
    pub wind_kts: f64,
    pub countdown: String,
    pub landing_type: LandingType,
}

impl ForecastResult {
    /// Served whenever no upcoming launch can be resolved.
    pub fn fallback() -> Self {
        Self {
            mission: "Starlink Group 10-15".to_string(),
            date: "TBD".to_string(),
            probability: 0.94,
            booster: "B1083 (Flight 12)".to_string(),
            wind_kts: 12.0,
            countdown: "T-18h 42m".to_string(),
            landing_type: LandingType::Asds,
        }
    }
}
