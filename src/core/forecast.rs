use crate::core::classifier::ClassifierBundle;
use crate::core::countdown::{format_countdown, format_launch_date, parse_net};
use crate::core::estimator::{estimate_probability, FALLBACK_PROBABILITY};
use crate::core::landing::{guess_booster, resolve_landing_profile};
use crate::core::{Clock, ForecastResult, LaunchSchedule, WindForecast};

pub const FALLBACK_WIND_KTS: f64 = 12.0;

/// Sequences launch lookup, wind and scoring into one forecast; never fails.
pub struct LiveForecaster<L, W, C> {
    launches: L,
    wind: W,
    clock: C,
}

impl<L, W, C> LiveForecaster<L, W, C>
where
    L: LaunchSchedule,
    W: WindForecast,
    C: Clock,
{
    pub fn new(launches: L, wind: W, clock: C) -> Self {
        Self {
            launches,
            wind,
            clock,
        }
    }

    pub async fn forecast(&self, classifier: Option<&ClassifierBundle>) -> ForecastResult {
        let launch = match self.launches.next_launch().await {
            Ok(Some(launch)) => launch,
            Ok(None) => {
                tracing::warn!("No upcoming launch listed; serving fallback forecast");
                return ForecastResult::fallback();
            }
            Err(e) => {
                tracing::warn!("Launch lookup failed ({}); serving fallback forecast", e);
                return ForecastResult::fallback();
            }
        };

        let net = parse_net(launch.net.as_deref());
        if net.is_none() {
            tracing::debug!("No usable NET for {}: {:?}", launch.mission, launch.net);
        }
        let countdown = format_countdown(net, self.clock.now());
        let booster = guess_booster(&launch.pad_name).to_string();
        let profile = resolve_landing_profile(&launch);

        let wind_kts = self
            .wind
            .max_wind_kts(profile.coordinates)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Wind fetch failed ({}); using {} kts", e, FALLBACK_WIND_KTS);
                FALLBACK_WIND_KTS
            });

        let probability = estimate_probability(classifier, wind_kts).unwrap_or_else(|e| {
            tracing::warn!("Probability fallback ({}); using {}", e, FALLBACK_PROBABILITY);
            FALLBACK_PROBABILITY
        });

        let result = ForecastResult {
            mission: launch.mission,
            date: format_launch_date(net),
            probability,
            booster,
            wind_kts,
            countdown,
            landing_type: profile.landing_type,
        };
        tracing::info!(
            "Live next launch: {} at {} ({} {:.1} kts, p={})",
            result.mission,
            result.date,
            result.landing_type,
            result.wind_kts,
            result.probability
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::LogisticModel;
    use crate::core::{Coordinates, LandingType, LaunchInfo};
    use crate::utils::error::{ForecastError, Result};
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Mutex;

    struct FixedLaunch(Option<LaunchInfo>);

    #[async_trait]
    impl LaunchSchedule for FixedLaunch {
        async fn next_launch(&self) -> Result<Option<LaunchInfo>> {
            Ok(self.0.clone())
        }
    }

    struct FailingLaunch;

    #[async_trait]
    impl LaunchSchedule for FailingLaunch {
        async fn next_launch(&self) -> Result<Option<LaunchInfo>> {
            Err(ForecastError::upstream("launch schedule", "timed out"))
        }
    }

    /// Records where wind was requested; `None` speed simulates an outage.
    struct RecordingWind {
        speed: Option<f64>,
        requested: Mutex<Vec<Coordinates>>,
    }

    impl RecordingWind {
        fn new(speed: Option<f64>) -> Self {
            Self {
                speed,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl WindForecast for RecordingWind {
        async fn max_wind_kts(&self, at: Coordinates) -> Result<f64> {
            self.requested.lock().unwrap().push(at);
            self.speed
                .ok_or_else(|| ForecastError::upstream("marine forecast", "offline"))
        }
    }

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
    }

    fn crew_launch() -> LaunchInfo {
        LaunchInfo {
            mission: "Crew-9".to_string(),
            net: Some("2025-06-01T03:15:00Z".to_string()),
            pad_name: "LC-39A".to_string(),
            latitude: Some(28.608),
            longitude: Some(-80.604),
        }
    }

    fn wind_bundle() -> ClassifierBundle {
        ClassifierBundle {
            model: LogisticModel {
                weights: vec![0.0, -0.1],
                bias: 0.0,
                means: vec![0.0, 0.0],
                scales: vec![1.0, 1.0],
            },
            feature_names: vec!["PayloadMass".to_string(), "wind_kts".to_string()],
            accuracy: 0.9,
        }
    }

    #[tokio::test]
    async fn test_no_launch_returns_fallback() {
        let forecaster = LiveForecaster::new(FixedLaunch(None), RecordingWind::new(Some(30.0)), clock());
        let result = forecaster.forecast(Some(&wind_bundle())).await;
        assert_eq!(result, ForecastResult::fallback());
        assert!(forecaster.wind.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_error_returns_fallback() {
        let forecaster = LiveForecaster::new(FailingLaunch, RecordingWind::new(Some(30.0)), clock());
        assert_eq!(forecaster.forecast(None).await, ForecastResult::fallback());
    }

    #[tokio::test]
    async fn test_full_forecast() {
        let forecaster = LiveForecaster::new(
            FixedLaunch(Some(crew_launch())),
            RecordingWind::new(Some(10.0)),
            clock(),
        );
        let result = forecaster.forecast(Some(&wind_bundle())).await;

        assert_eq!(result.mission, "Crew-9");
        assert_eq!(result.date, "Jun 01, 2025 03:15 UTC");
        assert_eq!(result.countdown, "T-3h 15m");
        assert_eq!(result.booster, "B1083 (Flight 12)");
        assert_eq!(result.landing_type, LandingType::Rtls);
        assert_eq!(result.wind_kts, 10.0);
        // sigmoid(-0.1 * 10) = 0.2689
        assert_eq!(result.probability, 0.269);

        let requested = forecaster.wind.requested.lock().unwrap();
        assert_eq!(requested.as_slice(), &[Coordinates::new(28.608, -80.604)]);
    }

    #[tokio::test]
    async fn test_leaf_failures_use_named_defaults() {
        let mut launch = crew_launch();
        launch.mission = "Starlink Group 6-20".to_string();
        launch.pad_name = "Vandenberg SLC-4E".to_string();
        launch.net = Some("soon".to_string());

        let forecaster = LiveForecaster::new(FixedLaunch(Some(launch)), RecordingWind::new(None), clock());
        let result = forecaster.forecast(None).await;

        assert_eq!(result.landing_type, LandingType::Asds);
        assert_eq!(result.booster, "B10xx (West Coast)");
        assert_eq!(result.wind_kts, FALLBACK_WIND_KTS);
        assert_eq!(result.probability, FALLBACK_PROBABILITY);
        assert_eq!(result.countdown, "T- TBD");
        assert_eq!(result.date, "TBD");

        let requested = forecaster.wind.requested.lock().unwrap();
        assert_eq!(requested.as_slice(), &[Coordinates::new(28.5, -74.5)]);
    }
}
