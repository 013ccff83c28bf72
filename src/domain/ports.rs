use crate::domain::model::{Coordinates, LaunchInfo};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn launch_url(&self) -> &str;
    fn marine_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn raw_dataset_path(&self) -> String;
    fn processed_dataset_path(&self) -> String;
    fn model_path(&self) -> &str;
}

/// Source of "now" for anything time-relative.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[async_trait]
pub trait LaunchSchedule: Send + Sync {
    /// `Ok(None)` when the provider answered but listed no launch.
    async fn next_launch(&self) -> Result<Option<LaunchInfo>>;
}

#[async_trait]
pub trait WindForecast: Send + Sync {
    async fn max_wind_kts(&self, at: Coordinates) -> Result<f64>;
}

pub trait Classifier: Send + Sync {
    /// Probability of the positive (landed) class for one feature row.
    fn predict_proba(&self, row: &[f64]) -> Result<f64>;
}
