pub mod classifier;
pub mod countdown;
pub mod dataset;
pub mod estimator;
pub mod forecast;
pub mod history;
pub mod landing;
pub mod launch;
pub mod weather;

pub use crate::domain::model::{
    Coordinates, ForecastResult, HistoricalRecord, LandingProfile, LandingType, LaunchInfo,
};
pub use crate::domain::ports::{
    Classifier, Clock, ConfigProvider, LaunchSchedule, Storage, SystemClock, WindForecast,
};
pub use crate::utils::error::Result;
