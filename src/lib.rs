pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use app::AppContext;
pub use config::{cli::LocalStorage, toml_config::{ConfigSource, TomlConfig}, CliConfig};
pub use core::forecast::LiveForecaster;
pub use utils::error::{ForecastError, Result};
