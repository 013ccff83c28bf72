use crate::core::ConfigProvider;
use crate::utils::error::{ForecastError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_LAUNCH_URL: &str =
    "https://ll.thespacedevs.com/2.3.0/launch/upcoming/?search=SpaceX&limit=1";
pub const DEFAULT_MARINE_URL: &str = "https://marine-api.open-meteo.com/v1/marine";
pub const DEFAULT_DATASET_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBM-DS0321EN-SkillsNetwork/datasets/dataset_part_2.csv";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub model: ModelConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub frontend_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            frontend_dir: "frontend".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: String,
    pub raw_file: String,
    pub processed_file: String,
    pub source_url: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: "data".to_string(),
            raw_file: "spacex_landing_dataset.csv".to_string(),
            processed_file: "spacex_processed.csv".to_string(),
            source_url: DEFAULT_DATASET_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: String,
    pub epochs: usize,
    pub learning_rate: f64,
    pub l2: f64,
    pub test_fraction: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: "models/landing_model.json".to_string(),
            epochs: 2000,
            learning_rate: 0.1,
            l2: 0.01,
            test_fraction: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub launch_url: String,
    pub marine_url: String,
    pub timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            launch_url: DEFAULT_LAUNCH_URL.to_string(),
            marine_url: DEFAULT_MARINE_URL.to_string(),
            timeout_seconds: 8,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    Defaults,
}

impl ConfigSource {
    /// Reports a missing config file; call once the logger is installed.
    pub fn log(self, path: &str) {
        match self {
            Self::File => tracing::info!("Loaded configuration from {}", path),
            Self::Defaults => tracing::warn!("Config file {} not found, using defaults", path),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ForecastError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when it exists, otherwise falls back to built-in defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, ConfigSource)> {
        if path.as_ref().exists() {
            Ok((Self::from_file(path)?, ConfigSource::File))
        } else {
            Ok((Self::default(), ConfigSource::Defaults))
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ForecastError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LAUNCH_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ForecastError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn dataset_path(&self, file: &str) -> String {
        Path::new(&self.data.dir).join(file).to_string_lossy().into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn launch_url(&self) -> &str {
        &self.upstream.launch_url
    }

    fn marine_url(&self) -> &str {
        &self.upstream.marine_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_seconds)
    }

    fn raw_dataset_path(&self) -> String {
        self.dataset_path(&self.data.raw_file)
    }

    fn processed_dataset_path(&self) -> String {
        self.dataset_path(&self.data.processed_file)
    }

    fn model_path(&self) -> &str {
        &self.model.path
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_socket_addr("server.bind", &self.server.bind)?;
        validation::validate_path("server.frontend_dir", &self.server.frontend_dir)?;

        validation::validate_path("data.dir", &self.data.dir)?;
        validation::validate_path("data.raw_file", &self.data.raw_file)?;
        validation::validate_path("data.processed_file", &self.data.processed_file)?;
        validation::validate_url("data.source_url", &self.data.source_url)?;

        validation::validate_path("model.path", &self.model.path)?;
        validation::validate_range("model.epochs", self.model.epochs, 1, 1_000_000)?;
        validation::validate_exclusive_range(
            "model.learning_rate",
            self.model.learning_rate,
            0.0,
            10.0,
        )?;
        validation::validate_range("model.l2", self.model.l2, 0.0, 10.0)?;
        validation::validate_exclusive_range(
            "model.test_fraction",
            self.model.test_fraction,
            0.0,
            1.0,
        )?;

        validation::validate_url("upstream.launch_url", &self.upstream.launch_url)?;
        validation::validate_url("upstream.marine_url", &self.upstream.marine_url)?;
        validation::validate_range("upstream.timeout_seconds", self.upstream.timeout_seconds, 1, 60)?;

        if self.data.raw_file == self.data.processed_file {
            return Err(ForecastError::InvalidConfigValue {
                field: "data.processed_file".to_string(),
                value: self.data.processed_file.clone(),
                reason: "must differ from data.raw_file".to_string(),
            });
        }

        Ok(())
    }
}
