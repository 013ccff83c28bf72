use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Upstream {service} unavailable: {message}")]
    UpstreamUnavailable { service: String, message: String },

    #[error("Scoring failed: {message}")]
    ScoringFailure { message: String },

    #[error("Parse failed: {message}")]
    ParseFailure { message: String },

    #[error("Dataset error: {message}")]
    DatasetError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Model,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ForecastError {
    pub fn upstream(service: &str, message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            service: service.to_string(),
            message: message.into(),
        }
    }

    pub fn scoring(message: impl Into<String>) -> Self {
        Self::ScoringFailure {
            message: message.into(),
        }
    }

    pub fn dataset(message: impl Into<String>) -> Self {
        Self::DatasetError {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseFailure {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::UpstreamUnavailable { .. } => ErrorCategory::Network,
            Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::ParseFailure { .. }
            | Self::DatasetError { .. } => ErrorCategory::Data,
            Self::ScoringFailure { .. } => ErrorCategory::Model,
            Self::ConfigError { .. }
            | Self::InvalidConfigValue { .. }
            | Self::MissingConfig { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Model => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ParseFailure { .. } => {
                "The upstream response format changed; check the provider's API version"
            }
            Self::MissingConfig { .. } => "Set the missing value in the configuration file",
            _ => match self.category() {
                ErrorCategory::Network => {
                    "Check network connectivity and the upstream URL, then retry"
                }
                ErrorCategory::Data => "Re-run collect-data to fetch a fresh copy of the dataset",
                ErrorCategory::Model => "Re-run train-model to rebuild the classifier bundle",
                ErrorCategory::Configuration => {
                    "Review the configuration file and command-line flags"
                }
                ErrorCategory::System => "Check file permissions and available disk space",
            },
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::HttpError(e) if e.is_timeout() => "The upstream service timed out".to_string(),
            Self::HttpError(_) => "Could not reach the upstream service".to_string(),
            Self::UpstreamUnavailable { service, .. } => format!("The {} is unavailable", service),
            Self::IoError(e) => format!("File system error: {}", e),
            other => other.to_string(),
        }
    }

    /// Process exit code for the command-line binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;
