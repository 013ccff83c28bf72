use crate::utils::error::{ForecastError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.trim().is_empty() {
        return Err(ForecastError::MissingConfig {
            field: field_name.to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ForecastError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ForecastError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(ForecastError::MissingConfig {
            field: field_name.to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ForecastError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<()> {
    addr.parse::<std::net::SocketAddr>()
        .map(|_| ())
        .map_err(|e| ForecastError::InvalidConfigValue {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN is out of range
    if !(value >= min && value <= max) {
        return Err(ForecastError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Open interval check, used for fractions and rates that must stay off the bounds.
pub fn validate_exclusive_range(field_name: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if !(value > min && value < max) {
        return Err(ForecastError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be strictly between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("upstream.launch_url", "https://example.com").is_ok());
        assert!(validate_url("upstream.launch_url", "http://example.com").is_ok());
        assert!(matches!(
            validate_url("upstream.launch_url", ""),
            Err(ForecastError::MissingConfig { .. })
        ));
        assert!(validate_url("upstream.launch_url", "invalid-url").is_err());
        assert!(validate_url("upstream.launch_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("data.dir", "data").is_ok());
        assert!(matches!(
            validate_path("data.dir", "  "),
            Err(ForecastError::MissingConfig { .. })
        ));
        assert!(validate_path("data.dir", "da\0ta").is_err());
    }

    #[test]
    fn test_validate_socket_addr() {
        assert!(validate_socket_addr("server.bind", "0.0.0.0:8000").is_ok());
        assert!(validate_socket_addr("server.bind", "localhost").is_err());
    }

    #[test]
    fn test_validate_ranges() {
        assert!(validate_range("upstream.timeout_seconds", 8u64, 1, 60).is_ok());
        assert!(validate_range("upstream.timeout_seconds", 0u64, 1, 60).is_err());
        assert!(validate_range("model.l2", 0.0, 0.0, 10.0).is_ok());
        assert!(validate_range("model.l2", f64::NAN, 0.0, 10.0).is_err());
        assert!(validate_exclusive_range("model.test_fraction", 0.2, 0.0, 1.0).is_ok());
        assert!(validate_exclusive_range("model.test_fraction", 1.0, 0.0, 1.0).is_err());
        assert!(validate_exclusive_range("model.test_fraction", f64::NAN, 0.0, 1.0).is_err());
    }
}
