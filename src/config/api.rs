//! REST API configuration

use serde::Deserialize;
use std::time::Duration;

use super::environment::Environment;
use super::error::ValidationError;

/// REST backend settings used for the notification bootstrap
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// API base URL (http:// or https://)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Notifications requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Upper bound on pages fetched during bootstrap
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate API configuration
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("API__BASE_URL"));
        }
        let secure = self.base_url.starts_with("https://");
        if !secure && !self.base_url.starts_with("http://") {
            return Err(ValidationError::InvalidApiUrl);
        }
        if environment.is_production() && !secure {
            return Err(ValidationError::InsecureScheme("API base URL"));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.page_size == 0 || self.page_size > 100 {
            return Err(ValidationError::InvalidPageSize);
        }
        if self.max_pages == 0 {
            return Err(ValidationError::InvalidMaxPages);
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_page_size() -> u32 {
    50
}

fn default_max_pages() -> u32 {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.page_size, 50);
        assert!(config.validate(Environment::Development).is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let config = ApiConfig {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(Environment::Development),
            Err(ValidationError::InvalidApiUrl)
        );
    }

    #[test]
    fn test_validation_page_size_bounds() {
        for page_size in [0, 101] {
            let config = ApiConfig {
                page_size,
                ..Default::default()
            };
            assert_eq!(
                config.validate(Environment::Development),
                Err(ValidationError::InvalidPageSize)
            );
        }
    }

    #[test]
    fn test_validation_requires_https_in_production() {
        assert!(ApiConfig::default()
            .validate(Environment::Production)
            .is_err());
    }
}
