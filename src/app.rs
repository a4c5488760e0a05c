use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::{
    adapters::outbound::storage::{memory, s3, ObjectStoreDriver, S3Config},
    domain::errors::DriverError,
    ports::Driver,
};

/// Names accepted by [`create_driver_from_env`] and the `backend` tag
pub const BACKENDS: &[&str] = &[memory::BACKEND_NAME, s3::BACKEND_NAME];

/// Storage backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend")]
pub enum DriverConfig {
    #[serde(rename = "memory")]
    InMemory,
    #[serde(rename = "s3")]
    S3(S3Config),
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig::InMemory
    }
}

impl DriverConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            DriverConfig::InMemory => memory::BACKEND_NAME,
            DriverConfig::S3(_) => s3::BACKEND_NAME,
        }
    }

    /// Read configuration from the process environment, loading `.env`
    /// first if one exists
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name
    /// to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("GATEWAY_BACKEND").unwrap_or_else(|| memory::BACKEND_NAME.to_string());

        match backend.as_str() {
            memory::BACKEND_NAME => Ok(DriverConfig::InMemory),
            s3::BACKEND_NAME => {
                let required = |name: &str| {
                    lookup(name).ok_or_else(|| AppError::Configuration {
                        message: format!("{} environment variable required", name),
                    })
                };

                let mut config = S3Config::new(
                    required("S3_ACCESS_KEY")?,
                    required("S3_SECRET_KEY")?,
                    required("S3_REGION")?,
                );

                if let Some(domain) = lookup("S3_PROVIDER_DOMAIN") {
                    config = config.with_provider_domain(domain);
                }
                if let Some(endpoint) = lookup("S3_ENDPOINT") {
                    config = config.with_endpoint(endpoint);
                }
                if let Some(allow_http) = lookup("S3_ALLOW_HTTP") {
                    config = config.with_allow_http(allow_http.eq_ignore_ascii_case("true"));
                }
                if let Some(max_retries) = lookup("S3_MAX_RETRIES") {
                    let max_retries = max_retries.parse().map_err(|_| AppError::Configuration {
                        message: format!("S3_MAX_RETRIES must be a number, got '{}'", max_retries),
                    })?;
                    config = config.with_max_retries(max_retries);
                }

                Ok(DriverConfig::S3(config))
            }
            other => Err(AppError::UnknownBackend {
                name: other.to_string(),
            }),
        }
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Unknown storage backend '{name}', expected one of: {}", BACKENDS.join(", "))]
    UnknownBackend { name: String },

    #[error("Storage initialization error: {message}")]
    StorageInit {
        message: String,
        #[source]
        source: DriverError,
    },
}

/// Build the driver selected by `config`
pub fn create_driver(config: &DriverConfig) -> Result<Arc<dyn Driver>, AppError> {
    let driver: Arc<dyn Driver> = match config {
        DriverConfig::InMemory => Arc::new(ObjectStoreDriver::in_memory()),
        DriverConfig::S3(s3_config) => {
            let driver =
                ObjectStoreDriver::s3(s3_config.clone()).map_err(|source| AppError::StorageInit {
                    message: format!("invalid configuration for backend '{}'", s3::BACKEND_NAME),
                    source,
                })?;
            Arc::new(driver)
        }
    };

    info!(backend = driver.backend(), "Storage driver ready");
    Ok(driver)
}

/// Build the driver described by the environment
pub fn create_driver_from_env() -> Result<Arc<dyn Driver>, AppError> {
    create_driver(&DriverConfig::from_env()?)
}
