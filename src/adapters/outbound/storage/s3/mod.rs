//! S3-style storage backend
//!
//! Targets S3-compatible providers whose service endpoint has the form
//! `https://{region}.{provider_domain}` (DigitalOcean Spaces by default).
//! Reads, listing and URL signing go through object_store. Writes go
//! through the S3 SDK, which signs the canned ACL with the request.

mod config;
mod writer;

pub use config::{S3Config, DEFAULT_MAX_RETRIES, DEFAULT_PROVIDER_DOMAIN};
pub use writer::S3Writer;

use std::sync::Arc;

use aws_sdk_s3::config::{
    retry::RetryConfig as SdkRetryConfig, BehaviorVersion, Builder as SdkConfigBuilder,
    Credentials, Region, RequestChecksumCalculation, ResponseChecksumValidation,
};
use http::Uri;
use object_store::{
    aws::{AmazonS3, AmazonS3Builder},
    RetryConfig,
};
use tracing::info;

use super::{
    client::{encode_key, ClientFactory, ContainerClient},
    driver::ObjectStoreDriver,
};
use crate::domain::{
    errors::{DriverError, DriverResult},
    value_objects::ContainerName,
};

pub const BACKEND_NAME: &str = "s3";

const CREDENTIALS_PROVIDER: &str = "object-gateway";

/// Create an S3-style driver from credentials and region.
///
/// No network call is made; malformed credentials or region fail here.
pub fn new_driver(
    access_key: impl Into<String>,
    secret_key: impl Into<String>,
    region: impl Into<String>,
) -> DriverResult<ObjectStoreDriver> {
    ObjectStoreDriver::s3(S3Config::new(access_key, secret_key, region))
}

/// Builds per-container S3 clients from one immutable configuration
pub struct S3ClientFactory {
    config: S3Config,
    template: AmazonS3Builder,
    writer: aws_sdk_s3::Client,
}

impl S3ClientFactory {
    pub fn new(config: S3Config) -> DriverResult<Self> {
        validate(&config)?;

        let template = AmazonS3Builder::new()
            .with_region(&config.region)
            .with_access_key_id(&config.access_key)
            .with_secret_access_key(&config.secret_key)
            .with_endpoint(config.endpoint_url())
            .with_virtual_hosted_style_request(false)
            .with_allow_http(config.allow_http)
            .with_retry(RetryConfig {
                max_retries: config.max_retries,
                ..Default::default()
            });

        let writer = aws_sdk_s3::Client::from_conf(writer_config(&config));

        info!(
            region = %config.region,
            endpoint = %config.endpoint_url(),
            "Created S3 client factory"
        );

        Ok(Self {
            config,
            template,
            writer,
        })
    }

    pub fn config(&self) -> &S3Config {
        &self.config
    }

    fn build(&self, container: &ContainerName) -> DriverResult<AmazonS3> {
        let builder = self.template.clone().with_bucket_name(container.as_str());

        builder.build().map_err(|e| {
            DriverError::from(e).context(format!(
                "Failed to build S3 client for container {}",
                container
            ))
        })
    }
}

impl std::fmt::Debug for S3ClientFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ClientFactory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ClientFactory for S3ClientFactory {
    fn backend(&self) -> &'static str {
        BACKEND_NAME
    }

    fn connect(&self, container: &ContainerName) -> DriverResult<ContainerClient> {
        let reader = Arc::new(self.build(container)?);
        let writer = Arc::new(S3Writer::new(self.writer.clone(), container));

        Ok(ContainerClient::new(reader.clone(), writer).with_signer(reader))
    }

    /// Path-style URL under the service endpoint, which is
    /// `https://{region}.{provider_domain}` unless overridden
    fn public_url(&self, container: &str, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.endpoint_url(),
            container,
            encode_key(key)
        )
    }
}

/// SDK configuration for the write path, built from the same settings as the reader
fn writer_config(config: &S3Config) -> aws_sdk_s3::Config {
    let credentials = Credentials::new(
        config.access_key.clone(),
        config.secret_key.clone(),
        None,
        None,
        CREDENTIALS_PROVIDER,
    );
    // One initial attempt plus the configured retries
    let max_attempts = u32::try_from(config.max_retries)
        .unwrap_or(u32::MAX)
        .saturating_add(1);

    SdkConfigBuilder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(credentials)
        .endpoint_url(config.endpoint_url())
        .force_path_style(true)
        .retry_config(SdkRetryConfig::standard().with_max_attempts(max_attempts))
        // S3-compatible providers do not all accept the SDK's default checksums
        .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
        .response_checksum_validation(ResponseChecksumValidation::WhenRequired)
        .build()
}

fn validate(config: &S3Config) -> DriverResult<()> {
    let invalid = |reason: &str| DriverError::new(format!("invalid S3 configuration: {}", reason));

    if config.access_key.trim().is_empty() {
        return Err(invalid("access key is empty"));
    }

    if config.secret_key.trim().is_empty() {
        return Err(invalid("secret key is empty"));
    }

    if config.region.is_empty() {
        return Err(invalid("region is empty"));
    }

    if !config
        .region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid(&format!("malformed region '{}'", config.region)));
    }

    if config.provider_domain.is_empty() || config.provider_domain.contains('/') {
        return Err(invalid(&format!(
            "malformed provider domain '{}'",
            config.provider_domain
        )));
    }

    if let Some(endpoint) = &config.endpoint {
        let uri: Uri = endpoint
            .parse()
            .map_err(|e| invalid(&format!("malformed endpoint '{}': {}", endpoint, e)))?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(invalid(&format!(
                "endpoint '{}' must include scheme and host",
                endpoint
            )));
        }
    }

    Ok(())
}
