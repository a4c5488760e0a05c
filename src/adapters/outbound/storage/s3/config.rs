use serde::Deserialize;

pub const DEFAULT_PROVIDER_DOMAIN: &str = "digitaloceanspaces.com";

/// Matches the transport's own default
pub const DEFAULT_MAX_RETRIES: usize = 10;

/// Configuration for the S3 storage backend
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct S3Config {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Domain under which `{region}.{provider_domain}` serves the API
    #[serde(default = "default_provider_domain")]
    pub provider_domain: String,
    /// Overrides the endpoint derived from region and provider domain
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub allow_http: bool,
    /// Handed to the transport; the driver itself never retries
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

fn default_provider_domain() -> String {
    DEFAULT_PROVIDER_DOMAIN.to_string()
}

fn default_max_retries() -> usize {
    DEFAULT_MAX_RETRIES
}

impl S3Config {
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: region.into(),
            provider_domain: default_provider_domain(),
            endpoint: None,
            allow_http: false,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_provider_domain(mut self, domain: impl Into<String>) -> Self {
        self.provider_domain = domain.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_allow_http(mut self, allow_http: bool) -> Self {
        self.allow_http = allow_http;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Service endpoint the client talks to
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}.{}", self.region, self.provider_domain),
        }
    }
}

impl std::fmt::Debug for S3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Config")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("provider_domain", &self.provider_domain)
            .field("endpoint", &self.endpoint)
            .field("allow_http", &self.allow_http)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}
