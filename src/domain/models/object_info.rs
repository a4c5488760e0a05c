use chrono::{DateTime, Utc};

/// Content type reported when the backend supplies none
pub const DEFAULT_CONTENT_TYPE: &str = "binary/octet-stream";

/// Snapshot of a stored object's metadata at the moment it was queried.
///
/// Only built from a successful metadata fetch; every field is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    url: String,
    content_type: String,
    content_length: u64,
    etag: String,
    last_modified: DateTime<Utc>,
}

impl ObjectInfo {
    /// The etag is stored without its surrounding quote characters
    pub fn new(
        url: impl Into<String>,
        content_type: impl Into<String>,
        content_length: u64,
        etag: &str,
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            url: url.into(),
            content_type: content_type.into(),
            content_length,
            etag: normalize_etag(etag).to_string(),
            last_modified,
        }
    }

    /// Locator for the object; dereferenceable, not necessarily public
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn etag(&self) -> &str {
        &self.etag
    }

    /// Backend clock, not the caller's
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }
}

/// Strip the quotes S3-style backends wrap around entity tags,
/// including the `W/` weak-validator prefix form.
pub fn normalize_etag(raw: &str) -> &str {
    let trimmed = raw.trim();
    let unprefixed = trimmed.strip_prefix("W/").unwrap_or(trimmed);
    unprefixed.trim_matches('"')
}
