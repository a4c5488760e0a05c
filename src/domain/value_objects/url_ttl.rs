use std::time::Duration;

/// Validity window of a signed URL.
///
/// Lifetimes are clamped into `[MIN_SECS, MAX_SECS]`: a zero lifetime becomes
/// one second, anything past the SigV4 limit of seven days becomes seven days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UrlTtl(u64);

impl UrlTtl {
    pub const MIN_SECS: u64 = 1;
    pub const MAX_SECS: u64 = 7 * 24 * 60 * 60;
    pub const DEFAULT_SECS: u64 = 300;

    pub fn from_secs(secs: u64) -> Self {
        Self(secs.clamp(Self::MIN_SECS, Self::MAX_SECS))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Default for UrlTtl {
    fn default() -> Self {
        Self(Self::DEFAULT_SECS)
    }
}

impl From<Duration> for UrlTtl {
    fn from(duration: Duration) -> Self {
        Self::from_secs(duration.as_secs())
    }
}
