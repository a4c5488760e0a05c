use std::error::Error as StdError;

use super::ValidationError;

type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Normalized failure raised by every [`Driver`](crate::ports::Driver) operation.
///
/// Vendor errors never cross the driver boundary directly: they are carried
/// as the [`source`](StdError::source) of a `DriverError`, which exposes only
/// a backend-agnostic message and the backend status code, if one was reported.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct DriverError {
    message: String,
    code: Option<u16>,
    #[source]
    cause: Option<BoxedCause>,
}

impl DriverError {
    /// Create an error with no status code and no cause
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            cause: None,
        }
    }

    /// Attach the backend status code
    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach the original failure
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: Into<BoxedCause>,
    {
        self.cause = Some(cause.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Backend status code (e.g. HTTP status); `None` when the failure
    /// never reached the backend or the backend reported none.
    pub fn code(&self) -> Option<u16> {
        self.code
    }

    /// The wrapped backend failure, kept for diagnostics only.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Replace the message while keeping code and cause
    pub(crate) fn context(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl From<ValidationError> for DriverError {
    fn from(err: ValidationError) -> Self {
        DriverError::new(format!("invalid object coordinates: {}", err)).with_cause(err)
    }
}

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;
