use std::error::Error as StdError;
use std::io;
use std::path::Path;

use aws_sdk_s3::{config::http::HttpResponse, error::SdkError};
use http::StatusCode;
use tracing::warn;

use crate::domain::errors::{DriverError, DriverResult};

/// Marker the HTTP transport uses when it reports a non-2xx response
const STATUS_MARKER: &str = "status code: ";

/// Convert object_store errors into the normalized driver error
impl From<object_store::Error> for DriverError {
    fn from(err: object_store::Error) -> Self {
        let error = DriverError::new("storage backend failure");
        match backend_status(&err) {
            Some(code) => error.with_code(code).with_cause(err),
            None => error.with_cause(err),
        }
    }
}

/// Convert S3 SDK failures; the status comes from the raw response when one arrived
impl<E> From<SdkError<E, HttpResponse>> for DriverError
where
    E: StdError + Send + Sync + 'static,
{
    fn from(err: SdkError<E, HttpResponse>) -> Self {
        let error = DriverError::new("storage backend failure");
        match err.raw_response().map(|response| response.status().as_u16()) {
            Some(code) => error.with_code(code).with_cause(err),
            None => error.with_cause(err),
        }
    }
}

/// Status code reported by the backend for this failure, if any
pub(crate) fn backend_status(err: &object_store::Error) -> Option<u16> {
    let status = match err {
        object_store::Error::NotFound { .. } => StatusCode::NOT_FOUND,
        object_store::Error::PermissionDenied { .. } => StatusCode::FORBIDDEN,
        object_store::Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
        object_store::Error::AlreadyExists { .. } => StatusCode::CONFLICT,
        object_store::Error::Precondition { .. } => StatusCode::PRECONDITION_FAILED,
        object_store::Error::NotModified { .. } => StatusCode::NOT_MODIFIED,
        object_store::Error::Generic { .. } => return status_from_chain(err),
        _ => return None,
    };
    Some(status.as_u16())
}

/// Walk the error chain looking for a status the transport reported
fn status_from_chain(err: &(dyn StdError + 'static)) -> Option<u16> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(code) = parse_status(&err.to_string()) {
            return Some(code);
        }
        current = err.source();
    }
    None
}

fn parse_status(message: &str) -> Option<u16> {
    let (_, rest) = message.split_once(STATUS_MARKER)?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let status = StatusCode::from_bytes(digits.as_bytes()).ok()?;
    Some(status.as_u16())
}

/// The one absence predicate for S3-style backends
pub(crate) fn is_absence(err: &DriverError) -> bool {
    err.code() == Some(StatusCode::NOT_FOUND.as_u16())
}

/// Fold the absence class into `None`, leaving all other failures untouched
pub(crate) fn absent_if_not_found<T>(result: DriverResult<T>) -> DriverResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if is_absence(&err) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Normalize a backend failure for `action`, logging it once
pub(crate) fn backend_failure(action: &str, err: impl Into<DriverError>) -> DriverError {
    let error = err.into().context(format!("failed to {}", action));
    if !is_absence(&error) {
        warn!(action, code = ?error.code(), cause = ?error.cause(), "storage backend failure");
    }
    error
}

/// Normalize a local filesystem failure
pub(crate) fn local_io_failure(action: &str, path: &Path, err: io::Error) -> DriverError {
    warn!(action, path = %path.display(), error = %err, "local file failure");
    DriverError::new(format!("failed to {} {}", action, path.display())).with_cause(err)
}
