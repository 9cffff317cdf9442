//! Shared error types for the services crate.

use thiserror::Error;

use selector_core::scorm::ScormVersion;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `ScormSession`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ScormError {
    #[error("no SCORM API could be located")]
    ApiNotFound,
    #[error("SCORM connection is not active")]
    NotActive,
    #[error("SCORM connection is already active")]
    AlreadyActive,
    #[error("SCORM connection was terminated")]
    Terminated,
    #[error("{call} failed ({code}: {message})")]
    CallFailed {
        call: &'static str,
        code: String,
        message: String,
    },
    #[error("{call} reported success but last error is {code}: {message}")]
    InconsistentSuccess {
        call: &'static str,
        code: String,
        message: String,
    },
    #[error("configuration is fixed once API discovery has run")]
    AlreadyConfigured,
}

/// Errors emitted while opening a `LocalLms` attempt.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LocalLmsError {
    #[error("stored attempt uses SCORM {stored}, requested {requested}")]
    VersionMismatch {
        stored: ScormVersion,
        requested: ScormVersion,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while assembling app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    SqliteInit(#[from] SqliteInitError),
    #[error(transparent)]
    LocalLms(#[from] LocalLmsError),
}
