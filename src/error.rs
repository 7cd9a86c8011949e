use std::io;

use http::status::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinError;

#[cfg(feature = "service")]
use notify::{Error as NotifyError, ErrorKind as NotifyErrorKind};

/// Error taxonomy for the document graph and its service surfaces.
///
/// Storage failures are fatal to the operation in progress; batch loads fail
/// on the first observed error rather than returning a partial graph. The one
/// documented exception is rename propagation, which may leave earlier
/// referencing documents rewritten when a later rewrite fails (see
/// [`crate::graph::WikiGraph::rename`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum WikiError {
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("Document parse error: {0}")]
    Parse(String),
    #[error("Invalid document name: {0}")]
    InvalidName(String),
    #[error("Service error: {0}")]
    Service(String),
    #[error("Custom error: {0}")]
    Custom(String),
}

impl WikiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WikiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WikiError::NotFound(_) => StatusCode::NOT_FOUND,
            WikiError::PermissionDenied => StatusCode::FORBIDDEN,
            WikiError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WikiError::InvalidName(_) => StatusCode::BAD_REQUEST,
            WikiError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WikiError::Custom(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<io::Error> for WikiError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => WikiError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => WikiError::PermissionDenied,
            _ => WikiError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<walkdir::Error> for WikiError {
    fn from(x: walkdir::Error) -> Self {
        match x.io_error().map(io::Error::kind) {
            Some(io::ErrorKind::NotFound) => WikiError::NotFound(format!("{x}")),
            Some(io::ErrorKind::PermissionDenied) => WikiError::PermissionDenied,
            _ => WikiError::Io(format!("Directory walk failed: {x}")),
        }
    }
}

impl From<JoinError> for WikiError {
    fn from(x: JoinError) -> Self {
        WikiError::Custom(format!("Document load task failed: {x}"))
    }
}

#[cfg(feature = "service")]
impl From<NotifyError> for WikiError {
    fn from(notify_error: NotifyError) -> Self {
        match notify_error.kind {
            NotifyErrorKind::Generic(msg) => WikiError::Service(format!(
                "notify-debouncer: {}, paths: {:?}",
                msg, notify_error.paths
            )),
            NotifyErrorKind::Io(io_error) => WikiError::Service(format!(
                "notify-debouncer: io error {}, paths: {:?}",
                io_error.kind(),
                notify_error.paths
            )),
            NotifyErrorKind::PathNotFound => WikiError::NotFound(format!(
                "notify-debouncer: path(s) not found: {:?}",
                notify_error.paths
            )),
            NotifyErrorKind::WatchNotFound => WikiError::NotFound(format!(
                "notify-debouncer: watch not found, paths: {:?}",
                notify_error.paths
            )),
            NotifyErrorKind::InvalidConfig(_) => {
                WikiError::Service("notify-debouncer invalid config".to_string())
            }
            NotifyErrorKind::MaxFilesWatch => {
                WikiError::Service("notify-debouncer max file watch limit reached".to_string())
            }
        }
    }
}

#[cfg(feature = "service")]
impl From<toml::de::Error> for WikiError {
    fn from(src: toml::de::Error) -> WikiError {
        WikiError::Parse(format!("Toml deserialization error: {src}"))
    }
}
