use http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Write failure: {0}")]
    WriteFailure(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Request body error: {0}")]
    Body(String),

    #[error("Request body is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Handler error ({status}): {message}")]
    Handler { status: StatusCode, message: String },
}

pub type Result<T> = std::result::Result<T, RouterError>;

impl RouterError {
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Handler {
            status,
            message: message.into(),
        }
    }

    /// HTTP status this error is rendered with when it reaches a response boundary.
    pub fn status(&self) -> StatusCode {
        match self {
            RouterError::NotFound(_) => StatusCode::NOT_FOUND,
            RouterError::Handler { status, .. } => *status,
            RouterError::WriteFailure(_)
            | RouterError::Io(_)
            | RouterError::Body(_)
            | RouterError::InvalidUtf8(_)
            | RouterError::Config(_)
            | RouterError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            RouterError::NotFound(_) => "not_found",
            RouterError::WriteFailure(_) => "write_failure",
            RouterError::Io(_) => "io_error",
            RouterError::Body(_) | RouterError::InvalidUtf8(_) => "body_error",
            RouterError::Config(_) => "config_error",
            RouterError::Serialization(_) => "serialization_error",
            RouterError::Handler { .. } => "handler_error",
        }
    }
}

impl From<std::io::Error> for RouterError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RouterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for RouterError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::InvalidUtf8(err.to_string())
    }
}
