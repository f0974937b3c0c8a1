use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::models::Message;

pub const STUDENT_NOT_FOUND: &str = "Student profile not found.";
pub const STUDENT_EXISTS: &str = "A student profile already exists for this user.";

pub async fn handler404(path: Uri) -> Error {
    Error::NotFound {
        message: format!("Invalid path: {}", path),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    NotFound { message: String },
    AlreadyExists { message: String },
    InvalidPayload { message: String },
    PersistenceError { message: String },
    InternalError { kind: &'static str, message: String },
}

impl Error {
    pub fn student_not_found() -> Error {
        Error::NotFound {
            message: STUDENT_NOT_FOUND.to_string(),
        }
    }

    pub fn student_exists() -> Error {
        Error::AlreadyExists {
            message: STUDENT_EXISTS.to_string(),
        }
    }

    /// Wraps a failed write. The store detail is kept in the message.
    pub fn persistence<D: std::fmt::Display>(detail: D) -> Error {
        Error::PersistenceError {
            message: format!("Database update failed: {}", detail),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::AlreadyExists { .. } => StatusCode::CONFLICT,
            Error::InvalidPayload { .. } => StatusCode::BAD_REQUEST,
            Error::PersistenceError { .. } | Error::InternalError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Error::NotFound { message }
            | Error::AlreadyExists { message }
            | Error::InvalidPayload { message }
            | Error::PersistenceError { message }
            | Error::InternalError { message, .. } => message,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InternalError { kind, message } => write!(f, "{}: {}", kind, message),
            other => f.write_str(other.message()),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(Message::of(self.message()))).into_response()
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        let message = match &rejection {
            JsonRejection::JsonDataError(err) => with_source(err),
            JsonRejection::JsonSyntaxError(err) => with_source(err),
            other => other.to_string(),
        };
        Self::InvalidPayload { message }
    }
}

/// Appends the serde detail that axum keeps behind `source()`.
fn with_source<E: std::error::Error>(err: &E) -> String {
    match err.source() {
        Some(source) => format!("{}: {}", err, source),
        None => err.to_string(),
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidPayload {
            message: rejection.to_string(),
        }
    }
}

/// Store lookups report through `anyhow`.
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError {
            kind: "DatabaseError",
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(Error::student_not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(Error::student_exists().status(), StatusCode::CONFLICT);
        assert_eq!(
            Error::persistence("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::InvalidPayload {
                message: String::new()
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn persistence_message_keeps_detail() {
        let err = Error::persistence("connection reset");
        assert_eq!(err.message(), "Database update failed: connection reset");
    }

    #[test]
    fn internal_error_display_includes_kind() {
        let err = Error::from(anyhow::anyhow!("pool closed"));
        assert_eq!(err.to_string(), "DatabaseError: pool closed");
    }
}
