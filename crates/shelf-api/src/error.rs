//! API error handling
//!
//! Every error body is `{"message": ...}`, with an `error` field carrying the
//! underlying cause for server-side failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shelf_core::ShelfError;
use tracing::{debug, error};

pub const REQUIRED_FIELDS_MESSAGE: &str = "Name, author, and date are required";
pub const BOOK_NOT_FOUND_MESSAGE: &str = "Book not found";
pub const IMAGE_ONLY_MESSAGE: &str = "Only image files are allowed!";

/// What a handler was doing when it failed, used for 500 messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookAction {
    Fetch,
    Create,
    Update,
    Delete,
}

impl BookAction {
    pub fn failure_message(self) -> &'static str {
        match self {
            BookAction::Fetch => "Error fetching books",
            BookAction::Create => "Error creating book",
            BookAction::Update => "Error updating book",
            BookAction::Delete => "Error deleting book",
        }
    }
}

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    PayloadTooLarge(String),
    UnsupportedMediaType(String),
    /// A request the body extractors could not read
    Rejected { status: StatusCode, message: String },
    Internal { message: String, error: String },
}

impl ApiError {
    pub fn book_not_found() -> Self {
        ApiError::NotFound(BOOK_NOT_FOUND_MESSAGE.into())
    }

    pub fn rejected(status: StatusCode, msg: impl Into<String>) -> Self {
        ApiError::Rejected {
            status,
            message: msg.into(),
        }
    }

    /// Map a service error, naming the action for server-side failures
    pub fn from_service(err: ShelfError, action: BookAction) -> Self {
        match err {
            ShelfError::Validation(ref errors) => {
                debug!(errors = ?errors.full_messages(), "Rejected book fields");
                ApiError::BadRequest(REQUIRED_FIELDS_MESSAGE.into())
            }
            ShelfError::NotFound { .. } => ApiError::book_not_found(),
            ShelfError::UnsupportedMediaType(_) => {
                ApiError::UnsupportedMediaType(IMAGE_ONLY_MESSAGE.into())
            }
            ShelfError::PayloadTooLarge { max, .. } => ApiError::PayloadTooLarge(format!(
                "File too large, the limit is {} MB",
                max / (1024 * 1024)
            )),
            ShelfError::Persistence(_) | ShelfError::Internal(_) => {
                error!(error = %err, action = ?action, "Request failed");
                ApiError::Internal {
                    message: action.failure_message().into(),
                    error: err.to_string(),
                }
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::NotFound(message)
            | ApiError::BadRequest(message)
            | ApiError::PayloadTooLarge(message)
            | ApiError::UnsupportedMediaType(message)
            | ApiError::Rejected { message, .. } => ErrorBody {
                message,
                error: None,
            },
            ApiError::Internal { message, error } => ErrorBody {
                message,
                error: Some(error),
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::ValidationErrors;

    #[test]
    fn test_service_error_mapping() {
        let cases = [
            (
                ShelfError::Validation(ValidationErrors::new()),
                StatusCode::BAD_REQUEST,
            ),
            (ShelfError::book_not_found(3), StatusCode::NOT_FOUND),
            (
                ShelfError::UnsupportedMediaType("txt".into()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (
                ShelfError::PayloadTooLarge { size: 6, max: 5 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                ShelfError::persistence("disk full"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(
                ApiError::from_service(err, BookAction::Create).status_code(),
                status
            );
        }
    }

    #[test]
    fn test_internal_error_carries_action_and_cause() {
        match ApiError::from_service(ShelfError::persistence("disk full"), BookAction::Delete) {
            ApiError::Internal { message, error } => {
                assert_eq!(message, "Error deleting book");
                assert!(error.contains("disk full"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_payload_message_names_limit() {
        let err = ApiError::from_service(
            ShelfError::PayloadTooLarge {
                size: 6 * 1024 * 1024,
                max: 5 * 1024 * 1024,
            },
            BookAction::Create,
        );
        assert!(matches!(err, ApiError::PayloadTooLarge(ref m) if m.contains("5 MB")));
    }
}
