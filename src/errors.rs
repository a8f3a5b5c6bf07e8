use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use std::fmt;

use crate::ai::LlmError;

/// A single rejected input field.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Validation(Vec<FieldError>),
    BadRequest(String),
    Unauthorized(String),
    NotFound(&'static str),
    Ai(LlmError),
    AiUnavailable,
    Import(String),
    Hash(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Validation(errors) => write!(f, "Validation failed ({} field(s))", errors.len()),
            AppError::BadRequest(msg) => write!(f, "Bad request: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::NotFound(what) => write!(f, "{what} not found"),
            AppError::Ai(e) => write!(f, "AI service error: {e}"),
            AppError::AiUnavailable => write!(f, "AI service is not configured"),
            AppError::Import(msg) => write!(f, "Import error: {msg}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
        }
    }
}

impl AppError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) | AppError::Import(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Ai(_) => StatusCode::BAD_GATEWAY,
            AppError::AiUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Db(_) | AppError::Hash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(errors) => ApiErrorResponse {
                error: "Validation failed".to_string(),
                details: serde_json::to_value(errors).ok(),
            },
            AppError::BadRequest(msg) | AppError::Import(msg) => ApiErrorResponse {
                error: "Bad request".to_string(),
                details: Some(serde_json::Value::String(msg.clone())),
            },
            AppError::Unauthorized(msg) => ApiErrorResponse {
                error: "Unauthorized".to_string(),
                details: Some(serde_json::Value::String(msg.clone())),
            },
            AppError::NotFound(_) | AppError::AiUnavailable => ApiErrorResponse {
                error: self.to_string(),
                details: None,
            },
            AppError::Ai(e) => {
                log::error!("{self}");
                ApiErrorResponse {
                    error: "AI service error".to_string(),
                    details: Some(serde_json::Value::String(e.to_string())),
                }
            }
            AppError::Db(_) | AppError::Hash(_) => {
                log::error!("{self}");
                ApiErrorResponse {
                    error: "Internal Server Error".to_string(),
                    details: None,
                }
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Ai(e)
    }
}

/// Maps JSON extractor failures onto the API error body.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Same as [`json_error_handler`] for path parameters (e.g. a non-numeric idea_seq).
pub fn path_error_handler(
    err: actix_web::error::PathError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// True when the database rejected a write because of a unique constraint.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = resp.into_body().try_into_bytes().unwrap_or_default();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let (status, body) = body_json(AppError::validation("question_title", "is required"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"][0]["field"], "question_title");
        assert_eq!(body["details"][0]["message"], "is required");
    }

    #[test]
    fn not_found_names_the_entity() {
        let (status, body) = body_json(AppError::NotFound("Question"));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Question not found");
    }

    #[test]
    fn database_errors_are_generic() {
        let (status, body) = body_json(AppError::Db(sqlx::Error::RowNotFound));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
        assert!(body.get("details").is_none());
    }
}
