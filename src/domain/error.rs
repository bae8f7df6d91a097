use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("an account with that email already exists: {0}")]
    DuplicateEmail(String),
    #[error("a post with that title already exists: {0}")]
    DuplicateTitle(String),
    #[error("no account with that email")]
    NoSuchEmail,
    #[error("password incorrect")]
    WrongPassword,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found: {0}")]
    NotFound(i64),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::DuplicateEmail(_) | DomainError::DuplicateTitle(_) => {
                StatusCode::CONFLICT
            }
            DomainError::NoSuchEmail
            | DomainError::WrongPassword
            | DomainError::Unauthorized => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden => StatusCode::FORBIDDEN,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        let details = match self {
            DomainError::NotFound(id) => Some(json!({ "resource": id })),
            DomainError::Forbidden => {
                Some(json!({ "message": "administrator access required" }))
            }
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
