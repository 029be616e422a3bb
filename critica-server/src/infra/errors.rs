use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use critica_core::DomainError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidUsername(_)
            | DomainError::InvalidField { .. }
            | DomainError::InvalidCode
            | DomainError::InvalidYear(_)
            | DomainError::UnknownReference(_)
            | DomainError::DuplicateIdentity
            | DomainError::DuplicateReview => Self::bad_request(err.to_string()),
            // A bare denial; never which rule would have granted access
            DomainError::PermissionDenied => Self::forbidden("Permission denied"),
            DomainError::UnknownUser(_) | DomainError::NotFound(_) => {
                Self::not_found(err.to_string())
            }
            DomainError::Conflict(_) => Self::conflict(err.to_string()),
            DomainError::Database(db) => {
                tracing::error!(error = %db, "database failure");
                Self::internal("Database error")
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_expected_statuses() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (
                DomainError::InvalidUsername("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (DomainError::DuplicateIdentity, StatusCode::BAD_REQUEST),
            (DomainError::InvalidCode, StatusCode::BAD_REQUEST),
            (DomainError::InvalidYear(3000), StatusCode::BAD_REQUEST),
            (DomainError::DuplicateReview, StatusCode::BAD_REQUEST),
            (
                DomainError::UnknownReference("genre `x`".into()),
                StatusCode::BAD_REQUEST,
            ),
            (DomainError::PermissionDenied, StatusCode::FORBIDDEN),
            (
                DomainError::UnknownUser("ghost".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::NotFound("title".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::Conflict("slug".into()),
                StatusCode::CONFLICT,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status, status);
        }
    }

    #[test]
    fn permission_denials_carry_no_rule_detail() {
        let err = AppError::from(DomainError::PermissionDenied);
        assert_eq!(err.message, "Permission denied");
    }
}
