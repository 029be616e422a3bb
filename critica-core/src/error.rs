use thiserror::Error;

/// Domain error taxonomy. Store-level constraint violations are mapped to
/// the nearest variant by the repositories; anything without a closer match
/// surfaces as [`DomainError::Conflict`].
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid value for field `{field}`: {message}")]
    InvalidField { field: &'static str, message: String },

    #[error("Username or email already in use")]
    DuplicateIdentity,

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Invalid confirmation code")]
    InvalidCode,

    #[error("Unknown reference: {0}")]
    UnknownReference(String),

    #[error("Year {0} is in the future")]
    InvalidYear(i32),

    #[error("You have already reviewed this title")]
    DuplicateReview,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DomainError {
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
