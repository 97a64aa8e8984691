//! Error types for the CANVASS system.
//!
//! Every model operation resolves to one variant of this closed set;
//! the first failing check wins and no errors are aggregated.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvassError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Document not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Email address is malformed")]
    EmailValidation,

    #[error("Password must be at least {min} characters")]
    PasswordLength { min: usize },

    #[error("Email address is already registered")]
    EmailDuplication,

    #[error("Password verification failed")]
    PasswordVerification,

    #[error("Phone number is not a valid mobile number")]
    PhoneValidation,

    #[error("Profile has already been completed")]
    AlreadyCompleted,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Mail delivery failed: {0}")]
    Mail(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CanvassError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        CanvassError::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        CanvassError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

pub type CanvassResult<T> = Result<T, CanvassError>;
