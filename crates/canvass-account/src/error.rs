//! Account-layer error types.

use canvass_core::error::CanvassError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("invalid password")]
    InvalidPassword,

    #[error("profile has already been completed")]
    AlreadyCompleted,

    #[error("password reset code does not match")]
    ResetCodeMismatch,

    #[error("password reset code has expired")]
    ResetCodeExpired,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AccountError> for CanvassError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidPassword | AccountError::ResetCodeMismatch => {
                CanvassError::PasswordVerification
            }
            AccountError::AlreadyCompleted => CanvassError::AlreadyCompleted,
            AccountError::ResetCodeExpired => CanvassError::BadRequest {
                message: err.to_string(),
            },
            AccountError::Crypto(msg) => CanvassError::Crypto(msg),
        }
    }
}
