//! HTTP mapping for the core error enumeration.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use canvass_core::error::CanvassError;
use serde_json::json;

/// HTTP-facing error: either a core model error or a gate failure that
/// only exists at the controller layer.
#[derive(Debug)]
pub enum ApiError {
    Core(CanvassError),
    Unauthorized,
}

impl From<CanvassError> for ApiError {
    fn from(err: CanvassError) -> Self {
        ApiError::Core(err)
    }
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::Core(err) => match err {
                CanvassError::BadRequest { .. } => "BAD_REQUEST",
                CanvassError::NotFound { .. } => "DOCUMENT_NOT_FOUND",
                CanvassError::EmailValidation => "EMAIL_VALIDATION",
                CanvassError::PasswordLength { .. } => "PASSWORD_LENGTH",
                CanvassError::EmailDuplication => "EMAIL_DUPLICATION",
                CanvassError::PasswordVerification => "PASSWORD_VERIFICATION",
                CanvassError::PhoneValidation => "PHONE_VALIDATION",
                CanvassError::AlreadyCompleted => "ALREADY_COMPLETED",
                CanvassError::Database(_) => "DATABASE_ERROR",
                CanvassError::Crypto(_) => "CRYPTO_ERROR",
                CanvassError::Mail(_) => "MAIL_ERROR",
                CanvassError::Internal(_) => "INTERNAL_ERROR",
            },
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Core(err) => match err {
                CanvassError::BadRequest { .. }
                | CanvassError::EmailValidation
                | CanvassError::PasswordLength { .. }
                | CanvassError::PhoneValidation => StatusCode::BAD_REQUEST,
                CanvassError::NotFound { .. } => StatusCode::NOT_FOUND,
                CanvassError::PasswordVerification => StatusCode::UNAUTHORIZED,
                CanvassError::EmailDuplication | CanvassError::AlreadyCompleted => {
                    StatusCode::CONFLICT
                }
                CanvassError::Database(_)
                | CanvassError::Crypto(_)
                | CanvassError::Mail(_)
                | CanvassError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Unauthorized => "missing or invalid admin key".into(),
            ApiError::Core(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({
                "error": self.kind(),
                "message": self.message(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        for err in [
            CanvassError::bad_request("x"),
            CanvassError::EmailValidation,
            CanvassError::PasswordLength { min: 6 },
            CanvassError::PhoneValidation,
        ] {
            assert_eq!(ApiError::Core(err).status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn conflict_and_auth_mappings() {
        assert_eq!(
            ApiError::Core(CanvassError::EmailDuplication).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Core(CanvassError::AlreadyCompleted).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Core(CanvassError::PasswordVerification).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Core(CanvassError::not_found("user", "x")).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn infrastructure_errors_are_internal() {
        assert_eq!(
            ApiError::Core(CanvassError::Database("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
