//! Mail-layer error types.

use canvass_core::error::CanvassError;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("mail API rejected the request: HTTP {status}: {body}")]
    Api { status: u16, body: String },
}

impl From<MailError> for CanvassError {
    fn from(err: MailError) -> Self {
        CanvassError::Mail(err.to_string())
    }
}
