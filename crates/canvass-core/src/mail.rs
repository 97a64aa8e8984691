//! Mail utility collaborator contract.

use serde::Serialize;

use crate::error::CanvassResult;

/// A templated email addressed to one or more recipients.
#[derive(Debug, Clone, Serialize)]
pub struct MailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

pub trait Mailer: Send + Sync {
    fn send(&self, message: &MailMessage) -> impl Future<Output = CanvassResult<()>> + Send;
}
