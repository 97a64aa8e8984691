//! CANVASS Mail — HTTP mail delivery via the Resend JSON API.

mod client;
mod error;

pub use client::ResendMailer;
pub use error::MailError;
