//! CANVASS Core — domain models, error types, and repository traits
//! shared across all crates.

pub mod country;
pub mod error;
pub mod mail;
pub mod models;
pub mod repository;
pub mod validate;

pub use error::{CanvassError, CanvassResult};
