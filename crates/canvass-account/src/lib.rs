//! CANVASS Account — account lifecycle orchestration: registration,
//! authentication, profile completion and updates, campaign membership,
//! credit accrual, and password recovery.

pub mod config;
pub mod error;
pub mod password;
pub mod service;

pub use config::AccountConfig;
pub use error::AccountError;
pub use service::AccountService;
