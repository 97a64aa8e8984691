//! Account service configuration.

use canvass_core::validate;

/// Configuration for the account service.
#[derive(Debug, Clone)]
pub struct AccountConfig {
    /// Optional pepper prepended to passwords before Argon2id
    /// verification. Must match the pepper used during hashing.
    pub pepper: Option<String>,
    /// Minimum plaintext password length (default: 6).
    pub min_password_length: usize,
    /// Fixed referral bonus paid to the invitor on the referee's first
    /// waiting-credit event (default: 2).
    pub invitor_bonus_credit: i64,
    /// Password reset code lifetime in seconds (default: 3600 = 1 hour).
    pub reset_code_ttl_secs: u64,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            pepper: None,
            min_password_length: validate::MIN_PASSWORD_LEN,
            invitor_bonus_credit: 2,
            reset_code_ttl_secs: 3600,
        }
    }
}
