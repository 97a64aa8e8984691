//! Environment configuration for the server binary.

use std::env;

use canvass_db::DbConfig;

#[derive(Clone, Debug)]
pub struct EnvConfig {
    pub port: u16,
    pub db: DbConfig,
    pub resend_key: String,
    pub mail_from: String,
    pub admin_key: String,
    pub pepper: Option<String>,
}

fn require(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("environment variable {key} is not set"))
}

impl EnvConfig {
    /// Read configuration from the environment, loading `.env` first.
    /// Missing required variables abort startup with a clear message.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        EnvConfig {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            db: DbConfig {
                url: require("SURREAL_URL"),
                namespace: env::var("SURREAL_NAMESPACE").unwrap_or_else(|_| "canvass".into()),
                database: env::var("SURREAL_DATABASE").unwrap_or_else(|_| "main".into()),
                username: require("SURREAL_USERNAME"),
                password: require("SURREAL_PASSWORD"),
            },
            resend_key: require("RESEND_KEY"),
            mail_from: require("MAIL_FROM"),
            admin_key: require("ADMIN_KEY"),
            pepper: env::var("PASSWORD_PEPPER").ok(),
        }
    }
}
