//! SurrealDB repository implementations.

mod campaign;
mod user;

pub use campaign::SurrealCampaignRepository;
pub use user::{SurrealUserRepository, verify_password};
