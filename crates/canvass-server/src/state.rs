//! Shared application state.

use canvass_account::AccountService;
use canvass_db::{SurrealCampaignRepository, SurrealUserRepository};
use canvass_mail::ResendMailer;
use surrealdb::engine::remote::ws::Client;

use crate::country::RestCountriesClient;

pub type Accounts = AccountService<SurrealUserRepository<Client>, RestCountriesClient>;

pub struct AppState {
    pub accounts: Accounts,
    /// Repository clone for admin listing and report lookups.
    pub users: SurrealUserRepository<Client>,
    pub campaigns: SurrealCampaignRepository<Client>,
    pub mailer: ResendMailer,
    pub admin_key: String,
}
