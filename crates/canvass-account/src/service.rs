//! Account service — account lifecycle orchestration.

use canvass_core::country::CountryService;
use canvass_core::error::{CanvassError, CanvassResult};
use canvass_core::models::user::{
    CompleteProfile, CompletedProfile, CreateAccount, Gender, NewAccount, PaymentOutcome,
    ProfileChanges, PublicUser, UpdateProfile, User,
};
use canvass_core::repository::UserRepository;
use canvass_core::validate;
use chrono::{Duration, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::config::AccountConfig;
use crate::error::AccountError;
use crate::password;

/// Account service.
///
/// Generic over the user repository and country service so that this
/// layer has no dependency on the database crate or any HTTP client.
pub struct AccountService<U: UserRepository, C: CountryService> {
    users: U,
    countries: C,
    config: AccountConfig,
}

fn parse_account_id(id: &str) -> CanvassResult<Uuid> {
    Uuid::parse_str(id.trim())
        .map_err(|_| CanvassError::bad_request("malformed account identifier"))
}

impl<U: UserRepository, C: CountryService> AccountService<U, C> {
    pub fn new(users: U, countries: C, config: AccountConfig) -> Self {
        Self {
            users,
            countries,
            config,
        }
    }

    /// Register a new account from email + password and an optional
    /// referral code.
    ///
    /// A referral code that is not a well-formed identifier is
    /// discarded, not rejected. The created account has
    /// `agreement_approved = true` and an incomplete profile.
    pub async fn create_account(&self, input: CreateAccount) -> CanvassResult<User> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() || input.password.is_empty() {
            return Err(CanvassError::bad_request("email and password are required"));
        }
        if !validate::email(&email) {
            return Err(CanvassError::EmailValidation);
        }
        if input.password.chars().count() < self.config.min_password_length {
            return Err(CanvassError::PasswordLength {
                min: self.config.min_password_length,
            });
        }

        let invitor = input
            .invitor_code
            .as_deref()
            .and_then(|code| Uuid::parse_str(code.trim()).ok());

        self.users
            .create(NewAccount {
                email,
                password: input.password,
                invitor,
            })
            .await
    }

    /// Authenticate with email + password and return the sanitized user.
    ///
    /// On success, legacy locale gender spellings stored on the document
    /// are rewritten to their canonical values. That rewrite is
    /// best-effort: a failure is logged and never surfaced to the
    /// caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> CanvassResult<PublicUser> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() || !validate::email(&email) {
            return Err(CanvassError::bad_request("email and password are required"));
        }

        let user = self.users.get_by_email(&email).await?;

        let valid =
            password::verify_password(password, &user.password_hash, self.config.pepper.as_deref())?;
        if !valid {
            return Err(AccountError::InvalidPassword.into());
        }

        if user.gender.is_some() {
            if let Err(e) = self.users.normalize_legacy_gender(user.id).await {
                warn!(user_id = %user.id, error = %e, "legacy gender rewrite failed");
            }
        }

        Ok(user.into_public())
    }

    /// Fetch the raw account document by identifier.
    ///
    /// The result includes secret fields (password hash, reset codes)
    /// and must never be exposed to a client directly; callers apply
    /// [`User::into_public`] themselves.
    pub async fn get_by_id(&self, id: &str) -> CanvassResult<User> {
        let id = parse_account_id(id)?;
        self.users.get_by_id(id).await
    }

    /// One-time profile completion.
    ///
    /// Validation is ordered and first-failure-wins: name, phone,
    /// gender, birth year, country, account existence, completion
    /// state. On success all profile fields and the `completed` flag
    /// are set atomically.
    pub async fn complete_profile(&self, id: &str, input: CompleteProfile) -> CanvassResult<()> {
        let id = parse_account_id(id)?;

        let name = input.name.trim();
        if name.is_empty() {
            return Err(CanvassError::bad_request("name is required"));
        }

        let phone = validate::mobile_phone(&input.phone).ok_or(CanvassError::PhoneValidation)?;

        let gender = Gender::parse(input.gender.trim())
            .ok_or_else(|| CanvassError::bad_request("unknown gender value"))?;

        if !validate::birth_year(input.birth_year) {
            return Err(CanvassError::bad_request("birth year out of range"));
        }

        let country = self
            .countries
            .resolve(input.country.trim())
            .await?
            .ok_or_else(|| CanvassError::bad_request("unknown country"))?;

        let user = self.users.get_by_id(id).await?;
        if user.completed {
            return Err(AccountError::AlreadyCompleted.into());
        }

        self.users
            .complete(
                id,
                CompletedProfile {
                    name: name.to_string(),
                    phone,
                    gender,
                    birth_year: input.birth_year,
                    country: country.code,
                },
            )
            .await
    }

    /// Repeatable profile update.
    ///
    /// When both city and town are supplied they are validated jointly
    /// against the stored country; otherwise the location is left
    /// untouched. Name and phone are each validated individually and
    /// fall back to the stored value when invalid or absent.
    pub async fn update_profile(&self, id: &str, input: UpdateProfile) -> CanvassResult<User> {
        let id = parse_account_id(id)?;
        let user = self.users.get_by_id(id).await?;

        let name = input
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from);
        let phone = input.phone.as_deref().and_then(validate::mobile_phone);

        let changes = match (input.city, input.town) {
            (Some(city), Some(town)) => {
                let country = user.country.as_deref().ok_or_else(|| {
                    CanvassError::bad_request("no country on file for location update")
                })?;
                let city = city.trim().to_string();
                let town = town.trim().to_string();
                if !self.countries.validate_city_town(country, &city, &town).await? {
                    return Err(CanvassError::bad_request(
                        "city and town do not match the stored country",
                    ));
                }
                ProfileChanges {
                    name,
                    phone,
                    city: Some(city),
                    town: Some(town),
                }
            }
            _ => ProfileChanges {
                name,
                phone,
                city: None,
                town: None,
            },
        };

        self.users.update_profile(id, changes).await
    }

    /// Join a campaign. Only completed profiles are full members.
    /// Joining the same campaign twice is a no-op.
    pub async fn join_campaign(&self, user_id: Uuid, campaign_id: Uuid) -> CanvassResult<()> {
        let user = self.users.get_by_id(user_id).await?;
        if !user.completed {
            return Err(CanvassError::bad_request(
                "profile must be completed before joining campaigns",
            ));
        }
        self.users.join_campaign(user_id, campaign_id).await
    }

    /// Record a campaign payment into the waiting balance.
    ///
    /// A campaign already paid for is a no-op (double-payment guard).
    /// On the user's first waiting-credit event the invitor, when set,
    /// receives the fixed referral bonus; that grant is best-effort and
    /// a failure is logged, not propagated.
    pub async fn record_campaign_payment(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        amount: i64,
    ) -> CanvassResult<PaymentOutcome> {
        if amount <= 0 {
            return Err(CanvassError::bad_request("payment amount must be positive"));
        }

        let user = self.users.get_by_id(user_id).await?;
        if !user.completed {
            return Err(CanvassError::bad_request(
                "profile must be completed before receiving payments",
            ));
        }

        let outcome = self
            .users
            .record_campaign_payment(user_id, campaign_id, amount)
            .await?;

        if outcome.first_waiting_credit {
            if let Some(invitor) = outcome.invitor {
                if let Err(e) = self
                    .users
                    .grant_credit(invitor, self.config.invitor_bonus_credit)
                    .await
                {
                    warn!(user_id = %user_id, invitor = %invitor, error = %e,
                        "invitor bonus grant failed");
                }
            }
        }

        Ok(outcome)
    }

    /// Settle part of the waiting balance into available credit.
    pub async fn settle_waiting_credit(&self, user_id: Uuid, amount: i64) -> CanvassResult<()> {
        if amount <= 0 {
            return Err(CanvassError::bad_request(
                "settlement amount must be positive",
            ));
        }

        let user = self.users.get_by_id(user_id).await?;
        if amount > user.waiting_credit {
            return Err(CanvassError::bad_request(
                "settlement exceeds waiting credit",
            ));
        }

        self.users.settle_waiting_credit(user_id, amount).await
    }

    /// Start a password reset: store an opaque code with an expiry and
    /// return it for delivery to the account's email address.
    pub async fn begin_password_reset(&self, email: &str) -> CanvassResult<String> {
        let email = email.trim().to_lowercase();
        if !validate::email(&email) {
            return Err(CanvassError::bad_request("malformed email address"));
        }

        let user = self.users.get_by_email(&email).await?;
        let code = Uuid::new_v4().simple().to_string();
        let expires_at = Utc::now() + Duration::seconds(self.config.reset_code_ttl_secs as i64);

        self.users
            .set_password_reset(user.id, code.clone(), expires_at)
            .await?;

        Ok(code)
    }

    /// Complete a password reset. The code must match the pending one
    /// and be unexpired; the new password is held to the same minimum
    /// length as registration. A consumed code cannot be replayed.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> CanvassResult<()> {
        let email = email.trim().to_lowercase();
        if !validate::email(&email) {
            return Err(CanvassError::bad_request("malformed email address"));
        }

        let user = self.users.get_by_email(&email).await?;

        let pending = user
            .password_reset_code
            .as_deref()
            .ok_or(AccountError::ResetCodeMismatch)?;
        if pending != code {
            return Err(AccountError::ResetCodeMismatch.into());
        }

        match user.password_reset_expires_at {
            Some(expires_at) if expires_at > Utc::now() => {}
            _ => return Err(AccountError::ResetCodeExpired.into()),
        }

        if new_password.chars().count() < self.config.min_password_length {
            return Err(CanvassError::PasswordLength {
                min: self.config.min_password_length,
            });
        }

        self.users.reset_password(user.id, new_password).await
    }
}
