//! SurrealDB implementation of [`UserRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash. An optional pepper (server-side secret) can be
//! provided at construction time. Plaintext passwords exist only inside
//! `create` and `reset_password`; they are never stored or logged.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use canvass_core::error::CanvassResult;
use canvass_core::models::user::{
    CompletedProfile, Gender, NewAccount, PaymentOutcome, ProfileChanges, User,
};
use canvass_core::repository::{PaginatedResult, Pagination, UserRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    email: String,
    password_hash: String,
    agreement_approved: bool,
    completed: bool,
    name: Option<String>,
    phone: Option<String>,
    gender: Option<String>,
    birth_year: Option<i32>,
    country: Option<String>,
    city: Option<String>,
    town: Option<String>,
    information: serde_json::Value,
    campaigns: Vec<String>,
    paid_campaigns: Vec<String>,
    payment_number: Option<String>,
    credit: i64,
    waiting_credit: i64,
    overall_credit: i64,
    invitor: Option<String>,
    password_reset_code: Option<String>,
    password_reset_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    email: String,
    password_hash: String,
    agreement_approved: bool,
    completed: bool,
    name: Option<String>,
    phone: Option<String>,
    gender: Option<String>,
    birth_year: Option<i32>,
    country: Option<String>,
    city: Option<String>,
    town: Option<String>,
    information: serde_json::Value,
    campaigns: Vec<String>,
    paid_campaigns: Vec<String>,
    payment_number: Option<String>,
    credit: i64,
    waiting_credit: i64,
    overall_credit: i64,
    invitor: Option<String>,
    password_reset_code: Option<String>,
    password_reset_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// Lenient read: legacy locale spellings stay readable until their lazy
/// rewrite on first successful authentication.
fn parse_gender(s: &str) -> Result<Gender, DbError> {
    match s {
        "male" | "erkek" => Ok(Gender::Male),
        "female" | "kadın" => Ok(Gender::Female),
        "other" => Ok(Gender::Other),
        "not_specified" => Ok(Gender::NotSpecified),
        other => Err(DbError::Query(format!("unknown gender value: {other}"))),
    }
}

fn parse_uuid_list(values: Vec<String>, field: &'static str) -> Result<Vec<Uuid>, DbError> {
    values
        .into_iter()
        .map(|v| {
            Uuid::parse_str(&v).map_err(|e| DbError::Query(format!("invalid {field} UUID: {e}")))
        })
        .collect()
}

fn parse_opt_uuid(value: Option<String>, field: &'static str) -> Result<Option<Uuid>, DbError> {
    value
        .map(|v| {
            Uuid::parse_str(&v).map_err(|e| DbError::Query(format!("invalid {field} UUID: {e}")))
        })
        .transpose()
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        Ok(User {
            id,
            email: self.email,
            password_hash: self.password_hash,
            agreement_approved: self.agreement_approved,
            completed: self.completed,
            name: self.name,
            phone: self.phone,
            gender: self.gender.as_deref().map(parse_gender).transpose()?,
            birth_year: self.birth_year,
            country: self.country,
            city: self.city,
            town: self.town,
            information: self.information,
            campaigns: parse_uuid_list(self.campaigns, "campaign")?,
            paid_campaigns: parse_uuid_list(self.paid_campaigns, "paid campaign")?,
            payment_number: self.payment_number,
            credit: self.credit,
            waiting_credit: self.waiting_credit,
            overall_credit: self.overall_credit,
            invitor: parse_opt_uuid(self.invitor, "invitor")?,
            password_reset_code: self.password_reset_code,
            password_reset_expires_at: self.password_reset_expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid record UUID: {e}")))?;
        Ok(User {
            id,
            email: self.email,
            password_hash: self.password_hash,
            agreement_approved: self.agreement_approved,
            completed: self.completed,
            name: self.name,
            phone: self.phone,
            gender: self.gender.as_deref().map(parse_gender).transpose()?,
            birth_year: self.birth_year,
            country: self.country,
            city: self.city,
            town: self.town,
            information: self.information,
            campaigns: parse_uuid_list(self.campaigns, "campaign")?,
            paid_campaigns: parse_uuid_list(self.paid_campaigns, "paid campaign")?,
            payment_number: self.payment_number,
            credit: self.credit,
            waiting_credit: self.waiting_credit,
            overall_credit: self.overall_credit,
            invitor: parse_opt_uuid(self.invitor, "invitor")?,
            password_reset_code: self.password_reset_code,
            password_reset_expires_at: self.password_reset_expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Crypto(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Crypto(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// Map a statement-level error, detecting unique-email violations so
/// they surface as duplication rather than a generic database error.
fn map_statement_error(e: surrealdb::Error) -> DbError {
    let msg = e.to_string();
    if msg.contains("idx_user_email") {
        DbError::Duplicate {
            entity: "user".into(),
        }
    } else {
        DbError::Query(msg)
    }
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: NewAccount) -> CanvassResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 email = $email, \
                 password_hash = $password_hash, \
                 agreement_approved = true, \
                 completed = false, \
                 name = NONE, phone = NONE, gender = NONE, \
                 birth_year = NONE, country = NONE, \
                 city = NONE, town = NONE, \
                 information = {}, \
                 campaigns = [], paid_campaigns = [], \
                 payment_number = NONE, \
                 credit = 0, waiting_credit = 0, overall_credit = 0, \
                 invitor = $invitor, \
                 password_reset_code = NONE, \
                 password_reset_expires_at = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("email", input.email))
            .bind(("password_hash", password_hash))
            .bind(("invitor", input.invitor.map(|u| u.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(map_statement_error)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CanvassResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_email(&self, email: &str) -> CanvassResult<User> {
        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM user WHERE email = $email")
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn complete(&self, id: Uuid, profile: CompletedProfile) -> CanvassResult<()> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 name = $name, phone = $phone, gender = $gender, \
                 birth_year = $birth_year, country = $country, \
                 completed = true, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", profile.name))
            .bind(("phone", profile.phone))
            .bind(("gender", profile.gender.as_str().to_string()))
            .bind(("birth_year", profile.birth_year))
            .bind(("country", profile.country))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(map_statement_error)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> CanvassResult<User> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if changes.name.is_some() {
            sets.push("name = $name");
        }
        if changes.phone.is_some() {
            sets.push("phone = $phone");
        }
        if changes.city.is_some() {
            sets.push("city = $city");
        }
        if changes.town.is_some() {
            sets.push("town = $town");
        }
        sets.push("updated_at = time::now()");

        let query = format!("UPDATE type::record('user', $id) SET {}", sets.join(", "));

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = changes.name {
            builder = builder.bind(("name", name));
        }
        if let Some(phone) = changes.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(city) = changes.city {
            builder = builder.bind(("city", city));
        }
        if let Some(town) = changes.town {
            builder = builder.bind(("town", town));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(map_statement_error)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn normalize_legacy_gender(&self, id: Uuid) -> CanvassResult<bool> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 gender = 'male', updated_at = time::now() \
                 WHERE gender = 'erkek';
                 UPDATE type::record('user', $id) SET \
                 gender = 'female', updated_at = time::now() \
                 WHERE gender = 'kadın'",
            )
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        let male_rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let female_rows: Vec<UserRow> = result.take(1).map_err(DbError::from)?;

        Ok(!male_rows.is_empty() || !female_rows.is_empty())
    }

    async fn join_campaign(&self, id: Uuid, campaign_id: Uuid) -> CanvassResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 campaigns = array::union(campaigns, [$campaign_id]), \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("campaign_id", campaign_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn record_campaign_payment(
        &self,
        id: Uuid,
        campaign_id: Uuid,
        amount: i64,
    ) -> CanvassResult<PaymentOutcome> {
        // Read-check-write without a transaction; concurrent payments for
        // the same user are last-write-wins, matching the rest of the
        // single-document operations.
        let user = self.get_by_id(id).await?;

        if user.paid_campaigns.contains(&campaign_id) {
            return Ok(PaymentOutcome {
                already_paid: true,
                first_waiting_credit: false,
                invitor: user.invitor,
            });
        }

        let first_waiting_credit = user.waiting_credit == 0 && user.overall_credit == 0;

        self.db
            .query(
                "UPDATE type::record('user', $id) SET \
                 paid_campaigns = array::union(paid_campaigns, [$campaign_id]), \
                 waiting_credit += $amount, \
                 updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .bind(("campaign_id", campaign_id.to_string()))
            .bind(("amount", amount))
            .await
            .map_err(DbError::from)?;

        Ok(PaymentOutcome {
            already_paid: false,
            first_waiting_credit,
            invitor: user.invitor,
        })
    }

    async fn grant_credit(&self, id: Uuid, amount: i64) -> CanvassResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 credit += $amount, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("amount", amount))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn settle_waiting_credit(&self, id: Uuid, amount: i64) -> CanvassResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 waiting_credit -= $amount, \
                 credit += $amount, \
                 overall_credit += $amount, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("amount", amount))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn set_password_reset(
        &self,
        id: Uuid,
        code: String,
        expires_at: DateTime<Utc>,
    ) -> CanvassResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 password_reset_code = $code, \
                 password_reset_expires_at = $expires_at, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("code", code))
            .bind(("expires_at", expires_at))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn reset_password(&self, id: Uuid, new_password: &str) -> CanvassResult<()> {
        let id_str = id.to_string();
        let password_hash = hash_password(new_password, self.pepper.as_deref())?;

        let mut result = self
            .db
            .query(
                "UPDATE type::record('user', $id) SET \
                 password_hash = $password_hash, \
                 password_reset_code = NONE, \
                 password_reset_expires_at = NONE, \
                 updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("password_hash", password_hash))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> CanvassResult<PaginatedResult<User>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM user GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

/// Verify a password against an Argon2id hash.
///
/// Public for use by the account layer and tests.
pub fn verify_password(password: &str, hash: &str, pepper: Option<&str>) -> Result<bool, DbError> {
    use argon2::PasswordVerifier;

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| DbError::Crypto(format!("invalid hash format: {e}")))?;

    let argon2 = Argon2::default();
    match argon2.verify_password(input, &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(DbError::Crypto(format!("verify error: {e}"))),
    }
}
