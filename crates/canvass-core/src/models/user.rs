//! User account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    NotSpecified,
}

impl Gender {
    /// Parse a canonical gender value. Legacy locale spellings are not
    /// accepted here; they exist only in storage and are handled by the
    /// persistence layer.
    pub fn parse(s: &str) -> Option<Gender> {
        match s {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            "not_specified" => Some(Gender::NotSpecified),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::NotSpecified => "not_specified",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Argon2id PHC-format hash; the plaintext never reaches storage.
    pub password_hash: String,
    pub agreement_approved: bool,
    /// One-way flag: profile completion happens exactly once.
    pub completed: bool,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub birth_year: Option<i32>,
    /// Canonical alpha-2 country code.
    pub country: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    /// Open-ended survey answers keyed by question identifier.
    pub information: serde_json::Value,
    pub campaigns: Vec<Uuid>,
    /// Campaigns already paid for; guards against double payment.
    pub paid_campaigns: Vec<Uuid>,
    pub payment_number: Option<String>,
    pub credit: i64,
    pub waiting_credit: i64,
    pub overall_credit: i64,
    pub invitor: Option<Uuid>,
    pub password_reset_code: Option<String>,
    pub password_reset_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Strip secret and internal bookkeeping fields for client exposure.
    ///
    /// This is the only way a user document may cross the HTTP boundary.
    pub fn into_public(self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email,
            agreement_approved: self.agreement_approved,
            completed: self.completed,
            name: self.name,
            phone: self.phone,
            gender: self.gender,
            birth_year: self.birth_year,
            country: self.country,
            city: self.city,
            town: self.town,
            information: self.information,
            campaigns: self.campaigns,
            payment_number: self.payment_number,
            credit: self.credit,
            waiting_credit: self.waiting_credit,
            overall_credit: self.overall_credit,
            created_at: self.created_at,
        }
    }
}

/// Sanitized user view: no password hash, no reset codes, no referral or
/// payment bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub agreement_approved: bool,
    pub completed: bool,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<Gender>,
    pub birth_year: Option<i32>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub information: serde_json::Value,
    pub campaigns: Vec<Uuid>,
    pub payment_number: Option<String>,
    pub credit: i64,
    pub waiting_credit: i64,
    pub overall_credit: i64,
    pub created_at: DateTime<Utc>,
}

/// Raw registration input as received from a client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccount {
    pub email: String,
    /// Raw password (hashed with Argon2id at the persistence boundary).
    pub password: String,
    /// Referral code; discarded when not a well-formed identifier.
    pub invitor_code: Option<String>,
}

/// Validated registration input handed to the repository.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub invitor: Option<Uuid>,
}

/// Raw one-time profile completion input.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteProfile {
    pub name: String,
    pub phone: String,
    pub gender: String,
    pub birth_year: i32,
    pub country: String,
}

/// Validated completion payload handed to the repository.
#[derive(Debug, Clone)]
pub struct CompletedProfile {
    pub name: String,
    pub phone: String,
    pub gender: Gender,
    pub birth_year: i32,
    pub country: String,
}

/// Repeatable profile update input. All fields optional; invalid or
/// absent name/phone fall back to the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
}

/// Resolved field set applied by the repository: `Some` = write,
/// `None` = keep stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
}

/// Result of recording a campaign payment.
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    /// The payment was skipped because the campaign was already paid.
    pub already_paid: bool,
    /// This was the user's first waiting-credit event.
    pub first_waiting_credit: bool,
    pub invitor: Option<Uuid>,
}
