//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Single-document operations are
//! read-modify-write sequences with no transaction wrapping; concurrent
//! writers are last-write-wins.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::CanvassResult;
use crate::models::{
    campaign::{Campaign, CreateCampaign, NewSubmission, Submission},
    user::{CompletedProfile, NewAccount, PaymentOutcome, ProfileChanges, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

pub trait UserRepository: Send + Sync {
    /// Create an account. The raw password is hashed here, at the
    /// persistence boundary. A unique-email violation surfaces as
    /// `EmailDuplication`, never as a generic database error.
    fn create(&self, input: NewAccount) -> impl Future<Output = CanvassResult<User>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CanvassResult<User>> + Send;

    /// Lookup by lowercased, trimmed email.
    fn get_by_email(&self, email: &str) -> impl Future<Output = CanvassResult<User>> + Send;

    /// Atomically set all profile fields and flip `completed` to true.
    fn complete(
        &self,
        id: Uuid,
        profile: CompletedProfile,
    ) -> impl Future<Output = CanvassResult<()>> + Send;

    /// Apply a resolved field set; `None` fields keep the stored value.
    fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> impl Future<Output = CanvassResult<User>> + Send;

    /// Rewrite a legacy locale gender value to its canonical spelling.
    /// Returns whether a rewrite actually happened.
    fn normalize_legacy_gender(&self, id: Uuid) -> impl Future<Output = CanvassResult<bool>> + Send;

    /// Idempotent append to the joined-campaigns list.
    fn join_campaign(
        &self,
        id: Uuid,
        campaign_id: Uuid,
    ) -> impl Future<Output = CanvassResult<()>> + Send;

    /// Append to `paid_campaigns` and add to `waiting_credit`. A campaign
    /// already present in `paid_campaigns` is reported back without any
    /// write (double-payment guard).
    fn record_campaign_payment(
        &self,
        id: Uuid,
        campaign_id: Uuid,
        amount: i64,
    ) -> impl Future<Output = CanvassResult<PaymentOutcome>> + Send;

    /// Direct grant to the available balance (referral bonus).
    fn grant_credit(&self, id: Uuid, amount: i64)
    -> impl Future<Output = CanvassResult<()>> + Send;

    /// Move settled amount from waiting to available and bump the
    /// lifetime total.
    fn settle_waiting_credit(
        &self,
        id: Uuid,
        amount: i64,
    ) -> impl Future<Output = CanvassResult<()>> + Send;

    fn set_password_reset(
        &self,
        id: Uuid,
        code: String,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = CanvassResult<()>> + Send;

    /// Re-hash and store a new password, clearing any pending reset code.
    fn reset_password(
        &self,
        id: Uuid,
        new_password: &str,
    ) -> impl Future<Output = CanvassResult<()>> + Send;

    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = CanvassResult<PaginatedResult<User>>> + Send;
}

pub trait CampaignRepository: Send + Sync {
    fn create(&self, input: CreateCampaign)
    -> impl Future<Output = CanvassResult<Campaign>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CanvassResult<Campaign>> + Send;

    fn add_submission(
        &self,
        campaign_id: Uuid,
        submission: NewSubmission,
    ) -> impl Future<Output = CanvassResult<()>> + Send;

    /// All submissions for one campaign version, oldest first.
    fn submissions_for_version(
        &self,
        campaign_id: Uuid,
        version: u32,
    ) -> impl Future<Output = CanvassResult<Vec<Submission>>> + Send;
}
