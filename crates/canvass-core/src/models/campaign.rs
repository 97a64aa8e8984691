//! Campaign and submission domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub title: String,
    pub active: bool,
    /// Credit awarded for a paid submission.
    pub reward_credit: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCampaign {
    pub title: String,
    pub reward_credit: i64,
}

/// One user's versioned set of answers to a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub campaign_id: Uuid,
    pub user_id: Uuid,
    pub version: u32,
    /// Answers keyed by question identifier.
    pub answers: serde_json::Value,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSubmission {
    pub user_id: Uuid,
    pub version: u32,
    pub answers: serde_json::Value,
}
