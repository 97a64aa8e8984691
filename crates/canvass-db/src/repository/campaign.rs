//! SurrealDB implementation of [`CampaignRepository`].
//!
//! Submissions live in their own table keyed by campaign id so the
//! report queries can use the (campaign_id, version) index.

use canvass_core::error::CanvassResult;
use canvass_core::models::campaign::{Campaign, CreateCampaign, NewSubmission, Submission};
use canvass_core::repository::CampaignRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CampaignRow {
    title: String,
    active: bool,
    reward_credit: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct SubmissionRow {
    campaign_id: String,
    user_id: String,
    version: u32,
    answers: serde_json::Value,
    submitted_at: DateTime<Utc>,
}

impl CampaignRow {
    fn into_campaign(self, id: Uuid) -> Campaign {
        Campaign {
            id,
            title: self.title,
            active: self.active,
            reward_credit: self.reward_credit,
            created_at: self.created_at,
        }
    }
}

impl SubmissionRow {
    fn try_into_submission(self) -> Result<Submission, DbError> {
        let campaign_id = Uuid::parse_str(&self.campaign_id)
            .map_err(|e| DbError::Query(format!("invalid campaign UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Query(format!("invalid user UUID: {e}")))?;
        Ok(Submission {
            campaign_id,
            user_id,
            version: self.version,
            answers: self.answers,
            submitted_at: self.submitted_at,
        })
    }
}

/// SurrealDB implementation of the Campaign repository.
#[derive(Clone)]
pub struct SurrealCampaignRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCampaignRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CampaignRepository for SurrealCampaignRepository<C> {
    async fn create(&self, input: CreateCampaign) -> CanvassResult<Campaign> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('campaign', $id) SET \
                 title = $title, active = true, \
                 reward_credit = $reward_credit",
            )
            .bind(("id", id_str.clone()))
            .bind(("title", input.title))
            .bind(("reward_credit", input.reward_credit))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<CampaignRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "campaign".into(),
            id: id_str,
        })?;

        Ok(row.into_campaign(id))
    }

    async fn get_by_id(&self, id: Uuid) -> CanvassResult<Campaign> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('campaign', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CampaignRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "campaign".into(),
            id: id_str,
        })?;

        Ok(row.into_campaign(id))
    }

    async fn add_submission(
        &self,
        campaign_id: Uuid,
        submission: NewSubmission,
    ) -> CanvassResult<()> {
        self.db
            .query(
                "CREATE submission SET \
                 campaign_id = $campaign_id, \
                 user_id = $user_id, \
                 version = $version, \
                 answers = $answers",
            )
            .bind(("campaign_id", campaign_id.to_string()))
            .bind(("user_id", submission.user_id.to_string()))
            .bind(("version", submission.version))
            .bind(("answers", submission.answers))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn submissions_for_version(
        &self,
        campaign_id: Uuid,
        version: u32,
    ) -> CanvassResult<Vec<Submission>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM submission \
                 WHERE campaign_id = $campaign_id AND version = $version \
                 ORDER BY submitted_at ASC",
            )
            .bind(("campaign_id", campaign_id.to_string()))
            .bind(("version", version))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SubmissionRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_submission())
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
