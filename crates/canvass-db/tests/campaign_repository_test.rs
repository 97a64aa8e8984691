//! Integration tests for the Campaign repository using in-memory
//! SurrealDB.

use canvass_core::error::CanvassError;
use canvass_core::models::campaign::{CreateCampaign, NewSubmission};
use canvass_core::repository::CampaignRepository;
use canvass_db::SurrealCampaignRepository;
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    canvass_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn create_and_get_campaign() {
    let db = setup().await;
    let repo = SurrealCampaignRepository::new(db);

    let campaign = repo
        .create(CreateCampaign {
            title: "Snack habits".into(),
            reward_credit: 5,
        })
        .await
        .unwrap();

    assert_eq!(campaign.title, "Snack habits");
    assert!(campaign.active);
    assert_eq!(campaign.reward_credit, 5);

    let fetched = repo.get_by_id(campaign.id).await.unwrap();
    assert_eq!(fetched.id, campaign.id);
}

#[tokio::test]
async fn missing_campaign_is_not_found() {
    let db = setup().await;
    let repo = SurrealCampaignRepository::new(db);

    let err = repo.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CanvassError::NotFound { .. }));
}

#[tokio::test]
async fn submissions_are_filtered_by_version() {
    let db = setup().await;
    let repo = SurrealCampaignRepository::new(db);

    let campaign = repo
        .create(CreateCampaign {
            title: "Commute survey".into(),
            reward_credit: 3,
        })
        .await
        .unwrap();

    let first_user = Uuid::new_v4();
    let second_user = Uuid::new_v4();

    repo.add_submission(
        campaign.id,
        NewSubmission {
            user_id: first_user,
            version: 1,
            answers: json!({"q1": "bike"}),
        },
    )
    .await
    .unwrap();
    repo.add_submission(
        campaign.id,
        NewSubmission {
            user_id: second_user,
            version: 1,
            answers: json!({"q1": "bus"}),
        },
    )
    .await
    .unwrap();
    repo.add_submission(
        campaign.id,
        NewSubmission {
            user_id: first_user,
            version: 2,
            answers: json!({"q1": "train"}),
        },
    )
    .await
    .unwrap();

    let v1 = repo
        .submissions_for_version(campaign.id, 1)
        .await
        .unwrap();
    assert_eq!(v1.len(), 2);
    assert!(v1.iter().all(|s| s.version == 1));

    let v2 = repo
        .submissions_for_version(campaign.id, 2)
        .await
        .unwrap();
    assert_eq!(v2.len(), 1);
    assert_eq!(v2[0].user_id, first_user);
    assert_eq!(v2[0].answers, json!({"q1": "train"}));

    // Unknown version yields an empty report, not an error.
    let v3 = repo
        .submissions_for_version(campaign.id, 3)
        .await
        .unwrap();
    assert!(v3.is_empty());
}
