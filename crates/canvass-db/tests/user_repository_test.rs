//! Integration tests for the User repository using in-memory SurrealDB.

use canvass_core::error::CanvassError;
use canvass_core::models::user::{CompletedProfile, Gender, NewAccount, ProfileChanges};
use canvass_core::repository::{Pagination, UserRepository};
use canvass_db::{SurrealUserRepository, verify_password};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    canvass_db::run_migrations(&db).await.unwrap();
    db
}

fn account(email: &str) -> NewAccount {
    NewAccount {
        email: email.into(),
        password: "secret".into(),
        invitor: None,
    }
}

fn profile() -> CompletedProfile {
    CompletedProfile {
        name: "Alice".into(),
        phone: "5551234567".into(),
        gender: Gender::Female,
        birth_year: 1995,
        country: "US".into(),
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(account("alice@example.com")).await.unwrap();

    assert_eq!(user.email, "alice@example.com");
    assert!(user.agreement_approved);
    assert!(!user.completed);
    assert_eq!(user.credit, 0);
    assert_eq!(user.waiting_credit, 0);
    assert_eq!(user.overall_credit, 0);
    assert!(user.campaigns.is_empty());
    assert!(user.gender.is_none());

    // Password should be hashed, not stored in plaintext.
    assert_ne!(user.password_hash, "secret");
    assert!(user.password_hash.starts_with("$argon2id$"));

    // Get by ID should return the same user.
    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.email, "alice@example.com");
}

#[tokio::test]
async fn get_user_by_email() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(account("bob@example.com")).await.unwrap();

    let fetched = repo.get_by_email("bob@example.com").await.unwrap();
    assert_eq!(fetched.id, user.id);
}

#[tokio::test]
async fn missing_user_is_not_found() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let err = repo.get_by_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, CanvassError::NotFound { .. }));

    let err = repo.get_by_email("nobody@example.com").await.unwrap_err();
    assert!(matches!(err, CanvassError::NotFound { .. }));
}

#[tokio::test]
async fn duplicate_email_is_duplication_not_database_error() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(account("same@example.com")).await.unwrap();

    let err = repo.create(account("same@example.com")).await.unwrap_err();
    assert!(
        matches!(err, CanvassError::EmailDuplication),
        "expected EmailDuplication, got {err:?}"
    );
}

#[tokio::test]
async fn password_verification() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(account("carol@example.com")).await.unwrap();

    assert!(verify_password("secret", &user.password_hash, None).unwrap());
    assert!(!verify_password("wrong", &user.password_hash, None).unwrap());
}

#[tokio::test]
async fn password_with_pepper() {
    let db = setup().await;
    let pepper = "server-secret-pepper".to_string();
    let repo = SurrealUserRepository::with_pepper(db, pepper.clone());

    let user = repo.create(account("dave@example.com")).await.unwrap();

    assert!(verify_password("secret", &user.password_hash, Some(&pepper)).unwrap());
    assert!(!verify_password("secret", &user.password_hash, None).unwrap());
}

#[tokio::test]
async fn complete_sets_profile_and_flag() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(account("eve@example.com")).await.unwrap();
    repo.complete(user.id, profile()).await.unwrap();

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert!(fetched.completed);
    assert_eq!(fetched.name.as_deref(), Some("Alice"));
    assert_eq!(fetched.phone.as_deref(), Some("5551234567"));
    assert_eq!(fetched.gender, Some(Gender::Female));
    assert_eq!(fetched.birth_year, Some(1995));
    assert_eq!(fetched.country.as_deref(), Some("US"));
}

#[tokio::test]
async fn complete_missing_user_is_not_found() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let err = repo.complete(Uuid::new_v4(), profile()).await.unwrap_err();
    assert!(matches!(err, CanvassError::NotFound { .. }));
}

#[tokio::test]
async fn update_profile_keeps_unset_fields() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(account("frank@example.com")).await.unwrap();
    repo.complete(user.id, profile()).await.unwrap();

    let updated = repo
        .update_profile(
            user.id,
            ProfileChanges {
                name: Some("Franklin".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name.as_deref(), Some("Franklin"));
    assert_eq!(updated.phone.as_deref(), Some("5551234567")); // unchanged
    assert!(updated.city.is_none());
}

#[tokio::test]
async fn legacy_gender_is_rewritten_once() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db.clone());

    let user = repo.create(account("grace@example.com")).await.unwrap();

    // Seed a legacy stored value directly.
    db.query("UPDATE type::record('user', $id) SET gender = 'erkek'")
        .bind(("id", user.id.to_string()))
        .await
        .unwrap()
        .check()
        .unwrap();

    // Legacy value reads leniently as the canonical variant.
    let before = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(before.gender, Some(Gender::Male));

    // First call rewrites, second is a no-op.
    assert!(repo.normalize_legacy_gender(user.id).await.unwrap());
    assert!(!repo.normalize_legacy_gender(user.id).await.unwrap());

    let after = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(after.gender, Some(Gender::Male));
}

#[tokio::test]
async fn canonical_gender_is_not_rewritten() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(account("heidi@example.com")).await.unwrap();
    repo.complete(user.id, profile()).await.unwrap();

    assert!(!repo.normalize_legacy_gender(user.id).await.unwrap());
}

#[tokio::test]
async fn join_campaign_is_idempotent() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(account("ivan@example.com")).await.unwrap();
    let campaign_id = Uuid::new_v4();

    repo.join_campaign(user.id, campaign_id).await.unwrap();
    repo.join_campaign(user.id, campaign_id).await.unwrap();

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.campaigns, vec![campaign_id]);
}

#[tokio::test]
async fn campaign_payment_guards_against_double_payment() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(account("judy@example.com")).await.unwrap();
    let campaign_id = Uuid::new_v4();

    let outcome = repo
        .record_campaign_payment(user.id, campaign_id, 5)
        .await
        .unwrap();
    assert!(!outcome.already_paid);
    assert!(outcome.first_waiting_credit);

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.waiting_credit, 5);
    assert_eq!(fetched.paid_campaigns, vec![campaign_id]);

    // Second payment for the same campaign is a no-op.
    let outcome = repo
        .record_campaign_payment(user.id, campaign_id, 5)
        .await
        .unwrap();
    assert!(outcome.already_paid);

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.waiting_credit, 5);

    // A different campaign pays out but is no longer the first event.
    let outcome = repo
        .record_campaign_payment(user.id, Uuid::new_v4(), 3)
        .await
        .unwrap();
    assert!(!outcome.already_paid);
    assert!(!outcome.first_waiting_credit);
}

#[tokio::test]
async fn settle_moves_waiting_to_available() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(account("mallory@example.com")).await.unwrap();
    repo.record_campaign_payment(user.id, Uuid::new_v4(), 10)
        .await
        .unwrap();

    repo.settle_waiting_credit(user.id, 10).await.unwrap();

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.waiting_credit, 0);
    assert_eq!(fetched.credit, 10);
    assert_eq!(fetched.overall_credit, 10);
}

#[tokio::test]
async fn grant_credit_adds_to_available_balance() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(account("niaj@example.com")).await.unwrap();
    repo.grant_credit(user.id, 2).await.unwrap();

    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.credit, 2);
    // Waiting and lifetime totals are untouched by a direct grant.
    assert_eq!(fetched.waiting_credit, 0);
    assert_eq!(fetched.overall_credit, 0);
}

#[tokio::test]
async fn password_reset_clears_pending_code() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(account("olivia@example.com")).await.unwrap();
    let expires = chrono::Utc::now() + chrono::Duration::hours(1);

    repo.set_password_reset(user.id, "reset-code".into(), expires)
        .await
        .unwrap();

    let pending = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(pending.password_reset_code.as_deref(), Some("reset-code"));
    assert!(pending.password_reset_expires_at.is_some());

    repo.reset_password(user.id, "new-password").await.unwrap();

    let reset = repo.get_by_id(user.id).await.unwrap();
    assert!(reset.password_reset_code.is_none());
    assert!(reset.password_reset_expires_at.is_none());
    assert!(verify_password("new-password", &reset.password_hash, None).unwrap());
    assert!(!verify_password("secret", &reset.password_hash, None).unwrap());
}

#[tokio::test]
async fn list_users_with_pagination() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    for i in 0..5 {
        repo.create(account(&format!("user-{i}@example.com")))
            .await
            .unwrap();
    }

    let page1 = repo
        .list(Pagination {
            offset: 0,
            limit: 3,
        })
        .await
        .unwrap();

    assert_eq!(page1.items.len(), 3);
    assert_eq!(page1.total, 5);

    let page2 = repo
        .list(Pagination {
            offset: 3,
            limit: 3,
        })
        .await
        .unwrap();

    assert_eq!(page2.items.len(), 2);
}
