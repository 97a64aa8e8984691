//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enumerated fields are stored as strings
//! with ASSERT constraints. The `user.email` column carries a UNIQUE
//! index; violations surface to callers as an email-duplication error.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD agreement_approved ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD completed ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD name ON TABLE user TYPE option<string>;
DEFINE FIELD phone ON TABLE user TYPE option<string>;
-- Legacy locale spellings remain readable until their lazy rewrite.
DEFINE FIELD gender ON TABLE user TYPE option<string> \
    ASSERT $value = NONE OR $value IN ['male', 'female', 'other', \
    'not_specified', 'erkek', 'kadın'];
DEFINE FIELD birth_year ON TABLE user TYPE option<int>;
DEFINE FIELD country ON TABLE user TYPE option<string>;
DEFINE FIELD city ON TABLE user TYPE option<string>;
DEFINE FIELD town ON TABLE user TYPE option<string>;
DEFINE FIELD information ON TABLE user TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD campaigns ON TABLE user TYPE array DEFAULT [];
DEFINE FIELD campaigns.* ON TABLE user TYPE string;
DEFINE FIELD paid_campaigns ON TABLE user TYPE array DEFAULT [];
DEFINE FIELD paid_campaigns.* ON TABLE user TYPE string;
DEFINE FIELD payment_number ON TABLE user TYPE option<string>;
DEFINE FIELD credit ON TABLE user TYPE int DEFAULT 0;
DEFINE FIELD waiting_credit ON TABLE user TYPE int DEFAULT 0;
DEFINE FIELD overall_credit ON TABLE user TYPE int DEFAULT 0;
DEFINE FIELD invitor ON TABLE user TYPE option<string>;
DEFINE FIELD password_reset_code ON TABLE user TYPE option<string>;
DEFINE FIELD password_reset_expires_at ON TABLE user \
    TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Campaigns
-- =======================================================================
DEFINE TABLE campaign SCHEMAFULL;
DEFINE FIELD title ON TABLE campaign TYPE string;
DEFINE FIELD active ON TABLE campaign TYPE bool DEFAULT true;
DEFINE FIELD reward_credit ON TABLE campaign TYPE int DEFAULT 0;
DEFINE FIELD created_at ON TABLE campaign TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Submissions (one row per user per campaign version)
-- =======================================================================
DEFINE TABLE submission SCHEMAFULL;
DEFINE FIELD campaign_id ON TABLE submission TYPE string;
DEFINE FIELD user_id ON TABLE submission TYPE string;
DEFINE FIELD version ON TABLE submission TYPE int;
DEFINE FIELD answers ON TABLE submission TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD submitted_at ON TABLE submission TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_submission_campaign_version ON TABLE submission \
    COLUMNS campaign_id, version;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn user_email_index_is_unique() {
        assert!(SCHEMA_V1.contains("DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE"));
    }
}
