//! Database migrations for the scope tables.
//!
//! Migrations are embedded in the binary and create the tables with the
//! default `oauth_` prefix. Deployments using a custom table prefix manage
//! their schema themselves.

use std::borrow::Cow;

use sqlx_core::migrate::{Migration, MigrationType, Migrator};
use tracing::{info, instrument};

use crate::{PgPool, StorageError, StorageResult};

/// Embedded migrations as (version, description, sql), in chronological order.
macro_rules! embedded_migrations {
    () => {
        &[(
            20250601000001i64,
            "scope_tables",
            include_str!("../../migrations/20250601000001_scope_tables.sql"),
        )]
    };
}

/// Builds the migration list from the embedded SQL files.
fn build_migrations() -> Vec<Migration> {
    embedded_migrations!()
        .iter()
        .map(|(version, description, sql)| Migration {
            version: *version,
            description: Cow::Borrowed(description),
            migration_type: MigrationType::Simple,
            sql: Cow::Borrowed(sql),
            checksum: Cow::Borrowed(&[]),
            no_tx: false,
        })
        .collect()
}

/// Applies all pending migrations.
///
/// Applied versions are tracked in `_sqlx_migrations`, so running this on
/// every startup is safe.
///
/// # Errors
///
/// Returns `StorageError::Migration` if a migration fails to execute.
#[instrument(skip(pool))]
pub async fn run(pool: &PgPool) -> StorageResult<()> {
    let migrations = build_migrations();
    info!(count = migrations.len(), "Running scope table migrations");

    let migrator = Migrator {
        migrations: Cow::Owned(migrations),
        ignore_missing: false,
        locking: true,
        no_tx: false,
    };

    migrator
        .run(pool)
        .await
        .map_err(|e| StorageError::migration(format!("Migration failed: {}", e)))?;

    info!("Scope table migrations completed");
    Ok(())
}
