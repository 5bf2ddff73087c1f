use anyhow::{Context, Result};
use scopegate_auth::AuthConfig;
use scopegate_auth_postgres::{PostgresAuthStorage, migrations};

use crate::output::print_success;

pub async fn migrate(config: &AuthConfig) -> Result<()> {
    let storage = PostgresAuthStorage::from_config(&config.database)
        .await
        .context("Failed to connect to database")?;
    migrations::run(storage.pool())
        .await
        .context("Failed to apply migrations")?;
    print_success("Scope tables are up to date");
    Ok(())
}
