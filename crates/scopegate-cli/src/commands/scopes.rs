use std::sync::Arc;

use anyhow::{Context, Result};
use scopegate_auth::{AuthConfig, Scope, ScopeRepository};
use scopegate_auth_postgres::PostgresAuthStorage;

use crate::cli::{GetArgs, ListArgs, LookupArgs, OutputFormat, ResolveArgs};
use crate::config::apply_lookup_overrides;
use crate::output::{print_scope, print_scope_page, print_scopes};

async fn connect(config: &AuthConfig) -> Result<PostgresAuthStorage> {
    let storage = PostgresAuthStorage::from_config(&config.database)
        .await
        .context("Failed to connect to database")?;
    storage
        .with_table_prefix(&config.scopes.table_prefix)
        .context("Invalid table prefix")
}

async fn repository(config: &AuthConfig, lookup: &LookupArgs) -> Result<ScopeRepository> {
    let storage = connect(config).await?;
    let scopes = apply_lookup_overrides(config.scopes.clone(), lookup);
    let repo = ScopeRepository::from_config(Arc::new(storage.scope_storage()), scopes)
        .context("Invalid scope configuration")?;
    Ok(repo)
}

pub async fn get(config: &AuthConfig, args: &GetArgs, format: OutputFormat) -> Result<()> {
    let repo = repository(config, &args.lookup).await?;
    let scope = repo
        .get(
            &args.scope,
            args.lookup.grant_type.as_deref(),
            args.lookup.client_id.as_deref(),
        )
        .await?
        .with_context(|| format!("Scope \"{}\" not found", args.scope))?;
    print_scope(&scope, format)
}

pub async fn resolve(config: &AuthConfig, args: &ResolveArgs, format: OutputFormat) -> Result<()> {
    let repo = repository(config, &args.lookup).await?;
    let scopes = repo
        .resolve_scopes(
            args.scope.as_deref(),
            args.lookup.grant_type.as_deref(),
            args.lookup.client_id.as_deref(),
        )
        .await?;
    print_scopes(&scopes, format)
}

pub async fn list(config: &AuthConfig, args: &ListArgs, format: OutputFormat) -> Result<()> {
    let storage = connect(config).await?;
    let rows = storage.scopes().list(args.limit, args.offset).await?;
    let total = storage.scopes().count().await?;
    let scopes: Vec<Scope> = rows.into_iter().map(Scope::from).collect();
    print_scope_page(&scopes, total, args.offset, format)
}
