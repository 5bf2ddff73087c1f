use anyhow::{Context, Result};
use scopegate_auth::config::loader;
use scopegate_auth::{AuthConfig, ScopeConfig};

use crate::cli::{Cli, LookupArgs};

/// Loads `.env` if present; a missing file is silently ignored.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv()
        && !is_missing_file(&e)
    {
        eprintln!("Warning: Failed to load .env file: {e}");
    }
}

fn is_missing_file(err: &dotenvy::Error) -> bool {
    matches!(err, dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
}

/// Loads configuration from file and environment, then applies global CLI flags.
pub fn load(cli: &Cli) -> Result<AuthConfig> {
    let mut config =
        loader::load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(url) = &cli.database_url {
        config.database.url = Some(url.clone());
    }
    Ok(config)
}

/// Restriction flags on the command line can only switch restrictions on.
pub fn apply_lookup_overrides(mut scopes: ScopeConfig, lookup: &LookupArgs) -> ScopeConfig {
    if lookup.limit_clients_to_scopes {
        scopes.limits.limit_clients_to_scopes = true;
    }
    if lookup.limit_scopes_to_grants {
        scopes.limits.limit_scopes_to_grants = true;
    }
    scopes
}
