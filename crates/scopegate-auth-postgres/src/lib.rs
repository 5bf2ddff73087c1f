//! PostgreSQL storage backend for scopegate
//!
//! Provides persistent, read-only access to:
//!
//! - OAuth scopes (`oauth_scopes`)
//! - Client to scope links (`oauth_client_scopes`)
//! - Grants and grant to scope links (`oauth_grants`, `oauth_grant_scopes`)
//!
//! Tables are created by the embedded [`migrations`]. The `oauth_` prefix
//! can be changed for existing schemas via [`ScopeTables::with_prefix`].
//!
//! # Example
//!
//! ```ignore
//! use scopegate_auth::{ScopeLimits, ScopeRepository};
//! use scopegate_auth_postgres::PostgresAuthStorage;
//!
//! let storage = PostgresAuthStorage::connect("postgres://localhost/scopegate").await?;
//! let repository = ScopeRepository::new(
//!     std::sync::Arc::new(storage.scope_storage()),
//!     ScopeLimits::default(),
//! );
//! let scope = repository.get("read", None, None).await?;
//! ```

pub mod migrations;
pub mod scope;
pub mod storage_adapters;

use std::sync::Arc;

use sqlx_core::pool::{Pool, PoolOptions};
use sqlx_postgres::Postgres;
use tracing::info;

use scopegate_auth::DatabaseConfig;

/// PostgreSQL connection pool type alias.
pub type PgPool = Pool<Postgres>;

pub use scope::{PostgresScopeStorage, ScopeRow, ScopeStorage, ScopeTables};
pub use storage_adapters::ArcScopeStorage;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during scope storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx_core::Error),

    /// Applying migrations failed.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Invalid input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl StorageError {
    // -------------------------------------------------------------------------
    // Constructor Methods
    // -------------------------------------------------------------------------

    /// Create a `Migration` error.
    #[must_use]
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    /// Create an `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    // -------------------------------------------------------------------------
    // Predicate Methods
    // -------------------------------------------------------------------------

    /// Returns `true` if this is a database error.
    #[must_use]
    pub fn is_database_error(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// Returns `true` if this is a migration error.
    #[must_use]
    pub fn is_migration_error(&self) -> bool {
        matches!(self, Self::Migration(_))
    }

    /// Returns `true` if this is an invalid input error.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Returns `true` if this is a client error (4xx equivalent).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Returns `true` if this is a server error (5xx equivalent).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Migration(_))
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// PostgreSQL Auth Storage
// =============================================================================

/// PostgreSQL storage backend for scope data.
///
/// Holds a connection pool and the scope table names, and hands out
/// storage types over them.
#[derive(Debug, Clone)]
pub struct PostgresAuthStorage {
    pool: Arc<PgPool>,
    tables: ScopeTables,
}

impl PostgresAuthStorage {
    /// Create new storage with an existing connection pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            tables: ScopeTables::default(),
        }
    }

    /// Use a custom table prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is not a valid identifier fragment.
    pub fn with_table_prefix(mut self, prefix: &str) -> StorageResult<Self> {
        self.tables = ScopeTables::with_prefix(prefix)?;
        Ok(self)
    }

    /// Create new storage by connecting to the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails.
    pub async fn connect(database_url: &str) -> StorageResult<Self> {
        let pool = PoolOptions::<Postgres>::new().connect(database_url).await?;
        Ok(Self::new(Arc::new(pool)))
    }

    /// Create new storage from database configuration, applying migrations
    /// when `run_migrations` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is missing, the connection fails, or a
    /// migration fails.
    pub async fn from_config(config: &DatabaseConfig) -> StorageResult<Self> {
        let url = config
            .require_url()
            .map_err(|e| StorageError::invalid_input(e.to_string()))?;

        let pool = PoolOptions::<Postgres>::new()
            .max_connections(config.max_connections)
            .connect(url)
            .await?;
        info!(
            max_connections = config.max_connections,
            "Connected to scope database"
        );

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        Ok(Self::new(Arc::new(pool)))
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get a reference to the Arc-wrapped pool.
    #[must_use]
    pub fn pool_arc(&self) -> Arc<PgPool> {
        Arc::clone(&self.pool)
    }

    /// Get the scope table names.
    #[must_use]
    pub fn tables(&self) -> &ScopeTables {
        &self.tables
    }

    // -------------------------------------------------------------------------
    // Storage Accessors
    // -------------------------------------------------------------------------

    /// Get low-level scope storage operations.
    #[must_use]
    pub fn scopes(&self) -> ScopeStorage<'_> {
        ScopeStorage::new(&self.pool, &self.tables)
    }

    /// Get an Arc-owning scope storage for use as `Arc<dyn ScopeStorage>`.
    #[must_use]
    pub fn scope_storage(&self) -> ArcScopeStorage {
        ArcScopeStorage::new(self.pool_arc(), self.tables.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================
