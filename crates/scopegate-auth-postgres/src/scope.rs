//! OAuth scope storage.
//!
//! Read-only queries over the scope tables:
//!
//! - `{prefix}scopes` (id, description)
//! - `{prefix}client_scopes` (client_id, scope_id)
//! - `{prefix}grants` (id)
//! - `{prefix}grant_scopes` (grant_id, scope_id)
//!
//! This module provides two layers:
//! - [`ScopeStorage`] - Low-level queries returning [`ScopeRow`]
//! - [`PostgresScopeStorage`] - Implements the `ScopeStorage` trait from `scopegate-auth`

use async_trait::async_trait;
use sqlx_core::query_as::query_as;
use sqlx_core::query_scalar::query_scalar;
use sqlx_postgres::Postgres;
use tracing::instrument;

use scopegate_auth::storage::ScopeStorage as ScopeStorageTrait;
use scopegate_auth::{AuthError, AuthResult, Scope, ScopeFilter};

use crate::{PgPool, StorageError, StorageResult};

// =============================================================================
// Types
// =============================================================================

/// Scope record from database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRow {
    /// Scope identifier (primary key)
    pub id: String,
    /// Human-readable description
    pub description: String,
}

impl ScopeRow {
    /// Create from database tuple.
    fn from_tuple(row: (String, String)) -> Self {
        Self {
            id: row.0,
            description: row.1,
        }
    }
}

impl From<ScopeRow> for Scope {
    fn from(row: ScopeRow) -> Self {
        Scope::new(row.id, row.description)
    }
}

/// Names of the scope tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeTables {
    scopes: String,
    grants: String,
    client_scopes: String,
    grant_scopes: String,
}

impl ScopeTables {
    /// Default table prefix, matching the embedded migrations.
    pub const DEFAULT_PREFIX: &'static str = "oauth_";

    /// Table names for the given prefix.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidInput` if the prefix contains anything
    /// other than ASCII alphanumerics and `_`.
    pub fn with_prefix(prefix: &str) -> StorageResult<Self> {
        if !prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(StorageError::invalid_input(format!(
                "Invalid table prefix '{}'",
                prefix
            )));
        }
        Ok(Self {
            scopes: format!("{prefix}scopes"),
            grants: format!("{prefix}grants"),
            client_scopes: format!("{prefix}client_scopes"),
            grant_scopes: format!("{prefix}grant_scopes"),
        })
    }

    /// Name of the scopes table.
    #[must_use]
    pub fn scopes(&self) -> &str {
        &self.scopes
    }

    /// Name of the grants table.
    #[must_use]
    pub fn grants(&self) -> &str {
        &self.grants
    }

    /// Name of the client to scope link table.
    #[must_use]
    pub fn client_scopes(&self) -> &str {
        &self.client_scopes
    }

    /// Name of the grant to scope link table.
    #[must_use]
    pub fn grant_scopes(&self) -> &str {
        &self.grant_scopes
    }

    /// `SELECT` for a single scope by id with `restrictions` additional
    /// `id = ANY($n)` predicates.
    fn find_scope_sql(&self, restrictions: usize) -> String {
        let mut sql = format!(
            "SELECT id, description FROM {} WHERE id = $1",
            self.scopes
        );
        for n in 0..restrictions {
            sql.push_str(&format!(" AND id = ANY(${})", n + 2));
        }
        sql.push_str(" LIMIT 1");
        sql
    }
}

impl Default for ScopeTables {
    fn default() -> Self {
        Self {
            scopes: "oauth_scopes".to_string(),
            grants: "oauth_grants".to_string(),
            client_scopes: "oauth_client_scopes".to_string(),
            grant_scopes: "oauth_grant_scopes".to_string(),
        }
    }
}

// =============================================================================
// Scope Storage
// =============================================================================

/// Scope storage operations.
///
/// Provides the queries behind scope lookups in PostgreSQL.
pub struct ScopeStorage<'a> {
    pool: &'a PgPool,
    tables: &'a ScopeTables,
}

impl<'a> ScopeStorage<'a> {
    /// Create a new scope storage with a connection pool reference.
    #[must_use]
    pub fn new(pool: &'a PgPool, tables: &'a ScopeTables) -> Self {
        Self { pool, tables }
    }

    /// Find a scope by id, restricted to ids present in every list of
    /// `restrictions`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(
        &self,
        id: &str,
        restrictions: &[Vec<String>],
    ) -> StorageResult<Option<ScopeRow>> {
        let sql = self.tables.find_scope_sql(restrictions.len());
        let mut q = query_as::<Postgres, (String, String)>(&sql).bind(id);
        for allowed in restrictions {
            q = q.bind(allowed.as_slice());
        }
        let row = q.fetch_optional(self.pool).await?;

        Ok(row.map(ScopeRow::from_tuple))
    }

    /// Ids of the scopes linked to a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn client_scope_ids(&self, client_id: &str) -> StorageResult<Vec<String>> {
        let sql = format!(
            "SELECT scope_id FROM {} WHERE client_id = $1 ORDER BY scope_id",
            self.tables.client_scopes
        );
        let ids: Vec<String> = query_scalar(&sql)
            .bind(client_id)
            .fetch_all(self.pool)
            .await?;

        Ok(ids)
    }

    /// Ids of the grants matching a grant type.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn grant_ids(&self, grant_type: &str) -> StorageResult<Vec<String>> {
        let sql = format!("SELECT id FROM {} WHERE id = $1", self.tables.grants);
        let ids: Vec<String> = query_scalar(&sql)
            .bind(grant_type)
            .fetch_all(self.pool)
            .await?;

        Ok(ids)
    }

    /// Ids of the scopes linked to any of the given grants.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn grant_scope_ids(&self, grant_ids: &[String]) -> StorageResult<Vec<String>> {
        let sql = format!(
            "SELECT DISTINCT scope_id FROM {} WHERE grant_id = ANY($1) ORDER BY scope_id",
            self.tables.grant_scopes
        );
        let ids: Vec<String> = query_scalar(&sql)
            .bind(grant_ids)
            .fetch_all(self.pool)
            .await?;

        Ok(ids)
    }

    /// List scopes ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, limit: i64, offset: i64) -> StorageResult<Vec<ScopeRow>> {
        let sql = format!(
            "SELECT id, description FROM {} ORDER BY id LIMIT $1 OFFSET $2",
            self.tables.scopes
        );
        let rows: Vec<(String, String)> = query_as(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(ScopeRow::from_tuple).collect())
    }

    /// Count all scopes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(&self) -> StorageResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.tables.scopes);
        let count: i64 = query_scalar(&sql).fetch_one(self.pool).await?;

        Ok(count)
    }
}

// =============================================================================
// PostgreSQL Scope Storage Trait Implementation
// =============================================================================

/// PostgreSQL implementation of the `ScopeStorage` trait from `scopegate-auth`.
///
/// # Example
///
/// ```ignore
/// use scopegate_auth_postgres::{PostgresScopeStorage, ScopeTables};
/// use scopegate_auth::storage::ScopeStorage;
///
/// let tables = ScopeTables::default();
/// let storage = PostgresScopeStorage::new(&pool, &tables);
/// let ids = storage.scope_ids_for_client("my-app").await?;
/// ```
pub struct PostgresScopeStorage<'a> {
    pool: &'a PgPool,
    tables: &'a ScopeTables,
}

impl<'a> PostgresScopeStorage<'a> {
    /// Create a new PostgreSQL scope storage.
    #[must_use]
    pub fn new(pool: &'a PgPool, tables: &'a ScopeTables) -> Self {
        Self { pool, tables }
    }

    /// Get the low-level storage operations.
    fn storage(&self) -> ScopeStorage<'_> {
        ScopeStorage::new(self.pool, self.tables)
    }

    /// Convert storage error to auth error.
    fn map_storage_error(err: StorageError) -> AuthError {
        AuthError::storage(err.to_string())
    }
}

#[async_trait]
impl ScopeStorageTrait for PostgresScopeStorage<'_> {
    #[instrument(skip(self), level = "debug")]
    async fn find_scope(&self, filter: &ScopeFilter) -> AuthResult<Option<Scope>> {
        let row = self
            .storage()
            .find(filter.id(), filter.restrictions())
            .await
            .map_err(Self::map_storage_error)?;

        Ok(row.map(Scope::from))
    }

    #[instrument(skip(self), level = "debug")]
    async fn scope_ids_for_client(&self, client_id: &str) -> AuthResult<Vec<String>> {
        self.storage()
            .client_scope_ids(client_id)
            .await
            .map_err(Self::map_storage_error)
    }

    #[instrument(skip(self), level = "debug")]
    async fn grant_ids(&self, grant_type: &str) -> AuthResult<Vec<String>> {
        self.storage()
            .grant_ids(grant_type)
            .await
            .map_err(Self::map_storage_error)
    }

    #[instrument(skip(self), level = "debug")]
    async fn scope_ids_for_grants(&self, grant_ids: &[String]) -> AuthResult<Vec<String>> {
        self.storage()
            .grant_scope_ids(grant_ids)
            .await
            .map_err(Self::map_storage_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let tables = ScopeTables::default();
        assert_eq!(tables.scopes(), "oauth_scopes");
        assert_eq!(tables.grants(), "oauth_grants");
        assert_eq!(tables.client_scopes(), "oauth_client_scopes");
        assert_eq!(tables.grant_scopes(), "oauth_grant_scopes");
        assert_eq!(
            ScopeTables::with_prefix(ScopeTables::DEFAULT_PREFIX).unwrap(),
            tables
        );
    }

    #[test]
    fn test_custom_prefix() {
        let tables = ScopeTables::with_prefix("auth_").unwrap();
        assert_eq!(tables.scopes(), "auth_scopes");
        assert_eq!(tables.grant_scopes(), "auth_grant_scopes");

        let tables = ScopeTables::with_prefix("").unwrap();
        assert_eq!(tables.client_scopes(), "client_scopes");
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        let err = ScopeTables::with_prefix("x; DROP TABLE oauth_scopes; --").unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_find_scope_sql_without_restrictions() {
        let sql = ScopeTables::default().find_scope_sql(0);
        assert_eq!(
            sql,
            "SELECT id, description FROM oauth_scopes WHERE id = $1 LIMIT 1"
        );
    }

    #[test]
    fn test_find_scope_sql_binds_each_restriction() {
        let sql = ScopeTables::default().find_scope_sql(2);
        assert_eq!(
            sql,
            "SELECT id, description FROM oauth_scopes WHERE id = $1 AND id = ANY($2) AND id = ANY($3) LIMIT 1"
        );
    }

    #[test]
    fn test_row_into_scope() {
        let row = ScopeRow {
            id: "read".to_string(),
            description: "Read access".to_string(),
        };
        assert_eq!(Scope::from(row), Scope::new("read", "Read access"));
    }
}
