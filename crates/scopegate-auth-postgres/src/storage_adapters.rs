//! Arc-owning storage adapters.
//!
//! These adapters wrap the lifetime-based storage types and own an
//! `Arc<PgPool>`, allowing them to be used as `Arc<dyn ScopeStorage>` in
//! a `ScopeRepository`.

use std::sync::Arc;

use async_trait::async_trait;

use scopegate_auth::storage::ScopeStorage as ScopeStorageTrait;
use scopegate_auth::{AuthResult, Scope, ScopeFilter};

use crate::PgPool;
use crate::scope::{PostgresScopeStorage, ScopeTables};

// =============================================================================
// Arc-Owning Scope Storage
// =============================================================================

/// Arc-owning PostgreSQL scope storage adapter.
#[derive(Debug, Clone)]
pub struct ArcScopeStorage {
    pool: Arc<PgPool>,
    tables: ScopeTables,
}

impl ArcScopeStorage {
    /// Create a new Arc-owning scope storage.
    #[must_use]
    pub fn new(pool: Arc<PgPool>, tables: ScopeTables) -> Self {
        Self { pool, tables }
    }
}

#[async_trait]
impl ScopeStorageTrait for ArcScopeStorage {
    async fn find_scope(&self, filter: &ScopeFilter) -> AuthResult<Option<Scope>> {
        let storage = PostgresScopeStorage::new(&self.pool, &self.tables);
        storage.find_scope(filter).await
    }

    async fn scope_ids_for_client(&self, client_id: &str) -> AuthResult<Vec<String>> {
        let storage = PostgresScopeStorage::new(&self.pool, &self.tables);
        storage.scope_ids_for_client(client_id).await
    }

    async fn grant_ids(&self, grant_type: &str) -> AuthResult<Vec<String>> {
        let storage = PostgresScopeStorage::new(&self.pool, &self.tables);
        storage.grant_ids(grant_type).await
    }

    async fn scope_ids_for_grants(&self, grant_ids: &[String]) -> AuthResult<Vec<String>> {
        let storage = PostgresScopeStorage::new(&self.pool, &self.tables);
        storage.scope_ids_for_grants(grant_ids).await
    }
}
