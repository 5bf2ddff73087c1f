//! In-memory scope storage.
//!
//! Concurrent maps keyed by scope, client and grant id. Intended for tests
//! and for embedding the repository without a database.

use std::collections::BTreeSet;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};

use crate::AuthResult;
use crate::storage::ScopeStorage;
use crate::types::{Scope, ScopeFilter};

/// In-memory [`ScopeStorage`] backed by `dashmap`.
///
/// Link lookups return ids in ascending order.
#[derive(Debug, Default)]
pub struct InMemoryScopeStorage {
    scopes: DashMap<String, Scope>,
    grants: DashSet<String>,
    client_scopes: DashMap<String, BTreeSet<String>>,
    grant_scopes: DashMap<String, BTreeSet<String>>,
}

impl InMemoryScopeStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a scope.
    pub fn insert_scope(&self, scope: Scope) {
        self.scopes.insert(scope.id.clone(), scope);
    }

    /// Registers a grant type.
    pub fn insert_grant(&self, grant_id: impl Into<String>) {
        self.grants.insert(grant_id.into());
    }

    /// Links a scope to a client.
    pub fn link_client(&self, client_id: impl Into<String>, scope_id: impl Into<String>) {
        self.client_scopes
            .entry(client_id.into())
            .or_default()
            .insert(scope_id.into());
    }

    /// Links a scope to a grant, registering the grant if needed.
    pub fn link_grant(&self, grant_id: impl Into<String>, scope_id: impl Into<String>) {
        let grant_id = grant_id.into();
        self.grants.insert(grant_id.clone());
        self.grant_scopes
            .entry(grant_id)
            .or_default()
            .insert(scope_id.into());
    }

    /// Number of stored scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Returns `true` if no scopes are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

#[async_trait]
impl ScopeStorage for InMemoryScopeStorage {
    async fn find_scope(&self, filter: &ScopeFilter) -> AuthResult<Option<Scope>> {
        Ok(self
            .scopes
            .get(filter.id())
            .filter(|scope| filter.matches(&scope.id))
            .map(|scope| scope.value().clone()))
    }

    async fn scope_ids_for_client(&self, client_id: &str) -> AuthResult<Vec<String>> {
        Ok(self
            .client_scopes
            .get(client_id)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn grant_ids(&self, grant_type: &str) -> AuthResult<Vec<String>> {
        if self.grants.contains(grant_type) {
            Ok(vec![grant_type.to_string()])
        } else {
            Ok(Vec::new())
        }
    }

    async fn scope_ids_for_grants(&self, grant_ids: &[String]) -> AuthResult<Vec<String>> {
        let mut ids = BTreeSet::new();
        for grant_id in grant_ids {
            if let Some(linked) = self.grant_scopes.get(grant_id) {
                ids.extend(linked.iter().cloned());
            }
        }
        Ok(ids.into_iter().collect())
    }
}
