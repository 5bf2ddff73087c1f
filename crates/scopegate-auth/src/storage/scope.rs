//! Scope storage trait.
//!
//! Defines the queries the scope repository issues against its backing
//! store. Implementations are provided by storage backends (e.g., PostgreSQL).

use async_trait::async_trait;

use crate::AuthResult;
use crate::types::{Scope, ScopeFilter};

/// Read-only storage operations for scopes and their client/grant links.
///
/// Every method maps onto a single query. Errors are propagated to the
/// caller unchanged; implementations must not retry.
///
/// # Example Implementation
///
/// ```ignore
/// use scopegate_auth::storage::ScopeStorage;
///
/// struct StaticScopes(Vec<Scope>);
///
/// #[async_trait::async_trait]
/// impl ScopeStorage for StaticScopes {
///     async fn find_scope(&self, filter: &ScopeFilter) -> AuthResult<Option<Scope>> {
///         Ok(self.0.iter().find(|s| filter.matches(&s.id)).cloned())
///     }
///     // ... other methods
/// }
/// ```
#[async_trait]
pub trait ScopeStorage: Send + Sync {
    /// Fetches the first scope row matching the filter.
    ///
    /// Returns `None` if no row matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_scope(&self, filter: &ScopeFilter) -> AuthResult<Option<Scope>>;

    /// Returns the ids of all scopes linked to a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn scope_ids_for_client(&self, client_id: &str) -> AuthResult<Vec<String>>;

    /// Resolves a grant type identifier to the matching grant ids.
    ///
    /// Returns an empty list for unknown grant types.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn grant_ids(&self, grant_type: &str) -> AuthResult<Vec<String>>;

    /// Returns the ids of all scopes linked to any of the given grants.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn scope_ids_for_grants(&self, grant_ids: &[String]) -> AuthResult<Vec<String>>;
}
