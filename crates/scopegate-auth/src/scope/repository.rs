//! Scope repository.
//!
//! Looks up a scope by id, optionally restricted to the scopes linked to
//! the requesting client and to the requested grant type.
//!
//! # Usage
//!
//! ```ignore
//! use scopegate_auth::scope::ScopeRepository;
//! use scopegate_auth::config::ScopeLimits;
//!
//! let repository = ScopeRepository::new(
//!     storage,
//!     ScopeLimits::unrestricted().with_grants_limited(true),
//! );
//!
//! if let Some(scope) = repository.get("read", Some("client_credentials"), None).await? {
//!     println!("{}: {}", scope.id, scope.description);
//! }
//! ```

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::AuthResult;
use crate::config::{ScopeConfig, ScopeLimits};
use crate::error::AuthError;
use crate::scope::param::parse_scope_param;
use crate::storage::ScopeStorage;
use crate::types::{Scope, ScopeFilter};

/// Scope lookup service.
///
/// Holds no state besides its configuration; every call goes to storage.
pub struct ScopeRepository {
    /// Backing storage for scopes and their links.
    storage: Arc<dyn ScopeStorage>,

    /// Restrictions and scope parameter handling.
    config: ScopeConfig,
}

impl ScopeRepository {
    /// Creates a repository with the given restrictions and default
    /// scope parameter handling.
    #[must_use]
    pub fn new(storage: Arc<dyn ScopeStorage>, limits: ScopeLimits) -> Self {
        Self {
            storage,
            config: ScopeConfig {
                limits,
                ..ScopeConfig::default()
            },
        }
    }

    /// Creates a repository from a full scope configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` if the configuration does not
    /// pass [`ScopeConfig::validate`].
    pub fn from_config(storage: Arc<dyn ScopeStorage>, config: ScopeConfig) -> AuthResult<Self> {
        config
            .validate()
            .map_err(|e| AuthError::configuration(e.to_string()))?;
        Ok(Self { storage, config })
    }

    /// Replaces the restrictions.
    #[must_use]
    pub fn with_limits(mut self, limits: ScopeLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Enables or disables the client restriction.
    pub fn set_limit_clients_to_scopes(&mut self, limit: bool) {
        self.config.limits.limit_clients_to_scopes = limit;
    }

    /// Enables or disables the grant restriction.
    pub fn set_limit_scopes_to_grants(&mut self, limit: bool) {
        self.config.limits.limit_scopes_to_grants = limit;
    }

    /// Returns `true` if lookups are restricted to the client's scopes.
    #[must_use]
    pub fn are_clients_limited_to_scopes(&self) -> bool {
        self.config.limits.limit_clients_to_scopes
    }

    /// Returns `true` if lookups are restricted to the grant's scopes.
    #[must_use]
    pub fn are_scopes_limited_to_grants(&self) -> bool {
        self.config.limits.limit_scopes_to_grants
    }

    /// Returns the current restrictions.
    #[must_use]
    pub fn limits(&self) -> ScopeLimits {
        self.config.limits
    }

    /// Returns the repository configuration.
    #[must_use]
    pub fn config(&self) -> &ScopeConfig {
        &self.config
    }

    /// Looks up a scope.
    ///
    /// `grant_type` is only consulted when grants are limited to scopes and
    /// `client_id` only when clients are limited to scopes. A scope that
    /// does not exist, or is excluded by a restriction, yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidRequest` if `scope_id` is empty, and
    /// propagates storage errors unchanged.
    #[instrument(skip(self), fields(limits = ?self.config.limits))]
    pub async fn get(
        &self,
        scope_id: &str,
        grant_type: Option<&str>,
        client_id: Option<&str>,
    ) -> AuthResult<Option<Scope>> {
        if scope_id.is_empty() {
            return Err(AuthError::invalid_request("scope id cannot be empty"));
        }

        let mut filter = ScopeFilter::by_id(scope_id);

        if self.config.limits.limit_clients_to_scopes
            && let Some(client_id) = client_id
        {
            let allowed = self.storage.scope_ids_for_client(client_id).await?;
            debug!(allowed = allowed.len(), "Restricting to client scopes");
            filter = filter.restrict_to(allowed);
        }

        if self.config.limits.limit_scopes_to_grants
            && let Some(grant_type) = grant_type
        {
            let grant_ids = self.storage.grant_ids(grant_type).await?;
            let allowed = self.storage.scope_ids_for_grants(&grant_ids).await?;
            debug!(
                grants = grant_ids.len(),
                allowed = allowed.len(),
                "Restricting to grant scopes"
            );
            filter = filter.restrict_to(allowed);
        }

        match self.storage.find_scope(&filter).await? {
            Some(scope) if scope.id != scope_id => Err(AuthError::internal(format!(
                "Storage returned scope '{}' for '{}'",
                scope.id, scope_id
            ))),
            Some(scope) => Ok(Some(scope)),
            None => {
                debug!("Scope not found");
                Ok(None)
            }
        }
    }

    /// Resolves a `scope` request parameter into scopes.
    ///
    /// The parameter is split on the configured delimiter. When it is
    /// absent or blank the configured default scope is used; without a
    /// default the result is empty, unless the parameter is required.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `AuthError::InvalidRequest` if the parameter is required but missing
    /// - `AuthError::InvalidScope` naming the first scope that cannot be found
    /// - Storage errors unchanged
    #[instrument(skip(self))]
    pub async fn resolve_scopes(
        &self,
        scope_param: Option<&str>,
        grant_type: Option<&str>,
        client_id: Option<&str>,
    ) -> AuthResult<Vec<Scope>> {
        let mut ids = scope_param
            .map(|param| parse_scope_param(param, &self.config.delimiter))
            .unwrap_or_default();

        if ids.is_empty() {
            match &self.config.default_scope {
                Some(default_scope) => ids.push(default_scope.clone()),
                None if self.config.require_scope_param => {
                    return Err(AuthError::invalid_request(
                        "Missing required parameter: scope",
                    ));
                }
                None => return Ok(Vec::new()),
            }
        }

        let mut scopes = Vec::with_capacity(ids.len());
        for id in &ids {
            let scope = self
                .get(id, grant_type, client_id)
                .await?
                .ok_or_else(|| AuthError::invalid_scope(format!("Unknown scope '{}'", id)))?;
            scopes.push(scope);
        }

        debug!(count = scopes.len(), "Resolved scopes");
        Ok(scopes)
    }
}

impl std::fmt::Debug for ScopeRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeRepository")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryScopeStorage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps in-memory storage and counts issued queries.
    struct CountingStorage {
        inner: InMemoryScopeStorage,
        queries: AtomicUsize,
    }

    impl CountingStorage {
        fn new(inner: InMemoryScopeStorage) -> Self {
            Self {
                inner,
                queries: AtomicUsize::new(0),
            }
        }

        fn queries(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ScopeStorage for CountingStorage {
        async fn find_scope(&self, filter: &ScopeFilter) -> AuthResult<Option<Scope>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.find_scope(filter).await
        }

        async fn scope_ids_for_client(&self, client_id: &str) -> AuthResult<Vec<String>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.scope_ids_for_client(client_id).await
        }

        async fn grant_ids(&self, grant_type: &str) -> AuthResult<Vec<String>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.grant_ids(grant_type).await
        }

        async fn scope_ids_for_grants(&self, grant_ids: &[String]) -> AuthResult<Vec<String>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.scope_ids_for_grants(grant_ids).await
        }
    }

    /// Storage whose every query fails.
    struct FailingStorage;

    #[async_trait::async_trait]
    impl ScopeStorage for FailingStorage {
        async fn find_scope(&self, _filter: &ScopeFilter) -> AuthResult<Option<Scope>> {
            Err(AuthError::storage("connection reset"))
        }

        async fn scope_ids_for_client(&self, _client_id: &str) -> AuthResult<Vec<String>> {
            Err(AuthError::storage("connection reset"))
        }

        async fn grant_ids(&self, _grant_type: &str) -> AuthResult<Vec<String>> {
            Err(AuthError::storage("connection reset"))
        }

        async fn scope_ids_for_grants(&self, _grant_ids: &[String]) -> AuthResult<Vec<String>> {
            Err(AuthError::storage("connection reset"))
        }
    }

    /// Storage that answers every lookup with the same scope.
    struct WrongScopeStorage;

    #[async_trait::async_trait]
    impl ScopeStorage for WrongScopeStorage {
        async fn find_scope(&self, _filter: &ScopeFilter) -> AuthResult<Option<Scope>> {
            Ok(Some(Scope::new("admin", "Administrator")))
        }

        async fn scope_ids_for_client(&self, _client_id: &str) -> AuthResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn grant_ids(&self, _grant_type: &str) -> AuthResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn scope_ids_for_grants(&self, _grant_ids: &[String]) -> AuthResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn seeded() -> InMemoryScopeStorage {
        let storage = InMemoryScopeStorage::new();
        storage.insert_scope(Scope::new("read", "Read access"));
        storage.insert_scope(Scope::new("write", "Write access"));
        storage.insert_scope(Scope::new("admin", "Administrator"));

        storage.link_client("reporting-app", "read");
        storage.link_client("editor-app", "read");
        storage.link_client("editor-app", "write");

        storage.link_grant("authorization_code", "read");
        storage.link_grant("authorization_code", "write");
        storage.link_grant("client_credentials", "read");
        storage.insert_grant("implicit");
        storage
    }

    fn repository(limits: ScopeLimits) -> ScopeRepository {
        ScopeRepository::new(Arc::new(seeded()), limits)
    }

    #[tokio::test]
    async fn test_get_existing_scope() {
        let repo = repository(ScopeLimits::default());
        let scope = repo.get("read", None, None).await.unwrap();
        assert_eq!(scope, Some(Scope::new("read", "Read access")));
    }

    #[tokio::test]
    async fn test_get_missing_scope_is_none() {
        let repo = repository(ScopeLimits::default());
        assert!(repo.get("delete", None, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_returned_id_equals_requested_id() {
        let repo = repository(ScopeLimits::default());
        for id in ["read", "write", "admin"] {
            let scope = repo.get(id, None, None).await.unwrap().unwrap();
            assert_eq!(scope.id, id);
        }
    }

    #[tokio::test]
    async fn test_empty_scope_id_is_invalid_request() {
        let repo = repository(ScopeLimits::default());
        let err = repo.get("", None, None).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_unrestricted_ignores_grant_and_client() {
        let storage = Arc::new(CountingStorage::new(seeded()));
        let repo = ScopeRepository::new(storage.clone(), ScopeLimits::unrestricted());

        let scope = repo
            .get("admin", Some("implicit"), Some("reporting-app"))
            .await
            .unwrap();
        assert_eq!(scope.map(|s| s.id), Some("admin".to_string()));
        assert_eq!(storage.queries(), 1);
    }

    #[tokio::test]
    async fn test_client_restriction() {
        let repo = repository(ScopeLimits::unrestricted().with_clients_limited(true));

        assert!(
            repo.get("read", None, Some("reporting-app"))
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            repo.get("write", None, Some("reporting-app"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            repo.get("write", None, Some("editor-app"))
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            repo.get("read", None, Some("unknown-app"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_client_restriction_skipped_without_client() {
        let storage = Arc::new(CountingStorage::new(seeded()));
        let repo = ScopeRepository::new(
            storage.clone(),
            ScopeLimits::unrestricted().with_clients_limited(true),
        );

        assert!(repo.get("admin", None, None).await.unwrap().is_some());
        assert_eq!(storage.queries(), 1);
    }

    #[tokio::test]
    async fn test_empty_client_id_is_not_absent() {
        let repo = repository(ScopeLimits::unrestricted().with_clients_limited(true));
        assert!(repo.get("read", None, Some("")).await.unwrap().is_none());
        assert!(repo.get("read", None, None).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_grant_restriction() {
        let repo = repository(ScopeLimits::unrestricted().with_grants_limited(true));

        assert!(
            repo.get("write", Some("authorization_code"), None)
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            repo.get("write", Some("client_credentials"), None)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            repo.get("read", Some("client_credentials"), None)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_grant_without_scopes_yields_none() {
        let repo = repository(ScopeLimits::unrestricted().with_grants_limited(true));

        // "read" exists unrestricted, but "implicit" has no linked scopes.
        assert!(repo.get("read", None, None).await.unwrap().is_some());
        assert!(repo.get("read", Some("implicit"), None).await.unwrap().is_none());
        assert!(repo.get("read", Some("unknown"), None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_grant_restriction_query_count() {
        let storage = Arc::new(CountingStorage::new(seeded()));
        let repo = ScopeRepository::new(
            storage.clone(),
            ScopeLimits::unrestricted()
                .with_clients_limited(true)
                .with_grants_limited(true),
        );

        repo.get("read", Some("client_credentials"), Some("editor-app"))
            .await
            .unwrap();
        assert_eq!(storage.queries(), 4);
    }

    #[tokio::test]
    async fn test_both_restrictions_intersect() {
        let repo = repository(
            ScopeLimits::unrestricted()
                .with_clients_limited(true)
                .with_grants_limited(true),
        );

        assert!(
            repo.get("write", Some("authorization_code"), Some("editor-app"))
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            repo.get("write", Some("client_credentials"), Some("editor-app"))
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            repo.get("write", Some("authorization_code"), Some("reporting-app"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_get_is_idempotent() {
        let repo = repository(ScopeLimits::unrestricted().with_grants_limited(true));
        let first = repo.get("read", Some("authorization_code"), None).await.unwrap();
        let second = repo.get("read", Some("authorization_code"), None).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_storage_errors_propagate() {
        let repo = ScopeRepository::new(
            Arc::new(FailingStorage),
            ScopeLimits::unrestricted().with_clients_limited(true),
        );

        let err = repo.get("read", None, None).await.unwrap_err();
        assert!(matches!(err, AuthError::Storage { .. }));

        let err = repo.get("read", None, Some("app")).await.unwrap_err();
        assert_eq!(err.to_string(), "Storage error: connection reset");
    }

    #[tokio::test]
    async fn test_mismatched_storage_row_is_internal_error() {
        let repo = ScopeRepository::new(Arc::new(WrongScopeStorage), ScopeLimits::default());
        let err = repo.get("read", None, None).await.unwrap_err();
        assert!(matches!(err, AuthError::Internal { .. }));
    }

    #[test]
    fn test_setters_and_getters() {
        let mut repo = repository(ScopeLimits::default());
        assert!(!repo.are_clients_limited_to_scopes());
        assert!(!repo.are_scopes_limited_to_grants());

        repo.set_limit_clients_to_scopes(true);
        assert!(repo.are_clients_limited_to_scopes());
        assert!(!repo.are_scopes_limited_to_grants());

        repo.set_limit_scopes_to_grants(true);
        repo.set_limit_clients_to_scopes(false);
        assert_eq!(
            repo.limits(),
            ScopeLimits::unrestricted().with_grants_limited(true)
        );

        let repo = repo.with_limits(ScopeLimits::default());
        assert!(!repo.are_scopes_limited_to_grants());
    }

    #[tokio::test]
    async fn test_resolve_scopes() {
        let repo = repository(ScopeLimits::default());
        let scopes = repo
            .resolve_scopes(Some("read write read"), None, None)
            .await
            .unwrap();
        let ids: Vec<_> = scopes.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["read", "write"]);
    }

    #[tokio::test]
    async fn test_resolve_unknown_scope_is_invalid_scope() {
        let repo = repository(ScopeLimits::default());
        let err = repo
            .resolve_scopes(Some("read delete"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidScope { .. }));
        assert_eq!(err.oauth_error_code(), "invalid_scope");
        assert!(err.to_string().contains("delete"));
    }

    #[tokio::test]
    async fn test_resolve_honours_restrictions() {
        let repo = repository(ScopeLimits::unrestricted().with_grants_limited(true));
        let err = repo
            .resolve_scopes(Some("read write"), Some("client_credentials"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidScope { .. }));
    }

    #[tokio::test]
    async fn test_resolve_missing_param() {
        let storage: Arc<dyn ScopeStorage> = Arc::new(seeded());

        let repo = ScopeRepository::from_config(storage.clone(), ScopeConfig::default()).unwrap();
        assert!(repo.resolve_scopes(None, None, None).await.unwrap().is_empty());

        let repo = ScopeRepository::from_config(
            storage.clone(),
            ScopeConfig {
                require_scope_param: true,
                ..ScopeConfig::default()
            },
        )
        .unwrap();
        let err = repo.resolve_scopes(Some("  "), None, None).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRequest { .. }));

        let repo = ScopeRepository::from_config(
            storage,
            ScopeConfig {
                require_scope_param: true,
                default_scope: Some("read".to_string()),
                ..ScopeConfig::default()
            },
        )
        .unwrap();
        let scopes = repo.resolve_scopes(None, None, None).await.unwrap();
        assert_eq!(scopes, vec![Scope::new("read", "Read access")]);
    }

    #[tokio::test]
    async fn test_resolve_custom_delimiter() {
        let repo = ScopeRepository::from_config(
            Arc::new(seeded()),
            ScopeConfig {
                delimiter: ",".to_string(),
                ..ScopeConfig::default()
            },
        )
        .unwrap();
        let scopes = repo
            .resolve_scopes(Some("read,admin"), None, None)
            .await
            .unwrap();
        assert_eq!(scopes.len(), 2);
    }

    #[test]
    fn test_from_config_rejects_empty_delimiter() {
        let err = ScopeRepository::from_config(
            Arc::new(seeded()),
            ScopeConfig {
                delimiter: String::new(),
                ..ScopeConfig::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::Configuration { .. }));
        assert!(err.is_server_error());
    }

    #[test]
    fn test_from_config_rejects_default_scope_with_delimiter() {
        let err = ScopeRepository::from_config(
            Arc::new(InMemoryScopeStorage::new()),
            ScopeConfig {
                default_scope: Some("read write".to_string()),
                ..ScopeConfig::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, AuthError::Configuration { .. }));
    }
}
