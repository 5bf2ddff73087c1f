//! # scopegate-auth
//!
//! OAuth 2.0 scope repository for authorization servers.
//!
//! This crate provides:
//! - The [`Scope`] domain type
//! - A [`ScopeStorage`] trait over the scope, grant and link tables
//! - [`ScopeRepository`], which looks up scopes with optional client and
//!   grant restrictions and resolves `scope` request parameters
//! - An in-memory storage backend
//!
//! ## Modules
//!
//! - [`config`] - Scope and database configuration
//! - [`error`] - Error types
//! - [`scope`] - Scope lookup and parameter resolution
//! - [`storage`] - Storage traits and the in-memory backend
//! - [`types`] - Domain types

pub mod config;
pub mod error;
pub mod scope;
pub mod storage;
pub mod types;

pub use config::{AuthConfig, ConfigError, DatabaseConfig, ScopeConfig, ScopeLimits};
pub use error::{AuthError, ErrorCategory};
pub use scope::{ScopeRepository, parse_scope_param};
pub use storage::{InMemoryScopeStorage, ScopeStorage};
pub use types::{Scope, ScopeFilter};

/// Type alias for scope lookup results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use scopegate_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::config::{AuthConfig, ConfigError, ScopeConfig, ScopeLimits};
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::scope::ScopeRepository;
    pub use crate::storage::{InMemoryScopeStorage, ScopeStorage};
    pub use crate::types::{Scope, ScopeFilter};
}
