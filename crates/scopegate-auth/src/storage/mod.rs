//! Storage traits for scope data.
//!
//! This module defines the storage interface the scope repository queries:
//!
//! - Scope rows (`scopes`)
//! - Client to scope links (`client_scopes`)
//! - Grant types (`grants`) and grant to scope links (`grant_scopes`)
//!
//! # Implementations
//!
//! - [`InMemoryScopeStorage`] - dashmap-backed, for tests and embedding
//! - `scopegate-auth-postgres` - PostgreSQL storage backend

pub mod memory;
pub mod scope;

pub use memory::InMemoryScopeStorage;
pub use scope::ScopeStorage;
