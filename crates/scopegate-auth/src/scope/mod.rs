//! Scope lookup and scope parameter resolution.
//!
//! - [`ScopeRepository`] - Looks up scopes, honouring client and grant restrictions
//! - [`parse_scope_param`] - Splits a `scope` request parameter into identifiers

pub mod param;
pub mod repository;

pub use param::parse_scope_param;
pub use repository::ScopeRepository;
