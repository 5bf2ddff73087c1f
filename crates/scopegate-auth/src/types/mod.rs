//! Common types used across the scope repository.
//!
//! ## Domain Types
//!
//! - [`Scope`] - A named permission unit with its description
//! - [`ScopeFilter`] - Predicate for a single scope row fetch

pub mod scope;

pub use scope::{Scope, ScopeFilter};
