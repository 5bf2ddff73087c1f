//! OAuth 2.0 scope domain types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Scope
// =============================================================================

/// An OAuth 2.0 scope as stored in the `scopes` table.
///
/// Scopes are immutable once fetched and owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// Unique scope identifier (e.g., "read", "openid").
    pub id: String,

    /// Human-readable description shown on consent screens.
    pub description: String,
}

impl Scope {
    /// Creates a new scope.
    #[must_use]
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }

    /// Returns the scope identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

// =============================================================================
// Scope Filter
// =============================================================================

/// Predicate for fetching a single scope row.
///
/// Matches the row whose id equals [`ScopeFilter::id`] and, for every
/// restriction, whose id is a member of the restriction's value list
/// (SQL `WHERE id = $1 AND id = ANY($2) AND ...`). An empty restriction
/// matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFilter {
    id: String,
    restrictions: Vec<Vec<String>>,
}

impl ScopeFilter {
    /// Filter on the scope id only.
    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            restrictions: Vec::new(),
        }
    }

    /// Restricts the filter to scope ids in `allowed`.
    #[must_use]
    pub fn restrict_to<I, S>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.restrictions
            .push(allowed.into_iter().map(Into::into).collect());
        self
    }

    /// The requested scope id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The `whereIn` restrictions, in the order they were added.
    #[must_use]
    pub fn restrictions(&self) -> &[Vec<String>] {
        &self.restrictions
    }

    /// Returns `true` if the given scope id satisfies this filter.
    #[must_use]
    pub fn matches(&self, scope_id: &str) -> bool {
        scope_id == self.id
            && self
                .restrictions
                .iter()
                .all(|allowed| allowed.iter().any(|id| id == scope_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_serializes_id_and_description() {
        let scope = Scope::new("read", "Read access");
        let json = serde_json::to_value(&scope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "read", "description": "Read access"})
        );
        assert_eq!(scope.to_string(), "read");
    }

    #[test]
    fn test_filter_by_id_only() {
        let filter = ScopeFilter::by_id("read");
        assert!(filter.matches("read"));
        assert!(!filter.matches("write"));
        assert!(filter.restrictions().is_empty());
    }

    #[test]
    fn test_filter_restrictions_intersect() {
        let filter = ScopeFilter::by_id("read")
            .restrict_to(["read", "write"])
            .restrict_to(vec!["read".to_string()]);
        assert!(filter.matches("read"));
        assert_eq!(filter.restrictions().len(), 2);

        let filter = ScopeFilter::by_id("write")
            .restrict_to(["read", "write"])
            .restrict_to(["read"]);
        assert!(!filter.matches("write"));
    }

    #[test]
    fn test_empty_restriction_matches_nothing() {
        let filter = ScopeFilter::by_id("read").restrict_to(Vec::<String>::new());
        assert!(!filter.matches("read"));
    }
}
