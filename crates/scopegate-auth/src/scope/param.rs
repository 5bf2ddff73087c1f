//! Parsing of the `scope` request parameter (RFC 6749 section 3.3).

/// Splits a scope parameter into scope identifiers.
///
/// Items are trimmed, empty items are dropped and duplicates are removed,
/// keeping the first occurrence.
#[must_use]
pub fn parse_scope_param(param: &str, delimiter: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for item in param.split(delimiter).map(str::trim) {
        if !item.is_empty() && !ids.iter().any(|id| id == item) {
            ids.push(item.to_string());
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_delimited() {
        assert_eq!(
            parse_scope_param("openid profile email", " "),
            vec!["openid", "profile", "email"]
        );
    }

    #[test]
    fn test_extra_whitespace_and_duplicates() {
        assert_eq!(
            parse_scope_param("  read   write read ", " "),
            vec!["read", "write"]
        );
    }

    #[test]
    fn test_custom_delimiter() {
        assert_eq!(
            parse_scope_param("read, write,,admin", ","),
            vec!["read", "write", "admin"]
        );
    }

    #[test]
    fn test_empty_param() {
        assert!(parse_scope_param("", " ").is_empty());
        assert!(parse_scope_param("   ", " ").is_empty());
    }
}
