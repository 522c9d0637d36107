//! Mapping from comparator tokens to query operators.

use thiserror::Error;

use crate::types::QueryCmp;

/// Recognized comparator tokens. Matching is exact and case-sensitive.
const COMPARATORS: [(&str, QueryCmp); 8] = [
    ("=", QueryCmp::Eq),
    ("==", QueryCmp::Eq),
    ("<", QueryCmp::Lt),
    ("<=", QueryCmp::Lte),
    (">", QueryCmp::Gt),
    (">=", QueryCmp::Gte),
    ("<>", QueryCmp::Neq),
    ("!=", QueryCmp::Neq),
];

/// Comparator text that does not name a known operator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown comparator: '{0}'")]
pub struct UnknownComparator(pub String);

impl UnknownComparator {
    /// True when no comparator text was given at all.
    pub fn is_missing(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolve a raw comparator token to its operator.
pub fn lookup_comparator(token: &str) -> Result<QueryCmp, UnknownComparator> {
    COMPARATORS
        .iter()
        .find(|(text, _)| *text == token)
        .map(|(_, cmp)| *cmp)
        .ok_or_else(|| UnknownComparator(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_all_tokens() {
        assert_eq!(lookup_comparator("="), Ok(QueryCmp::Eq));
        assert_eq!(lookup_comparator("=="), Ok(QueryCmp::Eq));
        assert_eq!(lookup_comparator("<"), Ok(QueryCmp::Lt));
        assert_eq!(lookup_comparator("<="), Ok(QueryCmp::Lte));
        assert_eq!(lookup_comparator(">"), Ok(QueryCmp::Gt));
        assert_eq!(lookup_comparator(">="), Ok(QueryCmp::Gte));
        assert_eq!(lookup_comparator("<>"), Ok(QueryCmp::Neq));
        assert_eq!(lookup_comparator("!="), Ok(QueryCmp::Neq));
    }

    #[test]
    fn test_table_has_eight_tokens_six_operators() {
        assert_eq!(COMPARATORS.len(), 8);

        let mut operators: Vec<_> = COMPARATORS
            .iter()
            .map(|(text, _)| lookup_comparator(text).unwrap())
            .collect();
        operators.sort_by_key(|op| *op as u8);
        operators.dedup();
        assert_eq!(operators.len(), 6);
    }

    #[test]
    fn test_lookup_is_exact() {
        // No trimming or normalization
        assert!(lookup_comparator(" =").is_err());
        assert!(lookup_comparator("= ").is_err());
        assert!(lookup_comparator("=>").is_err());
        assert!(lookup_comparator("eq").is_err());
    }

    #[test]
    fn test_unknown_comparator_missing() {
        let err = lookup_comparator("").unwrap_err();
        assert!(err.is_missing());

        let err = lookup_comparator("~=").unwrap_err();
        assert!(!err.is_missing());
        assert_eq!(err.to_string(), "unknown comparator: '~='");
    }
}
