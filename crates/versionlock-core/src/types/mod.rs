//! Shared core types used by the versionlock layer and its consumers.

/// Comparison operator applied when querying packages.
///
/// Only the identity of each operator lives here; the query engine that
/// consumes these values decides what they mean for a given attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryCmp {
    /// Equal to.
    Eq,
    /// Not equal to.
    Neq,
    /// Less than.
    Lt,
    /// Less than or equal to.
    Lte,
    /// Greater than.
    Gt,
    /// Greater than or equal to.
    Gte,
}

impl QueryCmp {
    /// Whether this operator is an equality test (`Eq` or `Neq`).
    pub fn is_equality(self) -> bool {
        matches!(self, QueryCmp::Eq | QueryCmp::Neq)
    }
}
