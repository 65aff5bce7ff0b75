use crate::{Clause, Keyword, QueryType};
use thiserror::Error;

/// Typed failures raised while building, rendering or binding a query.
///
/// They travel inside [`crate::Error`] so callers can attach context with `?`,
/// use `downcast_ref::<SqlError>()` to recover the variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqlError {
    #[error("Missing clause {0:?}, it is not registered in the dialect grammar")]
    MissingClause(Clause),
    #[error("Missing keyword {0:?}, it is not registered in the dialect grammar")]
    MissingKeyword(Keyword),
    #[error("Missing statement for {0:?} queries, it is not registered in the dialect grammar")]
    MissingStatement(QueryType),
    #[error("Missing column type `{0}`, it is not registered in the type registry")]
    MissingType(String),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
    #[error("A {existing} predicate already exists, cannot add a {requested} one at the top level")]
    ExistingPredicate {
        existing: &'static str,
        requested: &'static str,
    },
    #[error("Invalid order direction `{0}`, expected ASC or DESC")]
    InvalidOrder(String),
    #[error("Invalid sub-query filter `{0}`")]
    InvalidFilter(String),
    #[error("Unsupported: {0}")]
    Unsupported(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Invalid connection configuration: {0}")]
    InvalidConfig(String),
}

impl SqlError {
    /// Missing grammar or type registrations: programmer errors that must not be retried.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SqlError::MissingClause(..)
                | SqlError::MissingKeyword(..)
                | SqlError::MissingStatement(..)
                | SqlError::MissingType(..)
        )
    }

    pub(crate) fn invalid_query(message: impl Into<String>) -> crate::Error {
        SqlError::InvalidQuery(message.into()).into()
    }
}
