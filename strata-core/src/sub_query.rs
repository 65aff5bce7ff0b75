use crate::{Keyword, Query, SqlError};
use serde::{Deserialize, Serialize};
use std::{
    ops::{Deref, DerefMut},
    str::FromStr,
};

/// Comparison keyword written in front of a sub-query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter {
    All,
    Any,
    Some,
    Exists,
    NotExists,
    In,
    NotIn,
}

impl Filter {
    pub fn keyword(&self) -> Keyword {
        match self {
            Filter::All => Keyword::All,
            Filter::Any => Keyword::Any,
            Filter::Some => Keyword::Some,
            Filter::Exists => Keyword::Exists,
            Filter::NotExists => Keyword::NotExists,
            Filter::In => Keyword::In,
            Filter::NotIn => Keyword::NotIn,
        }
    }

    /// The sub-query stands alone, without a field or an operator on its left.
    pub fn is_exists(&self) -> bool {
        matches!(self, Filter::Exists | Filter::NotExists)
    }
}

impl FromStr for Filter {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Filter::All,
            "ANY" => Filter::Any,
            "SOME" => Filter::Some,
            "EXISTS" => Filter::Exists,
            "NOT EXISTS" => Filter::NotExists,
            "IN" => Filter::In,
            "NOT IN" => Filter::NotIn,
            _ => return Err(SqlError::InvalidFilter(s.into()).into()),
        })
    }
}

/// A SELECT nested in another query, as a scalar, a list source or an existence test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubQuery {
    query: Query,
    filter: Option<Filter>,
}

impl SubQuery {
    pub fn new(mut query: Query) -> Self {
        query.nested = true;
        Self {
            query,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn filter(&self) -> Option<Filter> {
        self.filter
    }

    pub fn query(&self) -> &Query {
        &self.query
    }
}

impl From<Query> for SubQuery {
    fn from(value: Query) -> Self {
        SubQuery::new(value)
    }
}

impl Deref for SubQuery {
    type Target = Query;
    fn deref(&self) -> &Self::Target {
        &self.query
    }
}

impl DerefMut for SubQuery {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.query
    }
}
