use crate::{Clause, SqlError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Comparison, matching, aliasing and arithmetic operators usable in an [`crate::Expr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Between,
    NotBetween,
    Like,
    NotLike,
    Regexp,
    NotRegexp,
    Rlike,
    Null,
    NotNull,
    As,
    Exists,
    NotExists,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl Operator {
    /// Textual operator, used by the generic `field op value` rendering.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
            Operator::NotBetween => "NOT BETWEEN",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::Regexp => "REGEXP",
            Operator::NotRegexp => "NOT REGEXP",
            Operator::Rlike => "RLIKE",
            Operator::Null => "IS NULL",
            Operator::NotNull => "IS NOT NULL",
            Operator::As => "AS",
            Operator::Exists => "EXISTS",
            Operator::NotExists => "NOT EXISTS",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
        }
    }

    /// Dedicated clause template, operators without one render as `field op value`.
    pub fn clause(&self) -> Option<Clause> {
        Some(match self {
            Operator::In => Clause::In,
            Operator::NotIn => Clause::NotIn,
            Operator::Between => Clause::Between,
            Operator::NotBetween => Clause::NotBetween,
            Operator::Like => Clause::Like,
            Operator::NotLike => Clause::NotLike,
            Operator::Regexp => Clause::Regexp,
            Operator::NotRegexp => Clause::NotRegexp,
            Operator::Rlike => Clause::Rlike,
            Operator::Null => Clause::IsNull,
            Operator::NotNull => Clause::IsNotNull,
            Operator::As => Clause::As,
            _ => return None,
        })
    }

    pub fn is_null_check(&self) -> bool {
        matches!(self, Operator::Null | Operator::NotNull)
    }
}

impl FromStr for Operator {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Ok(match upper.as_str() {
            "=" => Operator::Eq,
            "!=" | "<>" => Operator::NotEq,
            ">" => Operator::Gt,
            ">=" => Operator::Gte,
            "<" => Operator::Lt,
            "<=" => Operator::Lte,
            "IN" => Operator::In,
            "NOT IN" => Operator::NotIn,
            "BETWEEN" => Operator::Between,
            "NOT BETWEEN" => Operator::NotBetween,
            "LIKE" => Operator::Like,
            "NOT LIKE" => Operator::NotLike,
            "REGEXP" => Operator::Regexp,
            "NOT REGEXP" => Operator::NotRegexp,
            "RLIKE" => Operator::Rlike,
            "IS NULL" => Operator::Null,
            "IS NOT NULL" => Operator::NotNull,
            "AS" => Operator::As,
            "EXISTS" => Operator::Exists,
            "NOT EXISTS" => Operator::NotExists,
            "+" => Operator::Add,
            "-" => Operator::Sub,
            "*" => Operator::Mul,
            "/" => Operator::Div,
            "%" => Operator::Mod,
            _ => {
                return Err(SqlError::invalid_query(format!("Unknown operator `{s}`")));
            }
        })
    }
}
