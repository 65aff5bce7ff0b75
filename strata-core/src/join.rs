use crate::{Clause, Field};
use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Outer,
    Straight,
}

impl JoinType {
    pub fn clause(&self) -> Clause {
        match self {
            JoinType::Inner => Clause::InnerJoin,
            JoinType::Left => Clause::LeftJoin,
            JoinType::Right => Clause::RightJoin,
            JoinType::Outer => Clause::OuterJoin,
            JoinType::Straight => Clause::StraightJoin,
        }
    }
}

/// A join on another table, conditions reference columns only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    join: JoinType,
    table: String,
    alias: Option<String>,
    on: Vec<(String, String)>,
    fields: Vec<Field>,
}

impl Join {
    pub fn new(join: JoinType, table: impl Into<String>) -> Self {
        Self {
            join,
            table: table.into(),
            alias: None,
            on: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn inner(table: impl Into<String>) -> Self {
        Self::new(JoinType::Inner, table)
    }

    pub fn left(table: impl Into<String>) -> Self {
        Self::new(JoinType::Left, table)
    }

    pub fn right(table: impl Into<String>) -> Self {
        Self::new(JoinType::Right, table)
    }

    pub fn outer(table: impl Into<String>) -> Self {
        Self::new(JoinType::Outer, table)
    }

    pub fn straight(table: impl Into<String>) -> Self {
        Self::new(JoinType::Straight, table)
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Appends the condition `left = right`.
    pub fn on(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.on.push((left.into(), right.into()));
        self
    }

    pub fn fields<F: Into<Field>>(mut self, fields: impl IntoIterator<Item = F>) -> Self {
        for field in fields.into_iter().map(Into::into) {
            if !field.is_name() || !self.fields.contains(&field) {
                self.fields.push(field);
            }
        }
        self
    }

    pub fn join_type(&self) -> JoinType {
        self.join
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn get_alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn conditions(&self) -> &[(String, String)] {
        &self.on
    }

    pub fn get_fields(&self) -> &[Field] {
        &self.fields
    }

    /// Prefix used to qualify the join fields.
    pub fn qualifier(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }
}
