use crate::{QueryType, Result, SqlError};
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, collections::HashMap};

/// Keys of the clause table, each one maps to a printf-like template (`%s` placeholders).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    As,
    Between,
    NotBetween,
    In,
    NotIn,
    Like,
    NotLike,
    Regexp,
    NotRegexp,
    Rlike,
    IsNull,
    IsNotNull,
    /// Generic `operator value` right side.
    Expression,
    Function,
    SubQuery,
    /// Nested predicate.
    Group,
    Not,
    InnerJoin,
    LeftJoin,
    RightJoin,
    OuterJoin,
    StraightJoin,
    On,
    Where,
    Having,
    GroupBy,
    OrderBy,
    OrderDirection,
    Limit,
    LimitOffset,
    Union,
    Intersect,
    Except,
    Assign,
    Default,
    Comment,
    CharacterSet,
    Collate,
    Constraint,
    PrimaryKey,
    UniqueKey,
    ForeignKey,
    Index,
    OnUpdate,
    OnDelete,
    TableOption,
}

/// Keys of the keyword table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    And,
    Or,
    Xor,
    /// Separator inside `NOT (...)` for NOR groups.
    Nor,
    All,
    Any,
    Some,
    Exists,
    NotExists,
    In,
    NotIn,
    Distinct,
    Ignore,
    HighPriority,
    LowPriority,
    Delayed,
    Quick,
    Temporary,
    IfExists,
    IfNotExists,
    Unique,
    Fulltext,
    Spatial,
    Asc,
    Desc,
    Null,
    NotNull,
    AutoIncrement,
    Unsigned,
    Zerofill,
    Cascade,
    Restrict,
    SetNull,
    SetDefault,
    NoAction,
    Engine,
    CharacterSet,
    Collate,
    Comment,
}

/// Statement template with named slots, `SELECT {fields} FROM {table} {where}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    template: Cow<'static, str>,
}

impl Statement {
    pub fn new(template: impl Into<Cow<'static, str>>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Names of the slots, in template order.
    pub fn slots(&self) -> Vec<&str> {
        let mut result = Vec::new();
        let mut rest = self.template.as_ref();
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            result.push(&rest[start + 1..start + len]);
            rest = &rest[start + len + 1..];
        }
        result
    }

    /// Substitutes the slots, absent or empty ones vanish together with their leading space.
    pub fn render(&self, params: &HashMap<&str, String>) -> String {
        let mut out = String::with_capacity(self.template.len() + 128);
        let mut rest = self.template.as_ref();
        while let Some(start) = rest.find('{') {
            let Some(len) = rest[start..].find('}') else {
                break;
            };
            out.push_str(&rest[..start]);
            let name = &rest[start + 1..start + len];
            rest = &rest[start + len + 1..];
            match params.get(name).map(String::as_str).unwrap_or_default() {
                "" => {
                    if out.ends_with(' ')
                        && (rest.is_empty() || rest.starts_with([' ', '\n', ')']))
                    {
                        out.pop();
                    }
                }
                value => out.push_str(value),
            }
        }
        out.push_str(rest);
        out.trim().to_string()
    }
}

/// The three lookup tables of a dialect: clauses, keywords and statements.
///
/// Dialects start from [`Grammar::standard`] and patch the entries that differ, always during
/// construction. Once built it is only read.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    clauses: HashMap<Clause, Cow<'static, str>>,
    keywords: HashMap<Keyword, Cow<'static, str>>,
    statements: HashMap<QueryType, Statement>,
}

impl Grammar {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut grammar = Self::empty();
        grammar
            .add_clauses([
                (Clause::As, "%s AS %s"),
                (Clause::Between, "BETWEEN %s AND %s"),
                (Clause::NotBetween, "NOT BETWEEN %s AND %s"),
                (Clause::In, "IN (%s)"),
                (Clause::NotIn, "NOT IN (%s)"),
                (Clause::Like, "LIKE %s"),
                (Clause::NotLike, "NOT LIKE %s"),
                (Clause::Regexp, "REGEXP %s"),
                (Clause::NotRegexp, "NOT REGEXP %s"),
                (Clause::Rlike, "RLIKE %s"),
                (Clause::IsNull, "IS NULL"),
                (Clause::IsNotNull, "IS NOT NULL"),
                (Clause::Expression, "%s %s"),
                (Clause::Function, "%s(%s)"),
                (Clause::SubQuery, "(%s)"),
                (Clause::Group, "(%s)"),
                (Clause::Not, "NOT (%s)"),
                (Clause::InnerJoin, "INNER JOIN %s"),
                (Clause::LeftJoin, "LEFT JOIN %s"),
                (Clause::RightJoin, "RIGHT JOIN %s"),
                (Clause::OuterJoin, "FULL OUTER JOIN %s"),
                (Clause::StraightJoin, "STRAIGHT_JOIN %s"),
                (Clause::On, "ON %s"),
                (Clause::Where, "WHERE %s"),
                (Clause::Having, "HAVING %s"),
                (Clause::GroupBy, "GROUP BY %s"),
                (Clause::OrderBy, "ORDER BY %s"),
                (Clause::OrderDirection, "%s %s"),
                (Clause::Limit, "LIMIT %s"),
                (Clause::LimitOffset, "LIMIT %s OFFSET %s"),
                (Clause::Union, "UNION %s"),
                (Clause::Intersect, "INTERSECT %s"),
                (Clause::Except, "EXCEPT %s"),
                (Clause::Assign, "%s = %s"),
                (Clause::Default, "DEFAULT %s"),
                (Clause::Comment, "COMMENT %s"),
                (Clause::CharacterSet, "CHARACTER SET %s"),
                (Clause::Collate, "COLLATE %s"),
                (Clause::Constraint, "CONSTRAINT %s"),
                (Clause::PrimaryKey, "PRIMARY KEY (%s)"),
                (Clause::UniqueKey, "UNIQUE KEY %s (%s)"),
                (Clause::ForeignKey, "FOREIGN KEY (%s) REFERENCES %s(%s)"),
                (Clause::Index, "KEY %s (%s)"),
                (Clause::OnUpdate, "ON UPDATE %s"),
                (Clause::OnDelete, "ON DELETE %s"),
                (Clause::TableOption, "%s=%s"),
            ])
            .add_keywords([
                (Keyword::And, "AND"),
                (Keyword::Or, "OR"),
                (Keyword::Xor, "XOR"),
                (Keyword::Nor, "OR"),
                (Keyword::All, "ALL"),
                (Keyword::Any, "ANY"),
                (Keyword::Some, "SOME"),
                (Keyword::Exists, "EXISTS"),
                (Keyword::NotExists, "NOT EXISTS"),
                (Keyword::In, "IN"),
                (Keyword::NotIn, "NOT IN"),
                (Keyword::Distinct, "DISTINCT"),
                (Keyword::Ignore, "IGNORE"),
                (Keyword::HighPriority, "HIGH_PRIORITY"),
                (Keyword::LowPriority, "LOW_PRIORITY"),
                (Keyword::Delayed, "DELAYED"),
                (Keyword::Quick, "QUICK"),
                (Keyword::Temporary, "TEMPORARY"),
                (Keyword::IfExists, "IF EXISTS"),
                (Keyword::IfNotExists, "IF NOT EXISTS"),
                (Keyword::Unique, "UNIQUE"),
                (Keyword::Fulltext, "FULLTEXT"),
                (Keyword::Spatial, "SPATIAL"),
                (Keyword::Asc, "ASC"),
                (Keyword::Desc, "DESC"),
                (Keyword::Null, "NULL"),
                (Keyword::NotNull, "NOT NULL"),
                (Keyword::AutoIncrement, "AUTO_INCREMENT"),
                (Keyword::Unsigned, "UNSIGNED"),
                (Keyword::Zerofill, "ZEROFILL"),
                (Keyword::Cascade, "CASCADE"),
                (Keyword::Restrict, "RESTRICT"),
                (Keyword::SetNull, "SET NULL"),
                (Keyword::SetDefault, "SET DEFAULT"),
                (Keyword::NoAction, "NO ACTION"),
                (Keyword::Engine, "ENGINE"),
                (Keyword::CharacterSet, "CHARACTER SET"),
                (Keyword::Collate, "COLLATE"),
                (Keyword::Comment, "COMMENT"),
            ])
            .add_statements([
                (
                    QueryType::Select,
                    "SELECT {a.distinct} {fields} FROM {table} {joins} {where} {groupBy} {having} {compounds} {orderBy} {limit}",
                ),
                (
                    QueryType::Insert,
                    "INSERT INTO {table} {fields} VALUES {values}",
                ),
                (
                    QueryType::MultiInsert,
                    "INSERT INTO {table} {fields} VALUES {values}",
                ),
                (
                    QueryType::Update,
                    "UPDATE {table} {joins} SET {fields} {where} {orderBy} {limit}",
                ),
                (
                    QueryType::Delete,
                    "DELETE FROM {table} {joins} {where} {orderBy} {limit}",
                ),
                (QueryType::Truncate, "TRUNCATE {table}"),
                (
                    QueryType::CreateTable,
                    "CREATE {a.temporary} TABLE {a.ifNotExists} {table} (\n{columns}{keys}\n) {options}",
                ),
                (
                    QueryType::CreateIndex,
                    "CREATE {a.type} INDEX {index} ON {table} ({fields})",
                ),
                (
                    QueryType::DropTable,
                    "DROP {a.temporary} TABLE {a.ifExists} {table}",
                ),
                (QueryType::DropIndex, "DROP INDEX {index} ON {table}"),
            ]);
        grammar
    }

    pub fn add_clause(
        &mut self,
        clause: Clause,
        template: impl Into<Cow<'static, str>>,
    ) -> &mut Self {
        self.clauses.insert(clause, template.into());
        self
    }

    pub fn add_clauses<T: Into<Cow<'static, str>>>(
        &mut self,
        clauses: impl IntoIterator<Item = (Clause, T)>,
    ) -> &mut Self {
        self.clauses
            .extend(clauses.into_iter().map(|(k, v)| (k, v.into())));
        self
    }

    pub fn add_keyword(
        &mut self,
        keyword: Keyword,
        value: impl Into<Cow<'static, str>>,
    ) -> &mut Self {
        self.keywords.insert(keyword, value.into());
        self
    }

    pub fn add_keywords<T: Into<Cow<'static, str>>>(
        &mut self,
        keywords: impl IntoIterator<Item = (Keyword, T)>,
    ) -> &mut Self {
        self.keywords
            .extend(keywords.into_iter().map(|(k, v)| (k, v.into())));
        self
    }

    pub fn add_statement(
        &mut self,
        query_type: QueryType,
        template: impl Into<Cow<'static, str>>,
    ) -> &mut Self {
        self.statements.insert(query_type, Statement::new(template));
        self
    }

    pub fn add_statements<T: Into<Cow<'static, str>>>(
        &mut self,
        statements: impl IntoIterator<Item = (QueryType, T)>,
    ) -> &mut Self {
        self.statements.extend(
            statements
                .into_iter()
                .map(|(k, v)| (k, Statement::new(v))),
        );
        self
    }

    pub fn remove_clause(&mut self, clause: Clause) -> &mut Self {
        self.clauses.remove(&clause);
        self
    }

    pub fn remove_keyword(&mut self, keyword: Keyword) -> &mut Self {
        self.keywords.remove(&keyword);
        self
    }

    pub fn remove_statement(&mut self, query_type: QueryType) -> &mut Self {
        self.statements.remove(&query_type);
        self
    }

    pub fn has_clause(&self, clause: Clause) -> bool {
        self.clauses.contains_key(&clause)
    }

    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains_key(&keyword)
    }

    pub fn has_statement(&self, query_type: QueryType) -> bool {
        self.statements.contains_key(&query_type)
    }

    pub fn clause(&self, clause: Clause) -> Result<&str> {
        self.clauses
            .get(&clause)
            .map(AsRef::as_ref)
            .ok_or_else(|| SqlError::MissingClause(clause).into())
    }

    pub fn keyword(&self, keyword: Keyword) -> Result<&str> {
        self.keywords
            .get(&keyword)
            .map(AsRef::as_ref)
            .ok_or_else(|| SqlError::MissingKeyword(keyword).into())
    }

    pub fn statement(&self, query_type: QueryType) -> Result<&Statement> {
        self.statements
            .get(&query_type)
            .ok_or_else(|| SqlError::MissingStatement(query_type).into())
    }

    /// Substitutes `args` into the clause template, in order.
    pub fn format_clause(&self, clause: Clause, args: &[&str]) -> Result<String> {
        let template = self.clause(clause)?;
        let mut out = String::with_capacity(template.len() + args.iter().map(|v| v.len()).sum::<usize>());
        let mut args = args.iter();
        let mut rest = template;
        while let Some(i) = rest.find("%s") {
            out.push_str(&rest[..i]);
            if let Some(arg) = args.next() {
                out.push_str(arg);
            }
            rest = &rest[i + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}
