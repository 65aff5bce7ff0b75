use crate::{Expr, ExprField, Keyword, Operand, Operator, SubQuery, Value, sub_query::Filter};
use serde::{Deserialize, Serialize};

/// How the parameters of a [`Predicate`] are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conjunction {
    And,
    Or,
    Xor,
    /// Written as `NOT (a OR b)`.
    Nor,
}

impl Conjunction {
    pub fn keyword(&self) -> Keyword {
        match self {
            Conjunction::And => Keyword::And,
            Conjunction::Or => Keyword::Or,
            Conjunction::Xor => Keyword::Xor,
            Conjunction::Nor => Keyword::Nor,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
            Conjunction::Xor => "XOR",
            Conjunction::Nor => "NOR",
        }
    }
}

/// Value produced by the predicate tree, with the field it is compared to (if any).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub field: Option<String>,
    pub value: Value,
}

impl Binding {
    pub fn new(field: Option<&str>, value: Value) -> Self {
        Self {
            field: field.map(Into::into),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PredicateParam {
    Expr(Expr),
    Predicate(Predicate),
}

/// Boolean node of a WHERE or HAVING tree.
///
/// Bindings are accumulated while parameters are added, nested predicates merge their
/// whole list into the parent so the root always holds the values in writing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    conjunction: Conjunction,
    params: Vec<PredicateParam>,
    bindings: Vec<Binding>,
}

impl Predicate {
    pub fn new(conjunction: Conjunction) -> Self {
        Self {
            conjunction,
            params: Vec::new(),
            bindings: Vec::new(),
        }
    }

    pub fn conjunction(&self) -> Conjunction {
        self.conjunction
    }

    pub fn params(&self) -> &[PredicateParam] {
        &self.params
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Whether an expression on `field` exists, nested predicates included.
    pub fn has_param(&self, field: &str) -> bool {
        self.params.iter().any(|v| match v {
            PredicateParam::Expr(expr) => expr.get_field().name() == Some(field),
            PredicateParam::Predicate(predicate) => predicate.has_param(field),
        })
    }

    pub fn add(
        &mut self,
        field: impl Into<ExprField>,
        operator: Operator,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.add_expr(Expr::new(field, operator, value))
    }

    pub fn add_expr(&mut self, expr: Expr) -> &mut Self {
        expr.collect_bindings(&mut self.bindings);
        self.params.push(PredicateParam::Expr(expr));
        self
    }

    fn nest(&mut self, conjunction: Conjunction, f: impl FnOnce(&mut Predicate)) -> &mut Self {
        let mut predicate = Predicate::new(conjunction);
        f(&mut predicate);
        if !predicate.is_empty() {
            self.bindings.extend(predicate.bindings.iter().cloned());
            self.params.push(PredicateParam::Predicate(predicate));
        }
        self
    }

    /// Nested AND group.
    pub fn also(&mut self, f: impl FnOnce(&mut Predicate)) -> &mut Self {
        self.nest(Conjunction::And, f)
    }

    /// Nested OR group.
    pub fn either(&mut self, f: impl FnOnce(&mut Predicate)) -> &mut Self {
        self.nest(Conjunction::Or, f)
    }

    /// Nested XOR group.
    pub fn maybe(&mut self, f: impl FnOnce(&mut Predicate)) -> &mut Self {
        self.nest(Conjunction::Xor, f)
    }

    /// Nested NOR group.
    pub fn neither(&mut self, f: impl FnOnce(&mut Predicate)) -> &mut Self {
        self.nest(Conjunction::Nor, f)
    }

    /// `=`, a list becomes `IN` and a null becomes `IS NULL`.
    pub fn eq(&mut self, field: impl Into<ExprField>, value: impl Into<Operand>) -> &mut Self {
        match value.into() {
            v @ Operand::List(..) => self.in_(field, v),
            v if v.is_null() => self.null(field),
            v => self.add(field, Operator::Eq, v),
        }
    }

    /// `!=`, a list becomes `NOT IN` and a null becomes `IS NOT NULL`.
    pub fn not_eq(&mut self, field: impl Into<ExprField>, value: impl Into<Operand>) -> &mut Self {
        match value.into() {
            v @ Operand::List(..) => self.not_in(field, v),
            v if v.is_null() => self.not_null(field),
            v => self.add(field, Operator::NotEq, v),
        }
    }

    pub fn gt(&mut self, field: impl Into<ExprField>, value: impl Into<Operand>) -> &mut Self {
        self.add(field, Operator::Gt, value)
    }

    pub fn gte(&mut self, field: impl Into<ExprField>, value: impl Into<Operand>) -> &mut Self {
        self.add(field, Operator::Gte, value)
    }

    pub fn lt(&mut self, field: impl Into<ExprField>, value: impl Into<Operand>) -> &mut Self {
        self.add(field, Operator::Lt, value)
    }

    pub fn lte(&mut self, field: impl Into<ExprField>, value: impl Into<Operand>) -> &mut Self {
        self.add(field, Operator::Lte, value)
    }

    /// Scalars are wrapped in a one element list.
    pub fn in_(&mut self, field: impl Into<ExprField>, value: impl Into<Operand>) -> &mut Self {
        self.add(field, Operator::In, Self::listed(value.into()))
    }

    pub fn not_in(&mut self, field: impl Into<ExprField>, value: impl Into<Operand>) -> &mut Self {
        self.add(field, Operator::NotIn, Self::listed(value.into()))
    }

    pub fn between(
        &mut self,
        field: impl Into<ExprField>,
        start: impl Into<Value>,
        end: impl Into<Value>,
    ) -> &mut Self {
        self.add(
            field,
            Operator::Between,
            Operand::List(vec![start.into(), end.into()]),
        )
    }

    pub fn not_between(
        &mut self,
        field: impl Into<ExprField>,
        start: impl Into<Value>,
        end: impl Into<Value>,
    ) -> &mut Self {
        self.add(
            field,
            Operator::NotBetween,
            Operand::List(vec![start.into(), end.into()]),
        )
    }

    pub fn like(&mut self, field: impl Into<ExprField>, value: impl Into<Operand>) -> &mut Self {
        self.add(field, Operator::Like, value)
    }

    pub fn not_like(&mut self, field: impl Into<ExprField>, value: impl Into<Operand>) -> &mut Self {
        self.add(field, Operator::NotLike, value)
    }

    pub fn regexp(&mut self, field: impl Into<ExprField>, value: impl Into<Operand>) -> &mut Self {
        self.add(field, Operator::Regexp, value)
    }

    pub fn not_regexp(
        &mut self,
        field: impl Into<ExprField>,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.add(field, Operator::NotRegexp, value)
    }

    pub fn rlike(&mut self, field: impl Into<ExprField>, value: impl Into<Operand>) -> &mut Self {
        self.add(field, Operator::Rlike, value)
    }

    pub fn null(&mut self, field: impl Into<ExprField>) -> &mut Self {
        self.add_expr(Expr::unary(field, Operator::Null))
    }

    pub fn not_null(&mut self, field: impl Into<ExprField>) -> &mut Self {
        self.add_expr(Expr::unary(field, Operator::NotNull))
    }

    /// `EXISTS (SELECT ...)`, the sub-query filter is overwritten.
    pub fn exists(&mut self, query: SubQuery) -> &mut Self {
        self.add("", Operator::Exists, query.with_filter(Filter::Exists))
    }

    pub fn not_exists(&mut self, query: SubQuery) -> &mut Self {
        self.add("", Operator::NotExists, query.with_filter(Filter::NotExists))
    }

    fn listed(value: Operand) -> Operand {
        match value {
            Operand::Value(v) => Operand::List(vec![v]),
            v => v,
        }
    }
}
