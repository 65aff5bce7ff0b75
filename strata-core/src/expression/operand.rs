use crate::{AsValue, Binding, Expr, Func, RawExpr, SubQuery, Value};
use serde::{Deserialize, Serialize};

/// Right hand side of an [`Expr`], also used for insert/update data and function arguments.
///
/// Only `Value` and `List` produce placeholders, the other variants are written inline
/// (their own nested values excluded, sub-queries bring their binds along).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Value(Value),
    List(Vec<Value>),
    SubQuery(Box<SubQuery>),
    Func(Func),
    Raw(RawExpr),
    Column(String),
    Expr(Box<Expr>),
}

impl Operand {
    /// Reference to another column, quoted as identifier.
    pub fn column(name: impl Into<String>) -> Self {
        Operand::Column(name.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Operand::Value(v) if v.is_null())
    }

    pub fn as_sub_query(&self) -> Option<&SubQuery> {
        match self {
            Operand::SubQuery(v) => Some(v),
            _ => None,
        }
    }

    /// Appends the values this operand contributes, in writing order.
    pub(crate) fn collect_bindings(&self, field: Option<&str>, out: &mut Vec<Binding>) {
        match self {
            Operand::Value(v) => out.push(Binding::new(field, v.clone())),
            Operand::List(values) => {
                out.extend(values.iter().map(|v| Binding::new(field, v.clone())))
            }
            Operand::SubQuery(query) => out.extend(query.bindings()),
            Operand::Func(func) => func.collect_bindings(out),
            Operand::Expr(expr) => expr.collect_bindings(out),
            Operand::Raw(..) | Operand::Column(..) => {}
        }
    }
}

impl<T: AsValue> From<T> for Operand {
    fn from(value: T) -> Self {
        Operand::Value(value.as_value())
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl<T: AsValue> From<Vec<T>> for Operand {
    fn from(value: Vec<T>) -> Self {
        Operand::List(value.into_iter().map(AsValue::as_value).collect())
    }
}

impl<T: AsValue, const N: usize> From<[T; N]> for Operand {
    fn from(value: [T; N]) -> Self {
        Operand::List(value.into_iter().map(AsValue::as_value).collect())
    }
}

impl From<Vec<Value>> for Operand {
    fn from(value: Vec<Value>) -> Self {
        Operand::List(value)
    }
}

impl From<SubQuery> for Operand {
    fn from(value: SubQuery) -> Self {
        Operand::SubQuery(value.into())
    }
}

impl From<Func> for Operand {
    fn from(value: Func) -> Self {
        Operand::Func(value)
    }
}

impl From<RawExpr> for Operand {
    fn from(value: RawExpr) -> Self {
        Operand::Raw(value)
    }
}

impl From<Expr> for Operand {
    fn from(value: Expr) -> Self {
        Operand::Expr(value.into())
    }
}
