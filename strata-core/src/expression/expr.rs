use crate::{Binding, Func, Operand, Operator, RawExpr};
use serde::{Deserialize, Serialize};

/// Left hand side of an [`Expr`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprField {
    /// Column name, optionally dotted `table.column`.
    Name(String),
    Func(Func),
    Raw(RawExpr),
}

impl ExprField {
    pub fn name(&self) -> Option<&str> {
        match self {
            ExprField::Name(v) => Some(v),
            _ => None,
        }
    }
}

impl From<&str> for ExprField {
    fn from(value: &str) -> Self {
        ExprField::Name(value.into())
    }
}

impl From<String> for ExprField {
    fn from(value: String) -> Self {
        ExprField::Name(value)
    }
}

impl From<Func> for ExprField {
    fn from(value: Func) -> Self {
        ExprField::Func(value)
    }
}

impl From<RawExpr> for ExprField {
    fn from(value: RawExpr) -> Self {
        ExprField::Raw(value)
    }
}

/// A `field operator value` term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    field: ExprField,
    operator: Option<Operator>,
    value: Option<Operand>,
}

impl Expr {
    pub fn new(field: impl Into<ExprField>, operator: Operator, value: impl Into<Operand>) -> Self {
        Self {
            field: field.into(),
            operator: Some(operator),
            value: Some(value.into()),
        }
    }

    /// Operator without a value, `IS NULL` and `IS NOT NULL`.
    pub fn unary(field: impl Into<ExprField>, operator: Operator) -> Self {
        Self {
            field: field.into(),
            operator: Some(operator),
            value: None,
        }
    }

    /// Bare field, written without operator.
    pub fn field(field: impl Into<ExprField>) -> Self {
        Self {
            field: field.into(),
            operator: None,
            value: None,
        }
    }

    /// `field AS alias`.
    pub fn alias(field: impl Into<ExprField>, alias: impl Into<String>) -> Self {
        Self::new(field, Operator::As, Operand::Column(alias.into()))
    }

    pub fn get_field(&self) -> &ExprField {
        &self.field
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn value(&self) -> Option<&Operand> {
        self.value.as_ref()
    }

    /// Whether the value side is written, null checks never use one.
    pub fn use_value(&self) -> bool {
        match (self.operator, &self.value) {
            (Some(op), Some(value)) => !op.is_null_check() && !value.is_null(),
            _ => false,
        }
    }

    /// Appends the values this expression contributes, in writing order.
    pub(crate) fn collect_bindings(&self, out: &mut Vec<Binding>) {
        if let ExprField::Func(func) = &self.field {
            func.collect_bindings(out);
        }
        if self.operator == Some(Operator::As) || !self.use_value() {
            return;
        }
        if let Some(value) = &self.value {
            value.collect_bindings(self.field.name(), out);
        }
    }
}
