use crate::{Binding, Operand, RawExpr};
use serde::{Deserialize, Serialize};

/// How a function argument is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgType {
    /// Quoted as an identifier.
    Field,
    /// Written verbatim.
    Literal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncArg {
    pub kind: Option<ArgType>,
    pub value: Operand,
}

/// A named SQL function call: `COUNT(*)`, `SUBSTRING('abc', 2)`, `COALESCE(x, ?)`.
///
/// Untyped values are escaped inline through the dialect, nested functions and
/// sub-queries are written recursively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Func {
    name: String,
    args: Vec<FuncArg>,
    separator: String,
    alias: Option<String>,
}

impl Func {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            separator: ", ".into(),
            alias: None,
        }
    }

    /// Untyped argument.
    pub fn arg(mut self, value: impl Into<Operand>) -> Self {
        self.args.push(FuncArg {
            kind: None,
            value: value.into(),
        });
        self
    }

    pub fn args<T: Into<Operand>>(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.args.extend(values.into_iter().map(|v| FuncArg {
            kind: None,
            value: v.into(),
        }));
        self
    }

    /// Column argument, quoted as an identifier.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.args.push(FuncArg {
            kind: Some(ArgType::Field),
            value: Operand::Column(name.into()),
        });
        self
    }

    /// Literal argument, written exactly as given.
    pub fn literal(mut self, value: impl Into<String>) -> Self {
        self.args.push(FuncArg {
            kind: Some(ArgType::Literal),
            value: Operand::Raw(RawExpr::new(value)),
        });
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[FuncArg] {
        &self.args
    }

    pub fn get_separator(&self) -> &str {
        &self.separator
    }

    pub fn get_alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Only sub-queries and expressions nested in the arguments produce placeholders, whatever their kind.
    pub(crate) fn collect_bindings(&self, out: &mut Vec<Binding>) {
        for arg in &self.args {
            match &arg.value {
                Operand::SubQuery(query) => out.extend(query.bindings()),
                Operand::Func(func) => func.collect_bindings(out),
                Operand::Expr(expr) => expr.collect_bindings(out),
                _ => {}
            }
        }
    }
}
