use crate::{
    Driver, Expr, ExprField, Field, Func, Operand, Operator, OrderBy, Predicate, PredicateParam,
    Query, QueryType, Result, Schema, Value, parse_strict_integer,
};
use serde::{Deserialize, Serialize};

/// How a value is handed to the database client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindType {
    Null,
    Integer,
    String,
    Boolean,
    Lob,
}

/// Value of one `?` placeholder, already converted for its column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bind {
    pub value: Value,
    pub bind_type: BindType,
}

impl Bind {
    pub fn new(value: Value, bind_type: BindType) -> Self {
        Self { value, bind_type }
    }
}

/// Binding type inferred from the value alone.
///
/// Floats and decimals travel as strings so that no precision is lost on the way.
pub fn resolve_type(value: &Value) -> BindType {
    if value.is_null() {
        return BindType::Null;
    }
    match value {
        Value::Blob(..) => BindType::Lob,
        Value::Boolean(..) => BindType::Boolean,
        v if v.is_integer() => BindType::Integer,
        Value::Varchar(Some(v)) if parse_strict_integer(v).is_some() => BindType::Integer,
        _ => BindType::String,
    }
}

/// Walks a query and produces its binds in the order the writer emits the placeholders.
///
/// Every nested query is resolved against its own schema.
pub struct Binder<'d, D: Driver + ?Sized> {
    driver: &'d D,
}

impl<'d, D: Driver + ?Sized> Binder<'d, D> {
    pub fn new(driver: &'d D) -> Self {
        Self { driver }
    }

    pub fn resolve(&self, query: &Query) -> Result<Vec<Bind>> {
        let mut out = Vec::new();
        self.query(query, &mut out)?;
        Ok(out)
    }

    fn query(&self, query: &Query, out: &mut Vec<Bind>) -> Result<()> {
        let schema = query.get_schema();
        if query.query_type() == QueryType::Select {
            let join_fields = query.get_joins().iter().flat_map(|v| v.get_fields());
            for field in query.get_fields().iter().chain(join_fields) {
                self.field(field, schema, out)?;
            }
        }
        let rows = query.get_rows().iter().flatten();
        for (name, value) in query.get_data().iter().chain(rows) {
            self.operand(Some(name), value, schema, out)?;
        }
        if let Some(predicate) = query.get_where() {
            self.predicate(predicate, schema, out)?;
        }
        if let Some(predicate) = query.get_having() {
            self.predicate(predicate, schema, out)?;
        }
        for compound in query.get_compounds() {
            self.query(compound.query.query(), out)?;
        }
        for order in query.get_order_by() {
            if let OrderBy::Func(func, ..) = order {
                self.func(func, schema, out)?;
            }
        }
        Ok(())
    }

    fn field(&self, field: &Field, schema: Option<&Schema>, out: &mut Vec<Bind>) -> Result<()> {
        match field {
            Field::Expr(expr) => self.expr(expr, schema, out),
            Field::Func(func) => self.func(func, schema, out),
            Field::SubQuery(sub) => self.query(sub.query(), out),
            Field::Name(..) | Field::Raw(..) => Ok(()),
        }
    }

    fn predicate(
        &self,
        predicate: &Predicate,
        schema: Option<&Schema>,
        out: &mut Vec<Bind>,
    ) -> Result<()> {
        for param in predicate.params() {
            match param {
                PredicateParam::Expr(expr) => self.expr(expr, schema, out)?,
                PredicateParam::Predicate(nested) => self.predicate(nested, schema, out)?,
            }
        }
        Ok(())
    }

    fn expr(&self, expr: &Expr, schema: Option<&Schema>, out: &mut Vec<Bind>) -> Result<()> {
        if let ExprField::Func(func) = expr.get_field() {
            self.func(func, schema, out)?;
        }
        if expr.operator() == Some(Operator::As) || !expr.use_value() {
            return Ok(());
        }
        match expr.value() {
            Some(value) => self.operand(expr.get_field().name(), value, schema, out),
            None => Ok(()),
        }
    }

    fn func(&self, func: &Func, schema: Option<&Schema>, out: &mut Vec<Bind>) -> Result<()> {
        for arg in func.arguments() {
            match &arg.value {
                Operand::SubQuery(sub) => self.query(sub.query(), out)?,
                Operand::Func(func) => self.func(func, schema, out)?,
                Operand::Expr(expr) => self.expr(expr, schema, out)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn operand(
        &self,
        field: Option<&str>,
        operand: &Operand,
        schema: Option<&Schema>,
        out: &mut Vec<Bind>,
    ) -> Result<()> {
        match operand {
            Operand::Value(value) => {
                out.push(self.driver.resolve_bind(field, value.clone(), schema)?);
            }
            Operand::List(values) => {
                for value in values {
                    out.push(self.driver.resolve_bind(field, value.clone(), schema)?);
                }
            }
            Operand::SubQuery(sub) => self.query(sub.query(), out)?,
            Operand::Func(func) => self.func(func, schema, out)?,
            Operand::Expr(expr) => self.expr(expr, schema, out)?,
            Operand::Raw(..) | Operand::Column(..) => {}
        }
        Ok(())
    }
}
