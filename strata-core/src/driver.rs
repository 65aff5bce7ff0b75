use crate::{
    Bind, BindType, Binder, Context, Prepared, Query, Result, Schema, SqlError, SqlWriter,
    TypeRegistry, Value, truncate_long,
};

/// Entry point of a dialect: the writer producing the text and the binder producing the values.
pub trait Driver: Send + Sync {
    type SqlWriter: SqlWriter;

    /// Scheme of the connection urls.
    const NAME: &'static str;

    fn sql_writer(&self) -> &Self::SqlWriter;

    fn types(&self) -> &TypeRegistry {
        self.sql_writer().types()
    }

    /// Literal form of a value, for logs and inline function arguments.
    fn escape(&self, value: &Value) -> String {
        let mut out = String::new();
        self.sql_writer()
            .write_value(&mut Context::default(), &mut out, value);
        out
    }

    fn resolve_type(&self, value: &Value) -> BindType {
        crate::resolve_type(value)
    }

    /// Converts a value through the type of `field` in `schema`, unknown fields fall back to inference.
    fn resolve_bind(&self, field: Option<&str>, value: Value, schema: Option<&Schema>) -> Result<Bind> {
        if value.is_null() {
            return Ok(Bind::new(value, BindType::Null));
        }
        let column = field.zip(schema).and_then(|(field, schema)| schema.column(field));
        let Some(column) = column else {
            let bind_type = self.resolve_type(&value);
            return Ok(Bind::new(value, bind_type));
        };
        let column_type = self.types().get(&column.type_name)?;
        let value = column_type.to(value);
        let bind_type = if value.is_null() {
            BindType::Null
        } else {
            column_type.binding_type()
        };
        Ok(Bind::new(value, bind_type))
    }

    fn resolve_params(&self, query: &Query) -> Result<Vec<Bind>> {
        Binder::new(self).resolve(query)
    }

    /// Statement text and binds, checked to have the same number of placeholders and values.
    fn prepare(&self, query: &Query) -> Result<Prepared> {
        let result = (|| {
            let mut context = Context::default();
            let mut sql = String::with_capacity(128);
            self.sql_writer().write_query(&mut context, &mut sql, query)?;
            log::debug!("{}", truncate_long!(sql));
            let binds = self.resolve_params(query)?;
            log::trace!("{:?}", binds);
            if context.counter as usize != binds.len() {
                return Err(SqlError::invalid_query(format!(
                    "The statement has {} placeholders but {} values were resolved",
                    context.counter,
                    binds.len()
                )));
            }
            Ok(Prepared::new(sql, binds))
        })();
        if let Err(e) = &result {
            log::error!("{:#}", e);
        }
        result
    }
}
