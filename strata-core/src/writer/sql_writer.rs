use crate::{
    AttributeValue, Clause, Column, ColumnType, DefaultValue, Expr, ExprField, Field,
    Func, Grammar, Join, Keyword, Operand, Operator, OrderBy, Predicate, PredicateParam,
    PrimaryKey, Query, QueryType, Result, Schema, SqlError, SubQuery, TypeRegistry, UniqueKey,
    Value, separated_by,
    try_separated_by,
    writer::{Context, Fragment},
};
use std::{collections::HashMap, fmt::Write};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($this:ident, $context:ident, $out:ident, $value:expr) => {{
        if $value.is_infinite() {
            $this.write_value_infinity($context, $out, $value.is_sign_negative());
        } else if $value.is_nan() {
            $this.write_value_nan($context, $out);
        } else {
            let mut buffer = ryu::Buffer::new();
            $out.push_str(buffer.format($value));
        }
    }};
}

/// Slot values of a statement template.
pub type Params = HashMap<&'static str, String>;

/// Dialect printer turning a [`Query`] into SQL text.
///
/// Every placeholder written bumps `context.counter`, the binder produces one value for
/// each of them in the same order. Dialects implement `grammar` and `types`, then override
/// the methods where their syntax differs.
pub trait SqlWriter: Send + Sync {
    fn grammar(&self) -> &Grammar;

    fn types(&self) -> &TypeRegistry;

    fn quote_char(&self) -> char {
        '"'
    }

    /// Quote each dotted segment, `*` stays bare and quote chars already present are dropped.
    fn write_identifier_quoted(&self, _context: &mut Context, out: &mut String, value: &str) {
        let quote = self.quote_char();
        separated_by(
            out,
            value.split('.'),
            |out, segment| {
                let segment = segment.trim_matches(quote);
                if segment == "*" {
                    out.push('*');
                    return;
                }
                out.push(quote);
                out.extend(segment.chars().filter(|c| *c != quote));
                out.push(quote);
            },
            ".",
        );
    }

    fn quote(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len() + 2);
        self.write_identifier_quoted(&mut Context::default(), &mut out, value);
        out
    }

    fn quote_list(&self, values: &[String]) -> String {
        let mut out = String::new();
        separated_by(
            &mut out,
            values,
            |out, v| self.write_identifier_quoted(&mut Context::default(), out, v),
            ", ",
        );
        out
    }

    fn write_clause(&self, out: &mut String, clause: Clause, args: &[&str]) -> Result<()> {
        out.push_str(&self.grammar().format_clause(clause, args)?);
        Ok(())
    }

    fn write_keyword(&self, out: &mut String, keyword: Keyword) -> Result<()> {
        out.push_str(self.grammar().keyword(keyword)?);
        Ok(())
    }

    fn write_placeholder(&self, context: &mut Context, out: &mut String) {
        context.counter += 1;
        out.push('?');
    }

    /// Literal value, escaped for the dialect.
    fn write_value(&self, context: &mut Context, out: &mut String, value: &Value) {
        match value {
            v if v.is_null() => self.write_value_none(context, out),
            Value::Boolean(Some(v)) => self.write_value_bool(context, out, *v),
            Value::Int8(Some(v)) => write_integer!(out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::UInt8(Some(v)) => write_integer!(out, *v),
            Value::UInt16(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => write_float!(self, context, out, *v),
            Value::Float64(Some(v)) => write_float!(self, context, out, *v),
            Value::Decimal(Some(v), ..) => drop(write!(out, "{}", v)),
            Value::Varchar(Some(v)) => self.write_value_string(context, out, v),
            Value::Blob(Some(v)) => self.write_value_blob(context, out, v.as_ref()),
            Value::Date(Some(v)) => self.write_value_date(context, out, v, false),
            Value::Time(Some(v)) => self.write_value_time(context, out, v, false),
            Value::Timestamp(Some(v)) => self.write_value_timestamp(context, out, v),
            Value::TimestampWithTimezone(Some(v)) => {
                self.write_value_timestamptz(context, out, v)
            }
            Value::Uuid(Some(v)) => drop(write!(out, "'{}'", v)),
            _ => log::error!("Cannot write {:?}", value),
        }
    }

    fn write_value_none(&self, _context: &mut Context, out: &mut String) {
        out.push_str("NULL");
    }

    fn write_value_bool(&self, _context: &mut Context, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize]);
    }

    fn write_value_infinity(&self, _context: &mut Context, out: &mut String, negative: bool) {
        out.push_str(if negative { "'-Infinity'" } else { "'Infinity'" });
    }

    fn write_value_nan(&self, _context: &mut Context, out: &mut String) {
        out.push_str("'NaN'");
    }

    /// Single quoted, inner quotes doubled.
    fn write_value_string(&self, _context: &mut Context, out: &mut String, value: &str) {
        out.push('\'');
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == '\'' {
                out.push_str(&value[position..i]);
                out.push_str("''");
                position = i + 1;
            }
        }
        out.push_str(&value[position..]);
        out.push('\'');
    }

    fn write_value_blob(&self, _context: &mut Context, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        for b in value {
            let _ = write!(out, "{:02X}", b);
        }
        out.push('\'');
    }

    fn write_value_date(&self, _context: &mut Context, out: &mut String, value: &Date, timestamp: bool) {
        let b = if timestamp { "" } else { "'" };
        let _ = write!(
            out,
            "{b}{:04}-{:02}-{:02}{b}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    fn write_value_time(&self, _context: &mut Context, out: &mut String, value: &Time, timestamp: bool) {
        let b = if timestamp { "" } else { "'" };
        let _ = write!(
            out,
            "{b}{:02}:{:02}:{:02}",
            value.hour(),
            value.minute(),
            value.second()
        );
        let mut subsecond = value.nanosecond();
        if subsecond != 0 {
            let mut width = 9;
            while subsecond % 10 == 0 {
                subsecond /= 10;
                width -= 1;
            }
            let _ = write!(out, ".{:0width$}", subsecond);
        }
        out.push_str(b);
    }

    fn write_value_timestamp(&self, context: &mut Context, out: &mut String, value: &PrimitiveDateTime) {
        out.push('\'');
        self.write_value_date(context, out, &value.date(), true);
        out.push(' ');
        self.write_value_time(context, out, &value.time(), true);
        out.push('\'');
    }

    fn write_value_timestamptz(&self, context: &mut Context, out: &mut String, value: &OffsetDateTime) {
        let date_time = value.to_offset(time::UtcOffset::UTC);
        self.write_value_timestamp(
            context,
            out,
            &PrimitiveDateTime::new(date_time.date(), date_time.time()),
        );
    }

    /// Complete statement, terminated by `;`.
    fn render(&self, query: &Query) -> Result<String> {
        let mut context = Context::default();
        let mut out = String::with_capacity(128);
        self.write_query(&mut context, &mut out, query)?;
        Ok(out)
    }

    fn write_query(&self, context: &mut Context, out: &mut String, query: &Query) -> Result<()> {
        let sql = match query.query_type() {
            QueryType::Select => self.build_select(context, query),
            QueryType::Insert => self.build_insert(context, query),
            QueryType::MultiInsert => self.build_multi_insert(context, query),
            QueryType::Update => self.build_update(context, query),
            QueryType::Delete => self.build_delete(context, query),
            QueryType::Truncate => self.build_truncate(context, query),
            QueryType::CreateTable => self.build_create_table(context, query),
            QueryType::CreateIndex => self.build_create_index(context, query),
            QueryType::DropTable => self.build_drop_table(context, query),
            QueryType::DropIndex => self.build_drop_index(context, query),
        }?;
        out.push_str(&sql);
        out.push(';');
        Ok(())
    }

    /// Fills the statement template, a non empty part without a slot to land in is unsupported.
    fn render_statement(&self, query_type: QueryType, params: &Params) -> Result<String> {
        let statement = self.grammar().statement(query_type)?;
        let slots = statement.slots();
        if let Some((slot, _)) = params
            .iter()
            .find(|(k, v)| !v.is_empty() && !slots.contains(*k))
        {
            return Err(SqlError::Unsupported(format!(
                "{query_type:?} statements have no `{slot}` slot in this dialect"
            ))
            .into());
        }
        Ok(statement.render(params))
    }

    fn build_select(&self, context: &mut Context, query: &Query) -> Result<String> {
        self.grammar().statement(QueryType::Select)?;
        let mut params = Params::new();
        self.write_attributes(query, &mut params)?;
        let out = params.entry("fields").or_default();
        self.write_fields(&mut context.switch_fragment(Fragment::Fields).current, out, query)?;
        let out = params.entry("table").or_default();
        self.write_table(&mut context.switch_fragment(Fragment::Table).current, out, query)?;
        let out = params.entry("joins").or_default();
        self.write_joins(&mut context.switch_fragment(Fragment::Joins).current, out, query)?;
        let out = params.entry("where").or_default();
        self.write_where(&mut context.switch_fragment(Fragment::Where).current, out, query)?;
        let out = params.entry("groupBy").or_default();
        self.write_group_by(out, query)?;
        let out = params.entry("having").or_default();
        self.write_having(&mut context.switch_fragment(Fragment::Having).current, out, query)?;
        let out = params.entry("compounds").or_default();
        self.write_compounds(&mut context.switch_fragment(Fragment::Compounds).current, out, query)?;
        let out = params.entry("orderBy").or_default();
        self.write_order_by(&mut context.switch_fragment(Fragment::OrderBy).current, out, query)?;
        let out = params.entry("limit").or_default();
        self.write_limit_offset(out, query.get_limit(), query.get_offset())?;
        self.render_statement(QueryType::Select, &params)
    }

    fn build_insert(&self, context: &mut Context, query: &Query) -> Result<String> {
        let mut params = Params::new();
        self.write_attributes(query, &mut params)?;
        let out = params.entry("table").or_default();
        self.write_table(&mut context.switch_fragment(Fragment::Table).current, out, query)?;
        let out = params.entry("fields").or_default();
        self.write_fields(&mut context.switch_fragment(Fragment::Fields).current, out, query)?;
        let out = params.entry("values").or_default();
        self.write_values(&mut context.switch_fragment(Fragment::Values).current, out, query)?;
        self.render_statement(QueryType::Insert, &params)
    }

    fn build_multi_insert(&self, context: &mut Context, query: &Query) -> Result<String> {
        let mut params = Params::new();
        self.write_attributes(query, &mut params)?;
        let out = params.entry("table").or_default();
        self.write_table(&mut context.switch_fragment(Fragment::Table).current, out, query)?;
        let out = params.entry("fields").or_default();
        self.write_fields(&mut context.switch_fragment(Fragment::Fields).current, out, query)?;
        let out = params.entry("values").or_default();
        self.write_values(&mut context.switch_fragment(Fragment::Values).current, out, query)?;
        self.render_statement(QueryType::MultiInsert, &params)
    }

    fn build_update(&self, context: &mut Context, query: &Query) -> Result<String> {
        let mut params = Params::new();
        self.write_attributes(query, &mut params)?;
        let out = params.entry("table").or_default();
        self.write_table(&mut context.switch_fragment(Fragment::Table).current, out, query)?;
        let out = params.entry("joins").or_default();
        self.write_joins(&mut context.switch_fragment(Fragment::Joins).current, out, query)?;
        let out = params.entry("fields").or_default();
        self.write_fields(&mut context.switch_fragment(Fragment::Set).current, out, query)?;
        let out = params.entry("where").or_default();
        self.write_where(&mut context.switch_fragment(Fragment::Where).current, out, query)?;
        let out = params.entry("orderBy").or_default();
        self.write_order_by(&mut context.switch_fragment(Fragment::OrderBy).current, out, query)?;
        let out = params.entry("limit").or_default();
        self.write_limit_offset(out, query.get_limit(), None)?;
        self.render_statement(QueryType::Update, &params)
    }

    fn build_delete(&self, context: &mut Context, query: &Query) -> Result<String> {
        let mut params = Params::new();
        self.write_attributes(query, &mut params)?;
        let out = params.entry("table").or_default();
        self.write_table(&mut context.switch_fragment(Fragment::Table).current, out, query)?;
        let out = params.entry("joins").or_default();
        self.write_joins(&mut context.switch_fragment(Fragment::Joins).current, out, query)?;
        let out = params.entry("where").or_default();
        self.write_where(&mut context.switch_fragment(Fragment::Where).current, out, query)?;
        let out = params.entry("orderBy").or_default();
        self.write_order_by(&mut context.switch_fragment(Fragment::OrderBy).current, out, query)?;
        let out = params.entry("limit").or_default();
        self.write_limit_offset(out, query.get_limit(), None)?;
        self.render_statement(QueryType::Delete, &params)
    }

    fn build_truncate(&self, context: &mut Context, query: &Query) -> Result<String> {
        let mut params = Params::new();
        self.write_attributes(query, &mut params)?;
        let out = params.entry("table").or_default();
        self.write_table(&mut context.switch_fragment(Fragment::Table).current, out, query)?;
        self.render_statement(QueryType::Truncate, &params)
    }

    fn build_create_table(&self, context: &mut Context, query: &Query) -> Result<String> {
        let Some(schema) = query.get_schema() else {
            return Err(SqlError::InvalidSchema(
                "CREATE TABLE requires a table schema".into(),
            )
            .into());
        };
        if schema.columns().is_empty() {
            return Err(SqlError::InvalidSchema(format!(
                "Table `{}` has no columns",
                schema.table()
            ))
            .into());
        }
        let mut context = context.switch_fragment(Fragment::CreateTable);
        let context = &mut context.current;
        let mut params = Params::new();
        self.write_attributes(query, &mut params)?;
        let table = if schema.table().is_empty() {
            query.table()
        } else {
            schema.table()
        };
        if table.is_empty() {
            return Err(SqlError::invalid_query("CREATE TABLE requires a table name"));
        }
        params.insert("table", self.quote(table));
        let out = params.entry("columns").or_default();
        self.write_columns(context, out, schema)?;
        let out = params.entry("keys").or_default();
        self.write_table_keys(context, out, schema)?;
        let out = params.entry("options").or_default();
        self.write_table_options(context, out, schema)?;
        self.render_statement(QueryType::CreateTable, &params)
    }

    fn build_create_index(&self, context: &mut Context, query: &Query) -> Result<String> {
        let mut params = Params::new();
        self.write_attributes(query, &mut params)?;
        params.insert("index", self.index_name(query)?);
        let out = params.entry("table").or_default();
        self.write_table(&mut context.switch_fragment(Fragment::Table).current, out, query)?;
        let out = params.entry("fields").or_default();
        self.write_fields(&mut context.switch_fragment(Fragment::CreateIndex).current, out, query)?;
        self.render_statement(QueryType::CreateIndex, &params)
    }

    fn build_drop_table(&self, context: &mut Context, query: &Query) -> Result<String> {
        let mut params = Params::new();
        self.write_attributes(query, &mut params)?;
        let out = params.entry("table").or_default();
        self.write_table(&mut context.switch_fragment(Fragment::Table).current, out, query)?;
        self.render_statement(QueryType::DropTable, &params)
    }

    /// The table is written only when the dialect names it, some have schema wide index names.
    fn build_drop_index(&self, context: &mut Context, query: &Query) -> Result<String> {
        let mut params = Params::new();
        self.write_attributes(query, &mut params)?;
        params.insert("index", self.index_name(query)?);
        if self
            .grammar()
            .statement(QueryType::DropIndex)?
            .slots()
            .contains(&"table")
        {
            let out = params.entry("table").or_default();
            self.write_table(&mut context.switch_fragment(Fragment::Table).current, out, query)?;
        }
        self.render_statement(QueryType::DropIndex, &params)
    }

    fn index_name(&self, query: &Query) -> Result<String> {
        match query.alias() {
            Some(index) if !index.is_empty() => Ok(self.quote(index)),
            _ => Err(SqlError::invalid_query("Index statements require an index name")),
        }
    }

    /// Fills the `a.*` slots, flags write their keyword only when set.
    ///
    /// Modifiers the dialect template has no slot for are skipped.
    fn write_attributes(&self, query: &Query, params: &mut Params) -> Result<()> {
        let statement = self.grammar().statement(query.query_type())?;
        let slots = statement.slots();
        for (attribute, value) in query.get_attributes() {
            if !slots.contains(&attribute.slot()) {
                log::trace!(
                    "{:?} has no `{}` slot, modifier skipped",
                    query.query_type(),
                    attribute.slot()
                );
                continue;
            }
            let keyword = match value {
                AttributeValue::Flag(false) => continue,
                AttributeValue::Flag(true) => attribute.flag_keyword().ok_or_else(|| {
                    SqlError::invalid_query(format!(
                        "Attribute {attribute:?} expects a keyword, not a flag"
                    ))
                })?,
                AttributeValue::Keyword(keyword) => *keyword,
            };
            params.insert(attribute.slot(), self.grammar().keyword(keyword)?.to_string());
        }
        Ok(())
    }

    fn write_table(&self, _context: &mut Context, out: &mut String, query: &Query) -> Result<()> {
        if query.table().is_empty() {
            return Err(SqlError::invalid_query(format!(
                "{:?} query without a table",
                query.query_type()
            )));
        }
        let table = self.quote(query.table());
        match query.alias() {
            Some(alias)
                if matches!(
                    query.query_type(),
                    QueryType::Select | QueryType::Update | QueryType::Delete
                ) =>
            {
                self.write_clause(out, Clause::As, &[&table, &self.quote(alias)])
            }
            _ => {
                out.push_str(&table);
                Ok(())
            }
        }
    }

    fn write_fields(&self, context: &mut Context, out: &mut String, query: &Query) -> Result<()> {
        match query.query_type() {
            QueryType::Select => {
                let joined = query.get_joins().iter().any(|v| !v.get_fields().is_empty());
                if query.get_fields().is_empty() && !joined {
                    match query.alias() {
                        Some(alias) => {
                            self.write_identifier_quoted(context, out, alias);
                            out.push_str(".*");
                        }
                        None => out.push('*'),
                    }
                    return Ok(());
                }
                let qualifier = query.alias();
                let fields = query
                    .get_fields()
                    .iter()
                    .map(|v| (qualifier, v))
                    .chain(query.get_joins().iter().flat_map(|join| {
                        join.get_fields().iter().map(|v| (Some(join.qualifier()), v))
                    }));
                try_separated_by(
                    out,
                    fields,
                    |out, (qualifier, field)| self.write_field(context, out, field, qualifier),
                    ", ",
                )
            }
            QueryType::Insert => {
                if query.get_data().is_empty() {
                    return Err(SqlError::invalid_query("INSERT without field data"));
                }
                out.push('(');
                separated_by(
                    out,
                    query.get_data(),
                    |out, (name, _)| self.write_identifier_quoted(context, out, name),
                    ", ",
                );
                out.push(')');
                Ok(())
            }
            QueryType::MultiInsert => {
                let Some(first) = query.get_rows().first() else {
                    return Err(SqlError::invalid_query("MULTI_INSERT without rows"));
                };
                out.push('(');
                separated_by(
                    out,
                    first,
                    |out, (name, _)| self.write_identifier_quoted(context, out, name),
                    ", ",
                );
                out.push(')');
                Ok(())
            }
            QueryType::Update => {
                if query.get_data().is_empty() {
                    return Err(SqlError::invalid_query("UPDATE without field data"));
                }
                try_separated_by(
                    out,
                    query.get_data(),
                    |out, (name, value)| {
                        let mut field = String::new();
                        self.write_identifier_quoted(context, &mut field, name);
                        let mut operand = String::new();
                        self.write_operand(context, &mut operand, value)?;
                        self.write_clause(out, Clause::Assign, &[&field, &operand])
                    },
                    ", ",
                )
            }
            QueryType::CreateIndex => {
                if query.get_fields().is_empty() {
                    return Err(SqlError::invalid_query("CREATE INDEX without columns"));
                }
                try_separated_by(
                    out,
                    query.get_fields(),
                    |out, field| self.write_field(context, out, field, None),
                    ", ",
                )
            }
            query_type => Err(SqlError::invalid_query(format!(
                "{query_type:?} queries have no field list"
            ))),
        }
    }

    /// Single field, bare names get the qualifier unless already dotted.
    fn write_field(
        &self,
        context: &mut Context,
        out: &mut String,
        field: &Field,
        qualifier: Option<&str>,
    ) -> Result<()> {
        match field {
            Field::Name(name) => {
                match qualifier {
                    Some(qualifier) if !name.contains('.') => self.write_identifier_quoted(
                        context,
                        out,
                        &format!("{qualifier}.{name}"),
                    ),
                    _ => self.write_identifier_quoted(context, out, name),
                }
                Ok(())
            }
            Field::Expr(expr) => self.write_expression(context, out, expr),
            Field::Func(func) => self.write_function(context, out, func),
            Field::Raw(raw) => {
                out.push_str(raw.value());
                Ok(())
            }
            Field::SubQuery(sub) => self.write_sub_query(context, out, sub),
        }
    }

    fn write_values(&self, context: &mut Context, out: &mut String, query: &Query) -> Result<()> {
        let rows: Box<dyn Iterator<Item = _>> = match query.query_type() {
            QueryType::Insert => Box::new(std::iter::once(query.get_data())),
            QueryType::MultiInsert => Box::new(query.get_rows().iter()),
            query_type => {
                return Err(SqlError::invalid_query(format!(
                    "{query_type:?} queries have no VALUES list"
                )));
            }
        };
        try_separated_by(
            out,
            rows,
            |out, row| {
                out.push('(');
                try_separated_by(
                    out,
                    row,
                    |out, (_, value)| self.write_operand(context, out, value),
                    ", ",
                )?;
                out.push(')');
                Ok(())
            },
            ", ",
        )
    }

    fn write_joins(&self, context: &mut Context, out: &mut String, query: &Query) -> Result<()> {
        try_separated_by(
            out,
            query.get_joins(),
            |out, join| self.write_join(context, out, join),
            " ",
        )
    }

    fn write_join(&self, context: &mut Context, out: &mut String, join: &Join) -> Result<()> {
        let mut table = String::new();
        self.write_identifier_quoted(context, &mut table, join.table());
        if let Some(alias) = join.get_alias() {
            table = self
                .grammar()
                .format_clause(Clause::As, &[&table, &self.quote(alias)])?;
        }
        self.write_clause(out, join.join_type().clause(), &[&table])?;
        if !join.conditions().is_empty() {
            let mut on = String::new();
            try_separated_by(
                &mut on,
                join.conditions(),
                |out, (left, right)| {
                    self.write_clause(out, Clause::Assign, &[&self.quote(left), &self.quote(right)])
                },
                " AND ",
            )?;
            out.push(' ');
            self.write_clause(out, Clause::On, &[&on])?;
        }
        Ok(())
    }

    fn write_where(&self, context: &mut Context, out: &mut String, query: &Query) -> Result<()> {
        match query.get_where() {
            Some(predicate) if !predicate.is_empty() => {
                let mut text = String::new();
                self.write_predicate(context, &mut text, predicate)?;
                self.write_clause(out, Clause::Where, &[&text])
            }
            _ => Ok(()),
        }
    }

    fn write_having(&self, context: &mut Context, out: &mut String, query: &Query) -> Result<()> {
        match query.get_having() {
            Some(predicate) if !predicate.is_empty() => {
                let mut text = String::new();
                self.write_predicate(context, &mut text, predicate)?;
                self.write_clause(out, Clause::Having, &[&text])
            }
            _ => Ok(()),
        }
    }

    /// Parameters joined by the conjunction keyword, nested predicates grouped in parentheses.
    fn write_predicate(
        &self,
        context: &mut Context,
        out: &mut String,
        predicate: &Predicate,
    ) -> Result<()> {
        let keyword = predicate.conjunction().keyword();
        if predicate.conjunction() == crate::Conjunction::Xor && !self.grammar().has_keyword(keyword) {
            return Err(SqlError::Unsupported(
                "XOR predicates are not available in this dialect".into(),
            )
            .into());
        }
        let separator = format!(" {} ", self.grammar().keyword(keyword)?);
        let mut text = String::new();
        try_separated_by(
            &mut text,
            predicate.params(),
            |out, param| match param {
                PredicateParam::Expr(expr) => self.write_expression(context, out, expr),
                PredicateParam::Predicate(nested) => {
                    let mut inner = String::new();
                    self.write_predicate(context, &mut inner, nested)?;
                    self.write_clause(out, Clause::Group, &[&inner])
                }
            },
            &separator,
        )?;
        if predicate.conjunction() == crate::Conjunction::Nor {
            self.write_clause(out, Clause::Not, &[&text])
        } else {
            out.push_str(&text);
            Ok(())
        }
    }

    fn write_expression(&self, context: &mut Context, out: &mut String, expr: &Expr) -> Result<()> {
        if let Some(sub) = expr.value().and_then(Operand::as_sub_query) {
            if sub.filter().is_some_and(|v| v.is_exists()) {
                return self.write_sub_query(context, out, sub);
            }
        }
        let mut field = String::new();
        self.write_expr_field(context, &mut field, expr.get_field())?;
        let Some(operator) = expr.operator() else {
            out.push_str(&field);
            return Ok(());
        };
        if operator == Operator::As {
            let alias = match expr.value() {
                Some(Operand::Column(alias)) => self.quote(alias),
                Some(operand) => {
                    let mut alias = String::new();
                    self.write_operand(context, &mut alias, operand)?;
                    alias
                }
                None => return Err(SqlError::invalid_query("Alias expression without alias")),
            };
            return self.write_clause(out, Clause::As, &[&field, &alias]);
        }
        out.push_str(&field);
        if !field.is_empty() {
            out.push(' ');
        }
        if operator.is_null_check() {
            return self.write_clause(out, operator.clause().unwrap_or(Clause::IsNull), &[]);
        }
        if !expr.use_value() {
            return match operator {
                Operator::Eq | Operator::In => self.write_clause(out, Clause::IsNull, &[]),
                Operator::NotEq | Operator::NotIn => {
                    self.write_clause(out, Clause::IsNotNull, &[])
                }
                _ => {
                    let mut null = String::new();
                    self.write_value_none(context, &mut null);
                    self.write_clause(out, Clause::Expression, &[operator.symbol(), &null])
                }
            };
        }
        let Some(value) = expr.value() else {
            return Ok(());
        };
        match (operator, value) {
            (Operator::In | Operator::NotIn, Operand::SubQuery(sub)) => {
                let mut text = String::new();
                self.write_sub_query(context, &mut text, sub)?;
                let clause = operator.clause().unwrap_or(Clause::In);
                let template = self.grammar().format_clause(clause, &["\0"])?;
                match template.find("(\0)") {
                    Some(i) => {
                        out.push_str(&template[..i]);
                        out.push_str(&text);
                        out.push_str(&template[i + 3..]);
                    }
                    None => out.push_str(&template.replace('\0', &text)),
                }
                Ok(())
            }
            (Operator::In | Operator::NotIn, Operand::List(values)) => {
                if values.is_empty() {
                    return Err(SqlError::invalid_query(format!(
                        "{} with an empty list",
                        operator.symbol()
                    )));
                }
                let mut list = String::new();
                separated_by(
                    &mut list,
                    values,
                    |out, _| self.write_placeholder(context, out),
                    ", ",
                );
                self.write_clause(out, operator.clause().unwrap_or(Clause::In), &[&list])
            }
            (Operator::Between | Operator::NotBetween, Operand::List(values)) if values.len() == 2 => {
                let (mut start, mut end) = (String::new(), String::new());
                self.write_placeholder(context, &mut start);
                self.write_placeholder(context, &mut end);
                self.write_clause(
                    out,
                    operator.clause().unwrap_or(Clause::Between),
                    &[&start, &end],
                )
            }
            (Operator::Between | Operator::NotBetween, _) => Err(SqlError::invalid_query(format!(
                "{} requires exactly two values",
                operator.symbol()
            ))),
            (operator, value) => {
                let mut operand = String::new();
                self.write_operand(context, &mut operand, value)?;
                match operator
                    .clause()
                    .filter(|clause| self.grammar().has_clause(*clause))
                {
                    Some(clause) => self.write_clause(out, clause, &[&operand]),
                    None => self.write_clause(out, Clause::Expression, &[operator.symbol(), &operand]),
                }
            }
        }
    }

    fn write_expr_field(&self, context: &mut Context, out: &mut String, field: &ExprField) -> Result<()> {
        match field {
            ExprField::Name(name) if name.is_empty() => Ok(()),
            ExprField::Name(name) => {
                self.write_identifier_quoted(context, out, name);
                Ok(())
            }
            ExprField::Func(func) => self.write_function(context, out, func),
            ExprField::Raw(raw) => {
                out.push_str(raw.value());
                Ok(())
            }
        }
    }

    /// Value side of expressions and data, only values and lists produce placeholders.
    fn write_operand(&self, context: &mut Context, out: &mut String, operand: &Operand) -> Result<()> {
        match operand {
            Operand::Value(..) => self.write_placeholder(context, out),
            Operand::List(values) => {
                out.push('(');
                separated_by(out, values, |out, _| self.write_placeholder(context, out), ", ");
                out.push(')');
            }
            Operand::SubQuery(sub) => self.write_sub_query(context, out, sub)?,
            Operand::Func(func) => self.write_function(context, out, func)?,
            Operand::Raw(raw) => out.push_str(raw.value()),
            Operand::Column(name) => self.write_identifier_quoted(context, out, name),
            Operand::Expr(expr) => self.write_expression(context, out, expr)?,
        }
        Ok(())
    }

    /// Untyped scalar arguments are escaped inline, never bound.
    fn write_function(&self, context: &mut Context, out: &mut String, func: &Func) -> Result<()> {
        let mut args = String::new();
        {
            let mut context = context.switch_fragment(Fragment::Function);
            let context = &mut context.current;
            try_separated_by(
                &mut args,
                func.arguments(),
                |out, arg| match &arg.value {
                    Operand::Value(value) => {
                        self.write_value(context, out, value);
                        Ok(())
                    }
                    Operand::List(values) => {
                        separated_by(out, values, |out, v| self.write_value(context, out, v), ", ");
                        Ok(())
                    }
                    operand => self.write_operand(context, out, operand),
                },
                func.get_separator(),
            )?;
        }
        let call = self
            .grammar()
            .format_clause(Clause::Function, &[func.name(), &args])?;
        match func.get_alias() {
            Some(alias) => self.write_clause(out, Clause::As, &[&call, &self.quote(alias)]),
            None => {
                out.push_str(&call);
                Ok(())
            }
        }
    }

    /// Parenthesized SELECT, preceded by its filter keyword and followed by its alias in field lists.
    fn write_sub_query(&self, context: &mut Context, out: &mut String, sub: &SubQuery) -> Result<()> {
        if !self.grammar().has_statement(QueryType::Select) {
            return Err(SqlError::Unsupported(
                "Sub-queries require a SELECT statement in the dialect grammar".into(),
            )
            .into());
        }
        let fragment = context.fragment;
        let select = {
            let mut context = context.switch_fragment(Fragment::None);
            self.build_select(&mut context.current, sub.query())?
        };
        if let Some(filter) = sub.filter() {
            self.write_keyword(out, filter.keyword())?;
            out.push(' ');
        }
        let text = self.grammar().format_clause(Clause::SubQuery, &[&select])?;
        match sub.query().alias() {
            Some(alias) if fragment == Fragment::Fields => {
                self.write_clause(out, Clause::As, &[&text, &self.quote(alias)])
            }
            _ => {
                out.push_str(&text);
                Ok(())
            }
        }
    }

    fn write_group_by(&self, out: &mut String, query: &Query) -> Result<()> {
        if query.get_group_by().is_empty() {
            return Ok(());
        }
        self.write_clause(out, Clause::GroupBy, &[&self.quote_list(query.get_group_by())])
    }

    fn write_order_by(&self, context: &mut Context, out: &mut String, query: &Query) -> Result<()> {
        if query.get_order_by().is_empty() {
            return Ok(());
        }
        let mut text = String::new();
        try_separated_by(
            &mut text,
            query.get_order_by(),
            |out, order| match order {
                OrderBy::Field(name, direction) => self.write_clause(
                    out,
                    Clause::OrderDirection,
                    &[&self.quote(name), self.grammar().keyword(direction.keyword())?],
                ),
                OrderBy::Func(func, direction) => {
                    let mut call = String::new();
                    self.write_function(context, &mut call, func)?;
                    match direction {
                        Some(direction) => self.write_clause(
                            out,
                            Clause::OrderDirection,
                            &[&call, self.grammar().keyword(direction.keyword())?],
                        ),
                        None => {
                            out.push_str(&call);
                            Ok(())
                        }
                    }
                }
                OrderBy::Raw(raw) => {
                    out.push_str(raw.value());
                    Ok(())
                }
            },
            ", ",
        )?;
        self.write_clause(out, Clause::OrderBy, &[&text])
    }

    /// The offset is only written together with a limit.
    fn write_limit_offset(&self, out: &mut String, limit: Option<u64>, offset: Option<u64>) -> Result<()> {
        let Some(limit) = limit else {
            return Ok(());
        };
        let mut buffer = itoa::Buffer::new();
        let limit = buffer.format(limit).to_string();
        match offset {
            Some(offset) => {
                let mut buffer = itoa::Buffer::new();
                self.write_clause(out, Clause::LimitOffset, &[&limit, buffer.format(offset)])
            }
            None => self.write_clause(out, Clause::Limit, &[&limit]),
        }
    }

    fn write_compounds(&self, context: &mut Context, out: &mut String, query: &Query) -> Result<()> {
        try_separated_by(
            out,
            query.get_compounds(),
            |out, compound| {
                if !self.grammar().has_statement(QueryType::Select) {
                    return Err(SqlError::Unsupported(
                        "Compound queries require a SELECT statement in the dialect grammar".into(),
                    )
                    .into());
                }
                let mut text = String::new();
                if let Some(flag) = compound.flag {
                    self.write_keyword(&mut text, flag.keyword())?;
                    text.push(' ');
                }
                text.push_str(&self.build_select(context, compound.query.query())?);
                let clause = match compound.kind {
                    crate::CompoundType::Union => Clause::Union,
                    crate::CompoundType::Intersect => Clause::Intersect,
                    crate::CompoundType::Except => Clause::Except,
                };
                self.write_clause(out, clause, &[&text])
            },
            " ",
        )
    }

    /// Column definitions separated by `,\n`.
    fn write_columns(&self, context: &mut Context, out: &mut String, schema: &Schema) -> Result<()> {
        try_separated_by(
            out,
            schema.columns(),
            |out, (name, column)| self.write_column(context, out, name, column),
            ",\n",
        )
    }

    fn write_column(&self, context: &mut Context, out: &mut String, name: &str, column: &Column) -> Result<()> {
        let column_type = self.types().get(&column.type_name)?;
        let defaults = column_type.default_options();
        let length = column.length.as_deref().or(defaults.length);
        let ai = column.ai || defaults.ai;
        let unsigned = column.unsigned || defaults.unsigned;
        self.write_identifier_quoted(context, out, name);
        out.push(' ');
        self.write_column_type(out, column_type, length, ai)?;
        let grammar = self.grammar();
        if unsigned && grammar.has_keyword(Keyword::Unsigned) {
            out.push(' ');
            self.write_keyword(out, Keyword::Unsigned)?;
        }
        if column.zerofill && grammar.has_keyword(Keyword::Zerofill) {
            out.push(' ');
            self.write_keyword(out, Keyword::Zerofill)?;
        }
        if let Some(charset) = &column.charset {
            if grammar.has_clause(Clause::CharacterSet) {
                out.push(' ');
                self.write_clause(out, Clause::CharacterSet, &[charset])?;
            }
        }
        if let Some(collate) = &column.collate {
            out.push(' ');
            self.write_clause(out, Clause::Collate, &[collate])?;
        }
        out.push(' ');
        self.write_keyword(out, if column.null { Keyword::Null } else { Keyword::NotNull })?;
        if let Some(default) = &column.default {
            let mut value = String::new();
            match default {
                DefaultValue::Value(v) => self.write_value(context, &mut value, v),
                DefaultValue::Custom(raw) => value.push_str(raw.value()),
            }
            out.push(' ');
            self.write_clause(out, Clause::Default, &[&value])?;
        }
        if ai && grammar.has_keyword(Keyword::AutoIncrement) {
            out.push(' ');
            self.write_keyword(out, Keyword::AutoIncrement)?;
        }
        if let Some(comment) = &column.comment {
            if grammar.has_clause(Clause::Comment) {
                let mut value = String::new();
                self.write_value_string(context, &mut value, comment);
                out.push(' ');
                self.write_clause(out, Clause::Comment, &[&value])?;
            }
        }
        Ok(())
    }

    /// Type name with its length, `VARCHAR(255)`.
    fn write_column_type(
        &self,
        out: &mut String,
        column_type: &dyn ColumnType,
        length: Option<&str>,
        _ai: bool,
    ) -> Result<()> {
        out.push_str(column_type.sql_type());
        if let Some(length) = length {
            let _ = write!(out, "({length})");
        }
        Ok(())
    }

    /// Primary, unique, foreign and index keys, each one preceded by `,\n`.
    fn write_table_keys(&self, _context: &mut Context, out: &mut String, schema: &Schema) -> Result<()> {
        let mut key = String::new();
        if let Some(primary) = schema.primary_key() {
            self.write_primary_key(&mut key, schema, primary)?;
        }
        if !key.is_empty() {
            out.push_str(",\n");
            out.push_str(&key);
        }
        for (index, unique) in schema.unique_keys() {
            key.clear();
            self.write_unique_key(&mut key, index, unique)?;
            out.push_str(",\n");
            out.push_str(&key);
        }
        for (column, foreign) in schema.foreign_keys() {
            let Some((table, target)) = foreign.target() else {
                return Err(SqlError::InvalidSchema(format!(
                    "Foreign key on `{column}` must reference `table.column`, got `{}`",
                    foreign.references
                ))
                .into());
            };
            out.push_str(",\n");
            self.write_constraint(out, foreign.constraint.as_deref())?;
            self.write_clause(
                out,
                Clause::ForeignKey,
                &[&self.quote(column), &self.quote(table), &self.quote(target)],
            )?;
            if let Some(action) = foreign.on_delete {
                out.push(' ');
                let keyword = self.grammar().keyword(action.keyword())?;
                self.write_clause(out, Clause::OnDelete, &[keyword])?;
            }
            if let Some(action) = foreign.on_update {
                out.push(' ');
                let keyword = self.grammar().keyword(action.keyword())?;
                self.write_clause(out, Clause::OnUpdate, &[keyword])?;
            }
        }
        if self.grammar().has_clause(Clause::Index) {
            for (group, columns) in schema.indexes() {
                out.push_str(",\n");
                self.write_clause(
                    out,
                    Clause::Index,
                    &[&self.quote(group), &self.quote_list(columns)],
                )?;
            }
        }
        Ok(())
    }

    /// Table level primary key, nothing is written when there are no columns.
    fn write_primary_key(&self, out: &mut String, _schema: &Schema, primary: &PrimaryKey) -> Result<()> {
        if primary.columns.is_empty() {
            return Ok(());
        }
        self.write_constraint(out, primary.constraint.as_deref())?;
        self.write_clause(out, Clause::PrimaryKey, &[&self.quote_list(&primary.columns)])
    }

    fn write_unique_key(&self, out: &mut String, index: &str, unique: &UniqueKey) -> Result<()> {
        self.write_constraint(out, unique.constraint.as_deref())?;
        self.write_clause(
            out,
            Clause::UniqueKey,
            &[&self.quote(index), &self.quote_list(&unique.columns)],
        )
    }

    fn write_constraint(&self, out: &mut String, constraint: Option<&str>) -> Result<()> {
        if let Some(constraint) = constraint {
            self.write_clause(out, Clause::Constraint, &[&self.quote(constraint)])?;
            out.push(' ');
        }
        Ok(())
    }

    /// `ENGINE=InnoDB CHARACTER SET=utf8`, skipped when the dialect has no table options.
    fn write_table_options(&self, context: &mut Context, out: &mut String, schema: &Schema) -> Result<()> {
        if !self.grammar().has_clause(Clause::TableOption) {
            return Ok(());
        }
        try_separated_by(
            out,
            schema.options(),
            |out, (key, value)| {
                let keyword = match key.to_ascii_lowercase().as_str() {
                    "engine" => Some(Keyword::Engine),
                    "charset" | "characterset" | "character set" => Some(Keyword::CharacterSet),
                    "collate" => Some(Keyword::Collate),
                    "comment" => Some(Keyword::Comment),
                    "autoincrement" | "auto_increment" => Some(Keyword::AutoIncrement),
                    _ => None,
                };
                let key = match keyword {
                    Some(keyword) => self.grammar().keyword(keyword)?.to_string(),
                    None => key.to_ascii_uppercase(),
                };
                let mut text = String::new();
                if keyword == Some(Keyword::Comment) {
                    self.write_value_string(context, &mut text, value);
                } else {
                    text.push_str(value);
                }
                self.write_clause(out, Clause::TableOption, &[&key, &text])
            },
            " ",
        )
    }

    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("BEGIN;");
    }

    fn write_transaction_commit(&self, out: &mut String) {
        out.push_str("COMMIT;");
    }

    fn write_transaction_rollback(&self, out: &mut String) {
        out.push_str("ROLLBACK;");
    }
}

/// Fallback writer with the standard grammar and double quoted identifiers.
#[derive(Debug, Clone)]
pub struct GenericSqlWriter {
    grammar: Grammar,
    types: TypeRegistry,
}

impl GenericSqlWriter {
    pub fn new() -> Self {
        Self {
            grammar: Grammar::standard(),
            types: TypeRegistry::standard(),
        }
    }

    /// Same writer with a patched grammar.
    pub fn with_grammar(grammar: Grammar) -> Self {
        Self {
            grammar,
            types: TypeRegistry::standard(),
        }
    }
}

impl Default for GenericSqlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlWriter for GenericSqlWriter {
    fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    fn types(&self) -> &TypeRegistry {
        &self.types
    }
}
