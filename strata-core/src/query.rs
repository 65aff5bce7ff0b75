use crate::{
    Binding, Conjunction, Driver, Expr, ExprField, Func, Join, Keyword, Operand, Operator,
    Predicate, RawExpr, Result, Schema, SqlError, SqlWriter, SubQuery, split_once_ignore_case,
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, str::FromStr, sync::Arc, time::Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QueryType {
    Select,
    Insert,
    MultiInsert,
    Update,
    Delete,
    Truncate,
    CreateTable,
    CreateIndex,
    DropTable,
    DropIndex,
}

/// Entry of a SELECT field list (or a CREATE INDEX column list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field {
    Name(String),
    Expr(Expr),
    Func(Func),
    Raw(RawExpr),
    SubQuery(Box<SubQuery>),
}

impl Field {
    pub fn is_name(&self) -> bool {
        matches!(self, Field::Name(..))
    }

    pub(crate) fn collect_bindings(&self, out: &mut Vec<Binding>) {
        match self {
            Field::Expr(expr) => expr.collect_bindings(out),
            Field::Func(func) => func.collect_bindings(out),
            Field::SubQuery(query) => out.extend(query.bindings()),
            Field::Name(..) | Field::Raw(..) => {}
        }
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}

/// `"name AS alias"` becomes an aliasing expression.
impl From<String> for Field {
    fn from(value: String) -> Self {
        match split_once_ignore_case(&value, " AS ") {
            Some((name, alias)) => Field::Expr(Expr::alias(name.trim(), alias.trim())),
            None => Field::Name(value),
        }
    }
}

impl From<Expr> for Field {
    fn from(value: Expr) -> Self {
        Field::Expr(value)
    }
}

impl From<Func> for Field {
    fn from(value: Func) -> Self {
        Field::Func(value)
    }
}

impl From<RawExpr> for Field {
    fn from(value: RawExpr) -> Self {
        Field::Raw(value)
    }
}

impl From<SubQuery> for Field {
    fn from(value: SubQuery) -> Self {
        Field::SubQuery(value.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn keyword(&self) -> Keyword {
        match self {
            Order::Asc => Keyword::Asc,
            Order::Desc => Keyword::Desc,
        }
    }
}

impl FromStr for Order {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Order::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Order::Desc)
        } else {
            Err(SqlError::InvalidOrder(s.into()).into())
        }
    }
}

/// Anything accepted as an ordering direction.
pub trait AsOrder {
    fn as_order(self) -> Result<Order>;
}

impl AsOrder for Order {
    fn as_order(self) -> Result<Order> {
        Ok(self)
    }
}

impl AsOrder for &str {
    fn as_order(self) -> Result<Order> {
        self.parse()
    }
}

impl AsOrder for String {
    fn as_order(self) -> Result<Order> {
        self.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderBy {
    Field(String, Order),
    Func(Func, Option<Order>),
    Raw(RawExpr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundType {
    Union,
    Intersect,
    Except,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompoundFlag {
    All,
    Distinct,
}

impl CompoundFlag {
    pub fn keyword(&self) -> Keyword {
        match self {
            CompoundFlag::All => Keyword::All,
            CompoundFlag::Distinct => Keyword::Distinct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compound {
    pub kind: CompoundType,
    pub flag: Option<CompoundFlag>,
    pub query: SubQuery,
}

/// Statement modifiers, written in the `{a.*}` slots of the statement templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    Distinct,
    Ignore,
    Priority,
    Quick,
    Temporary,
    IfExists,
    IfNotExists,
    IndexType,
}

impl Attribute {
    /// Name of the template slot.
    pub fn slot(&self) -> &'static str {
        match self {
            Attribute::Distinct => "a.distinct",
            Attribute::Ignore => "a.ignore",
            Attribute::Priority => "a.priority",
            Attribute::Quick => "a.quick",
            Attribute::Temporary => "a.temporary",
            Attribute::IfExists => "a.ifExists",
            Attribute::IfNotExists => "a.ifNotExists",
            Attribute::IndexType => "a.type",
        }
    }

    /// Keyword written when the attribute is a flag set to true.
    pub fn flag_keyword(&self) -> Option<Keyword> {
        Some(match self {
            Attribute::Distinct => Keyword::Distinct,
            Attribute::Ignore => Keyword::Ignore,
            Attribute::Quick => Keyword::Quick,
            Attribute::Temporary => Keyword::Temporary,
            Attribute::IfExists => Keyword::IfExists,
            Attribute::IfNotExists => Keyword::IfNotExists,
            Attribute::Priority | Attribute::IndexType => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    Flag(bool),
    Keyword(Keyword),
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Flag(value)
    }
}

impl From<Keyword> for AttributeValue {
    fn from(value: Keyword) -> Self {
        AttributeValue::Keyword(value)
    }
}

/// Caching hint, carried along for the execution layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cache {
    pub key: String,
    pub ttl: Option<Duration>,
}

/// Field/value pairs of INSERT and UPDATE, in insertion order.
pub type Data = Vec<(String, Operand)>;

/// The statement being built: type, target table and every clause.
///
/// It only builds structure, [`Query::render`] and [`Query::resolve_bindings`] turn
/// it into SQL text and into the values for its placeholders. Both read the query
/// in the same order, keep it untouched between the two calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    query_type: QueryType,
    table: String,
    alias: Option<String>,
    fields: Vec<Field>,
    data: Data,
    rows: Vec<Data>,
    filter: Option<Predicate>,
    having: Option<Predicate>,
    joins: Vec<Join>,
    group_by: Vec<String>,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
    compounds: Vec<Compound>,
    attributes: BTreeMap<Attribute, AttributeValue>,
    schema: Option<Arc<Schema>>,
    cache: Option<Cache>,
    pub(crate) nested: bool,
}

impl Query {
    pub fn new(query_type: QueryType, table: impl Into<String>) -> Self {
        Self {
            query_type,
            table: table.into(),
            alias: None,
            fields: Vec::new(),
            data: Vec::new(),
            rows: Vec::new(),
            filter: None,
            having: None,
            joins: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            compounds: Vec::new(),
            attributes: BTreeMap::new(),
            schema: None,
            cache: None,
            nested: false,
        }
    }

    pub fn select(table: impl Into<String>) -> Self {
        Self::new(QueryType::Select, table)
    }

    pub fn insert(table: impl Into<String>) -> Self {
        Self::new(QueryType::Insert, table)
    }

    pub fn multi_insert(table: impl Into<String>) -> Self {
        Self::new(QueryType::MultiInsert, table)
    }

    pub fn update(table: impl Into<String>) -> Self {
        Self::new(QueryType::Update, table)
    }

    pub fn delete(table: impl Into<String>) -> Self {
        Self::new(QueryType::Delete, table)
    }

    pub fn truncate(table: impl Into<String>) -> Self {
        Self::new(QueryType::Truncate, table)
    }

    pub fn create_table(schema: impl Into<Arc<Schema>>) -> Self {
        let schema = schema.into();
        let mut query = Self::new(QueryType::CreateTable, schema.table());
        query.schema = Some(schema);
        query
    }

    pub fn drop_table(table: impl Into<String>) -> Self {
        Self::new(QueryType::DropTable, table)
    }

    /// The index name travels as the query alias.
    pub fn create_index(table: impl Into<String>, index: impl Into<String>) -> Self {
        let mut query = Self::new(QueryType::CreateIndex, table);
        query.alias = Some(index.into());
        query
    }

    pub fn drop_index(table: impl Into<String>, index: impl Into<String>) -> Self {
        let mut query = Self::new(QueryType::DropIndex, table);
        query.alias = Some(index.into());
        query
    }

    /// SELECT on the same table and schema, ready to be nested.
    pub fn sub_query(&self) -> SubQuery {
        let mut query = Query::select(self.table.clone());
        query.schema = self.schema.clone();
        SubQuery::new(query)
    }

    pub fn func(name: impl Into<String>) -> Func {
        Func::new(name)
    }

    pub fn expr(field: impl Into<ExprField>, operator: Operator, value: impl Into<Operand>) -> Expr {
        Expr::new(field, operator, value)
    }

    pub fn raw(value: impl Into<String>) -> RawExpr {
        RawExpr::new(value)
    }

    pub fn query_type(&self) -> QueryType {
        self.query_type
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// The alias is only meaningful when the query has joins, is nested, or names an index.
    pub fn alias(&self) -> Option<&str> {
        if !self.joins.is_empty()
            || self.nested
            || matches!(
                self.query_type,
                QueryType::CreateIndex | QueryType::DropIndex
            )
        {
            self.alias.as_deref()
        } else {
            None
        }
    }

    pub fn set_alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn is_nested(&self) -> bool {
        self.nested
    }

    /// Column list of SELECT and CREATE INDEX, names are deduplicated keeping the first one.
    pub fn fields<F: Into<Field>>(&mut self, fields: impl IntoIterator<Item = F>) -> &mut Self {
        for field in fields.into_iter().map(Into::into) {
            if !field.is_name() || !self.fields.contains(&field) {
                self.fields.push(field);
            }
        }
        self
    }

    pub fn get_fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field values of INSERT and UPDATE, replacing the previous ones.
    pub fn data<K, V>(&mut self, data: impl IntoIterator<Item = (K, V)>) -> Result<&mut Self>
    where
        K: Into<String>,
        V: Into<Operand>,
    {
        if !matches!(self.query_type, QueryType::Insert | QueryType::Update) {
            return Err(SqlError::invalid_query(format!(
                "Field data is only accepted by INSERT and UPDATE queries, not {:?}",
                self.query_type
            )));
        }
        self.data = Self::collect_data(data);
        Ok(self)
    }

    pub fn get_data(&self) -> &Data {
        &self.data
    }

    /// Appends rows to a MULTI_INSERT, every row must list the fields of the first one in the same order.
    pub fn rows<R, K, V>(&mut self, rows: impl IntoIterator<Item = R>) -> Result<&mut Self>
    where
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Operand>,
    {
        if self.query_type != QueryType::MultiInsert {
            return Err(SqlError::invalid_query(format!(
                "Rows are only accepted by MULTI_INSERT queries, not {:?}",
                self.query_type
            )));
        }
        for row in rows {
            let row = Self::collect_data(row);
            if row.is_empty() {
                return Err(SqlError::invalid_query("Cannot insert an empty row"));
            }
            let mismatch = self
                .rows
                .first()
                .is_some_and(|first| !first.iter().map(|v| &v.0).eq(row.iter().map(|v| &v.0)));
            if mismatch {
                return Err(SqlError::invalid_query(format!(
                    "Row {} does not have the same fields as the first row",
                    self.rows.len()
                )));
            }
            self.rows.push(row);
        }
        Ok(self)
    }

    pub fn get_rows(&self) -> &[Data] {
        &self.rows
    }

    fn collect_data<K, V>(data: impl IntoIterator<Item = (K, V)>) -> Data
    where
        K: Into<String>,
        V: Into<Operand>,
    {
        let mut result: Data = Vec::new();
        for (key, value) in data {
            let key = key.into();
            let value = value.into();
            match result.iter_mut().find(|v| v.0 == key) {
                Some(entry) => entry.1 = value,
                None => result.push((key, value)),
            }
        }
        result
    }

    fn modify_predicate(
        slot: &mut Option<Predicate>,
        conjunction: Conjunction,
        f: impl FnOnce(&mut Predicate),
    ) -> Result<()> {
        if let Some(existing) = slot {
            if existing.conjunction() != conjunction {
                return Err(SqlError::ExistingPredicate {
                    existing: existing.conjunction().name(),
                    requested: conjunction.name(),
                }
                .into());
            }
        }
        f(slot.get_or_insert_with(|| Predicate::new(conjunction)));
        Ok(())
    }

    fn check_where(&self) -> Result<()> {
        if !matches!(
            self.query_type,
            QueryType::Select | QueryType::Update | QueryType::Delete
        ) {
            return Err(SqlError::invalid_query(format!(
                "WHERE is not available on {:?} queries",
                self.query_type
            )));
        }
        Ok(())
    }

    fn check_having(&self) -> Result<()> {
        if self.query_type != QueryType::Select {
            return Err(SqlError::invalid_query(format!(
                "HAVING is not available on {:?} queries",
                self.query_type
            )));
        }
        Ok(())
    }

    /// AND-ed WHERE conditions.
    pub fn where_(&mut self, f: impl FnOnce(&mut Predicate)) -> Result<&mut Self> {
        self.check_where()?;
        Self::modify_predicate(&mut self.filter, Conjunction::And, f)?;
        Ok(self)
    }

    /// OR-ed WHERE conditions.
    pub fn or_where(&mut self, f: impl FnOnce(&mut Predicate)) -> Result<&mut Self> {
        self.check_where()?;
        Self::modify_predicate(&mut self.filter, Conjunction::Or, f)?;
        Ok(self)
    }

    /// XOR-ed WHERE conditions.
    pub fn xor_where(&mut self, f: impl FnOnce(&mut Predicate)) -> Result<&mut Self> {
        self.check_where()?;
        Self::modify_predicate(&mut self.filter, Conjunction::Xor, f)?;
        Ok(self)
    }

    /// Single AND-ed WHERE condition.
    pub fn where_expr(
        &mut self,
        field: impl Into<ExprField>,
        operator: Operator,
        value: impl Into<Operand>,
    ) -> Result<&mut Self> {
        let expr = Expr::new(field, operator, value);
        self.where_(|p| {
            p.add_expr(expr);
        })
    }

    pub fn having(&mut self, f: impl FnOnce(&mut Predicate)) -> Result<&mut Self> {
        self.check_having()?;
        Self::modify_predicate(&mut self.having, Conjunction::And, f)?;
        Ok(self)
    }

    pub fn or_having(&mut self, f: impl FnOnce(&mut Predicate)) -> Result<&mut Self> {
        self.check_having()?;
        Self::modify_predicate(&mut self.having, Conjunction::Or, f)?;
        Ok(self)
    }

    pub fn xor_having(&mut self, f: impl FnOnce(&mut Predicate)) -> Result<&mut Self> {
        self.check_having()?;
        Self::modify_predicate(&mut self.having, Conjunction::Xor, f)?;
        Ok(self)
    }

    pub fn get_where(&self) -> Option<&Predicate> {
        self.filter.as_ref()
    }

    pub fn get_having(&self) -> Option<&Predicate> {
        self.having.as_ref()
    }

    pub fn join(&mut self, join: Join) -> Result<&mut Self> {
        if !matches!(
            self.query_type,
            QueryType::Select | QueryType::Update | QueryType::Delete
        ) {
            return Err(SqlError::invalid_query(format!(
                "Joins are not available on {:?} queries",
                self.query_type
            )));
        }
        self.joins.push(join);
        Ok(self)
    }

    pub fn get_joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn group_by<S: Into<String>>(&mut self, fields: impl IntoIterator<Item = S>) -> &mut Self {
        for field in fields.into_iter().map(Into::into) {
            if !self.group_by.contains(&field) {
                self.group_by.push(field);
            }
        }
        self
    }

    pub fn get_group_by(&self) -> &[String] {
        &self.group_by
    }

    pub fn order_by(&mut self, field: impl Into<String>, direction: impl AsOrder) -> Result<&mut Self> {
        let direction = direction.as_order()?;
        self.order_by.push(OrderBy::Field(field.into(), direction));
        Ok(self)
    }

    pub fn order_by_func(&mut self, func: Func, direction: Option<Order>) -> &mut Self {
        self.order_by.push(OrderBy::Func(func, direction));
        self
    }

    /// Verbatim ordering, `RAND()` and the like.
    pub fn order_by_raw(&mut self, raw: RawExpr) -> &mut Self {
        self.order_by.push(OrderBy::Raw(raw));
        self
    }

    pub fn get_order_by(&self) -> &[OrderBy] {
        &self.order_by
    }

    /// Zero removes the limit.
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Only written together with a limit.
    pub fn offset(&mut self, offset: u64) -> &mut Self {
        self.offset = (offset > 0).then_some(offset);
        self
    }

    pub fn get_limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn get_offset(&self) -> Option<u64> {
        self.offset
    }

    fn compound(
        &mut self,
        kind: CompoundType,
        query: impl Into<SubQuery>,
        flag: Option<CompoundFlag>,
    ) -> Result<&mut Self> {
        let query = query.into();
        if self.query_type != QueryType::Select || query.query_type() != QueryType::Select {
            return Err(SqlError::invalid_query(format!(
                "{kind:?} combines SELECT queries only, got {:?} and {:?}",
                self.query_type,
                query.query_type()
            )));
        }
        self.compounds.push(Compound { kind, flag, query });
        Ok(self)
    }

    pub fn union(&mut self, query: impl Into<SubQuery>, flag: Option<CompoundFlag>) -> Result<&mut Self> {
        self.compound(CompoundType::Union, query, flag)
    }

    pub fn intersect(
        &mut self,
        query: impl Into<SubQuery>,
        flag: Option<CompoundFlag>,
    ) -> Result<&mut Self> {
        self.compound(CompoundType::Intersect, query, flag)
    }

    pub fn except(&mut self, query: impl Into<SubQuery>, flag: Option<CompoundFlag>) -> Result<&mut Self> {
        self.compound(CompoundType::Except, query, flag)
    }

    pub fn get_compounds(&self) -> &[Compound] {
        &self.compounds
    }

    pub fn attribute(&mut self, attribute: Attribute, value: impl Into<AttributeValue>) -> &mut Self {
        self.attributes.insert(attribute, value.into());
        self
    }

    pub fn distinct(&mut self, distinct: bool) -> &mut Self {
        self.attribute(Attribute::Distinct, distinct)
    }

    pub fn ignore(&mut self, ignore: bool) -> &mut Self {
        self.attribute(Attribute::Ignore, ignore)
    }

    pub fn temporary(&mut self, temporary: bool) -> &mut Self {
        self.attribute(Attribute::Temporary, temporary)
    }

    pub fn if_exists(&mut self, if_exists: bool) -> &mut Self {
        self.attribute(Attribute::IfExists, if_exists)
    }

    pub fn if_not_exists(&mut self, if_not_exists: bool) -> &mut Self {
        self.attribute(Attribute::IfNotExists, if_not_exists)
    }

    pub fn get_attributes(&self) -> &BTreeMap<Attribute, AttributeValue> {
        &self.attributes
    }

    pub fn schema(&mut self, schema: impl Into<Arc<Schema>>) -> &mut Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn get_schema(&self) -> Option<&Schema> {
        self.schema.as_deref()
    }

    pub fn cache(&mut self, key: impl Into<String>, ttl: Option<Duration>) -> &mut Self {
        self.cache = Some(Cache {
            key: key.into(),
            ttl,
        });
        self
    }

    pub fn get_cache(&self) -> Option<&Cache> {
        self.cache.as_ref()
    }

    /// Values of the placeholders in writing order, read from the predicate binding lists.
    pub fn bindings(&self) -> Vec<Binding> {
        let mut out = Vec::new();
        if self.query_type == QueryType::Select {
            for field in &self.fields {
                field.collect_bindings(&mut out);
            }
            for field in self.joins.iter().flat_map(|v| v.get_fields()) {
                field.collect_bindings(&mut out);
            }
        }
        for (name, value) in self.data.iter().chain(self.rows.iter().flatten()) {
            value.collect_bindings(Some(name), &mut out);
        }
        if let Some(filter) = &self.filter {
            out.extend(filter.bindings().iter().cloned());
        }
        if let Some(having) = &self.having {
            out.extend(having.bindings().iter().cloned());
        }
        for compound in &self.compounds {
            out.extend(compound.query.bindings());
        }
        for order in &self.order_by {
            if let OrderBy::Func(func, ..) = order {
                func.collect_bindings(&mut out);
            }
        }
        out
    }

    /// SQL text for the given dialect.
    pub fn render(&self, writer: &impl SqlWriter) -> Result<String> {
        writer.render(self)
    }

    /// Typed values for the placeholders of [`Query::render`], in the same order.
    pub fn resolve_bindings<D: Driver>(&self, driver: &D) -> Result<Vec<crate::Bind>> {
        driver.resolve_params(self)
    }
}
