use strata_core::{
    Clause, Context, Grammar, IntegerType, QueryType, SqlWriter, StringType,
    TypeDefaults, TypeRegistry,
};

/// MySQL and MariaDB: backtick identifiers, statement priorities and `IGNORE`.
#[derive(Debug, Clone)]
pub struct MySqlSqlWriter {
    grammar: Grammar,
    types: TypeRegistry,
}

impl MySqlSqlWriter {
    pub fn new() -> Self {
        let mut grammar = Grammar::standard();
        grammar
            .remove_clause(Clause::OuterJoin)
            .add_statements([
                (
                    QueryType::Insert,
                    "INSERT {a.priority} {a.ignore} INTO {table} {fields} VALUES {values}",
                ),
                (
                    QueryType::MultiInsert,
                    "INSERT {a.priority} {a.ignore} INTO {table} {fields} VALUES {values}",
                ),
                (
                    QueryType::Update,
                    "UPDATE {a.priority} {a.ignore} {table} {joins} SET {fields} {where} {orderBy} {limit}",
                ),
                (
                    QueryType::Delete,
                    "DELETE {a.priority} {a.quick} {a.ignore} FROM {table} {joins} {where} {orderBy} {limit}",
                ),
                (QueryType::Truncate, "TRUNCATE TABLE {table}"),
            ]);
        let mut types = TypeRegistry::standard();
        types
            .register(IntegerType {
                name: "mediumint",
                sql_type: "MEDIUMINT",
                defaults: TypeDefaults::default(),
            })
            .register(StringType {
                name: "longtext",
                sql_type: "LONGTEXT",
                defaults: TypeDefaults::default(),
            })
            .register(StringType {
                name: "json",
                sql_type: "JSON",
                defaults: TypeDefaults::default(),
            });
        Self { grammar, types }
    }
}

impl Default for MySqlSqlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlWriter for MySqlSqlWriter {
    fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    fn types(&self) -> &TypeRegistry {
        &self.types
    }

    fn quote_char(&self) -> char {
        '`'
    }

    fn write_value_infinity(&self, _context: &mut Context, out: &mut String, negative: bool) {
        if negative {
            out.push('-');
        }
        out.push_str("1.0e+10000");
    }

    fn write_value_nan(&self, _context: &mut Context, out: &mut String) {
        log::warn!("MySQL has no NaN, writing NULL instead");
        out.push_str("NULL");
    }

    /// Backslash is an escape character in MySQL string literals.
    fn write_value_string(&self, _context: &mut Context, out: &mut String, value: &str) {
        out.push('\'');
        let mut position = 0;
        for (i, c) in value.char_indices() {
            let escaped = match c {
                '\'' => "''",
                '\\' => "\\\\",
                _ => continue,
            };
            out.push_str(&value[position..i]);
            out.push_str(escaped);
            position = i + 1;
        }
        out.push_str(&value[position..]);
        out.push('\'');
    }

    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("START TRANSACTION;");
    }
}

