use strata_core::{
    BinaryType, Clause, ColumnType, Context, FloatType, Grammar, IntegerType, Keyword,
    PrimaryKey, QueryType, Result, Schema, SqlWriter, StringType, TemporalKind, TemporalType,
    TypeDefaults, TypeRegistry, UniqueKey,
};

/// SQLite: storage classes as column types, `INSERT OR IGNORE`, inline `AUTOINCREMENT`
/// primary keys and `DELETE FROM` in place of TRUNCATE.
#[derive(Debug, Clone)]
pub struct SqliteSqlWriter {
    grammar: Grammar,
    types: TypeRegistry,
}

impl SqliteSqlWriter {
    pub fn new() -> Self {
        let mut grammar = Grammar::standard();
        grammar
            .add_clause(Clause::UniqueKey, "UNIQUE (%s)")
            .remove_clause(Clause::Rlike)
            .remove_clause(Clause::StraightJoin)
            .remove_clause(Clause::CharacterSet)
            .remove_clause(Clause::Comment)
            .remove_clause(Clause::Index)
            .remove_clause(Clause::TableOption)
            .add_keywords([
                (Keyword::Ignore, "OR IGNORE"),
                (Keyword::AutoIncrement, "PRIMARY KEY AUTOINCREMENT"),
            ])
            .remove_keyword(Keyword::Xor)
            .remove_keyword(Keyword::Unsigned)
            .remove_keyword(Keyword::Zerofill)
            .add_statements([
                (
                    QueryType::Insert,
                    "INSERT {a.ignore} INTO {table} {fields} VALUES {values}",
                ),
                (
                    QueryType::MultiInsert,
                    "INSERT {a.ignore} INTO {table} {fields} VALUES {values}",
                ),
                (QueryType::Update, "UPDATE {a.ignore} {table} SET {fields} {where}"),
                (QueryType::Delete, "DELETE FROM {table} {where}"),
                (QueryType::Truncate, "DELETE FROM {table}"),
                (
                    QueryType::CreateTable,
                    "CREATE {a.temporary} TABLE {a.ifNotExists} {table} (\n{columns}{keys}\n)",
                ),
                (
                    QueryType::CreateIndex,
                    "CREATE {a.type} INDEX {a.ifNotExists} {index} ON {table} ({fields})",
                ),
                (QueryType::DropIndex, "DROP INDEX {a.ifExists} {index}"),
            ]);
        let mut types = TypeRegistry::standard();
        for name in ["int", "integer", "bigint", "smallint", "tinyint"] {
            types.register(IntegerType {
                name,
                sql_type: "INTEGER",
                defaults: TypeDefaults::default(),
            });
        }
        types.register(IntegerType {
            name: "serial",
            sql_type: "INTEGER",
            defaults: TypeDefaults {
                ai: true,
                ..Default::default()
            },
        });
        for name in ["float", "double"] {
            types.register(FloatType {
                name,
                sql_type: "REAL",
                defaults: TypeDefaults::default(),
            });
        }
        types.register(FloatType {
            name: "decimal",
            sql_type: "NUMERIC",
            defaults: TypeDefaults::default(),
        });
        for name in ["char", "varchar", "text"] {
            types.register(StringType {
                name,
                sql_type: "TEXT",
                defaults: TypeDefaults::default(),
            });
        }
        for name in ["blob", "binary"] {
            types.register(BinaryType {
                name,
                sql_type: "BLOB",
            });
        }
        for (name, kind) in [
            ("date", TemporalKind::Date),
            ("datetime", TemporalKind::DateTime),
            ("timestamp", TemporalKind::DateTime),
            ("time", TemporalKind::Time),
        ] {
            types.register(TemporalType {
                name,
                sql_type: "TEXT",
                kind,
            });
        }
        Self { grammar, types }
    }

    fn is_auto_increment(&self, schema: &Schema, column: &str) -> bool {
        schema.column(column).is_some_and(|column| {
            column.ai
                || self
                    .types
                    .get(&column.type_name)
                    .is_ok_and(|v| v.default_options().ai)
        })
    }
}

impl Default for SqliteSqlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlWriter for SqliteSqlWriter {
    fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    fn types(&self) -> &TypeRegistry {
        &self.types
    }

    fn write_value_infinity(&self, _context: &mut Context, out: &mut String, negative: bool) {
        if negative {
            out.push('-');
        }
        out.push_str("1.0e+10000");
    }

    fn write_value_nan(&self, _context: &mut Context, out: &mut String) {
        log::warn!("SQLite stores NaN as NULL");
        out.push_str("NULL");
    }

    /// Auto increment is only available on `INTEGER PRIMARY KEY` columns.
    fn write_column_type(
        &self,
        out: &mut String,
        column_type: &dyn ColumnType,
        length: Option<&str>,
        ai: bool,
    ) -> Result<()> {
        if ai {
            out.push_str("INTEGER");
            return Ok(());
        }
        out.push_str(column_type.sql_type());
        if let Some(length) = length {
            out.push('(');
            out.push_str(length);
            out.push(')');
        }
        Ok(())
    }

    /// Already declared inline when the key is a single auto increment column.
    fn write_primary_key(&self, out: &mut String, schema: &Schema, primary: &PrimaryKey) -> Result<()> {
        match primary.columns.as_slice() {
            [] => Ok(()),
            [column] if self.is_auto_increment(schema, column) => Ok(()),
            columns => {
                self.write_constraint(out, primary.constraint.as_deref())?;
                self.write_clause(out, Clause::PrimaryKey, &[&self.quote_list(columns)])
            }
        }
    }

    fn write_unique_key(&self, out: &mut String, _index: &str, unique: &UniqueKey) -> Result<()> {
        self.write_constraint(out, unique.constraint.as_deref())?;
        self.write_clause(out, Clause::UniqueKey, &[&self.quote_list(&unique.columns)])
    }
}
