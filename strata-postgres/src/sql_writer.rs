use std::fmt::Write;
use strata_core::{
    BinaryType, Clause, ColumnType, Context, FloatType, Grammar, IntegerType, Keyword, QueryType,
    Result, SqlWriter, StringType, TemporalKind, TemporalType, TypeDefaults, TypeRegistry,
    UniqueKey,
};

/// Types whose declaration accepts a `(length)` or `(precision, scale)` modifier.
const SIZED_TYPES: [&str; 6] = ["CHAR", "VARCHAR", "DECIMAL", "NUMERIC", "TIME", "TIMESTAMP"];

/// PostgreSQL: `~` regular expressions, `ON CONFLICT DO NOTHING`, serial columns and
/// constraint-named unique keys. UPDATE and DELETE take no joins, ordering or limit.
#[derive(Debug, Clone)]
pub struct PostgresSqlWriter {
    grammar: Grammar,
    types: TypeRegistry,
}

impl PostgresSqlWriter {
    pub fn new() -> Self {
        let mut grammar = Grammar::standard();
        grammar
            .add_clauses([
                (Clause::Regexp, "~ %s"),
                (Clause::NotRegexp, "!~ %s"),
                (Clause::UniqueKey, "UNIQUE (%s)"),
            ])
            .remove_clause(Clause::Rlike)
            .remove_clause(Clause::StraightJoin)
            .remove_clause(Clause::CharacterSet)
            .remove_clause(Clause::Comment)
            .remove_clause(Clause::Index)
            .remove_clause(Clause::TableOption)
            .add_keyword(Keyword::Ignore, "ON CONFLICT DO NOTHING")
            .remove_keyword(Keyword::Xor)
            .remove_keyword(Keyword::AutoIncrement)
            .remove_keyword(Keyword::Unsigned)
            .remove_keyword(Keyword::Zerofill)
            .add_statements([
                (
                    QueryType::Insert,
                    "INSERT INTO {table} {fields} VALUES {values} {a.ignore}",
                ),
                (
                    QueryType::MultiInsert,
                    "INSERT INTO {table} {fields} VALUES {values} {a.ignore}",
                ),
                (QueryType::Update, "UPDATE {table} SET {fields} {where}"),
                (QueryType::Delete, "DELETE FROM {table} {where}"),
                (
                    QueryType::CreateTable,
                    "CREATE {a.temporary} TABLE {a.ifNotExists} {table} (\n{columns}{keys}\n)",
                ),
                (QueryType::DropIndex, "DROP INDEX {a.ifExists} {index}"),
            ]);
        let mut types = TypeRegistry::standard();
        types
            .register(IntegerType {
                name: "int",
                sql_type: "INTEGER",
                defaults: TypeDefaults::default(),
            })
            .register(IntegerType {
                name: "tinyint",
                sql_type: "SMALLINT",
                defaults: TypeDefaults::default(),
            })
            .register(FloatType {
                name: "float",
                sql_type: "REAL",
                defaults: TypeDefaults::default(),
            })
            .register(FloatType {
                name: "double",
                sql_type: "DOUBLE PRECISION",
                defaults: TypeDefaults::default(),
            })
            .register(FloatType {
                name: "decimal",
                sql_type: "NUMERIC",
                defaults: TypeDefaults {
                    length: Some("8,2"),
                    ..Default::default()
                },
            })
            .register(TemporalType {
                name: "datetime",
                sql_type: "TIMESTAMP",
                kind: TemporalKind::DateTime,
            })
            .register(BinaryType {
                name: "blob",
                sql_type: "BYTEA",
            })
            .register(BinaryType {
                name: "binary",
                sql_type: "BYTEA",
            })
            .register(BinaryType {
                name: "bytea",
                sql_type: "BYTEA",
            })
            .register(StringType {
                name: "uuid",
                sql_type: "UUID",
                defaults: TypeDefaults::default(),
            })
            .register(StringType {
                name: "jsonb",
                sql_type: "JSONB",
                defaults: TypeDefaults::default(),
            });
        Self { grammar, types }
    }
}

impl Default for PostgresSqlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlWriter for PostgresSqlWriter {
    fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    fn types(&self) -> &TypeRegistry {
        &self.types
    }

    fn write_value_bool(&self, _context: &mut Context, out: &mut String, value: bool) {
        out.push_str(["FALSE", "TRUE"][value as usize]);
    }

    fn write_value_infinity(&self, _context: &mut Context, out: &mut String, negative: bool) {
        out.push_str(if negative {
            "'-Infinity'::FLOAT8"
        } else {
            "'Infinity'::FLOAT8"
        });
    }

    fn write_value_nan(&self, _context: &mut Context, out: &mut String) {
        out.push_str("'NaN'::FLOAT8");
    }

    fn write_value_blob(&self, _context: &mut Context, out: &mut String, value: &[u8]) {
        out.push_str("'\\x");
        for b in value {
            let _ = write!(out, "{:02X}", b);
        }
        out.push_str("'::BYTEA");
    }

    /// Auto increment columns become `SERIAL`/`BIGSERIAL`, lengths are kept only where accepted.
    fn write_column_type(
        &self,
        out: &mut String,
        column_type: &dyn ColumnType,
        length: Option<&str>,
        ai: bool,
    ) -> Result<()> {
        let sql_type = column_type.sql_type();
        if ai {
            out.push_str(if sql_type == "BIGINT" {
                "BIGSERIAL"
            } else {
                "SERIAL"
            });
            return Ok(());
        }
        out.push_str(sql_type);
        if let Some(length) = length {
            if SIZED_TYPES.contains(&sql_type) {
                let _ = write!(out, "({length})");
            } else {
                log::warn!(
                    "Postgres does not accept a length on {sql_type}, `{length}` is ignored"
                );
            }
        }
        Ok(())
    }

    fn write_unique_key(&self, out: &mut String, index: &str, unique: &UniqueKey) -> Result<()> {
        let name = unique.constraint.as_deref().unwrap_or(index);
        self.write_constraint(out, Some(name))?;
        self.write_clause(out, Clause::UniqueKey, &[&self.quote_list(&unique.columns)])
    }
}
