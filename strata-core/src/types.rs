use crate::{BindType, Result, SqlError, Value, parse_strict_integer};
use std::{collections::HashMap, fmt::Debug, sync::Arc};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::BorrowedFormatItem,
    macros::format_description,
};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");
const DATETIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Options a column type applies when the column does not set them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDefaults {
    pub length: Option<&'static str>,
    pub unsigned: bool,
    pub ai: bool,
}

/// Converter between Rust values and the representation a column type expects.
pub trait ColumnType: Send + Sync + Debug {
    /// Registry key, lowercase.
    fn name(&self) -> &'static str;
    /// Type written in DDL.
    fn sql_type(&self) -> &'static str;
    /// Value as sent to the database.
    fn to(&self, value: Value) -> Value {
        value
    }
    /// Value as read from the database.
    fn from(&self, value: Value) -> Value {
        value
    }
    fn binding_type(&self) -> BindType;
    fn default_options(&self) -> TypeDefaults {
        TypeDefaults::default()
    }
}

#[derive(Debug)]
pub struct IntegerType {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub defaults: TypeDefaults,
}

impl ColumnType for IntegerType {
    fn name(&self) -> &'static str {
        self.name
    }
    fn sql_type(&self) -> &'static str {
        self.sql_type
    }
    fn to(&self, value: Value) -> Value {
        match value {
            Value::Boolean(Some(v)) => Value::Int8(Some(v as _)),
            Value::Varchar(Some(ref v)) => match parse_strict_integer(v) {
                Some(v) if i64::try_from(v).is_ok() => Value::Int64(Some(v as _)),
                _ => value,
            },
            _ => value,
        }
    }
    fn binding_type(&self) -> BindType {
        BindType::Integer
    }
    fn default_options(&self) -> TypeDefaults {
        self.defaults.clone()
    }
}

/// Floating point and decimal types, bound as strings to keep their precision.
#[derive(Debug)]
pub struct FloatType {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub defaults: TypeDefaults,
}

impl ColumnType for FloatType {
    fn name(&self) -> &'static str {
        self.name
    }
    fn sql_type(&self) -> &'static str {
        self.sql_type
    }
    fn binding_type(&self) -> BindType {
        BindType::String
    }
    fn default_options(&self) -> TypeDefaults {
        self.defaults.clone()
    }
}

#[derive(Debug)]
pub struct BooleanType;

impl ColumnType for BooleanType {
    fn name(&self) -> &'static str {
        "boolean"
    }
    fn sql_type(&self) -> &'static str {
        "BOOLEAN"
    }
    fn to(&self, value: Value) -> Value {
        match value.as_integer() {
            Some(v) if !value.is_float() => Value::Boolean(Some(v != 0)),
            _ => value,
        }
    }
    fn from(&self, value: Value) -> Value {
        self.to(value)
    }
    fn binding_type(&self) -> BindType {
        BindType::Boolean
    }
}

#[derive(Debug)]
pub struct StringType {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub defaults: TypeDefaults,
}

impl ColumnType for StringType {
    fn name(&self) -> &'static str {
        self.name
    }
    fn sql_type(&self) -> &'static str {
        self.sql_type
    }
    fn binding_type(&self) -> BindType {
        BindType::String
    }
    fn default_options(&self) -> TypeDefaults {
        self.defaults.clone()
    }
}

#[derive(Debug)]
pub struct BinaryType {
    pub name: &'static str,
    pub sql_type: &'static str,
}

impl ColumnType for BinaryType {
    fn name(&self) -> &'static str {
        self.name
    }
    fn sql_type(&self) -> &'static str {
        self.sql_type
    }
    fn to(&self, value: Value) -> Value {
        match value {
            Value::Varchar(Some(v)) => Value::Blob(Some(v.into_bytes().into())),
            _ => value,
        }
    }
    fn binding_type(&self) -> BindType {
        BindType::Lob
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    Date,
    Time,
    DateTime,
}

/// Date and time types, sent as formatted strings (`Y-m-d`, `H:i:s`, `Y-m-d H:i:s`).
///
/// Integers are taken as unix timestamps, strings pass through untouched.
#[derive(Debug)]
pub struct TemporalType {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub kind: TemporalKind,
}

impl TemporalType {
    fn format(&self, value: PrimitiveDateTime) -> Option<String> {
        match self.kind {
            TemporalKind::Date => value.date().format(DATE_FORMAT),
            TemporalKind::Time => value.time().format(TIME_FORMAT),
            TemporalKind::DateTime => value.format(DATETIME_FORMAT),
        }
        .ok()
    }
}

impl ColumnType for TemporalType {
    fn name(&self) -> &'static str {
        self.name
    }
    fn sql_type(&self) -> &'static str {
        self.sql_type
    }
    fn to(&self, value: Value) -> Value {
        let date_time = match &value {
            Value::Date(Some(v)) => PrimitiveDateTime::new(*v, Time::MIDNIGHT),
            Value::Time(Some(v)) => PrimitiveDateTime::new(Date::MIN, *v),
            Value::Timestamp(Some(v)) => *v,
            Value::TimestampWithTimezone(Some(v)) => {
                let v = v.to_offset(time::UtcOffset::UTC);
                PrimitiveDateTime::new(v.date(), v.time())
            }
            v if v.is_integer() => {
                let Some(v) = v
                    .as_integer()
                    .and_then(|v| i64::try_from(v).ok())
                    .and_then(|v| OffsetDateTime::from_unix_timestamp(v).ok())
                else {
                    return value;
                };
                PrimitiveDateTime::new(v.date(), v.time())
            }
            _ => return value,
        };
        match self.format(date_time) {
            Some(v) => Value::Varchar(Some(v)),
            None => {
                log::warn!("Could not format {:?} as {}", value, self.name);
                value
            }
        }
    }
    fn from(&self, value: Value) -> Value {
        let Value::Varchar(Some(text)) = &value else {
            return value;
        };
        let parsed = match self.kind {
            TemporalKind::Date => Date::parse(text, DATE_FORMAT).map(|v| Value::Date(Some(v))),
            TemporalKind::Time => Time::parse(text, TIME_FORMAT).map(|v| Value::Time(Some(v))),
            TemporalKind::DateTime => PrimitiveDateTime::parse(text, DATETIME_FORMAT)
                .map(|v| Value::Timestamp(Some(v))),
        };
        parsed.unwrap_or(value)
    }
    fn binding_type(&self) -> BindType {
        BindType::String
    }
}

/// Column types by name, consulted by the binder and by the DDL writer.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, Arc<dyn ColumnType>>,
}

impl TypeRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut registry = Self::empty();
        let integer = |name, sql_type| IntegerType {
            name,
            sql_type,
            defaults: TypeDefaults::default(),
        };
        let string = |name, sql_type, length| StringType {
            name,
            sql_type,
            defaults: TypeDefaults {
                length,
                ..Default::default()
            },
        };
        let temporal = |name, sql_type, kind| TemporalType {
            name,
            sql_type,
            kind,
        };
        registry
            .register(integer("int", "INT"))
            .register(integer("integer", "INTEGER"))
            .register(integer("bigint", "BIGINT"))
            .register(integer("smallint", "SMALLINT"))
            .register(integer("tinyint", "TINYINT"))
            .register(IntegerType {
                name: "serial",
                sql_type: "BIGINT",
                defaults: TypeDefaults {
                    length: None,
                    unsigned: true,
                    ai: true,
                },
            })
            .register(BooleanType)
            .register(FloatType {
                name: "float",
                sql_type: "FLOAT",
                defaults: TypeDefaults::default(),
            })
            .register(FloatType {
                name: "double",
                sql_type: "DOUBLE",
                defaults: TypeDefaults::default(),
            })
            .register(FloatType {
                name: "decimal",
                sql_type: "DECIMAL",
                defaults: TypeDefaults {
                    length: Some("8,2"),
                    ..Default::default()
                },
            })
            .register(string("char", "CHAR", None))
            .register(string("varchar", "VARCHAR", Some("255")))
            .register(string("text", "TEXT", None))
            .register(BinaryType {
                name: "blob",
                sql_type: "BLOB",
            })
            .register(BinaryType {
                name: "binary",
                sql_type: "BINARY",
            })
            .register(temporal("date", "DATE", TemporalKind::Date))
            .register(temporal("datetime", "DATETIME", TemporalKind::DateTime))
            .register(temporal("timestamp", "TIMESTAMP", TemporalKind::DateTime))
            .register(temporal("time", "TIME", TemporalKind::Time));
        registry
    }

    /// Adds or replaces a type under its name.
    pub fn register(&mut self, column_type: impl ColumnType + 'static) -> &mut Self {
        self.types
            .insert(column_type.name().to_ascii_lowercase(), Arc::new(column_type));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(&name.to_ascii_lowercase())
    }

    pub fn get(&self, name: &str) -> Result<&dyn ColumnType> {
        self.types
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_ref())
            .ok_or_else(|| SqlError::MissingType(name.into()).into())
    }
}
