use crate::{AsValue, Bind, Result, SqlError, resolve_type, truncate_long};
use std::fmt::{self, Display};

/// Statement text together with the values of its `?` placeholders, in order.
///
/// Produced by [`crate::Driver::prepare`], values can be appended or replaced afterwards:
/// ```rust,ignore
/// prepared.bind(42)?.bind("hello")?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    pub sql: String,
    pub binds: Vec<Bind>,
}

impl Prepared {
    pub fn new(sql: impl Into<String>, binds: Vec<Bind>) -> Self {
        Self {
            sql: sql.into(),
            binds,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn binds(&self) -> &[Bind] {
        &self.binds
    }

    /// Append a value, its type is inferred.
    pub fn bind<V: AsValue>(&mut self, value: V) -> Result<&mut Self> {
        let value = value.as_value();
        let bind_type = resolve_type(&value);
        self.binds.push(Bind::new(value, bind_type));
        Ok(self)
    }

    /// Replace the value at `index` (from 0).
    pub fn bind_index<V: AsValue>(&mut self, value: V, index: u64) -> Result<&mut Self> {
        let len = self.binds.len();
        let Some(bind) = usize::try_from(index)
            .ok()
            .and_then(|i| self.binds.get_mut(i))
        else {
            return Err(SqlError::invalid_query(format!(
                "Bind index {index} is out of range, the statement has {len} values"
            )));
        };
        let value = value.as_value();
        bind.bind_type = resolve_type(&value);
        bind.value = value;
        Ok(self)
    }
}

impl From<String> for Prepared {
    fn from(value: String) -> Self {
        Prepared::new(value, Vec::new())
    }
}

impl From<&str> for Prepared {
    fn from(value: &str) -> Self {
        Prepared::new(value, Vec::new())
    }
}

impl Display for Prepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}
