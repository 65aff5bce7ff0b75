use crate::MySqlSqlWriter;
use strata_core::Driver;

#[derive(Debug, Clone, Default)]
pub struct MySqlDriver {
    writer: MySqlSqlWriter,
}

impl MySqlDriver {
    pub fn new() -> Self {
        Self {
            writer: MySqlSqlWriter::new(),
        }
    }
}

impl Driver for MySqlDriver {
    type SqlWriter = MySqlSqlWriter;

    const NAME: &'static str = "mysql";

    fn sql_writer(&self) -> &MySqlSqlWriter {
        &self.writer
    }
}
