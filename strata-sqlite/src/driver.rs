use crate::SqliteSqlWriter;
use strata_core::Driver;

#[derive(Debug, Clone, Default)]
pub struct SqliteDriver {
    writer: SqliteSqlWriter,
}

impl SqliteDriver {
    pub fn new() -> Self {
        Self {
            writer: SqliteSqlWriter::new(),
        }
    }
}

impl Driver for SqliteDriver {
    type SqlWriter = SqliteSqlWriter;

    const NAME: &'static str = "sqlite";

    fn sql_writer(&self) -> &SqliteSqlWriter {
        &self.writer
    }
}
