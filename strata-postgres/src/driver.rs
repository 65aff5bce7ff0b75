use crate::PostgresSqlWriter;
use strata_core::Driver;

#[derive(Debug, Clone, Default)]
pub struct PostgresDriver {
    writer: PostgresSqlWriter,
}

impl PostgresDriver {
    pub fn new() -> Self {
        Self {
            writer: PostgresSqlWriter::new(),
        }
    }
}

impl Driver for PostgresDriver {
    type SqlWriter = PostgresSqlWriter;

    const NAME: &'static str = "postgres";

    fn sql_writer(&self) -> &PostgresSqlWriter {
        &self.writer
    }
}
