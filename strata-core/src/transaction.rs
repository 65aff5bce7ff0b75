use crate::{
    Driver, Executor, Prepared, QueryResult, Result, SqlError, SqlWriter,
    stream::{Stream, TryStreamExt},
};

/// Executor wrapper tracking nested transactions.
///
/// Only the outermost `begin` and `commit` reach the database, inner levels just move the
/// depth. A rollback at the outermost level discards everything.
#[derive(Debug)]
pub struct Transaction<E: Executor> {
    executor: E,
    depth: u32,
}

impl<E: Executor> Transaction<E> {
    pub fn new(executor: E) -> Self {
        Self { executor, depth: 0 }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn in_transaction(&self) -> bool {
        self.depth > 0
    }

    pub fn executor(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn into_inner(self) -> E {
        self.executor
    }

    pub async fn begin(&mut self) -> Result<()> {
        if self.depth == 0 {
            let mut sql = String::new();
            self.executor
                .driver()
                .sql_writer()
                .write_transaction_begin(&mut sql);
            self.emit(sql).await?;
        }
        self.depth += 1;
        Ok(())
    }

    pub async fn commit(&mut self) -> Result<()> {
        match self.depth {
            0 => Err(Self::not_open("commit")),
            1 => {
                let mut sql = String::new();
                self.executor
                    .driver()
                    .sql_writer()
                    .write_transaction_commit(&mut sql);
                self.emit(sql).await?;
                self.depth = 0;
                Ok(())
            }
            _ => {
                self.depth -= 1;
                Ok(())
            }
        }
    }

    pub async fn rollback(&mut self) -> Result<()> {
        match self.depth {
            0 => Err(Self::not_open("rollback")),
            1 => {
                let mut sql = String::new();
                self.executor
                    .driver()
                    .sql_writer()
                    .write_transaction_rollback(&mut sql);
                self.depth = 0;
                self.emit(sql).await
            }
            _ => {
                self.depth -= 1;
                Ok(())
            }
        }
    }

    async fn emit(&mut self, sql: String) -> Result<()> {
        self.executor
            .run(Prepared::from(sql))
            .try_for_each(|_| async { Ok(()) })
            .await
    }

    fn not_open(operation: &str) -> crate::Error {
        log::warn!("Cannot {operation}, there is no open transaction");
        SqlError::invalid_query(format!("Cannot {operation} without an open transaction"))
    }
}

impl<E: Executor> Executor for Transaction<E> {
    type Driver = E::Driver;

    fn driver(&self) -> &Self::Driver {
        self.executor.driver()
    }

    fn run(&mut self, prepared: Prepared) -> impl Stream<Item = Result<QueryResult>> + Send {
        self.executor.run(prepared)
    }
}
