use crate::{
    Driver, Prepared, Query, QueryResult, Result, RowLabeled, RowsAffected,
    stream::{Stream, StreamExt, TryStreamExt},
};
use futures::TryFutureExt;
use std::future::Future;

pub trait Executor: Send + Sized {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    /// Sends a prepared statement, yields rows and modify counts as they come.
    fn run(&mut self, prepared: Prepared) -> impl Stream<Item = Result<QueryResult>> + Send;

    /// Prepares the query through the driver and runs it.
    fn query(&mut self, query: &Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        let prepared = self.driver().prepare(query);
        async move { Ok::<_, crate::Error>(self.run(prepared?)) }.try_flatten_stream()
    }

    /// Rows only, modify counts are dropped.
    fn fetch(&mut self, query: &Query) -> impl Stream<Item = Result<RowLabeled>> + Send {
        self.query(query).filter_map(|v| async move {
            match v {
                Ok(QueryResult::Row(v)) => Some(Ok(v)),
                Err(e) => Some(Err(e)),
                _ => None,
            }
        })
    }

    /// Total number of rows affected.
    fn execute(&mut self, query: &Query) -> impl Future<Output = Result<RowsAffected>> + Send {
        self.query(query)
            .filter_map(|v| async move {
                match v {
                    Ok(QueryResult::Affected(v)) => Some(Ok(v)),
                    Err(e) => Some(Err(e)),
                    _ => None,
                }
            })
            .try_collect()
    }
}
