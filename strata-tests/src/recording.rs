use std::{collections::VecDeque, future::Future};
use strata_core::{
    Connection, Driver, Executor, Prepared, QueryResult, Result, RowsAffected,
    stream::{self, Stream},
};

/// Executor that sends nothing, it keeps the statements and answers with queued results.
///
/// Runs without a queued answer report zero affected rows.
#[derive(Debug, Default)]
pub struct RecordingConnection<D: Driver> {
    driver: D,
    executed: Vec<Prepared>,
    replies: VecDeque<Vec<QueryResult>>,
}

impl<D: Driver> RecordingConnection<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            executed: Vec::new(),
            replies: VecDeque::new(),
        }
    }

    /// Queues the results of the next run.
    pub fn reply(&mut self, results: impl IntoIterator<Item = QueryResult>) -> &mut Self {
        self.replies.push_back(results.into_iter().collect());
        self
    }

    pub fn executed(&self) -> &[Prepared] {
        &self.executed
    }

    pub fn statements(&self) -> Vec<&str> {
        self.executed.iter().map(Prepared::sql).collect()
    }

    pub fn clear(&mut self) {
        self.executed.clear();
    }
}

impl<D: Driver> Executor for RecordingConnection<D> {
    type Driver = D;

    fn driver(&self) -> &D {
        &self.driver
    }

    fn run(&mut self, prepared: Prepared) -> impl Stream<Item = Result<QueryResult>> + Send {
        log::debug!("{} records: {}", D::NAME, prepared);
        self.executed.push(prepared);
        let results = self
            .replies
            .pop_front()
            .unwrap_or_else(|| vec![RowsAffected::default().into()]);
        stream::iter(results.into_iter().map(Ok))
    }
}

impl<D: Driver + Default> Connection for RecordingConnection<D> {
    fn connect(url: &str) -> impl Future<Output = Result<Self>> + Send {
        let config = Self::config(url);
        async move {
            let config = config?;
            log::debug!(
                "{} recording connection to {}",
                D::NAME,
                config.host.as_deref().unwrap_or("localhost")
            );
            Ok(Self::new(D::default()))
        }
    }
}
