use crate::{ConnectionConfig, Driver, Executor, Result, Transaction};
use std::future::Future;

pub trait Connection: Executor {
    /// Opens a connection to the url, whose scheme must be the driver name.
    fn connect(url: &str) -> impl Future<Output = Result<Self>> + Send;

    /// Parses and checks the url, shared by the `connect` implementations.
    fn config(url: &str) -> Result<ConnectionConfig> {
        let config = ConnectionConfig::from_url(url)?;
        config.expect_scheme(<Self::Driver as Driver>::NAME)?;
        Ok(config)
    }

    /// Moves the connection into a transaction already begun.
    fn begin(self) -> impl Future<Output = Result<Transaction<Self>>> + Send {
        async move {
            let mut transaction = Transaction::new(self);
            transaction.begin().await?;
            Ok(transaction)
        }
    }
}
