mod as_value;
mod binder;
mod config;
mod connection;
mod driver;
mod error;
mod executor;
mod expression;
mod join;
mod prepared;
mod predicate;
mod query;
mod record;
mod result;
mod schema;
mod sub_query;
mod transaction;
mod types;
mod util;
mod value;
pub mod writer;

pub use ::anyhow::Context as ErrorContext;
pub use as_value::*;
pub use binder::*;
pub use config::*;
pub use connection::*;
pub use driver::*;
pub use error::*;
pub use executor::*;
pub use expression::*;
pub use join::*;
pub use prepared::*;
pub use predicate::*;
pub use query::*;
pub use record::*;
pub use result::*;
pub use schema::*;
pub use sub_query::*;
pub use transaction::*;
pub use types::*;
pub use util::*;
pub use value::*;
pub use writer::{Clause, Context, Fragment, GenericSqlWriter, Grammar, Keyword, SqlWriter, Statement};
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
