mod context;
mod grammar;
mod sql_writer;

pub use context::*;
pub use grammar::*;
pub use sql_writer::*;
