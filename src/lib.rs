//! Build a statement once, render it for any dialect and get the binds in placeholder order.
//!
//! Dialects live in their own crates: `strata-mysql`, `strata-postgres` and `strata-sqlite`.
pub use strata_core::*;
