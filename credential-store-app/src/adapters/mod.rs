//! Storage adapters.

mod sql;

pub use sql::{Dialect, SqlCredentialStore};
