//! SQLite backend for the TORO record store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Every operation is one SQLite
//! transaction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use encode::Table;
pub use error::{Error, Result};
pub use store::SqliteStore;
