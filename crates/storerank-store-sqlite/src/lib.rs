//! SQLite backend for storerank.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Every operation is a single
//! closure on that thread, which serialises the read-then-write of
//! [`RankStore::record_scan`](storerank_core::store::RankStore::record_scan).

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
