//! Core types and trait definitions for storerank.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! SQLite store and the search client both implement traits defined here, and
//! the rank-check loop is written against those traits only.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod app;
pub mod check;
pub mod error;
pub mod history;
pub mod ids;
pub mod keyword;
pub mod rank;
pub mod scan;
pub mod source;
pub mod store;

pub use error::{Error, Result};
