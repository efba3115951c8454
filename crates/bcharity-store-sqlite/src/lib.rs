//! SQLite backend for the BCharity publication store.
//!
//! Emulates the social protocol locally: profiles, posts, comments,
//! visibility and collect counters. Wraps [`tokio_rusqlite`] so all database
//! access runs on a dedicated thread without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
