//! Relational store (SQLite).
//!
//! - [`Store`]: connection factory with fixed-delay retries and the
//!   [`Store::unit_of_work`] transaction scope
//! - [`StoreConfig`]: location, retry policy and page size
//! - [`schema`]: the `projects` and `tasks` tables

pub mod connection;
pub mod error;
pub mod schema;

pub use connection::{Store, StoreConfig, default_store_path};
pub use error::StoreError;
pub use schema::DEFAULT_TASK_STATUS;
