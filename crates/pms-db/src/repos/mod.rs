//! Repositories: typed reads and writes per table, plus the store-trait bridge.

pub mod metric;
pub mod panel;
pub mod question;
pub mod snapshot;
mod stores;
pub mod student;
