#![forbid(unsafe_code)]

//! SQLite-backed store for ordered, audited trees.
//!
//! Every mutating call runs in one immediate transaction: the node rows,
//! the sibling renumbering and the history rows it causes commit together
//! or not at all.

mod config;
mod store;

pub use config::{ConfigError, StoreConfig};
pub use store::*;
