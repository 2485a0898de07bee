#![forbid(unsafe_code)]

mod schema;
mod tree_tx;

pub(super) use schema::migrate_sqlite_schema;
pub(super) use tree_tx::begin::*;
pub(super) use tree_tx::counters::*;
pub(super) use tree_tx::cycle::*;
pub(super) use tree_tx::depth::*;
pub(super) use tree_tx::history::*;
pub(super) use tree_tx::ordering::*;
pub(super) use tree_tx::patch::*;
pub(super) use tree_tx::rows::*;
