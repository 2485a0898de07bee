#![forbid(unsafe_code)]

use super::super::super::StoreError;
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Opens a write transaction that takes the database write lock up front,
/// so sibling reads made inside it cannot be invalidated by a concurrent
/// writer before commit.
pub(in crate::store) fn begin_write(conn: &mut Connection) -> Result<Transaction<'_>, StoreError> {
    Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
}
