#![forbid(unsafe_code)]

use super::super::*;
use arbor_core::ids::TreeId;
use arbor_core::model::TreeDomain;
use rusqlite::params;

impl SqliteStore {
    /// Status and kind tallies for one tree. "Completed" means the domain's
    /// terminal status.
    pub fn tree_progress(&self, domain: TreeDomain, tree_id: &TreeId) -> Result<TreeProgress, StoreError> {
        let completed_status = domain.policy().completed_status.as_str();
        let mut stmt = self.conn.prepare(
            r#"
            SELECT kind, status, COUNT(*)
            FROM tree_nodes
            WHERE domain=?1 AND tree_id=?2
            GROUP BY kind, status
            "#,
        )?;
        let rows = stmt.query_map(params![domain.as_str(), tree_id.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut progress = TreeProgress::default();
        for row in rows {
            let (kind, status, count) = row?;
            let count = u64::try_from(count).unwrap_or(0);
            progress.total += count;
            *progress.by_status.entry(status.clone()).or_default() += count;
            *progress.by_kind.entry(kind.clone()).or_default() += count;
            if status == completed_status {
                progress.completed += count;
                *progress.completed_by_kind.entry(kind).or_default() += count;
            }
        }
        progress.completion_percent = completion_percent(progress.completed, progress.total);
        Ok(progress)
    }
}

fn completion_percent(completed: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (completed * 200 + total) / (total * 2);
    u8::try_from(percent.min(100)).unwrap_or(100)
}
