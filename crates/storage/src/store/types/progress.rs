#![forbid(unsafe_code)]

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TreeProgress {
    pub total: u64,
    pub completed: u64,
    pub by_status: BTreeMap<String, u64>,
    pub by_kind: BTreeMap<String, u64>,
    pub completed_by_kind: BTreeMap<String, u64>,
    /// `completed / total` in percent, rounded half up; 0 for an empty tree.
    pub completion_percent: u8,
}
