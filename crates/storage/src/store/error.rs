#![forbid(unsafe_code)]

use crate::config::ConfigError;
use arbor_core::access::AccessDenied;
use arbor_core::audit::CorruptHistoryValue;
use arbor_core::ordering::OrderingError;
use arbor_core::policy::PolicyViolation;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error(transparent)]
    AccessDenied(#[from] AccessDenied),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("cross-tree reference (node={node_id}, expected tree={expected_tree}, found tree={found_tree})")]
    CrossTreeReference {
        node_id: String,
        expected_tree: String,
        found_tree: String,
    },
    #[error("cyclic move (node={node_id}, target parent={parent_id})")]
    CyclicMove { node_id: String, parent_id: String },
    #[error("tree depth exceeded (max={max_depth})")]
    TreeDepthExceeded { max_depth: usize },
    #[error("root node cannot be moved or deleted: {0}")]
    RootImmutable(String),
    #[error("invalid ordering: {0}")]
    InvalidOrdering(#[from] OrderingError),
    #[error("history {history_id} does not belong to {entity_id}")]
    MismatchedHistory {
        history_id: String,
        entity_id: String,
    },
    #[error(transparent)]
    CorruptHistoryValue(#[from] CorruptHistoryValue),
    #[error("stale history (history={history_id}, field={field}): live value changed since it was recorded")]
    StaleHistory { history_id: String, field: String },
    #[error("corrupt row (id={id}, column={column})")]
    CorruptRow { id: String, column: &'static str },
}

impl From<PolicyViolation> for StoreError {
    fn from(value: PolicyViolation) -> Self {
        Self::InvalidInput(value.0)
    }
}

impl StoreError {
    pub(in crate::store) fn node_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "node",
            id: id.to_string(),
        }
    }
}
