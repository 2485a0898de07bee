#![forbid(unsafe_code)]

use arbor_core::ids::ActorId;
use arbor_core::model::TreeDomain;

pub use arbor_core::model::HistoryRecord;

#[derive(Clone, Debug)]
pub struct RollbackRequest {
    pub domain: TreeDomain,
    pub node_id: String,
    pub history_id: String,
    pub actor: ActorId,
}
