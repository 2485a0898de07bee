#![forbid(unsafe_code)]

use arbor_core::ids::{ActorId, TreeId};
use arbor_core::view_state::ViewStatePatch;

pub use arbor_core::view_state::ViewState;

#[derive(Clone, Debug)]
pub struct SaveViewStateRequest {
    pub actor_id: ActorId,
    pub tree_id: TreeId,
    pub patch: ViewStatePatch,
}
