#![forbid(unsafe_code)]

use crate::ids::{ActorId, TreeId};
use thiserror::Error;

/// Membership decision supplied by the hosting application. The engine
/// never derives it on its own.
pub trait TreeAccess {
    fn is_authorized(&self, tree: &TreeId, actor: &ActorId) -> bool;
}

impl<F> TreeAccess for F
where
    F: Fn(&TreeId, &ActorId) -> bool,
{
    fn is_authorized(&self, tree: &TreeId, actor: &ActorId) -> bool {
        self(tree, actor)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("actor {actor} is not a member of tree {tree}")]
pub struct AccessDenied {
    pub tree: TreeId,
    pub actor: ActorId,
}

pub fn require_access(
    access: &impl TreeAccess,
    tree: &TreeId,
    actor: &ActorId,
) -> Result<(), AccessDenied> {
    if access.is_authorized(tree, actor) {
        return Ok(());
    }
    Err(AccessDenied {
        tree: tree.clone(),
        actor: actor.clone(),
    })
}
