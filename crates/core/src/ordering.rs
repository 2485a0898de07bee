#![forbid(unsafe_code)]

use std::collections::HashSet;
use thiserror::Error;

/// One sibling's position under a parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiblingSlot {
    pub id: String,
    pub order_index: i64,
}

impl SiblingSlot {
    pub fn new(id: impl Into<String>, order_index: i64) -> Self {
        Self {
            id: id.into(),
            order_index,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OrderingError {
    #[error("id listed more than once: {0}")]
    DuplicateId(String),
    #[error("id is not a child of this parent: {0}")]
    UnknownId(String),
    #[error("child missing from ordering: {0}")]
    MissingChild(String),
    #[error("order index overflow")]
    IndexOverflow,
}

/// Largest index a caller may request for an explicit placement. Appends
/// and shifts may go past it; only `i64::MAX` is a hard stop.
pub const MAX_ORDER_INDEX: i64 = u32::MAX as i64;

/// Index for a node appended after the current maximum.
pub fn next_index(max_existing: Option<i64>) -> Result<i64, OrderingError> {
    match max_existing {
        None => Ok(0),
        Some(max) => max.checked_add(1).ok_or(OrderingError::IndexOverflow),
    }
}

/// Slots that must shift by one so `from_index` becomes free. `exclude` is
/// the node being placed; it never moves here. Siblings below `from_index`
/// are untouched.
pub fn plan_make_room(
    siblings: &[SiblingSlot],
    from_index: i64,
    exclude: &str,
) -> Result<Vec<SiblingSlot>, OrderingError> {
    siblings
        .iter()
        .filter(|slot| slot.id != exclude && slot.order_index >= from_index)
        .map(|slot| {
            let shifted = slot
                .order_index
                .checked_add(1)
                .ok_or(OrderingError::IndexOverflow)?;
            Ok(SiblingSlot::new(slot.id.clone(), shifted))
        })
        .collect()
}

/// Positions `ordered_ids` as `0..n`. The ids must be exactly the current
/// children, each listed once. Returns only slots whose index changes.
pub fn plan_reindex(
    children: &[SiblingSlot],
    ordered_ids: &[String],
) -> Result<Vec<SiblingSlot>, OrderingError> {
    let current: HashSet<&str> = children.iter().map(|slot| slot.id.as_str()).collect();
    let mut seen = HashSet::with_capacity(ordered_ids.len());
    for id in ordered_ids {
        if !current.contains(id.as_str()) {
            return Err(OrderingError::UnknownId(id.clone()));
        }
        if !seen.insert(id.as_str()) {
            return Err(OrderingError::DuplicateId(id.clone()));
        }
    }
    if let Some(missing) = children.iter().find(|slot| !seen.contains(slot.id.as_str())) {
        return Err(OrderingError::MissingChild(missing.id.clone()));
    }

    let mut out = Vec::new();
    for (position, id) in ordered_ids.iter().enumerate() {
        let position = position as i64;
        let unchanged = children
            .iter()
            .any(|slot| slot.id == *id && slot.order_index == position);
        if !unchanged {
            out.push(SiblingSlot::new(id.clone(), position));
        }
    }
    Ok(out)
}
