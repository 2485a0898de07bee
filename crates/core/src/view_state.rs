#![forbid(unsafe_code)]

use crate::ids::{ActorId, TreeId};
use crate::policy::PolicyViolation;
use serde::{Deserialize, Serialize};

pub const DEFAULT_VIEW_TYPE: &str = "mindmap";
pub const DEFAULT_ZOOM: f64 = 1.0;
pub const DEFAULT_PAN: f64 = 50.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

/// How one user last looked at one tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub actor_id: ActorId,
    pub tree_id: TreeId,
    pub view_type: String,
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub expanded_nodes: Vec<String>,
    pub updated_at_ms: i64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewStatePatch {
    pub view_type: Option<String>,
    pub zoom: Option<f64>,
    pub pan_x: Option<f64>,
    pub pan_y: Option<f64>,
    pub expanded_nodes: Option<Vec<String>>,
}

impl ViewStatePatch {
    pub fn validate(&self) -> Result<(), PolicyViolation> {
        if let Some(view_type) = self.view_type.as_deref()
            && view_type.trim().is_empty()
        {
            return Err(PolicyViolation("view type must not be empty"));
        }
        if let Some(zoom) = self.zoom
            && !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom)
        {
            return Err(PolicyViolation("zoom must be within 0.1..=5.0"));
        }
        for pan in [self.pan_x, self.pan_y].into_iter().flatten() {
            if !pan.is_finite() {
                return Err(PolicyViolation("pan must be finite"));
            }
        }
        Ok(())
    }

    /// State for a first save: missing fields take their defaults.
    pub fn into_state(self, actor_id: ActorId, tree_id: TreeId, now_ms: i64) -> ViewState {
        ViewState {
            actor_id,
            tree_id,
            view_type: self.view_type.unwrap_or_else(|| DEFAULT_VIEW_TYPE.to_string()),
            zoom: self.zoom.unwrap_or(DEFAULT_ZOOM),
            pan_x: self.pan_x.unwrap_or(DEFAULT_PAN),
            pan_y: self.pan_y.unwrap_or(DEFAULT_PAN),
            expanded_nodes: self.expanded_nodes.unwrap_or_default(),
            updated_at_ms: now_ms,
        }
    }

    pub fn apply_to(self, state: &mut ViewState, now_ms: i64) {
        if let Some(view_type) = self.view_type {
            state.view_type = view_type;
        }
        if let Some(zoom) = self.zoom {
            state.zoom = zoom;
        }
        if let Some(pan_x) = self.pan_x {
            state.pan_x = pan_x;
        }
        if let Some(pan_y) = self.pan_y {
            state.pan_y = pan_y;
        }
        if let Some(expanded_nodes) = self.expanded_nodes {
            state.expanded_nodes = expanded_nodes;
        }
        state.updated_at_ms = now_ms;
    }
}

/// Write throttle for view-state autosave. The caller owns one per session
/// and feeds it the clock; nothing here sleeps or spawns.
///
/// The first pending change may be written at once, later ones at most once
/// per `interval_ms`.
#[derive(Clone, Debug)]
pub struct AutosaveThrottle {
    interval_ms: i64,
    last_saved_ms: Option<i64>,
    dirty_since_ms: Option<i64>,
}

impl AutosaveThrottle {
    pub fn new(interval_ms: i64) -> Self {
        Self {
            interval_ms: interval_ms.max(0),
            last_saved_ms: None,
            dirty_since_ms: None,
        }
    }

    pub fn record_change(&mut self, now_ms: i64) {
        if self.dirty_since_ms.is_none() {
            self.dirty_since_ms = Some(now_ms);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since_ms.is_some()
    }

    /// Whether a write should happen now.
    pub fn poll(&self, now_ms: i64) -> bool {
        if !self.is_dirty() {
            return false;
        }
        match self.last_saved_ms {
            None => true,
            Some(saved) => now_ms.saturating_sub(saved) >= self.interval_ms,
        }
    }

    pub fn mark_saved(&mut self, now_ms: i64) {
        self.last_saved_ms = Some(now_ms);
        self.dirty_since_ms = None;
    }
}
