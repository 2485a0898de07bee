#![forbid(unsafe_code)]

use super::*;
use arbor_core::ids::{ActorId, TreeId};
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    pub fn view_state_get(
        &self,
        actor_id: &ActorId,
        tree_id: &TreeId,
    ) -> Result<Option<ViewState>, StoreError> {
        load_view_state(&self.conn, actor_id, tree_id)
    }

    /// Upsert. A first save fills unset fields with defaults; later saves
    /// change only the fields the patch carries.
    pub fn view_state_save(&mut self, request: SaveViewStateRequest) -> Result<ViewState, StoreError> {
        let SaveViewStateRequest {
            actor_id,
            tree_id,
            patch,
        } = request;
        patch.validate()?;

        let now_ms = now_ms();
        let tx = begin_write(&mut self.conn)?;
        let state = match load_view_state(&tx, &actor_id, &tree_id)? {
            Some(mut state) => {
                patch.apply_to(&mut state, now_ms);
                state
            }
            None => patch.into_state(actor_id, tree_id, now_ms),
        };

        let expanded_nodes_json = serde_json::to_string(&state.expanded_nodes)
            .map_err(|_| StoreError::InvalidInput("expanded nodes are not serializable"))?;
        tx.execute(
            r#"
            INSERT INTO view_states(
              actor_id, tree_id, view_type, zoom, pan_x, pan_y, expanded_nodes_json, updated_at_ms
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(actor_id, tree_id) DO UPDATE SET
              view_type=excluded.view_type,
              zoom=excluded.zoom,
              pan_x=excluded.pan_x,
              pan_y=excluded.pan_y,
              expanded_nodes_json=excluded.expanded_nodes_json,
              updated_at_ms=excluded.updated_at_ms
            "#,
            params![
                state.actor_id.as_str(),
                state.tree_id.as_str(),
                state.view_type,
                state.zoom,
                state.pan_x,
                state.pan_y,
                expanded_nodes_json,
                state.updated_at_ms
            ],
        )?;
        tx.commit()?;

        tracing::debug!(
            actor_id = %state.actor_id,
            tree_id = %state.tree_id,
            view_type = %state.view_type,
            "view state saved"
        );
        Ok(state)
    }

    /// Returns whether a saved state existed.
    pub fn view_state_delete(&mut self, actor_id: &ActorId, tree_id: &TreeId) -> Result<bool, StoreError> {
        let removed = self.conn.execute(
            "DELETE FROM view_states WHERE actor_id=?1 AND tree_id=?2",
            params![actor_id.as_str(), tree_id.as_str()],
        )?;
        Ok(removed > 0)
    }
}

fn load_view_state(
    conn: &rusqlite::Connection,
    actor_id: &ActorId,
    tree_id: &TreeId,
) -> Result<Option<ViewState>, StoreError> {
    let row = conn
        .query_row(
            r#"
            SELECT view_type, zoom, pan_x, pan_y, expanded_nodes_json, updated_at_ms
            FROM view_states
            WHERE actor_id=?1 AND tree_id=?2
            "#,
            params![actor_id.as_str(), tree_id.as_str()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            },
        )
        .optional()?;

    let Some((view_type, zoom, pan_x, pan_y, expanded_nodes_json, updated_at_ms)) = row else {
        return Ok(None);
    };
    let expanded_nodes: Vec<String> =
        serde_json::from_str(&expanded_nodes_json).map_err(|_| StoreError::CorruptRow {
            id: format!("{actor_id}/{tree_id}"),
            column: "expanded_nodes_json",
        })?;

    Ok(Some(ViewState {
        actor_id: actor_id.clone(),
        tree_id: tree_id.clone(),
        view_type,
        zoom,
        pan_x,
        pan_y,
        expanded_nodes,
        updated_at_ms,
    }))
}
