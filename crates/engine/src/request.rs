//! Payloads an API layer deserializes before calling into the engine.

use serde::{Deserialize, Serialize};

use fogbound_core::{FogGrid, FogId, FogRecord, GridRect, PlayerId, SceneId, Timestamp};

use crate::EngineError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreRequest {
    #[serde(default)]
    pub explored_grid: Option<FogGrid>,
}

impl ExploreRequest {
    pub fn into_grid(self) -> Result<FogGrid, EngineError> {
        self.explored_grid
            .ok_or_else(|| EngineError::InvalidArgument("exploredGrid is required".into()))
    }
}

/// Rectangle as sent over the wire. Signed so negative input can be reported
/// rather than failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RectRequest {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl RectRequest {
    pub fn into_rect(self) -> Result<GridRect, EngineError> {
        Ok(GridRect::new(self.x, self.y, self.width, self.height)?)
    }
}

/// JSON view of a fog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FogView {
    pub id: FogId,
    pub scene_id: SceneId,
    pub player_id: PlayerId,
    pub explored_grid: FogGrid,
    pub revealed_grid: FogGrid,
    pub grid_cell_size: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<FogRecord> for FogView {
    fn from(record: FogRecord) -> Self {
        Self {
            id: record.id,
            scene_id: record.scene_id,
            player_id: record.player_id,
            explored_grid: record.explored_grid,
            revealed_grid: record.revealed_grid,
            grid_cell_size: record.grid_cell_size,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
