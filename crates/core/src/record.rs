use serde::{Deserialize, Serialize};

use crate::{FogGrid, FogId, PlayerId, SceneId, Timestamp};

/// Edge length, in world units, of one fog cell when no other size is given.
pub const DEFAULT_GRID_CELL_SIZE: u32 = 50;

/// Per-(scene, player) fog state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FogRecord {
    pub id: FogId,
    pub scene_id: SceneId,
    pub player_id: PlayerId,
    /// Everywhere this player has ever seen. Only grows, except on reset.
    pub explored_grid: FogGrid,
    /// Cells the GM is currently force-showing.
    pub revealed_grid: FogGrid,
    pub grid_cell_size: u32,
    /// Optimistic-concurrency token; bumped by every successful save.
    pub version: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl FogRecord {
    /// A fresh record with both grids empty, not yet persisted.
    pub fn new(
        scene_id: SceneId,
        player_id: PlayerId,
        grid_cell_size: u32,
        now: Timestamp,
    ) -> Self {
        Self {
            id: FogId::new(),
            scene_id,
            player_id,
            explored_grid: FogGrid::new(),
            revealed_grid: FogGrid::new(),
            grid_cell_size,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a player standing in this record could see `(row, col)`.
    pub fn is_visible(&self, row: usize, col: usize) -> bool {
        self.explored_grid.get(row, col) || self.revealed_grid.get(row, col)
    }
}
