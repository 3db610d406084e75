use fogbound_core::{FogId, FogRecord, PlayerId, SceneId};

use crate::error::StorageError;

/// Durable access to fog records.
///
/// Implementations must make `get_or_create` safe against concurrent callers
/// for the same `(scene_id, player_id)` and must reject a `save` whose
/// `version` no longer matches the stored row.
pub trait FogStore {
    /// Fetch the record for `(scene_id, player_id)`, inserting an empty one
    /// with `grid_cell_size` if none exists.
    fn get_or_create(
        &mut self,
        scene_id: SceneId,
        player_id: PlayerId,
        grid_cell_size: u32,
    ) -> Result<FogRecord, StorageError>;

    fn find(
        &self,
        scene_id: SceneId,
        player_id: PlayerId,
    ) -> Result<Option<FogRecord>, StorageError>;

    fn get(&self, id: FogId) -> Result<Option<FogRecord>, StorageError>;

    /// All records of a scene in creation order. Empty is not an error.
    fn list_by_scene(&self, scene_id: SceneId) -> Result<Vec<FogRecord>, StorageError>;

    /// Persist both grids if the stored version still equals `record.version`.
    /// Returns the record as stored, with its version bumped and `updated_at`
    /// refreshed.
    fn save(&mut self, record: &FogRecord) -> Result<FogRecord, StorageError>;

    /// Remove every record of a scene. Returns how many were removed.
    fn delete_scene(&mut self, scene_id: SceneId) -> Result<usize, StorageError>;
}
