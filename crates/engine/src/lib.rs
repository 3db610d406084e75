pub mod config;
pub mod error;
pub mod request;

pub use config::EngineConfig;
pub use error::EngineError;
pub use request::{ExploreRequest, FogView, RectRequest};

use tracing::{debug, info, warn};

use fogbound_core::{FogGrid, FogRecord, GridRect, PlayerId, SceneId};
use fogbound_storage::{FogStore, StorageError};

/// Explore, reveal, hide and reset over a [`FogStore`].
///
/// One engine per store connection. Writes are version-checked; a save that
/// loses a race is re-applied to the freshly loaded record, which is safe
/// because every transform here is idempotent.
pub struct FogEngine<S: FogStore> {
    store: S,
    config: EngineConfig,
}

impl<S: FogStore> FogEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Load a player's fog for a scene, creating an empty record on first use.
    pub fn get_fog(
        &mut self,
        scene_id: SceneId,
        player_id: PlayerId,
    ) -> Result<FogRecord, EngineError> {
        let record =
            self.store
                .get_or_create(scene_id, player_id, self.config.default_grid_cell_size)?;
        Ok(record)
    }

    /// OR `new_grid` into the player's explored grid. The revealed grid is
    /// carried through untouched.
    pub fn explore(
        &mut self,
        scene_id: SceneId,
        player_id: PlayerId,
        new_grid: &FogGrid,
    ) -> Result<FogRecord, EngineError> {
        self.check_grid_extent(new_grid)?;
        let record = self.get_fog(scene_id, player_id)?;
        let id = record.id;
        self.apply(record, |r| r.explored_grid.merge_or(new_grid))?
            .ok_or_else(|| StorageError::NotFound(format!("fog record {id}")).into())
    }

    /// Force-show `rect` to every player in the scene, growing each revealed
    /// grid as needed.
    pub fn reveal(
        &mut self,
        scene_id: SceneId,
        rect: GridRect,
    ) -> Result<Vec<FogRecord>, EngineError> {
        self.check_rect_extent(&rect)?;
        self.fan_out(scene_id, "reveal", |r| r.revealed_grid.fill_rect(&rect))
    }

    /// Stop force-showing `rect` to every player in the scene. Cells past a
    /// grid's current bounds are skipped; nothing is allocated.
    pub fn hide(
        &mut self,
        scene_id: SceneId,
        rect: GridRect,
    ) -> Result<Vec<FogRecord>, EngineError> {
        self.fan_out(scene_id, "hide", |r| r.revealed_grid.clear_rect(&rect))
    }

    /// Empty both grids of every record in the scene.
    pub fn reset(&mut self, scene_id: SceneId) -> Result<Vec<FogRecord>, EngineError> {
        self.fan_out(scene_id, "reset", |r| {
            let explored = r.explored_grid.clear();
            let revealed = r.revealed_grid.clear();
            explored | revealed
        })
    }

    fn fan_out<F>(
        &mut self,
        scene_id: SceneId,
        op: &'static str,
        mut transform: F,
    ) -> Result<Vec<FogRecord>, EngineError>
    where
        F: FnMut(&mut FogRecord) -> bool,
    {
        let records = self.store.list_by_scene(scene_id)?;
        let mut updated = Vec::with_capacity(records.len());
        for record in records {
            if let Some(record) = self.apply(record, &mut transform)? {
                updated.push(record);
            }
        }
        info!(%scene_id, op, records = updated.len(), "fog fan-out complete");
        Ok(updated)
    }

    /// Read-modify-write of one record with optimistic retry. `transform`
    /// reports whether it changed anything; unchanged records are not written.
    /// Returns `None` if the record was deleted underneath us.
    fn apply<F>(
        &mut self,
        mut record: FogRecord,
        mut transform: F,
    ) -> Result<Option<FogRecord>, EngineError>
    where
        F: FnMut(&mut FogRecord) -> bool,
    {
        let attempts = self.config.max_write_attempts.max(1);
        for attempt in 1..=attempts {
            if !transform(&mut record) {
                debug!(fog_id = %record.id, "fog record unchanged, skipping write");
                return Ok(Some(record));
            }
            match self.store.save(&record) {
                Ok(saved) => {
                    debug!(fog_id = %saved.id, version = saved.version, "saved fog record");
                    return Ok(Some(saved));
                }
                Err(StorageError::StaleVersion { .. }) => {
                    warn!(fog_id = %record.id, attempt, "fog record changed during write, retrying");
                    match self.store.get(record.id)? {
                        Some(fresh) => record = fresh,
                        None => return Ok(None),
                    }
                }
                Err(StorageError::NotFound(_)) => {
                    debug!(fog_id = %record.id, "fog record deleted during write");
                    return Ok(None);
                }
                Err(e) => return Err(e.into()),
            }
        }
        warn!(fog_id = %record.id, attempts, "giving up on contended fog record");
        Err(EngineError::ConcurrentModification {
            id: record.id.to_string(),
            attempts,
        })
    }

    fn check_grid_extent(&self, grid: &FogGrid) -> Result<(), EngineError> {
        let max = self.config.max_grid_extent;
        if grid.row_count() > max || grid.max_row_len() > max {
            return Err(EngineError::InvalidArgument(format!(
                "grid of {} rows x {} columns exceeds the {max} cell limit",
                grid.row_count(),
                grid.max_row_len()
            )));
        }
        Ok(())
    }

    fn check_rect_extent(&self, rect: &GridRect) -> Result<(), EngineError> {
        let max = self.config.max_grid_extent;
        if !rect.is_empty() && (rect.right() > max || rect.bottom() > max) {
            return Err(EngineError::InvalidArgument(format!(
                "rectangle {rect:?} exceeds the {max} cell limit"
            )));
        }
        Ok(())
    }
}
