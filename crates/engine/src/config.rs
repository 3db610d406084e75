use serde::{Deserialize, Serialize};

use fogbound_core::DEFAULT_GRID_CELL_SIZE;

use crate::EngineError;

pub const DEFAULT_MAX_WRITE_ATTEMPTS: u32 = 8;
pub const DEFAULT_MAX_GRID_EXTENT: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cell size stamped on newly created records.
    pub default_grid_cell_size: u32,
    /// Save attempts per record before giving up on a contended write.
    pub max_write_attempts: u32,
    /// Largest row or column index + 1 a single request may touch.
    pub max_grid_extent: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_grid_cell_size: DEFAULT_GRID_CELL_SIZE,
            max_write_attempts: DEFAULT_MAX_WRITE_ATTEMPTS,
            max_grid_extent: DEFAULT_MAX_GRID_EXTENT,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        let config: Self = toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.default_grid_cell_size == 0 {
            return Err(EngineError::Config("default_grid_cell_size must be positive".into()));
        }
        if self.max_write_attempts == 0 {
            return Err(EngineError::Config("max_write_attempts must be at least 1".into()));
        }
        if self.max_grid_extent == 0 {
            return Err(EngineError::Config("max_grid_extent must be positive".into()));
        }
        Ok(())
    }
}
