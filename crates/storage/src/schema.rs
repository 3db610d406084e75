use rusqlite::Connection;

use crate::error::StorageError;

pub const SCHEMA_VERSION: i32 = 1;

pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA cache_size = -32000;
        PRAGMA busy_timeout = 5000;
    ",
    )?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at INTEGER NOT NULL
);
INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, unixepoch());

CREATE TABLE IF NOT EXISTS fog_records (
    id BLOB PRIMARY KEY CHECK (length(id) = 16),
    scene_id BLOB NOT NULL CHECK (length(scene_id) = 16),
    player_id BLOB NOT NULL CHECK (length(player_id) = 16),
    explored_grid BLOB NOT NULL,
    revealed_grid BLOB NOT NULL,
    grid_cell_size INTEGER NOT NULL CHECK (grid_cell_size > 0),
    version INTEGER NOT NULL CHECK (version > 0),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    UNIQUE (scene_id, player_id)
);
CREATE INDEX IF NOT EXISTS idx_fog_scene ON fog_records (scene_id, created_at);
";
