use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use fogbound_core::{FogGrid, FogId, FogRecord, PlayerId, SceneId, Timestamp};

use crate::error::StorageError;
use crate::traits::FogStore;

const RECORD_COLUMNS: &str = "id, scene_id, player_id, explored_grid, revealed_grid, grid_cell_size, version, created_at, updated_at";

/// Convert Vec<u8> to fixed-size array with proper error handling.
fn to_array<const N: usize>(v: Vec<u8>, label: &str) -> Result<[u8; N], StorageError> {
    v.try_into()
        .map_err(|_| StorageError::Serialization(format!("invalid {label} length")))
}

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn query_records(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<FogRecord>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let records = stmt
            .query_map(params, |row| read_record(row).map_err(tunnel))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn insert_record(&self, record: &FogRecord) -> Result<bool, StorageError> {
        let sql = format!(
            "INSERT INTO fog_records ({RECORD_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(scene_id, player_id) DO NOTHING"
        );
        let inserted = self.conn.execute(
            &sql,
            rusqlite::params![
                record.id.as_bytes().as_slice(),
                record.scene_id.as_bytes().as_slice(),
                record.player_id.as_bytes().as_slice(),
                record.explored_grid.to_msgpack()?,
                record.revealed_grid.to_msgpack()?,
                record.grid_cell_size,
                record.version as i64,
                record.created_at.as_millis() as i64,
                record.updated_at.as_millis() as i64,
            ],
        )?;
        Ok(inserted == 1)
    }

    fn exists(&self, id: FogId) -> Result<bool, StorageError> {
        let exists = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM fog_records WHERE id = ?1)",
            rusqlite::params![id.as_bytes().as_slice()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

fn read_record(row: &rusqlite::Row) -> Result<FogRecord, StorageError> {
    let id_bytes: Vec<u8> = row.get(0)?;
    let scene_id_bytes: Vec<u8> = row.get(1)?;
    let player_id_bytes: Vec<u8> = row.get(2)?;
    let explored_bytes: Vec<u8> = row.get(3)?;
    let revealed_bytes: Vec<u8> = row.get(4)?;
    let grid_cell_size: u32 = row.get(5)?;
    let version: i64 = row.get(6)?;
    let created_at: i64 = row.get(7)?;
    let updated_at: i64 = row.get(8)?;

    Ok(FogRecord {
        id: FogId::from_bytes(to_array::<16>(id_bytes, "id")?),
        scene_id: SceneId::from_bytes(to_array::<16>(scene_id_bytes, "scene_id")?),
        player_id: PlayerId::from_bytes(to_array::<16>(player_id_bytes, "player_id")?),
        explored_grid: FogGrid::from_msgpack(&explored_bytes)?,
        revealed_grid: FogGrid::from_msgpack(&revealed_bytes)?,
        grid_cell_size,
        version: version as u64,
        created_at: Timestamp::from_millis(created_at as u64),
        updated_at: Timestamp::from_millis(updated_at as u64),
    })
}

/// Pass a StorageError out of a query_map closure, which must return
/// rusqlite::Error.
fn tunnel(e: StorageError) -> rusqlite::Error {
    match e {
        StorageError::Sqlite(sq) => sq,
        other => rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Blob,
            Box::new(OpaqueStorageError(other.to_string())),
        ),
    }
}

impl FogStore for SqliteStorage {
    fn get_or_create(
        &mut self,
        scene_id: SceneId,
        player_id: PlayerId,
        grid_cell_size: u32,
    ) -> Result<FogRecord, StorageError> {
        if let Some(existing) = self.find(scene_id, player_id)? {
            return Ok(existing);
        }

        let fresh = FogRecord::new(scene_id, player_id, grid_cell_size, Timestamp::now()?);
        if self.insert_record(&fresh)? {
            debug!(%scene_id, %player_id, fog_id = %fresh.id, "created fog record");
            return Ok(fresh);
        }

        // Another connection inserted between our lookup and insert.
        self.find(scene_id, player_id)?.ok_or_else(|| {
            StorageError::NotFound(format!("fog record for scene {scene_id} player {player_id}"))
        })
    }

    fn find(
        &self,
        scene_id: SceneId,
        player_id: PlayerId,
    ) -> Result<Option<FogRecord>, StorageError> {
        let sql =
            format!("SELECT {RECORD_COLUMNS} FROM fog_records WHERE scene_id = ?1 AND player_id = ?2");
        let record = self
            .conn
            .query_row(
                &sql,
                rusqlite::params![
                    scene_id.as_bytes().as_slice(),
                    player_id.as_bytes().as_slice()
                ],
                |row| read_record(row).map_err(tunnel),
            )
            .optional()?;
        Ok(record)
    }

    fn get(&self, id: FogId) -> Result<Option<FogRecord>, StorageError> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM fog_records WHERE id = ?1");
        let record = self
            .conn
            .query_row(&sql, rusqlite::params![id.as_bytes().as_slice()], |row| {
                read_record(row).map_err(tunnel)
            })
            .optional()?;
        Ok(record)
    }

    fn list_by_scene(&self, scene_id: SceneId) -> Result<Vec<FogRecord>, StorageError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM fog_records WHERE scene_id = ?1 ORDER BY created_at, id"
        );
        self.query_records(&sql, rusqlite::params![scene_id.as_bytes().as_slice()])
    }

    fn save(&mut self, record: &FogRecord) -> Result<FogRecord, StorageError> {
        let updated_at = Timestamp::now_after(record.updated_at)?;
        let changed = self.conn.execute(
            "UPDATE fog_records
             SET explored_grid = ?1, revealed_grid = ?2, version = version + 1, updated_at = ?3
             WHERE id = ?4 AND version = ?5",
            rusqlite::params![
                record.explored_grid.to_msgpack()?,
                record.revealed_grid.to_msgpack()?,
                updated_at.as_millis() as i64,
                record.id.as_bytes().as_slice(),
                record.version as i64,
            ],
        )?;

        if changed == 0 {
            if self.exists(record.id)? {
                debug!(fog_id = %record.id, version = record.version, "stale fog record save");
                return Err(StorageError::StaleVersion {
                    id: record.id.to_string(),
                    expected: record.version,
                });
            }
            return Err(StorageError::NotFound(format!("fog record {}", record.id)));
        }

        Ok(FogRecord {
            version: record.version + 1,
            updated_at,
            ..record.clone()
        })
    }

    fn delete_scene(&mut self, scene_id: SceneId) -> Result<usize, StorageError> {
        let removed = self.conn.execute(
            "DELETE FROM fog_records WHERE scene_id = ?1",
            rusqlite::params![scene_id.as_bytes().as_slice()],
        )?;
        debug!(%scene_id, removed, "deleted scene fog records");
        Ok(removed)
    }
}

/// Wrapper error type used to tunnel StorageError through rusqlite's error system
/// in query_map closures that must return rusqlite::Error.
#[derive(Debug)]
struct OpaqueStorageError(String);

impl std::fmt::Display for OpaqueStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for OpaqueStorageError {}
