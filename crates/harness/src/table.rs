use fogbound_core::{PlayerId, SceneId};
use fogbound_engine::{EngineConfig, EngineError, FogEngine};
use fogbound_storage::{SqliteStorage, StorageError};
use tempfile::TempDir;

/// Open a fresh engine connection onto the database at `path`.
pub fn open_engine(path: &str) -> Result<FogEngine<SqliteStorage>, StorageError> {
    Ok(FogEngine::new(SqliteStorage::open(path)?))
}

/// One scene backed by an on-disk database that any number of engine
/// connections can share, the way several API workers would.
pub struct TestTable {
    _dir: TempDir,
    path: String,
    scene_id: SceneId,
    players: Vec<PlayerId>,
    engines: Vec<FogEngine<SqliteStorage>>,
}

impl TestTable {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir
            .path()
            .join("fog.db")
            .to_str()
            .ok_or("temp path is not valid UTF-8")?
            .to_string();
        let gm = open_engine(&path)?;
        Ok(Self {
            _dir: dir,
            path,
            scene_id: SceneId::new(),
            players: Vec::new(),
            engines: vec![gm],
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn scene_id(&self) -> SceneId {
        self.scene_id
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Add a player and touch their fog so the scene has a record for them.
    pub fn seat_player(&mut self) -> Result<PlayerId, EngineError> {
        let player_id = PlayerId::new();
        let scene_id = self.scene_id;
        self.gm().get_fog(scene_id, player_id)?;
        self.players.push(player_id);
        Ok(player_id)
    }

    /// Open another connection. Returns its index for [`TestTable::engine`].
    pub fn add_connection(&mut self) -> Result<usize, StorageError> {
        self.add_connection_with(EngineConfig::default())
    }

    pub fn add_connection_with(&mut self, config: EngineConfig) -> Result<usize, StorageError> {
        let engine = FogEngine::with_config(SqliteStorage::open(&self.path)?, config);
        let index = self.engines.len();
        self.engines.push(engine);
        Ok(index)
    }

    /// The connection the game master acts through.
    pub fn gm(&mut self) -> &mut FogEngine<SqliteStorage> {
        &mut self.engines[0]
    }

    pub fn engine(&mut self, index: usize) -> &mut FogEngine<SqliteStorage> {
        &mut self.engines[index]
    }
}
