//! JSON files under a data directory (default `~/.questlog/`).

use super::{StatsRecord, Storage, StorageError};
use crate::boss::Boss;
use crate::core::config::EngineConfig;
use crate::core::session_state::{SessionMeta, UserProfile};
use crate::idle::GeneratorData;
use crate::missions::{MissionId, MissionPool};
use crate::tasks::Task;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const TASKS_FILE: &str = "tasks.json";
const STATS_FILE: &str = "stats.json";
const GENERATOR_FILE: &str = "generator.json";
const BOSSES_FILE: &str = "bosses.json";
const POOL_FILE: &str = "mission_pool.json";
const PROFILE_FILE: &str = "profile.json";
const META_FILE: &str = "meta.json";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn from_config(config: &EngineConfig) -> io::Result<Self> {
        Self::open(config.resolve_data_dir()?)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// A missing file reads as the default value. An unreadable or invalid
    /// one is an error.
    fn read_json<T: Default + DeserializeOwned>(&self, filename: &str) -> Result<T, StorageError> {
        match fs::read_to_string(self.path(filename)) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, filename: &str, data: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(self.path(filename), json)?;
        Ok(())
    }
}

impl Storage for JsonFileStore {
    fn load_tasks(&self) -> Result<Vec<Task>, StorageError> {
        self.read_json(TASKS_FILE)
    }

    fn save_tasks(&self, tasks: &[Task]) -> Result<(), StorageError> {
        self.write_json(TASKS_FILE, tasks)
    }

    fn load_stats(&self) -> Result<StatsRecord, StorageError> {
        self.read_json(STATS_FILE)
    }

    fn save_stats(&self, record: &StatsRecord) -> Result<(), StorageError> {
        self.write_json(STATS_FILE, record)
    }

    fn load_generator(&self) -> Result<GeneratorData, StorageError> {
        self.read_json(GENERATOR_FILE)
    }

    fn save_generator(&self, generator: &GeneratorData) -> Result<(), StorageError> {
        self.write_json(GENERATOR_FILE, generator)
    }

    fn load_bosses(&self) -> Result<Vec<Boss>, StorageError> {
        self.read_json(BOSSES_FILE)
    }

    fn save_bosses(&self, bosses: &[Boss]) -> Result<(), StorageError> {
        self.write_json(BOSSES_FILE, bosses)
    }

    fn load_mission_pool(&self) -> Result<MissionPool, StorageError> {
        self.read_json(POOL_FILE)
    }

    fn replace_mission_pool(&self, pool: &MissionPool) -> Result<(), StorageError> {
        self.write_json(POOL_FILE, pool)
    }

    fn set_mission_used(&self, id: MissionId) -> Result<(), StorageError> {
        let mut pool: MissionPool = self.read_json(POOL_FILE)?;
        if !pool.mark_used(id) && pool.get(id).is_none() {
            return Err(StorageError::MissionNotFound(id));
        }
        self.write_json(POOL_FILE, &pool)
    }

    fn load_profile(&self) -> Result<UserProfile, StorageError> {
        self.read_json(PROFILE_FILE)
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        self.write_json(PROFILE_FILE, profile)
    }

    fn load_meta(&self) -> Result<SessionMeta, StorageError> {
        self.read_json(META_FILE)
    }

    fn save_meta(&self, meta: &SessionMeta) -> Result<(), StorageError> {
        self.write_json(META_FILE, meta)
    }
}
