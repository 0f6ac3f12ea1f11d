//! Persistence contract and the command queue that feeds it.
//!
//! The session never writes directly. Each handler enqueues
//! [`PersistCommand`]s carrying owned snapshots; the [`SessionWriter`] applies
//! them one at a time in enqueue order.

pub mod json_store;
pub mod memory;
pub mod writer;

pub use json_store::JsonFileStore;
pub use memory::MemoryStore;
pub use writer::{PersistCommand, PersistOutcome, SessionWriter};

use crate::boss::Boss;
use crate::core::session_state::{SessionMeta, SessionState, UserProfile};
use crate::idle::GeneratorData;
use crate::missions::{MissionId, MissionPool};
use crate::progression::Stats;
use crate::tasks::Task;
use serde::{Deserialize, Serialize};
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("stored record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("mission {0} is not in the stored pool")]
    MissionNotFound(MissionId),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Stats and gold share one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRecord {
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub gold: u64,
}

/// Key/value style store, one record per collection. The mission pool only
/// supports whole replacement and per-mission used flags.
pub trait Storage {
    fn load_tasks(&self) -> Result<Vec<Task>, StorageError>;
    fn save_tasks(&self, tasks: &[Task]) -> Result<(), StorageError>;

    fn load_stats(&self) -> Result<StatsRecord, StorageError>;
    fn save_stats(&self, record: &StatsRecord) -> Result<(), StorageError>;

    fn load_generator(&self) -> Result<GeneratorData, StorageError>;
    fn save_generator(&self, generator: &GeneratorData) -> Result<(), StorageError>;

    fn load_bosses(&self) -> Result<Vec<Boss>, StorageError>;
    fn save_bosses(&self, bosses: &[Boss]) -> Result<(), StorageError>;

    fn load_mission_pool(&self) -> Result<MissionPool, StorageError>;
    fn replace_mission_pool(&self, pool: &MissionPool) -> Result<(), StorageError>;
    fn set_mission_used(&self, id: MissionId) -> Result<(), StorageError>;

    fn load_profile(&self) -> Result<UserProfile, StorageError>;
    fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError>;

    fn load_meta(&self) -> Result<SessionMeta, StorageError>;
    fn save_meta(&self, meta: &SessionMeta) -> Result<(), StorageError>;
}

fn or_default<T: Default>(collection: &str, loaded: Result<T, StorageError>) -> T {
    loaded.unwrap_or_else(|e| {
        tracing::warn!(collection, error = %e, "failed to load, starting from defaults");
        T::default()
    })
}

/// Loads every collection. A collection that fails to load starts from its
/// default; the others are unaffected.
pub fn load_session_state(store: &dyn Storage) -> SessionState {
    let record = or_default("stats", store.load_stats());
    SessionState {
        tasks: or_default("tasks", store.load_tasks()),
        stats: record.stats,
        gold: record.gold,
        generator: or_default("generator", store.load_generator()),
        bosses: or_default("bosses", store.load_bosses()),
        pool: or_default("mission_pool", store.load_mission_pool()),
        profile: or_default("profile", store.load_profile()),
        meta: or_default("meta", store.load_meta()),
    }
}

/// Writes every collection, stopping at the first failure.
pub fn save_session_state(store: &dyn Storage, state: &SessionState) -> Result<(), StorageError> {
    store.save_tasks(&state.tasks)?;
    store.save_stats(&StatsRecord {
        stats: state.stats,
        gold: state.gold,
    })?;
    store.save_generator(&state.generator)?;
    store.save_bosses(&state.bosses)?;
    store.replace_mission_pool(&state.pool)?;
    store.save_profile(&state.profile)?;
    store.save_meta(&state.meta)?;
    Ok(())
}
