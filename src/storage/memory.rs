//! In-memory store. Clones share the same data, so a test can keep a handle
//! while the session owns another.

use super::{StatsRecord, Storage, StorageError};
use crate::boss::Boss;
use crate::core::session_state::{SessionMeta, UserProfile};
use crate::idle::GeneratorData;
use crate::missions::{MissionId, MissionPool};
use crate::tasks::Task;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryData {
    tasks: Vec<Task>,
    stats: StatsRecord,
    generator: GeneratorData,
    bosses: Vec<Boss>,
    pool: MissionPool,
    profile: UserProfile,
    meta: SessionMeta,
    /// Names of successful writes, in order.
    writes: Vec<&'static str>,
    /// Remaining writes that will fail.
    fail_writes: usize,
    fail_reads: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn data(&self) -> MutexGuard<'_, MemoryData> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes the next `count` writes fail.
    pub fn fail_next_writes(&self, count: usize) {
        self.data().fail_writes = count;
    }

    /// Makes every load fail until turned off.
    pub fn set_fail_reads(&self, fail: bool) {
        self.data().fail_reads = fail;
    }

    /// Collections written so far, in order.
    pub fn write_log(&self) -> Vec<&'static str> {
        self.data().writes.clone()
    }

    pub fn clear_write_log(&self) {
        self.data().writes.clear();
    }

    fn read<T>(&self, f: impl FnOnce(&MemoryData) -> T) -> Result<T, StorageError> {
        let data = self.data();
        if data.fail_reads {
            return Err(StorageError::Unavailable("read failure injected".to_string()));
        }
        Ok(f(&data))
    }

    fn write(
        &self,
        collection: &'static str,
        f: impl FnOnce(&mut MemoryData) -> Result<(), StorageError>,
    ) -> Result<(), StorageError> {
        let mut data = self.data();
        if data.fail_writes > 0 {
            data.fail_writes -= 1;
            return Err(StorageError::Unavailable(format!(
                "write to {} failed (injected)",
                collection
            )));
        }
        f(&mut data)?;
        data.writes.push(collection);
        Ok(())
    }
}

impl Storage for MemoryStore {
    fn load_tasks(&self) -> Result<Vec<Task>, StorageError> {
        self.read(|d| d.tasks.clone())
    }

    fn save_tasks(&self, tasks: &[Task]) -> Result<(), StorageError> {
        self.write("tasks", |d| {
            d.tasks = tasks.to_vec();
            Ok(())
        })
    }

    fn load_stats(&self) -> Result<StatsRecord, StorageError> {
        self.read(|d| d.stats)
    }

    fn save_stats(&self, record: &StatsRecord) -> Result<(), StorageError> {
        self.write("stats", |d| {
            d.stats = *record;
            Ok(())
        })
    }

    fn load_generator(&self) -> Result<GeneratorData, StorageError> {
        self.read(|d| d.generator.clone())
    }

    fn save_generator(&self, generator: &GeneratorData) -> Result<(), StorageError> {
        self.write("generator", |d| {
            d.generator = generator.clone();
            Ok(())
        })
    }

    fn load_bosses(&self) -> Result<Vec<Boss>, StorageError> {
        self.read(|d| d.bosses.clone())
    }

    fn save_bosses(&self, bosses: &[Boss]) -> Result<(), StorageError> {
        self.write("bosses", |d| {
            d.bosses = bosses.to_vec();
            Ok(())
        })
    }

    fn load_mission_pool(&self) -> Result<MissionPool, StorageError> {
        self.read(|d| d.pool.clone())
    }

    fn replace_mission_pool(&self, pool: &MissionPool) -> Result<(), StorageError> {
        self.write("mission_pool", |d| {
            d.pool = pool.clone();
            Ok(())
        })
    }

    fn set_mission_used(&self, id: MissionId) -> Result<(), StorageError> {
        self.write("mission_used", |d| {
            if d.pool.get(id).is_none() {
                return Err(StorageError::MissionNotFound(id));
            }
            d.pool.mark_used(id);
            Ok(())
        })
    }

    fn load_profile(&self) -> Result<UserProfile, StorageError> {
        self.read(|d| d.profile.clone())
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        self.write("profile", |d| {
            d.profile = profile.clone();
            Ok(())
        })
    }

    fn load_meta(&self) -> Result<SessionMeta, StorageError> {
        self.read(|d| d.meta.clone())
    }

    fn save_meta(&self, meta: &SessionMeta) -> Result<(), StorageError> {
        self.write("meta", |d| {
            d.meta = meta.clone();
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{load_session_state, save_session_state};
    use crate::core::session_state::SessionState;

    #[test]
    fn test_clones_share_data() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store
            .save_stats(&StatsRecord {
                gold: 77,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(handle.load_stats().unwrap().gold, 77);
        assert_eq!(handle.write_log(), vec!["stats"]);
    }

    #[test]
    fn test_injected_write_failure_is_one_shot() {
        let store = MemoryStore::new();
        store.fail_next_writes(1);
        assert!(store.save_tasks(&[]).is_err());
        assert!(store.save_tasks(&[]).is_ok());
        assert_eq!(store.write_log(), vec!["tasks"]);
    }

    #[test]
    fn test_failed_reads_load_defaults() {
        let store = MemoryStore::new();
        let mut state = SessionState::default();
        state.gold = 300;
        save_session_state(&store, &state).unwrap();

        store.set_fail_reads(true);
        assert_eq!(load_session_state(&store).gold, 0);

        store.set_fail_reads(false);
        assert_eq!(load_session_state(&store), state);
    }
}
