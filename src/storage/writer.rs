//! Single-flight persistence queue.

use super::{StatsRecord, Storage, StorageError};
use crate::boss::Boss;
use crate::core::session_state::{SessionMeta, UserProfile};
use crate::idle::GeneratorData;
use crate::missions::{MissionId, MissionPool};
use crate::progression::Stats;
use crate::tasks::Task;
use std::collections::VecDeque;

/// One write, carrying an owned snapshot of what to store.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistCommand {
    SaveTasks(Vec<Task>),
    SaveStats { stats: Stats, gold: u64 },
    SaveGenerator(GeneratorData),
    SaveBosses(Vec<Boss>),
    ReplacePool(MissionPool),
    MarkMissionUsed(MissionId),
    SaveProfile(UserProfile),
    SaveMeta(SessionMeta),
    /// Writes applied back to back in one flush step. Stops at the first
    /// failure.
    Batch(Vec<PersistCommand>),
}

impl PersistCommand {
    pub fn label(&self) -> &'static str {
        match self {
            PersistCommand::SaveTasks(_) => "tasks",
            PersistCommand::SaveStats { .. } => "stats",
            PersistCommand::SaveGenerator(_) => "generator",
            PersistCommand::SaveBosses(_) => "bosses",
            PersistCommand::ReplacePool(_) => "mission_pool",
            PersistCommand::MarkMissionUsed(_) => "mission_used",
            PersistCommand::SaveProfile(_) => "profile",
            PersistCommand::SaveMeta(_) => "meta",
            PersistCommand::Batch(_) => "batch",
        }
    }

    pub fn apply(&self, store: &dyn Storage) -> Result<(), StorageError> {
        match self {
            PersistCommand::SaveTasks(tasks) => store.save_tasks(tasks),
            PersistCommand::SaveStats { stats, gold } => store.save_stats(&StatsRecord {
                stats: *stats,
                gold: *gold,
            }),
            PersistCommand::SaveGenerator(generator) => store.save_generator(generator),
            PersistCommand::SaveBosses(bosses) => store.save_bosses(bosses),
            PersistCommand::ReplacePool(pool) => store.replace_mission_pool(pool),
            PersistCommand::MarkMissionUsed(id) => store.set_mission_used(*id),
            PersistCommand::SaveProfile(profile) => store.save_profile(profile),
            PersistCommand::SaveMeta(meta) => store.save_meta(meta),
            PersistCommand::Batch(commands) => commands.iter().try_for_each(|c| c.apply(store)),
        }
    }
}

/// Result of applying one queued command.
#[derive(Debug)]
pub struct PersistOutcome {
    pub command: &'static str,
    pub result: Result<(), StorageError>,
}

impl PersistOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Owns the store and applies queued writes strictly in order, one at a
/// time. Failures are reported, never retried.
pub struct SessionWriter {
    store: Box<dyn Storage>,
    queue: VecDeque<PersistCommand>,
}

impl SessionWriter {
    pub fn new(store: Box<dyn Storage>) -> Self {
        Self {
            store,
            queue: VecDeque::new(),
        }
    }

    pub fn store(&self) -> &dyn Storage {
        self.store.as_ref()
    }

    pub fn enqueue(&mut self, command: PersistCommand) {
        self.queue.push_back(command);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drains the queue front to back.
    pub fn flush(&mut self) -> Vec<PersistOutcome> {
        let mut outcomes = Vec::with_capacity(self.queue.len());
        while let Some(command) = self.queue.pop_front() {
            let result = command.apply(self.store.as_ref());
            if let Err(e) = &result {
                tracing::warn!(command = command.label(), error = %e, "persist failed");
            }
            outcomes.push(PersistOutcome {
                command: command.label(),
                result,
            });
        }
        outcomes
    }
}
