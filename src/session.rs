//! Session controller.
//!
//! A [`GameSession`] owns the one [`SessionState`] for a user together with
//! the clock, random source, content generator and persistence writer. Every
//! handler runs the pure operation against the state, then enqueues the
//! writes it implies. Nothing touches storage until [`GameSession::flush`].

use crate::analytics::{activity_heatmap, stat_radar, HeatmapCell};
use crate::boss::{self, BossId};
use crate::content::{
    analyze_boss_or_fallback, analyze_task_or_fallback, weekly_missions_or_fallback,
    ContentGenerator, FallbackGenerator, HttpGenerator,
};
use crate::core::clock::{month_key, week_id, Clock, SystemClock};
use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, EngineResult};
use crate::core::events::{ActionResult, EngineEvent, Outcome};
use crate::core::session_state::SessionState;
use crate::idle::{self, IdleReport};
use crate::missions::{self, MissionId, PoolMission};
use crate::progression::{exp_for_level_and_progress, Track, NUM_TRACKS};
use crate::shop::{self, ShopItem};
use crate::skip::{self, SkipMode};
use crate::storage::{
    load_session_state, JsonFileStore, PersistCommand, PersistOutcome, SessionWriter, Storage,
};
use crate::tasks::{self, NewTask, TaskEdit, TaskId};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Fixed answer, for scripts and tests.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

/// What the UI should offer when the user opens the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPrompt {
    /// The pool belongs to another week; ask for this week's goals.
    WeeklySetup { week_id: String },
    /// Today's gacha draw is still available.
    DailyGacha,
    None,
}

/// Shop prices and balances at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopView {
    pub potion_price: u64,
    pub ticket_price: u64,
    pub gold: u64,
    pub tickets: u32,
}

pub struct GameSession<R: Rng = StdRng> {
    state: SessionState,
    writer: SessionWriter,
    content: Box<dyn ContentGenerator>,
    clock: Box<dyn Clock>,
    rng: R,
}

impl GameSession<StdRng> {
    /// Session backed by the JSON store, the configured content endpoint (or
    /// the fallback generator) and the system clock.
    pub fn open(config: &EngineConfig) -> io::Result<Self> {
        let store = JsonFileStore::from_config(config)?;
        tracing::info!(dir = %store.dir().display(), "opening session");

        let content: Box<dyn ContentGenerator> = match HttpGenerator::from_config(config) {
            Some(generator) => Box::new(generator),
            None => Box::new(FallbackGenerator),
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::load(Box::new(store), content, Box::new(SystemClock), rng))
    }
}

impl<R: Rng> GameSession<R> {
    pub fn new(
        state: SessionState,
        writer: SessionWriter,
        content: Box<dyn ContentGenerator>,
        clock: Box<dyn Clock>,
        rng: R,
    ) -> Self {
        Self {
            state,
            writer,
            content,
            clock,
            rng,
        }
    }

    /// Loads every collection from `store`. Collections that fail to load
    /// start from defaults.
    pub fn load(
        store: Box<dyn Storage>,
        content: Box<dyn ContentGenerator>,
        clock: Box<dyn Clock>,
        rng: R,
    ) -> Self {
        let state = load_session_state(store.as_ref());
        Self::new(state, SessionWriter::new(store), content, clock, rng)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn pending_writes(&self) -> usize {
        self.writer.pending()
    }

    /// Applies queued writes in order and reports each outcome.
    pub fn flush(&mut self) -> Vec<PersistOutcome> {
        self.writer.flush()
    }

    fn save_tasks(&mut self) {
        self.writer
            .enqueue(PersistCommand::SaveTasks(self.state.tasks.clone()));
    }

    fn save_stats(&mut self) {
        self.writer.enqueue(PersistCommand::SaveStats {
            stats: self.state.stats,
            gold: self.state.gold,
        });
    }

    fn save_generator(&mut self) {
        self.writer
            .enqueue(PersistCommand::SaveGenerator(self.state.generator.clone()));
    }

    fn save_bosses(&mut self) {
        self.writer
            .enqueue(PersistCommand::SaveBosses(self.state.bosses.clone()));
    }

    fn save_meta(&mut self) {
        self.writer
            .enqueue(PersistCommand::SaveMeta(self.state.meta.clone()));
    }

    fn save_burned_missions(&mut self, result: &ActionResult) {
        for event in &result.events {
            if let EngineEvent::MissionBurned { mission_id } = event {
                self.writer
                    .enqueue(PersistCommand::MarkMissionUsed(*mission_id));
            }
        }
    }

    // ── Day start ───────────────────────────────────────────────

    /// Records today's visit and says which prompt to show.
    pub fn start_day(&mut self) -> SessionPrompt {
        let today = self.today();
        if self.state.meta.streak.advance(today) {
            tracing::info!(streak = self.state.meta.streak.count, "visit recorded");
            self.save_meta();
        }

        let current_week = week_id(today);
        if self.state.pool.needs_rollover(&current_week) {
            SessionPrompt::WeeklySetup {
                week_id: current_week,
            }
        } else if missions::gacha_available(&self.state, today) {
            SessionPrompt::DailyGacha
        } else {
            SessionPrompt::None
        }
    }

    /// Replaces the mission pool for the current week from free-text goals,
    /// one per line.
    pub fn setup_week(&mut self, goal_text: &str) -> EngineResult<ActionResult> {
        let goals = missions::parse_goals(goal_text);
        if goals.is_empty() {
            return Err(EngineError::NoGoals);
        }

        let generated =
            weekly_missions_or_fallback(self.content.as_ref(), &goals, &self.state.profile);
        let current_week = week_id(self.today());
        let result = missions::install_weekly_pool(&mut self.state, &current_week, generated);
        self.state.profile.weekly_goal = Some(goal_text.trim().to_string());

        self.writer
            .enqueue(PersistCommand::ReplacePool(self.state.pool.clone()));
        self.writer
            .enqueue(PersistCommand::SaveProfile(self.state.profile.clone()));
        Ok(result)
    }

    // ── Tasks ───────────────────────────────────────────────────

    pub fn add_task(&mut self, new: NewTask) -> EngineResult<(TaskId, ActionResult)> {
        let (id, result) = tasks::add_task(&mut self.state, new, &mut self.rng)?;
        self.save_burned_missions(&result);
        self.save_tasks();
        Ok((id, result))
    }

    /// Adds a task whose track and reward come from the content generator.
    pub fn add_task_assisted(
        &mut self,
        title: &str,
        date: NaiveDate,
    ) -> EngineResult<(TaskId, ActionResult)> {
        if title.trim().is_empty() {
            return Err(EngineError::EmptyTitle);
        }
        let analysis = analyze_task_or_fallback(self.content.as_ref(), title, date);
        self.add_task(NewTask::new(title, analysis.track, date, analysis.reward))
    }

    pub fn complete_task(&mut self, id: TaskId) -> EngineResult<ActionResult> {
        let today = self.today();
        let result = tasks::complete_task(&mut self.state, id, today, &mut self.rng)?;
        self.save_tasks();
        self.save_stats();
        if result
            .events
            .iter()
            .any(|e| matches!(e, EngineEvent::BossDamaged { .. }))
        {
            self.save_bosses();
        }
        Ok(result)
    }

    pub fn undo_task(&mut self, id: TaskId) -> EngineResult<ActionResult> {
        let result = tasks::undo_task(&mut self.state, id)?;
        self.save_tasks();
        self.save_stats();
        Ok(result)
    }

    pub fn edit_task(&mut self, id: TaskId, edit: TaskEdit) -> EngineResult<ActionResult> {
        let result = tasks::edit_task(&mut self.state, id, edit)?;
        self.save_tasks();
        self.save_stats();
        Ok(result)
    }

    pub fn delete_task(&mut self, id: TaskId, confirm: &mut dyn Confirm) -> EngineResult<Outcome> {
        let title = self
            .state
            .tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.title.clone())
            .ok_or(EngineError::TaskNotFound(id))?;
        if !confirm.confirm(&format!("Delete task '{}'?", title)) {
            return Ok(Outcome::Cancelled);
        }

        let result = tasks::delete_task(&mut self.state, id)?;
        self.save_tasks();
        self.save_stats();
        Ok(Outcome::Applied(result))
    }

    // ── Gacha ───────────────────────────────────────────────────

    pub fn roll_gacha(&mut self) -> EngineResult<PoolMission> {
        let today = self.today();
        missions::roll_gacha(&self.state, today, &mut self.rng)
    }

    /// Accepts a drawn mission. The used flag, new task, streak bonus and
    /// gacha date are written together.
    pub fn accept_gacha(&mut self, mission_id: MissionId) -> EngineResult<(TaskId, ActionResult)> {
        let today = self.today();
        let (task_id, result) = missions::accept_gacha(&mut self.state, mission_id, today)?;
        self.writer.enqueue(PersistCommand::Batch(vec![
            PersistCommand::MarkMissionUsed(mission_id),
            PersistCommand::SaveTasks(self.state.tasks.clone()),
            PersistCommand::SaveStats {
                stats: self.state.stats,
                gold: self.state.gold,
            },
            PersistCommand::SaveMeta(self.state.meta.clone()),
        ]));
        Ok((task_id, result))
    }

    // ── Idle gold ───────────────────────────────────────────────

    pub fn idle_report(&self) -> IdleReport {
        idle::idle_report(&self.state.stats, &self.state.generator, self.clock.now())
    }

    pub fn collect_idle_gold(&mut self) -> ActionResult {
        let now = self.clock.now();
        let result = idle::collect(&mut self.state, now);
        self.save_stats();
        self.save_generator();
        result
    }

    // ── Boss ────────────────────────────────────────────────────

    pub fn create_boss(&mut self, name: &str, deadline: NaiveDate) -> EngineResult<BossId> {
        if name.trim().is_empty() {
            return Err(EngineError::EmptyTitle);
        }
        boss::ensure_no_active_boss(&self.state)?;

        let days = boss::days_remaining(deadline, self.today());
        let analysis = analyze_boss_or_fallback(self.content.as_ref(), name.trim(), days);
        let id = boss::create_boss(&mut self.state, name, Some(deadline), analysis)?;
        self.save_bosses();
        Ok(id)
    }

    pub fn abandon_boss(&mut self, id: BossId, confirm: &mut dyn Confirm) -> EngineResult<Outcome> {
        let name = self
            .state
            .bosses
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.name.clone())
            .ok_or(EngineError::BossNotFound(id))?;
        if !confirm.confirm(&format!("Abandon '{}'? The boss will be deleted.", name)) {
            return Ok(Outcome::Cancelled);
        }

        boss::abandon_boss(&mut self.state, id)?;
        tracing::info!(%id, "boss abandoned");
        self.save_bosses();
        Ok(Outcome::Applied(ActionResult::default()))
    }

    // ── Shop ────────────────────────────────────────────────────

    /// Applies the monthly price reset if the month changed.
    pub fn open_shop(&mut self) -> ActionResult {
        let month = month_key(self.today());
        let mut result = ActionResult::default();
        if shop::open_shop(&mut self.state.generator, &month) {
            tracing::debug!(month = %month, "shop prices reset");
            result.push(EngineEvent::ShopMonthReset { month });
            self.save_generator();
        }
        result
    }

    pub fn shop_view(&self) -> ShopView {
        let gen = &self.state.generator;
        ShopView {
            potion_price: shop::price(ShopItem::Potion, gen),
            ticket_price: shop::price(ShopItem::SkipTicket, gen),
            gold: self.state.gold,
            tickets: gen.ticket_inventory,
        }
    }

    pub fn buy(&mut self, item: ShopItem) -> EngineResult<ActionResult> {
        let mut result = self.open_shop();
        let month = month_key(self.today());
        result.extend(shop::purchase(&mut self.state, item, &month)?.events);
        self.save_stats();
        self.save_generator();
        Ok(result)
    }

    // ── Emergency skip ──────────────────────────────────────────

    pub fn emergency_skip(
        &mut self,
        mode: SkipMode,
        confirm: &mut dyn Confirm,
    ) -> EngineResult<Outcome> {
        let today = self.today();
        let targets = skip::skip_targets(&self.state, today);
        if targets.is_empty() {
            return Ok(Outcome::Applied(ActionResult::default()));
        }
        if mode == SkipMode::Ticket && self.state.generator.ticket_inventory == 0 {
            return Err(EngineError::NoSkipTicket);
        }

        let prompt = match mode {
            SkipMode::Ticket => format!("Use a skip ticket on {} task(s)?", targets.len()),
            SkipMode::Penalty => format!(
                "Skip {} task(s)? Their rewards will be taken as a penalty.",
                targets.len()
            ),
        };
        if !confirm.confirm(&prompt) {
            return Ok(Outcome::Cancelled);
        }

        let result = skip::emergency_skip(&mut self.state, today, mode)?;
        match mode {
            SkipMode::Ticket => self.writer.enqueue(PersistCommand::Batch(vec![
                PersistCommand::SaveTasks(self.state.tasks.clone()),
                PersistCommand::SaveGenerator(self.state.generator.clone()),
            ])),
            SkipMode::Penalty => {
                self.save_tasks();
                self.save_stats();
            }
        }
        Ok(Outcome::Applied(result))
    }

    // ── Profile and corrections ─────────────────────────────────

    pub fn update_profile(&mut self, hobbies: &str, recent_activities: &str) {
        self.state.profile.hobbies = hobbies.trim().to_string();
        self.state.profile.recent_activities = recent_activities.trim().to_string();
        self.writer
            .enqueue(PersistCommand::SaveProfile(self.state.profile.clone()));
    }

    /// Overwrites a track's EXP from a level and the EXP earned inside it.
    pub fn correct_stat(
        &mut self,
        track: Track,
        level: u32,
        exp_into_level: u64,
    ) -> EngineResult<u64> {
        let total = exp_for_level_and_progress(level, exp_into_level).ok_or(
            EngineError::LevelOutOfRange {
                level,
                exp: exp_into_level,
            },
        )?;
        tracing::info!(track = %track, level, exp_into_level, total, "stat corrected");
        self.state.stats.set(track, total);
        self.save_stats();
        Ok(total)
    }

    // ── Analytics ───────────────────────────────────────────────

    pub fn heatmap(&self, weeks: u32) -> Vec<HeatmapCell> {
        activity_heatmap(&self.state.tasks, self.today(), weeks)
    }

    pub fn radar(&self) -> [(Track, f64); NUM_TRACKS] {
        stat_radar(&self.state.stats)
    }
}
