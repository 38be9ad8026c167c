//! Session engine - the authoritative fixed-timestep mission loop.
//!
//! One 60 Hz tick drives all state mutation: spawning, expiry and
//! completion scans, the flavor stream, the healing trigger, and the
//! terminal check, in that order. Player commands arrive between ticks via
//! [`SessionEngine::apply`] and are dispatched synchronously; every
//! command is safe to send at any time, and invalid or stale ones are
//! ignored.

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use roverops_logic::balance;
use roverops_logic::constants::{penalties, session, timing};

use crate::components::{Category, EventInfo, Lane, Priority};
use crate::generation::EventGenerator;
use crate::logs::{flavor_line, LogFeed, LogLevel};
use crate::minigame::{MinigamePicker, OutcomeProvider, SimulatedMinigames};
use crate::snapshot::{self, MissionSnapshot};
use crate::triage;

pub use roverops_logic::mission::MissionConfig;

/// How a mission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionResult {
    /// The clock ran out with the rover still alive.
    Success,
    /// Health reached zero first.
    Failure,
}

/// Terminal report for a finished mission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionOutcome {
    pub result: MissionResult,
    pub health: i32,
    pub score: i32,
    pub elapsed_secs: f32,
}

/// A discrete triage command from the presentation layer.
///
/// Commands that need a target act on the current selection; a selection
/// that went stale, points at the wrong lane, or fails a capacity guard
/// turns the command into a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Select { lane: Lane, id: u32 },
    Honor,
    Reject,
    Enqueue,
    Execute,
    Terminate,
    AdjustPriority { delta: i8 },
}

/// Owns the world, the clocks, and the session meters for one mission.
/// Created at mission start and discarded at mission end.
pub struct SessionEngine {
    world: World,
    rng: StdRng,
    config: MissionConfig,
    generator: EventGenerator,
    picker: MinigamePicker,
    provider: Box<dyn OutcomeProvider>,
    logs: LogFeed,
    health: i32,
    score: i32,
    ticks: u64,
    ticks_since_spawn: u64,
    ticks_since_log: u64,
    next_heal_secs: f32,
    lane_seq: u64,
    selection: Option<(Lane, u32)>,
    outcome: Option<MissionOutcome>,
}

impl SessionEngine {
    pub fn new(config: MissionConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let first_heal_secs = rng.gen_range(20..=40) as f32;
        let provider = Box::new(SimulatedMinigames::seeded(rng.gen()));

        Self {
            world: World::new(),
            rng,
            config,
            generator: EventGenerator::new(),
            picker: MinigamePicker::new(),
            provider,
            logs: LogFeed::new(),
            health: session::STARTING_HEALTH,
            score: 0,
            ticks: 0,
            ticks_since_spawn: 0,
            ticks_since_log: 0,
            next_heal_secs: first_heal_secs,
            lane_seq: 0,
            selection: None,
            outcome: None,
        }
    }

    /// Swap in a different mini-game resolver (a windowed frontend, or a
    /// scripted one in tests).
    pub fn with_provider(mut self, provider: Box<dyn OutcomeProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// Advance one fixed 1/60 s step. Returns the outcome on the tick the
    /// mission ends and on every call after; a finished mission never
    /// ticks again.
    pub fn tick(&mut self) -> Option<MissionOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        self.ticks += 1;
        let dt = timing::TICK_SECONDS;

        // 1. Arrival cadence
        self.ticks_since_spawn += 1;
        if self.ticks_since_spawn >= self.config.spawn_interval_ticks {
            self.ticks_since_spawn = 0;
            let spec = self.generator.generate(&mut self.rng);
            log::debug!(
                "event {} arrived: {} [{}]",
                spec.id,
                spec.name,
                spec.category.label()
            );
            let seq = self.next_seq();
            triage::spawn_incoming(&mut self.world, &spec, seq);
        }

        // 2. Automatic expirations, then completions
        for missed in triage::expire_incoming(&mut self.world, dt) {
            self.health -= missed.impact;
            log::info!("event {} missed (-{} HP)", missed.id, missed.impact);
            self.logs.push(
                LogLevel::Warn,
                format!("Missed: {} (-{} HP)", missed.category.label(), missed.impact),
            );
            self.drop_selection_of(missed.id);
        }
        for done in triage::complete_active(&mut self.world, dt) {
            self.score += done.benefit;
            log::info!("event {} completed (+{} pts)", done.id, done.benefit);
            self.logs.push(
                LogLevel::Info,
                format!("Completed: {} (+{} pts)", done.category.label(), done.benefit),
            );
            self.drop_selection_of(done.id);
        }

        // 3. Flavor stream
        self.ticks_since_log += 1;
        if self.ticks_since_log >= timing::LOG_INTERVAL_TICKS {
            self.ticks_since_log = 0;
            let (level, text) = flavor_line(&mut self.rng);
            self.logs.push(level, text);
        }

        // 4. Healing mini-game
        if self.elapsed_secs() >= self.next_heal_secs {
            let kind = self.picker.pick(&mut self.rng);
            log::debug!("healing mini-game: {:?}", kind);
            if self.provider.attempt(kind) {
                self.health = balance::healed(self.health);
                self.logs.push(
                    LogLevel::Info,
                    format!("Healing mini-game success! +{} HP", penalties::HEAL_AMOUNT),
                );
            }
            let (lo, hi) = balance::heal_window(self.health);
            self.next_heal_secs = self.elapsed_secs() + self.rng.gen_range(lo..=hi) as f32;
        }

        // 5. Terminal check
        if self.health <= 0 {
            self.finish(MissionResult::Failure)
        } else if self.elapsed_secs() >= self.config.mission_secs as f32 {
            self.finish(MissionResult::Success)
        } else {
            None
        }
    }

    /// Dispatch one player command. Ignored after the mission ends.
    pub fn apply(&mut self, command: Command) {
        if self.outcome.is_some() {
            return;
        }
        match command {
            Command::Select { lane, id } => {
                if triage::resolve(&self.world, lane, id).is_some() {
                    self.selection = Some((lane, id));
                }
            }
            Command::Honor => self.honor(),
            Command::Reject => self.reject(),
            Command::Enqueue => self.enqueue(),
            Command::Execute => self.execute(),
            Command::Terminate => self.terminate(),
            Command::AdjustPriority { delta } => self.adjust_priority(delta),
        }
    }

    /// Read-only view of the session for rendering.
    pub fn snapshot(&self) -> MissionSnapshot {
        snapshot::capture(
            &self.world,
            self.selection,
            self.health,
            self.score,
            self.remaining_secs(),
            &self.logs,
        )
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.ticks as f32 * timing::TICK_SECONDS
    }

    pub fn remaining_secs(&self) -> f32 {
        (self.config.mission_secs as f32 - self.elapsed_secs()).max(0.0)
    }

    /// When the next healing mini-game is due, in elapsed seconds.
    pub fn next_heal_at_secs(&self) -> f32 {
        self.next_heal_secs
    }

    pub fn selection(&self) -> Option<(Lane, u32)> {
        self.selection
    }

    pub fn outcome(&self) -> Option<MissionOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn active_count(&self) -> usize {
        triage::active_count(&self.world)
    }

    pub fn incoming_count(&self) -> usize {
        triage::incoming_count(&self.world)
    }

    pub fn queued_count(&self) -> usize {
        triage::queued_count(&self.world)
    }

    /// Console lines oldest-first.
    pub fn logs(&self) -> impl Iterator<Item = &crate::logs::LogLine> {
        self.logs.lines()
    }

    /// Lane-disjointness probe for tests and the simtest harness.
    pub fn lanes_disjoint(&self) -> bool {
        triage::lanes_disjoint(&self.world)
    }

    // ── Commands ────────────────────────────────────────────────────────

    fn honor(&mut self) {
        if triage::active_count(&self.world) >= self.config.max_active {
            return;
        }
        let Some(entity) = self.take_selection(Lane::Incoming) else {
            return;
        };
        let (category, priority) = self.describe(entity);
        let seq = self.next_seq();
        if !triage::begin(&mut self.world, entity, seq) {
            return;
        }
        self.selection = None;
        self.logs.push(
            LogLevel::Info,
            format!("Honored: {} (P{})", category.label(), priority),
        );

        if self.rng.gen_bool(penalties::HONOR_MINIGAME_CHANCE) {
            let kind = self.picker.pick(&mut self.rng);
            log::debug!("honor mini-game: {:?}", kind);
            if self.provider.attempt(kind) {
                self.score += penalties::HONOR_MINIGAME_SCORE;
            } else {
                self.health -= penalties::HONOR_MINIGAME_PENALTY;
            }
        }
    }

    fn reject(&mut self) {
        let Some(entity) = self.take_selection(Lane::Incoming) else {
            return;
        };
        let (category, priority) = self.describe(entity);
        triage::discard(&mut self.world, entity);
        self.health -= penalties::REJECT;
        self.selection = None;
        self.logs.push(
            LogLevel::Warn,
            format!("Rejected: {} (P{})", category.label(), priority),
        );
    }

    fn enqueue(&mut self) {
        let Some(entity) = self.take_selection(Lane::Incoming) else {
            return;
        };
        let (category, priority) = self.describe(entity);
        let seq = self.next_seq();
        if !triage::park(&mut self.world, entity, seq) {
            return;
        }
        self.selection = None;
        self.logs.push(
            LogLevel::Info,
            format!("Queued: {} (P{})", category.label(), priority),
        );
    }

    fn execute(&mut self) {
        if triage::active_count(&self.world) >= self.config.max_active {
            return;
        }
        let Some(entity) = self.take_selection(Lane::Queued) else {
            return;
        };
        let (category, priority) = self.describe(entity);
        let seq = self.next_seq();
        if !triage::resume(&mut self.world, entity, seq) {
            return;
        }
        self.selection = None;
        self.logs.push(
            LogLevel::Info,
            format!("Executed: {} (P{})", category.label(), priority),
        );
    }

    fn terminate(&mut self) {
        let Some((lane, _)) = self.selection else {
            return;
        };
        match lane {
            Lane::Active => {
                let Some(entity) = self.take_selection(Lane::Active) else {
                    return;
                };
                let (category, _) = self.describe(entity);
                if let Some(damage) = triage::terminate_active(&mut self.world, entity) {
                    self.health -= damage;
                    self.selection = None;
                    self.logs.push(
                        LogLevel::Warn,
                        format!("Terminated: {} (-{} HP)", category.label(), damage),
                    );
                }
            }
            Lane::Queued => {
                let Some(entity) = self.take_selection(Lane::Queued) else {
                    return;
                };
                let (category, _) = self.describe(entity);
                triage::discard(&mut self.world, entity);
                self.selection = None;
                self.logs.push(
                    LogLevel::Info,
                    format!("Removed from queue: {}", category.label()),
                );
            }
            Lane::Incoming => {}
        }
    }

    fn adjust_priority(&mut self, delta: i8) {
        let Some((Lane::Queued, id)) = self.selection else {
            return;
        };
        let Some(entity) = triage::resolve(&self.world, Lane::Queued, id) else {
            self.selection = None;
            return;
        };
        if let Ok(mut priority) = self.world.get::<&mut Priority>(entity) {
            priority.adjust(delta.signum());
        }
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Resolve the current selection against `lane`. A selection tagged
    /// with a different lane is left untouched; one whose referent is gone
    /// from its tagged lane is stale and gets cleared.
    fn take_selection(&mut self, lane: Lane) -> Option<Entity> {
        let (selected_lane, id) = self.selection?;
        if selected_lane != lane {
            return None;
        }
        match triage::resolve(&self.world, lane, id) {
            Some(entity) => Some(entity),
            None => {
                self.selection = None;
                None
            }
        }
    }

    /// Clear the selection if it refers to `id` (which just left the
    /// session).
    fn drop_selection_of(&mut self, id: u32) {
        if let Some((_, selected_id)) = self.selection {
            if selected_id == id {
                self.selection = None;
            }
        }
    }

    fn describe(&self, entity: Entity) -> (Category, u8) {
        let category = self
            .world
            .get::<&EventInfo>(entity)
            .map(|info| info.category)
            .unwrap_or(Category::Sensors);
        let priority = self
            .world
            .get::<&Priority>(entity)
            .map(|priority| priority.0)
            .unwrap_or(0);
        (category, priority)
    }

    fn next_seq(&mut self) -> u64 {
        self.lane_seq += 1;
        self.lane_seq
    }

    fn finish(&mut self, result: MissionResult) -> Option<MissionOutcome> {
        let outcome = MissionOutcome {
            result,
            health: self.health,
            score: self.score,
            elapsed_secs: self.elapsed_secs(),
        };
        log::info!(
            "mission over: {:?} health={} score={} elapsed={:.1}s",
            result,
            outcome.health,
            outcome.score,
            outcome.elapsed_secs
        );
        self.outcome = Some(outcome);
        self.outcome
    }
}
