//! Game state and status machine
//!
//! One `GameState` is one running game. Subsystem operations live next to
//! their subsystem (`gate`, `merge`, `particle`, ...) as `impl GameState`
//! blocks; this module owns construction, lifecycle transitions, events and
//! the render snapshot.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::circle::{Circle, CircleId, CircleStore};
use super::danger::DangerMonitor;
use super::gate::{DropGate, PreviewQueue};
use super::particle::{Particle, ParticleSystem};
use super::powerup::PowerUpLedger;
use super::scheduler::AutoDropScheduler;
use crate::config::{ConfigError, GameConfig, GameMode};
use crate::palette::ColorPalette;

/// Overall game status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    /// Initial, no entities
    Ready,
    /// Physics, merges, monitor and scheduler active
    Playing,
    /// Everything frozen in place
    Paused,
    /// Terminal
    GameOver,
}

/// Side effects reported to the host (sound, UI, score submission)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A mergeable pair was found (fired during the scan)
    MergeDetected { level: u8 },
    /// A merge produced a new circle
    Merged { id: CircleId, level: u8, position: Vec2 },
    /// A circle entered play
    Dropped { id: CircleId, level: u8, auto: bool },
    /// A destroy charge removed a circle
    Destroyed { id: CircleId, level: u8 },
    PowerUpAwarded { charges: u32 },
    DangerStarted,
    DangerCleared,
    GameOver { score: u64, mode: GameMode },
}

/// Work posted from outside the tick, drained at the start of the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Scheduler fire; ignored unless `generation` is still current
    AutoDrop { generation: u64 },
}

/// Read-only view handed to the renderer each tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub circles: Vec<Circle>,
    pub preview: Option<Circle>,
    pub particles: Vec<Particle>,
    pub score: u64,
    pub status: GameStatus,
    pub next_level: u8,
    pub upcoming_level: u8,
    pub highest_level: u8,
    pub power_ups: u32,
    pub in_danger: bool,
    pub mode: GameMode,
}

/// Complete state of one game
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) mode: GameMode,
    pub(crate) status: GameStatus,
    pub(crate) score: u64,
    pub(crate) highest_level: u8,
    pub(crate) circles: CircleStore,
    pub(crate) preview: Option<Circle>,
    pub(crate) queue: PreviewQueue,
    pub(crate) gate: DropGate,
    pub(crate) ledger: PowerUpLedger,
    pub(crate) particles: ParticleSystem,
    pub(crate) danger: DangerMonitor,
    pub(crate) scheduler: AutoDropScheduler,
    pub(crate) commands: VecDeque<Command>,
    pub(crate) events: Vec<GameEvent>,
    /// Simulated play time; only advances while playing
    pub(crate) elapsed_ms: f64,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a game in `Ready` status. The config must already be valid;
    /// use [`GameState::try_new`] for untrusted configs.
    pub fn new(config: GameConfig, mode: GameMode) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid game config");
        let rng = Pcg32::seed_from_u64(config.seed);
        Self::fresh(config, mode, rng, AutoDropScheduler::new())
    }

    /// Validate the config, then create a game in `Ready` status
    pub fn try_new(config: GameConfig, mode: GameMode) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, mode))
    }

    fn fresh(config: GameConfig, mode: GameMode, mut rng: Pcg32, scheduler: AutoDropScheduler) -> Self {
        let queue = PreviewQueue::new(&mut rng, config.spawn_levels);
        Self {
            circles: CircleStore::new(config.scaled_radii()),
            gate: DropGate::new(config.width / 2.0),
            ledger: PowerUpLedger::new(config.power_up_threshold, config.max_power_ups),
            particles: ParticleSystem::new(config.particles.clone()),
            danger: DangerMonitor::new(config.danger_timeout_ms),
            queue,
            scheduler,
            mode,
            status: GameStatus::Ready,
            score: 0,
            highest_level: 0,
            preview: None,
            commands: VecDeque::new(),
            events: Vec::new(),
            elapsed_ms: 0.0,
            time_ticks: 0,
            rng,
            config,
        }
    }

    /// Rebuild every subsystem for a new game, keeping the RNG stream and the
    /// scheduler generation so nothing from the old game can act on this one.
    fn reset(&mut self, mode: GameMode) {
        self.scheduler.stop();
        let scheduler = self.scheduler.successor();
        let rng = std::mem::replace(&mut self.rng, Pcg32::seed_from_u64(0));
        *self = Self::fresh(self.config.clone(), mode, rng, scheduler);
    }

    // === Lifecycle ===

    /// Start a new game from any status
    pub fn start(&mut self) {
        self.start_with_mode(self.mode);
    }

    /// Start a new game in the given mode
    pub fn start_with_mode(&mut self, mode: GameMode) {
        self.reset(mode);
        self.status = GameStatus::Playing;
        self.create_preview(self.gate.last_pointer_x());
        if self.mode == GameMode::Speed {
            self.restart_auto_drop();
        }
        log::info!("Game started ({} mode)", self.mode.as_str());
    }

    /// Playing -> Paused
    pub fn pause(&mut self) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        self.status = GameStatus::Paused;
        self.scheduler.stop();
        log::info!("Game paused at score {}", self.score);
        true
    }

    /// Paused -> Playing
    pub fn resume(&mut self) -> bool {
        if self.status != GameStatus::Paused {
            return false;
        }
        self.status = GameStatus::Playing;
        if self.mode == GameMode::Speed {
            self.restart_auto_drop();
        }
        log::info!("Game resumed");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            GameStatus::Playing => self.pause(),
            GameStatus::Paused => self.resume(),
            _ => false,
        }
    }

    /// Full teardown back to `Ready`
    pub fn restart(&mut self) {
        self.reset(self.mode);
        log::info!("Game reset to ready");
    }

    /// Playing -> GameOver
    pub(crate) fn end_game(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }
        self.status = GameStatus::GameOver;
        self.scheduler.stop();
        self.commands.clear();
        self.events.push(GameEvent::GameOver {
            score: self.score,
            mode: self.mode,
        });
        log::info!(
            "Game over: score {} ({} mode), highest level {}",
            self.score,
            self.mode.as_str(),
            self.highest_level
        );
    }

    // === Scoring ===

    pub(crate) fn add_score(&mut self, points: u64) {
        let before = self.score;
        self.score = self.score.saturating_add(points);
        debug_assert!(self.score >= before);
    }

    // === Commands & events ===

    /// Queue work for the next tick
    pub fn post(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Queries ===

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn highest_level(&self) -> u8 {
        self.highest_level
    }

    pub fn power_ups(&self) -> u32 {
        self.ledger.charges()
    }

    pub fn next_level(&self) -> u8 {
        self.queue.next
    }

    pub fn upcoming_level(&self) -> u8 {
        self.queue.upcoming
    }

    pub fn circles(&self) -> &[Circle] {
        self.circles.as_slice()
    }

    /// Mutable circle slice, the same view the physics adapter receives
    pub fn circles_mut(&mut self) -> &mut [Circle] {
        self.circles.as_mut_slice()
    }

    pub fn circle(&self, id: CircleId) -> Option<&Circle> {
        self.circles.get(id)
    }

    pub fn preview(&self) -> Option<&Circle> {
        self.preview.as_ref()
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.as_slice()
    }

    /// Radius per level, scaled to the field
    pub fn radii(&self) -> &[f32] {
        self.circles.radii()
    }

    pub fn palette(&self) -> ColorPalette {
        self.config.palette
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// True while the danger timer is running
    pub fn is_in_danger(&self) -> bool {
        self.danger.is_running()
    }

    /// First circle containing the point
    pub fn circle_at(&self, point: Vec2) -> Option<CircleId> {
        self.circles.hit_test(point)
    }

    /// Place an active circle directly (setups, tests, tooling)
    pub fn spawn_circle(&mut self, level: u8, pos: Vec2, vel: Vec2) -> CircleId {
        let level = level.min((self.circles.level_count() - 1) as u8);
        self.circles.spawn(level, pos, vel).id
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            circles: self.circles.as_slice().to_vec(),
            preview: self.preview.clone(),
            particles: self.particles.as_slice().to_vec(),
            score: self.score,
            status: self.status,
            next_level: self.queue.next,
            upcoming_level: self.queue.upcoming,
            highest_level: self.highest_level,
            power_ups: self.ledger.charges(),
            in_danger: self.danger.is_running(),
            mode: self.mode,
        }
    }
}
