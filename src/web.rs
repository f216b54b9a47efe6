//! Browser bindings
//!
//! The page owns rendering, audio and the animation frame loop. It calls
//! `tick` once per frame and reads back JSON snapshots and events.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::config::{GameConfig, GameMode};
use crate::leaderboard::{BOARD_SIZE, Leaderboard};
use crate::sim::{BasicPhysics, GameState, GameStatus, TickInput, tick};

/// Install the panic hook and console logger. Safe to call more than once.
#[wasm_bindgen(start)]
pub fn init_web() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("Pop Pop starting...");
    }
}

/// One game plus its integrator and the local leaderboard
#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    physics: BasicPhysics,
    input: TickInput,
    leaderboard: Leaderboard,
}

fn parse_mode(mode: &str) -> Result<GameMode, JsError> {
    GameMode::parse(mode).ok_or_else(|| JsError::new(&format!("unknown game mode: {mode}")))
}

#[wasm_bindgen]
impl WebGame {
    /// Build from a JSON config (empty string for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, mode: &str) -> Result<WebGame, JsError> {
        let config = if config_json.trim().is_empty() {
            GameConfig {
                seed: js_sys::Date::now() as u64,
                ..GameConfig::default()
            }
        } else {
            GameConfig::from_json(config_json)?
        };
        let mode = parse_mode(mode)?;
        log::info!("Game initialized with seed: {}", config.seed);

        Ok(Self {
            physics: BasicPhysics::new(config.width, config.height),
            state: GameState::new(config, mode),
            input: TickInput::default(),
            leaderboard: Leaderboard::new(),
        })
    }

    pub fn start(&mut self, mode: &str) -> Result<(), JsError> {
        self.state.start_with_mode(parse_mode(mode)?);
        self.input = TickInput::default();
        Ok(())
    }

    pub fn restart(&mut self) {
        self.state.restart();
        self.input = TickInput::default();
    }

    pub fn pause(&mut self) -> bool {
        self.state.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.state.resume()
    }

    /// Queue a pause toggle for the next tick (Escape key)
    pub fn toggle_pause(&mut self) {
        self.input.pause = true;
    }

    pub fn set_pointer(&mut self, x: f32) {
        self.input.pointer_x = Some(x);
    }

    /// Queue a drop for the next tick (click, tap, space)
    pub fn request_drop(&mut self) {
        self.input.drop = true;
    }

    pub fn can_drop(&self) -> bool {
        self.state.can_drop()
    }

    /// Destroy the circle under the point. Returns the destroyed id, or -1.
    pub fn destroy_at(&mut self, x: f32, y: f32) -> i64 {
        self.state
            .destroy_circle_at(Vec2::new(x, y))
            .map(|id| i64::from(id.0))
            .unwrap_or(-1)
    }

    /// Advance one frame of `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &mut self.physics, &input, dt);
        // Keep the pointer so the next preview follows it
        self.input.pointer_x = input.pointer_x;
    }

    pub fn score(&self) -> u64 {
        self.state.score()
    }

    pub fn power_ups(&self) -> u32 {
        self.state.power_ups()
    }

    pub fn status(&self) -> String {
        match self.state.status() {
            GameStatus::Ready => "ready",
            GameStatus::Playing => "playing",
            GameStatus::Paused => "paused",
            GameStatus::GameOver => "gameOver",
        }
        .to_string()
    }

    pub fn snapshot_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.state.snapshot())?)
    }

    /// Events since the last call, as a JSON array
    pub fn drain_events_json(&mut self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.state.drain_events())?)
    }

    pub fn radii(&self) -> Vec<f32> {
        self.state.radii().to_vec()
    }

    pub fn colors(&self) -> Vec<u32> {
        self.state.palette().colors().to_vec()
    }

    // === Leaderboard ===

    pub fn load_leaderboard(&mut self, json: &str) -> Result<(), JsError> {
        self.leaderboard = Leaderboard::from_json(json)?;
        Ok(())
    }

    pub fn leaderboard_json(&self) -> Result<String, JsError> {
        Ok(self.leaderboard.to_json()?)
    }

    /// Submit the current score under the player's initials
    pub fn submit_score(&mut self, name: &str) -> Result<String, JsError> {
        let entry = self.leaderboard.submit(
            name,
            self.state.score(),
            self.state.mode(),
            js_sys::Date::now(),
        )?;
        Ok(serde_json::to_string(&entry)?)
    }

    pub fn top_scores_json(&self, mode: &str) -> Result<String, JsError> {
        let top = self.leaderboard.top(parse_mode(mode)?, BOARD_SIZE);
        Ok(serde_json::to_string(&top)?)
    }

    pub fn weekly_scores_json(&self, mode: &str) -> Result<String, JsError> {
        let weekly = self
            .leaderboard
            .weekly(parse_mode(mode)?, js_sys::Date::now(), BOARD_SIZE);
        Ok(serde_json::to_string(&weekly)?)
    }

    /// 1-indexed rank the current score would take, 0 if it doesn't qualify
    pub fn potential_rank(&self) -> usize {
        self.leaderboard
            .potential_rank(self.state.mode(), self.state.score())
            .unwrap_or(0)
    }
}
