//! Pop Pop - A falling-circle merge game
//!
//! Core modules:
//! - `sim`: Simulation/state engine (entities, merges, drop gating, timers)
//! - `config`: Data-driven game balance
//! - `palette`: Per-level colour tables
//! - `leaderboard`: Score board for finished runs

pub mod config;
pub mod leaderboard;
pub mod palette;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ConfigError, GameConfig, GameMode};
pub use leaderboard::Leaderboard;
pub use palette::ColorPalette;

/// Game configuration constants
pub mod consts {
    /// Nominal tick duration (one physics step per rendered frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Nominal tick duration in milliseconds
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;

    /// Number of circle tiers
    pub const LEVEL_COUNT: usize = 11;

    /// Width the base radius table is authored for
    pub const REFERENCE_WIDTH: f32 = 400.0;
    /// Default play field dimensions
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Drop zone at the top; its lower edge is the danger line
    pub const DROP_ZONE_HEIGHT: f32 = 80.0;
}
