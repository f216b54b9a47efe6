//! Per-frame simulation tick
//!
//! One call per rendered frame. Order while playing: input, queued commands,
//! physics, drop gate, merges, particles, danger monitor, scheduler.

use super::physics::PhysicsAdapter;
use super::state::{GameState, GameStatus};
use crate::consts::SIM_DT;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x in field coordinates
    pub pointer_x: Option<f32>,
    /// Drop the preview (click/tap/space)
    pub drop: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one tick of `dt` seconds
pub fn tick<P: PhysicsAdapter + ?Sized>(
    state: &mut GameState,
    physics: &mut P,
    input: &TickInput,
    dt: f32,
) {
    if input.pause {
        state.toggle_pause();
    }

    if state.status != GameStatus::Playing {
        return;
    }

    state.time_ticks += 1;
    state.elapsed_ms += f64::from(dt) * 1000.0;

    if let Some(x) = input.pointer_x {
        state.update_pointer(x);
    }
    if input.drop {
        state.request_drop();
    }

    // Auto-drops posted at the end of the previous tick
    state.drain_commands();

    physics.advance(state.circles.as_mut_slice(), dt);

    state.update_drop_gate();
    state.resolve_merges();
    state.particles.update(state.elapsed_ms, SIM_DT);

    if state.check_danger() {
        return;
    }

    state.poll_auto_drop();
}
