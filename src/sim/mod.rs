//! Simulation/state engine
//!
//! All gameplay logic lives here. This module is pure in-memory state
//! transition logic:
//! - One tick per rendered frame, single logical thread
//! - Seeded RNG only
//! - Stable iteration order (store insertion order)
//! - No rendering, audio or platform dependencies

pub mod circle;
pub mod danger;
pub mod gate;
pub mod merge;
pub mod particle;
pub mod physics;
pub mod powerup;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use circle::{Circle, CircleId, CircleStore};
pub use danger::{DangerCheck, DangerMonitor};
pub use gate::{DropGate, DropOutcome, DropRejection, PreviewQueue};
pub use merge::{MergePair, can_merge, scan_merges};
pub use particle::{Particle, ParticleSystem};
pub use physics::{BasicPhysics, PhysicsAdapter};
pub use powerup::PowerUpLedger;
pub use scheduler::AutoDropScheduler;
pub use state::{Command, GameEvent, GameState, GameStatus, Snapshot};
pub use tick::{TickInput, tick};
