//! Drop gate and preview queue
//!
//! Only one circle is in flight at a time: after a drop the gate closes and
//! reopens once the newest circle has fully cleared the danger line. The
//! preview keeps following the pointer while the gate is closed.

use glam::Vec2;
use rand::Rng;

use super::circle::Circle;
use super::state::{GameEvent, GameState, GameStatus};

/// Why a drop request was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRejection {
    NoPreview,
    NotPlaying,
    /// Previous circle has not cleared the danger line yet
    Gated,
}

/// Result of a drop request; rejection is a no-op, not an error
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Dropped(Circle),
    Rejected(DropRejection),
}

impl DropOutcome {
    pub fn is_dropped(&self) -> bool {
        matches!(self, DropOutcome::Dropped(_))
    }
}

/// Two-slot preview queue: the level about to drop and the one after it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewQueue {
    pub next: u8,
    pub upcoming: u8,
}

impl PreviewQueue {
    pub fn new<R: Rng>(rng: &mut R, spawn_levels: u8) -> Self {
        Self {
            next: rng.random_range(0..spawn_levels),
            upcoming: rng.random_range(0..spawn_levels),
        }
    }

    /// Shift `upcoming -> next` and draw a new `upcoming`
    pub fn advance<R: Rng>(&mut self, rng: &mut R, spawn_levels: u8) {
        self.next = self.upcoming;
        self.upcoming = rng.random_range(0..spawn_levels);
    }
}

/// Drop throttle state
#[derive(Debug, Clone)]
pub struct DropGate {
    can_drop: bool,
    /// Last known pointer x, used to re-seed the preview when the gate reopens
    last_pointer_x: f32,
}

impl DropGate {
    pub fn new(pointer_x: f32) -> Self {
        Self {
            can_drop: true,
            last_pointer_x: pointer_x,
        }
    }

    pub fn is_open(&self) -> bool {
        self.can_drop
    }

    pub fn close(&mut self) {
        self.can_drop = false;
    }

    pub fn open(&mut self) {
        self.can_drop = true;
    }

    pub fn last_pointer_x(&self) -> f32 {
        self.last_pointer_x
    }

    pub fn set_pointer_x(&mut self, x: f32) {
        self.last_pointer_x = x;
    }

    /// Whether a closed gate may reopen given the newest circle
    pub fn should_reopen(&self, newest: Option<&Circle>, danger_line_y: f32) -> bool {
        if self.can_drop {
            return false;
        }
        match newest {
            Some(circle) => circle.top() > danger_line_y,
            // The in-flight circle is gone (destroyed); nothing left to wait on
            None => true,
        }
    }
}

/// Keep a circle of `radius` inside `[radius, width - radius]`
#[inline]
pub fn clamp_x(x: f32, radius: f32, width: f32) -> f32 {
    x.max(radius).min(width - radius)
}

impl GameState {
    /// (Re)create the preview at `x`, clamped to the field
    pub(crate) fn create_preview(&mut self, x: f32) {
        let level = self.queue.next;
        let radius = self.circles.radius_for(level);
        let pos = Vec2::new(clamp_x(x, radius, self.config.width), self.config.preview_y());
        self.preview = Some(self.circles.preview(level, pos));
    }

    /// Pointer moved. Rejected (false) unless the game is playing.
    pub fn update_pointer(&mut self, x: f32) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        self.gate.set_pointer_x(x);

        match self.preview.as_mut() {
            Some(preview) => {
                preview.pos.x = clamp_x(x, preview.radius, self.config.width);
            }
            None => {
                if self.gate.is_open() {
                    self.create_preview(x);
                }
            }
        }
        true
    }

    /// Whether a drop request would currently succeed
    pub fn can_drop(&self) -> bool {
        self.status == GameStatus::Playing && self.gate.is_open() && self.preview.is_some()
    }

    /// Player-initiated drop. In speed mode a successful drop restarts the
    /// auto-drop timer from zero.
    pub fn request_drop(&mut self) -> DropOutcome {
        let outcome = self.drop_preview(false);
        if outcome.is_dropped() && self.mode == crate::config::GameMode::Speed {
            self.restart_auto_drop();
        }
        outcome
    }

    /// Materialize the preview as an active circle
    pub(crate) fn drop_preview(&mut self, auto: bool) -> DropOutcome {
        if self.status != GameStatus::Playing {
            return DropOutcome::Rejected(DropRejection::NotPlaying);
        }
        if !self.gate.is_open() {
            log::debug!("Drop rejected: gate closed");
            return DropOutcome::Rejected(DropRejection::Gated);
        }
        let Some(preview) = self.preview.take() else {
            return DropOutcome::Rejected(DropRejection::NoPreview);
        };

        let circle = self.circles.spawn(preview.level, preview.pos, Vec2::ZERO);
        self.queue.advance(&mut self.rng, self.config.spawn_levels);
        self.gate.close();
        self.events.push(GameEvent::Dropped {
            id: circle.id,
            level: circle.level,
            auto,
        });
        log::debug!(
            "Dropped {:?} level {} at x={:.1}{}",
            circle.id,
            circle.level,
            circle.pos.x,
            if auto { " (auto)" } else { "" }
        );
        DropOutcome::Dropped(circle)
    }

    /// Reopen the gate once the newest circle clears the danger line
    pub(crate) fn update_drop_gate(&mut self) {
        if !self
            .gate
            .should_reopen(self.circles.last(), self.config.danger_line_y())
        {
            return;
        }
        self.gate.open();
        if self.preview.is_none() {
            self.create_preview(self.gate.last_pointer_x());
        }
    }
}
