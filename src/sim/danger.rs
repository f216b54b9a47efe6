//! Danger line monitor
//!
//! Level-triggered: the timer starts the first tick any falling circle pokes
//! above the danger line, keeps running while the violation persists, and
//! resets as soon as the line is clear.

use super::circle::Circle;
use super::state::{GameEvent, GameState};

/// Outcome of one monitor check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DangerCheck {
    Clear,
    /// Violation detected this tick, timer started
    Started,
    /// Timer running, still within the timeout
    Pending,
    /// Violation outlasted the timeout
    Expired,
}

/// Tracks how long the danger line has been violated
#[derive(Debug, Clone)]
pub struct DangerMonitor {
    started_at_ms: Option<f64>,
    timeout_ms: f64,
}

impl DangerMonitor {
    pub fn new(timeout_ms: f64) -> Self {
        Self {
            started_at_ms: None,
            timeout_ms,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at_ms.is_some()
    }

    /// Time spent in violation so far
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        self.started_at_ms.map_or(0.0, |start| now_ms - start)
    }

    pub fn check(&mut self, violating: bool, now_ms: f64) -> DangerCheck {
        if !violating {
            self.started_at_ms = None;
            return DangerCheck::Clear;
        }
        match self.started_at_ms {
            None => {
                self.started_at_ms = Some(now_ms);
                DangerCheck::Started
            }
            Some(start) if now_ms - start > self.timeout_ms => DangerCheck::Expired,
            Some(_) => DangerCheck::Pending,
        }
    }
}

/// A falling circle whose top edge is above the line (y-down)
#[inline]
pub fn violates_danger_line(circle: &Circle, danger_line_y: f32) -> bool {
    !circle.is_static && circle.top() < danger_line_y
}

impl GameState {
    /// Run the monitor; returns true when this check ended the game
    pub(crate) fn check_danger(&mut self) -> bool {
        let line = self.config.danger_line_y();
        let violating = self
            .circles
            .iter()
            .any(|c| violates_danger_line(c, line));
        let was_running = self.danger.is_running();

        match self.danger.check(violating, self.elapsed_ms) {
            DangerCheck::Clear => {
                if was_running {
                    self.events.push(GameEvent::DangerCleared);
                }
                false
            }
            DangerCheck::Started => {
                self.events.push(GameEvent::DangerStarted);
                false
            }
            DangerCheck::Pending => false,
            DangerCheck::Expired => {
                self.end_game();
                true
            }
        }
    }
}
