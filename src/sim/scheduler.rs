//! Speed-mode auto-drop scheduler
//!
//! A self-rescheduling one-shot deadline on the play clock. Firing never
//! mutates the circle store directly: it posts `Command::AutoDrop` tagged with
//! the current generation, and the next tick drains it. Every cancel/restart
//! bumps the generation, so a fire that was posted before a manual drop,
//! pause or restart is discarded.

use super::state::{Command, GameState, GameStatus};

/// One-shot deadline timer with a generation token
#[derive(Debug, Clone)]
pub struct AutoDropScheduler {
    generation: u64,
    deadline_ms: Option<f64>,
    /// Interval used for the most recent schedule
    interval_ms: f64,
}

impl Default for AutoDropScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoDropScheduler {
    pub fn new() -> Self {
        Self {
            generation: 0,
            deadline_ms: None,
            interval_ms: 0.0,
        }
    }

    /// Fresh, stopped scheduler for a new game that continues this one's
    /// generation sequence
    pub fn successor(&self) -> Self {
        Self {
            generation: self.generation + 1,
            deadline_ms: None,
            interval_ms: 0.0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline_ms(&self) -> Option<f64> {
        self.deadline_ms
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Cancel any pending deadline and schedule from zero
    pub fn start(&mut self, now_ms: f64, interval_ms: f64) {
        self.generation += 1;
        self.schedule(now_ms, interval_ms);
    }

    /// Unconditional, idempotent cancel
    pub fn stop(&mut self) {
        self.generation += 1;
        self.deadline_ms = None;
    }

    /// Schedule the next check without invalidating posted fires
    pub fn schedule(&mut self, now_ms: f64, interval_ms: f64) {
        self.interval_ms = interval_ms;
        self.deadline_ms = Some(now_ms + interval_ms);
    }

    /// If the deadline has passed, consume it and return the generation the
    /// fire belongs to. The caller must reschedule.
    pub fn poll(&mut self, now_ms: f64) -> Option<u64> {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                Some(self.generation)
            }
            _ => None,
        }
    }
}

impl GameState {
    /// Current auto-drop interval for this score
    pub fn auto_drop_interval_ms(&self) -> f64 {
        self.config.speed.interval_ms(self.score)
    }

    /// Cancel and restart the auto-drop timer from zero
    pub(crate) fn restart_auto_drop(&mut self) {
        let interval = self.auto_drop_interval_ms();
        self.scheduler.start(self.elapsed_ms, interval);
        log::debug!("Auto-drop scheduled in {interval} ms");
    }

    /// Fire the scheduler if due: post the drop for the next tick and
    /// immediately schedule the following check from the current score.
    pub(crate) fn poll_auto_drop(&mut self) {
        if self.status != GameStatus::Playing {
            return;
        }
        if let Some(generation) = self.scheduler.poll(self.elapsed_ms) {
            self.post(Command::AutoDrop { generation });
            let interval = self.auto_drop_interval_ms();
            self.scheduler.schedule(self.elapsed_ms, interval);
        }
    }

    /// Apply queued commands; stale or out-of-play commands are dropped
    pub(crate) fn drain_commands(&mut self) {
        while let Some(command) = self.commands.pop_front() {
            match command {
                Command::AutoDrop { generation } => {
                    if generation != self.scheduler.generation() {
                        log::debug!("Discarding stale auto-drop (generation {generation})");
                        continue;
                    }
                    if self.can_drop() {
                        self.drop_preview(true);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeedConfig;
    use proptest::prelude::*;

    #[test]
    fn test_poll_fires_once_at_deadline() {
        let mut scheduler = AutoDropScheduler::new();
        scheduler.start(0.0, 2000.0);
        assert_eq!(scheduler.poll(1999.0), None);
        assert_eq!(scheduler.poll(2000.0), Some(scheduler.generation()));
        assert_eq!(scheduler.poll(2500.0), None, "one-shot");
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_stop_is_idempotent_and_invalidates() {
        let mut scheduler = AutoDropScheduler::new();
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());

        scheduler.start(0.0, 1000.0);
        let fired = scheduler.poll(1000.0).unwrap();
        scheduler.stop();
        assert_ne!(fired, scheduler.generation());
    }

    #[test]
    fn test_restart_moves_deadline() {
        let mut scheduler = AutoDropScheduler::new();
        scheduler.start(0.0, 2000.0);
        scheduler.start(1500.0, 2000.0);
        assert_eq!(scheduler.poll(2000.0), None);
        assert!(scheduler.poll(3500.0).is_some());
    }

    #[test]
    fn test_schedule_keeps_generation() {
        let mut scheduler = AutoDropScheduler::new();
        scheduler.start(0.0, 500.0);
        let generation = scheduler.generation();
        scheduler.poll(500.0);
        scheduler.schedule(500.0, 500.0);
        assert_eq!(scheduler.generation(), generation);
        assert_eq!(scheduler.deadline_ms(), Some(1000.0));
    }

    #[test]
    fn test_successor_is_stopped_and_newer() {
        let mut scheduler = AutoDropScheduler::new();
        scheduler.start(0.0, 500.0);
        let next = scheduler.successor();
        assert!(!next.is_running());
        assert!(next.generation() > scheduler.generation());
    }

    proptest! {
        #[test]
        fn prop_interval_non_increasing_and_floored(a in 0u64..100_000, b in 0u64..100_000) {
            let speed = SpeedConfig::default();
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(speed.interval_ms(high) <= speed.interval_ms(low));
            prop_assert!(speed.interval_ms(high) >= speed.min_interval_ms);
        }

        #[test]
        fn prop_band_crossing_strictly_decreases_above_floor(band in 0u64..15) {
            let speed = SpeedConfig::default();
            let before = speed.interval_ms(band * 100 + 99);
            let after = speed.interval_ms((band + 1) * 100);
            prop_assert!(after < before);
            prop_assert!(after >= speed.min_interval_ms);
        }
    }
}
