//! Merge resolution
//!
//! Two-phase: a scan flags pairs as it finds them (first-found pair wins, in
//! ascending store order), then every queued pair is resolved and the flagged
//! inputs are purged in one pass.

use super::circle::Circle;
use super::state::{GameEvent, GameState};

/// Indices into the circle slice of a pair selected for merging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePair {
    pub a: usize,
    pub b: usize,
}

/// Whether two circles qualify, ignoring `merged` flags
#[inline]
pub fn can_merge(a: &Circle, b: &Circle, max_level: u8, tolerance: f32) -> bool {
    if a.is_static || b.is_static || a.level != b.level || a.level >= max_level {
        return false;
    }
    a.pos.distance(b.pos) <= (a.radius + b.radius) * tolerance
}

/// Find merge pairs and flag their members. A flagged circle cannot be
/// claimed by a later pair in the same scan.
pub fn scan_merges(circles: &mut [Circle], max_level: u8, tolerance: f32) -> Vec<MergePair> {
    let mut pairs = Vec::new();
    for i in 0..circles.len() {
        for j in (i + 1)..circles.len() {
            if circles[i].merged {
                break;
            }
            if circles[j].merged {
                continue;
            }
            if can_merge(&circles[i], &circles[j], max_level, tolerance) {
                circles[i].merged = true;
                circles[j].merged = true;
                pairs.push(MergePair { a: i, b: j });
            }
        }
    }
    pairs
}

impl GameState {
    /// Scan, resolve and purge merges for this tick. Returns merges resolved.
    pub(crate) fn resolve_merges(&mut self) -> usize {
        let max_level = (self.circles.level_count() - 1) as u8;
        let pairs = scan_merges(
            self.circles.as_mut_slice(),
            max_level,
            self.config.merge_tolerance,
        );
        if pairs.is_empty() {
            return 0;
        }

        // Detection-time notifications, in scan order
        for pair in &pairs {
            let level = self.circles.as_slice()[pair.a].level;
            self.events.push(GameEvent::MergeDetected { level });
        }

        // Spawning appends, so indices of the scanned circles stay valid
        for pair in &pairs {
            let (a, b) = {
                let slice = self.circles.as_slice();
                (slice[pair.a].clone(), slice[pair.b].clone())
            };
            let level = a.level + 1;
            let position = (a.pos + b.pos) * 0.5;
            let velocity = (a.vel + b.vel) * 0.5;
            let merged = self.circles.spawn(level, position, velocity);

            self.add_score(self.config.merge_points[a.level as usize]);
            if self.ledger.on_score(self.score) {
                self.events.push(GameEvent::PowerUpAwarded {
                    charges: self.ledger.charges(),
                });
                log::info!(
                    "Power-up awarded at score {} ({} held)",
                    self.score,
                    self.ledger.charges()
                );
            }
            if level > self.highest_level {
                self.highest_level = level;
            }

            self.events.push(GameEvent::Merged {
                id: merged.id,
                level,
                position,
            });
            log::debug!(
                "Merged {:?}+{:?} -> {:?} level {} (score {})",
                a.id,
                b.id,
                merged.id,
                level,
                self.score
            );
        }

        self.circles.purge_merged();
        pairs.len()
    }
}
