//! Destroy-charge ledger
//!
//! Charges are earned at score milestones (`floor(score / threshold)`), capped,
//! and spent one at a time by the destroy action.

/// Bounded counter of destroy charges
#[derive(Debug, Clone)]
pub struct PowerUpLedger {
    charges: u32,
    /// Score at which the last charge was awarded
    last_award_score: u64,
    threshold: u64,
    max_charges: u32,
}

impl PowerUpLedger {
    pub fn new(threshold: u64, max_charges: u32) -> Self {
        Self {
            charges: 0,
            last_award_score: 0,
            threshold: threshold.max(1),
            max_charges,
        }
    }

    pub fn charges(&self) -> u32 {
        self.charges
    }

    pub fn last_award_score(&self) -> u64 {
        self.last_award_score
    }

    pub fn max_charges(&self) -> u32 {
        self.max_charges
    }

    /// Milestone check after a merge. Awards at most one charge per call, even
    /// when several milestones were crossed at once, and only below the cap.
    pub fn on_score(&mut self, score: u64) -> bool {
        let current_milestone = score / self.threshold;
        let last_milestone = self.last_award_score / self.threshold;
        if current_milestone > last_milestone && self.charges < self.max_charges {
            self.charges += 1;
            self.last_award_score = score;
            debug_assert!(self.charges <= self.max_charges);
            return true;
        }
        false
    }

    /// Spend one charge
    pub fn consume(&mut self) -> bool {
        if self.charges == 0 {
            return false;
        }
        self.charges -= 1;
        true
    }
}
