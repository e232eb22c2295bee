//! Periodic interval helper driven by explicit timestamps

use serde::{Deserialize, Serialize};

/// Fires at most once per `period_ms`.
///
/// Games use these for things like "move the invaders every 500 ms" or
/// "power-up wears off after 10 s"; the frame driver uses one for the tick
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickDelta {
    period_ms: u64,
    last_ms: u64,
    active: bool,
}

impl TickDelta {
    pub fn new(period_ms: u64, now_ms: u64) -> Self {
        Self {
            period_ms,
            last_ms: now_ms,
            active: true,
        }
    }

    pub fn inactive(period_ms: u64) -> Self {
        Self {
            period_ms,
            last_ms: 0,
            active: false,
        }
    }

    /// True once the period has passed since the last firing; restarts the
    /// period when it fires
    pub fn elapsed(&mut self, now_ms: u64) -> bool {
        if !self.active {
            return false;
        }
        if now_ms.saturating_sub(self.last_ms) >= self.period_ms {
            self.last_ms = now_ms;
            return true;
        }
        false
    }

    /// (De)activate, restarting the period from `now_ms`
    pub fn set_active(&mut self, active: bool, now_ms: u64) {
        self.last_ms = now_ms;
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Lengthen or shorten the period; never below zero
    pub fn add_ms(&mut self, delta: i64) {
        self.period_ms = self.period_ms.saturating_add_signed(delta);
    }

    /// Time left until the next firing
    pub fn remaining(&self, now_ms: u64) -> u64 {
        self.period_ms
            .saturating_sub(now_ms.saturating_sub(self.last_ms))
    }
}
