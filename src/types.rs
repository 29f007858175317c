// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Resonance Round Engine - Type Definitions

use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Value Bounds ────────────────────────────────────────────────────────────

/// Lowest frequency the resonance can be steered to.
pub const MIN_HZ: i64 = 0;

/// Highest frequency the resonance can be steered to.
pub const MAX_HZ: i64 = 10_000;

/// Maximum number of tokens a player may hold at once.
pub const MAX_NUMBERS: usize = 3;

/// Length of the most-recent-first move log.
pub const RECENT_MOVES_CAP: usize = 10;

/// Clamp a frequency into `[MIN_HZ, MAX_HZ]`.
pub fn clamp_hz(hz: i64) -> i64 {
    hz.clamp(MIN_HZ, MAX_HZ)
}

// ─── Game Status ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Idle,
    Active,
    Win,     // TERMINAL until reset
    Timeout, // TERMINAL until reset
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Win | Self::Timeout)
    }

    pub fn is_active(&self) -> bool {
        *self == Self::Active
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Win => "win",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Direction ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Add,
    Sub,
}

impl Direction {
    /// Signed delta produced by playing `token` in this direction.
    pub fn apply(&self, token: i64) -> i64 {
        match self {
            Self::Add => token,
            Self::Sub => -token,
        }
    }
}

// ─── Move Log ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveItem {
    pub delta: i64,
    /// Milliseconds since the Unix epoch.
    pub at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_hz_keeps_range() {
        assert_eq!(clamp_hz(-5), 0);
        assert_eq!(clamp_hz(10_050), 10_000);
        assert_eq!(clamp_hz(4321), 4321);
    }

    #[test]
    fn direction_signs_delta() {
        assert_eq!(Direction::Add.apply(120), 120);
        assert_eq!(Direction::Sub.apply(120), -120);
    }

    #[test]
    fn terminal_statuses() {
        assert!(GameStatus::Win.is_terminal());
        assert!(GameStatus::Timeout.is_terminal());
        assert!(!GameStatus::Idle.is_terminal());
        assert!(GameStatus::Active.is_active());
        assert_eq!(GameStatus::Timeout.to_string(), "timeout");
    }
}
