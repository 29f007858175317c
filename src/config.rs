// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Resonance Round Engine - Game Configuration
//
// Every tunable the round engine, judge and projections read. Defaults match
// the shipped game; hosts may override any subset from JSON.

use serde::{Deserialize, Serialize};

use crate::types::{MAX_HZ, MIN_HZ};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} range is inverted: {lo} > {hi}")]
    InvertedRange { name: &'static str, lo: i64, hi: i64 },
    #[error("{name} range {lo}..={hi} leaves the frequency band 0..=10000")]
    OutOfBand { name: &'static str, lo: i64, hi: i64 },
    #[error("token values must be at least 1, got {0}")]
    NonPositiveToken(i64),
    #[error("timeout window must be non-zero")]
    ZeroWindow,
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// ValueRange
// ---------------------------------------------------------------------------

/// Closed integer range `lo..=hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub lo: i64,
    pub hi: i64,
}

impl ValueRange {
    pub const fn new(lo: i64, hi: i64) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, v: i64) -> bool {
        (self.lo..=self.hi).contains(&v)
    }

    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.lo > self.hi {
            return Err(ConfigError::InvertedRange { name, lo: self.lo, hi: self.hi });
        }
        if self.lo < MIN_HZ || self.hi > MAX_HZ {
            return Err(ConfigError::OutOfBand { name, lo: self.lo, hi: self.hi });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PotIncrements
// ---------------------------------------------------------------------------

/// Fixed amount the pot grows by for each economic action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotIncrements {
    pub join: u64,
    pub buy: u64,
    pub play: u64,
}

impl Default for PotIncrements {
    fn default() -> Self {
        Self { join: 100, buy: 50, play: 25 }
    }
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// NGT charged for the three-token starter pack.
    pub initial_pack_cost: u64,
    /// NGT charged per extra token.
    pub single_number_cost: u64,
    pub token_range: ValueRange,
    pub target_range: ValueRange,
    /// Minimum |resonance - target| for a freshly drawn resonance.
    pub min_start_distance: i64,
    /// Rejection-sampling cap before the distance constraint is dropped.
    pub resonance_attempts: u32,
    pub near_threshold: u64,
    pub timeout_window_ms: u64,
    /// Balance is never depleted when set.
    pub test_mode: bool,
    pub starting_balance: u64,
    pub starting_pot: u64,
    pub pot_increments: PotIncrements,
    /// Start the session already joined with an active round.
    pub auto_join: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_pack_cost: 2000,
            single_number_cost: 500,
            token_range: ValueRange::new(1, 500),
            target_range: ValueRange::new(3000, 7000),
            min_start_distance: 3000,
            resonance_attempts: 100,
            near_threshold: 100,
            timeout_window_ms: 600_000,
            test_mode: false,
            starting_balance: 50_000,
            starting_pot: 12_000,
            pot_increments: PotIncrements::default(),
            auto_join: false,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token_range.check("token_range")?;
        if self.token_range.lo < 1 {
            return Err(ConfigError::NonPositiveToken(self.token_range.lo));
        }
        self.target_range.check("target_range")?;
        if self.timeout_window_ms == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.target_range, ValueRange::new(3000, 7000));
        assert_eq!(config.timeout_window_ms, 600_000);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{"test_mode": true, "near_threshold": 3}"#).unwrap();
        assert!(config.test_mode);
        assert_eq!(config.near_threshold, 3);
        assert_eq!(config.initial_pack_cost, 2000);
        assert_eq!(config.pot_increments.play, 25);
    }

    #[test]
    fn rejects_inverted_target_range() {
        let err = GameConfig::from_json(r#"{"target_range": {"lo": 7000, "hi": 3000}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvertedRange { name: "target_range", .. }));
    }

    #[test]
    fn rejects_target_outside_band() {
        let config = GameConfig {
            target_range: ValueRange::new(9000, 12_000),
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::OutOfBand { .. })));
    }

    #[test]
    fn rejects_zero_token_and_zero_window() {
        let config = GameConfig {
            token_range: ValueRange::new(0, 500),
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NonPositiveToken(0))));

        let config = GameConfig { timeout_window_ms: 0, ..GameConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroWindow)));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(GameConfig::from_json("{oops"), Err(ConfigError::Parse(_))));
    }
}
