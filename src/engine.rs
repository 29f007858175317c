// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Resonance Round Engine - Round Lifecycle
//
// Owns the single RoundState of a session. Every write goes through a method
// here; a method whose precondition fails returns an ActionError and leaves
// the state untouched, so a stale click racing a reset is harmless.

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::config::{ConfigError, GameConfig};
use crate::rng::FrequencyRng;
use crate::types::*;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("player has not joined")]
    NotJoined,
    #[error("player has already joined")]
    AlreadyJoined,
    #[error("round is {status}, not active")]
    NotActive { status: GameStatus },
    #[error("balance {available} NGT does not cover {needed} NGT")]
    InsufficientBalance { needed: u64, available: u64 },
    #[error("inventory already holds {max} tokens")]
    InventoryFull { max: usize },
    #[error("no token at index {idx} (inventory holds {len})")]
    NoTokenAt { idx: usize, len: usize },
}

// ─── Round State ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub(crate) target_hz: i64,
    pub(crate) resonance_hz: i64,
    pub(crate) pot: u64,
    pub(crate) last_move_at: u64,
    pub(crate) numbers: Vec<i64>,
    pub(crate) status: GameStatus,
    pub(crate) selected_idx: Option<usize>,
    /// Most recent first.
    pub(crate) recent_moves: Vec<MoveItem>,
    pub(crate) has_joined: bool,
    pub(crate) ngt_balance: u64,
    pub(crate) sound_on: bool,
    /// Bumped whenever a new round starts (join or reset).
    pub(crate) round_id: u64,
}

impl RoundState {
    pub fn target_hz(&self) -> i64 { self.target_hz }
    pub fn resonance_hz(&self) -> i64 { self.resonance_hz }
    pub fn pot(&self) -> u64 { self.pot }
    pub fn last_move_at(&self) -> u64 { self.last_move_at }
    pub fn numbers(&self) -> &[i64] { &self.numbers }
    pub fn status(&self) -> GameStatus { self.status }
    pub fn selected_idx(&self) -> Option<usize> { self.selected_idx }
    pub fn recent_moves(&self) -> &[MoveItem] { &self.recent_moves }
    pub fn has_joined(&self) -> bool { self.has_joined }
    pub fn ngt_balance(&self) -> u64 { self.ngt_balance }
    pub fn sound_on(&self) -> bool { self.sound_on }
    pub fn round_id(&self) -> u64 { self.round_id }

    /// Selected token value, if the selection still points into the inventory.
    pub fn selected_token(&self) -> Option<i64> {
        self.selected_idx.and_then(|i| self.numbers.get(i).copied())
    }
}

/// Result of an applied `play`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayOutcome {
    pub token: i64,
    pub delta: i64,
    /// Unclamped `resonance + delta`; the win check compares this value.
    pub raw_hz: i64,
    /// Resonance after the move, clamped into the band.
    pub resonance_hz: i64,
    pub won: bool,
}

// ─── RoundEngine ─────────────────────────────────────────────────────────────

pub struct RoundEngine {
    state: RoundState,
    config: GameConfig,
    clock: Box<dyn Clock>,
    rng: FrequencyRng,
}

impl RoundEngine {
    /// Build a session. The target and starting resonance are drawn
    /// immediately; the round stays `Idle` until the player joins unless
    /// `auto_join` is set.
    pub fn new(
        config: GameConfig,
        clock: impl Clock + 'static,
        mut rng: FrequencyRng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let target_hz = rng.random_target(config.target_range);
        let resonance_hz = rng
            .random_resonance(target_hz, config.min_start_distance, config.resonance_attempts)
            .hz;
        let now = clock.now_ms();

        let mut state = RoundState {
            target_hz,
            resonance_hz,
            pot: config.starting_pot,
            last_move_at: now,
            numbers: Vec::new(),
            status: GameStatus::Idle,
            selected_idx: None,
            recent_moves: Vec::new(),
            has_joined: false,
            ngt_balance: config.starting_balance,
            sound_on: true,
            round_id: 0,
        };

        if config.auto_join {
            state.has_joined = true;
            state.status = GameStatus::Active;
            state.numbers = (0..MAX_NUMBERS).map(|_| rng.random_token(config.token_range)).collect();
            state.selected_idx = Some(0);
            state.round_id = 1;
        }

        log::debug!(
            "session created: target {} resonance {} status {}",
            state.target_hz, state.resonance_hz, state.status
        );

        Ok(Self { state, config, clock: Box::new(clock), rng })
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn initial_pack_cost(&self) -> u64 {
        self.config.initial_pack_cost
    }

    pub fn single_number_cost(&self) -> u64 {
        self.config.single_number_cost
    }

    // ─── Plain Setters ──────────────────────────────────────────────────────

    pub fn set_target(&mut self, hz: i64) {
        self.state.target_hz = hz;
    }

    pub fn set_resonance(&mut self, hz: i64) {
        self.state.resonance_hz = clamp_hz(hz);
    }

    /// Flip the presentation sound flag; returns the new value.
    pub fn toggle_sound(&mut self) -> bool {
        self.state.sound_on = !self.state.sound_on;
        self.state.sound_on
    }

    /// Stored as given. Consumers resolve it through `selected_token`, and
    /// `play` rejects indices outside the inventory.
    pub fn select_idx(&mut self, idx: Option<usize>) {
        self.state.selected_idx = idx;
        log::debug!("selected {:?}", idx);
    }

    // ─── Economy ────────────────────────────────────────────────────────────

    fn check_funds(&self, cost: u64) -> Result<(), ActionError> {
        if self.config.test_mode || self.state.ngt_balance >= cost {
            Ok(())
        } else {
            Err(ActionError::InsufficientBalance {
                needed: cost,
                available: self.state.ngt_balance,
            })
        }
    }

    fn charge(&mut self, cost: u64) {
        if !self.config.test_mode {
            self.state.ngt_balance = self.state.ngt_balance.saturating_sub(cost);
        }
    }

    fn draw_pack(&mut self) -> Vec<i64> {
        let range = self.config.token_range;
        (0..MAX_NUMBERS).map(|_| self.rng.random_token(range)).collect()
    }

    fn draw_resonance(&mut self, target: i64) -> i64 {
        self.rng
            .random_resonance(target, self.config.min_start_distance, self.config.resonance_attempts)
            .hz
    }

    /// `Idle → Active`: pay for the starter pack and start the first round
    /// against the already drawn target.
    pub fn join_with_initial_pack(&mut self) -> Result<(), ActionError> {
        if self.state.has_joined {
            return Err(ActionError::AlreadyJoined);
        }
        let cost = self.config.initial_pack_cost;
        self.check_funds(cost)?;

        self.charge(cost);
        let target = self.state.target_hz;
        self.state.resonance_hz = self.draw_resonance(target);
        self.state.numbers = self.draw_pack();
        self.state.has_joined = true;
        self.state.status = GameStatus::Active;
        self.state.selected_idx = Some(0);
        self.state.pot += self.config.pot_increments.join;
        self.state.last_move_at = self.clock.now_ms();
        self.state.round_id += 1;

        log::info!(
            "joined: round {} target {} resonance {} tokens {:?}",
            self.state.round_id, target, self.state.resonance_hz, self.state.numbers
        );
        Ok(())
    }

    fn check_buy(&self) -> Result<(), ActionError> {
        if !self.state.has_joined {
            return Err(ActionError::NotJoined);
        }
        if !self.state.status.is_active() {
            return Err(ActionError::NotActive { status: self.state.status });
        }
        if self.state.numbers.len() >= MAX_NUMBERS {
            return Err(ActionError::InventoryFull { max: MAX_NUMBERS });
        }
        self.check_funds(self.config.single_number_cost)
    }

    pub fn can_buy_number(&self) -> bool {
        self.check_buy().is_ok()
    }

    /// Append one fresh token; returns its value.
    pub fn buy_number(&mut self) -> Result<i64, ActionError> {
        self.check_buy()?;

        let token = self.rng.random_token(self.config.token_range);
        self.state.numbers.push(token);
        self.charge(self.config.single_number_cost);
        self.state.pot += self.config.pot_increments.buy;
        self.state.last_move_at = self.clock.now_ms();

        log::debug!("bought token {} (inventory {:?})", token, self.state.numbers);
        Ok(token)
    }

    // ─── Gameplay ───────────────────────────────────────────────────────────

    /// Spend the token at `idx` to move the resonance by `±token`.
    ///
    /// The token is removed (remaining tokens keep their order), the move is
    /// logged, and the round is won when the raw sum lands exactly on the
    /// target. The stored resonance is clamped afterwards.
    pub fn play(&mut self, idx: usize, dir: Direction) -> Result<PlayOutcome, ActionError> {
        if !self.state.has_joined {
            return Err(ActionError::NotJoined);
        }
        if !self.state.status.is_active() {
            return Err(ActionError::NotActive { status: self.state.status });
        }
        let len = self.state.numbers.len();
        if idx >= len {
            return Err(ActionError::NoTokenAt { idx, len });
        }

        let now = self.clock.now_ms();
        let token = self.state.numbers.remove(idx);
        let delta = dir.apply(token);
        let raw_hz = self.state.resonance_hz + delta;
        let won = raw_hz == self.state.target_hz;

        self.state.recent_moves.insert(0, MoveItem { delta, at: now });
        self.state.recent_moves.truncate(RECENT_MOVES_CAP);

        if won {
            self.state.status = GameStatus::Win;
        }
        self.state.resonance_hz = clamp_hz(raw_hz);
        self.state.pot += self.config.pot_increments.play;
        self.state.last_move_at = now;
        self.state.selected_idx = None;

        if won {
            log::info!("round {} won at {} Hz", self.state.round_id, raw_hz);
        } else {
            log::debug!("played {:+} -> {} Hz (target {})", delta, raw_hz, self.state.target_hz);
        }

        Ok(PlayOutcome {
            token,
            delta,
            raw_hz,
            resonance_hz: self.state.resonance_hz,
            won,
        })
    }

    /// Start a fresh round: new target, new resonance, new pack, empty log.
    /// Balance, pot and `has_joined` carry over, so an unjoined player still
    /// cannot play or buy after a reset.
    pub fn reset_round(&mut self) {
        let target = self.rng.random_target(self.config.target_range);
        self.state.target_hz = target;
        self.state.resonance_hz = self.draw_resonance(target);
        self.state.numbers = self.draw_pack();
        self.state.status = GameStatus::Active;
        self.state.last_move_at = self.clock.now_ms();
        self.state.recent_moves.clear();
        self.state.selected_idx = Some(0);
        self.state.round_id += 1;

        log::info!(
            "round {} started: target {} resonance {}",
            self.state.round_id, target, self.state.resonance_hz
        );
    }

    /// `Active → Timeout`. Only the timeout judge calls this.
    pub(crate) fn force_timeout(&mut self) -> bool {
        if !self.state.status.is_active() {
            return false;
        }
        self.state.status = GameStatus::Timeout;
        log::info!(
            "round {} timed out at {} Hz (target {})",
            self.state.round_id, self.state.resonance_hz, self.state.target_hz
        );
        true
    }
}
