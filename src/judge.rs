// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Resonance Round Engine - Timeout Judge
//
// Ends an active round after `window_ms` without a move. Instead of polling
// every frame, the judge hands the host one deadline to wake at. The host
// calls `sync` after any state change (to re-arm or cancel) and `fire` when
// its timer elapses. A wake-up armed for an older round or an older move is
// recognized and never touches the current round.

use serde::{Deserialize, Serialize};

use crate::engine::RoundEngine;
use crate::types::GameStatus;

/// What a wake-up did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// Nothing was armed.
    Disarmed,
    /// The round left `Active` or was replaced; the deadline was cancelled.
    Stale,
    /// Not due yet (early wake or a newer move); schedule again at `deadline_ms`.
    Pending { deadline_ms: u64 },
    /// The round was moved to `Timeout`.
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Armed {
    round_id: u64,
    deadline_ms: u64,
}

#[derive(Debug, Clone)]
pub struct TimeoutJudge {
    window_ms: u64,
    armed: Option<Armed>,
}

impl TimeoutJudge {
    pub fn new(window_ms: u64) -> Self {
        Self { window_ms, armed: None }
    }

    pub fn for_engine(engine: &RoundEngine) -> Self {
        Self::new(engine.config().timeout_window_ms)
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Currently armed deadline, if any.
    pub fn deadline(&self) -> Option<u64> {
        self.armed.map(|a| a.deadline_ms)
    }

    /// `max(0, window - (now - last_move_at))`.
    pub fn remaining_ms(&self, engine: &RoundEngine, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(engine.state().last_move_at());
        self.window_ms.saturating_sub(elapsed)
    }

    fn deadline_for(&self, engine: &RoundEngine) -> u64 {
        engine.state().last_move_at().saturating_add(self.window_ms)
    }

    /// Align the armed deadline with the engine. Returns the instant the host
    /// should wake at, or `None` when no timer should be pending.
    pub fn sync(&mut self, engine: &RoundEngine) -> Option<u64> {
        let state = engine.state();
        if state.status() != GameStatus::Active {
            self.cancel();
            return None;
        }
        let armed = Armed {
            round_id: state.round_id(),
            deadline_ms: self.deadline_for(engine),
        };
        if self.armed != Some(armed) {
            log::debug!("judge armed for round {} at {}", armed.round_id, armed.deadline_ms);
        }
        self.armed = Some(armed);
        Some(armed.deadline_ms)
    }

    pub fn cancel(&mut self) {
        if let Some(a) = self.armed.take() {
            log::debug!("judge cancelled for round {}", a.round_id);
        }
    }

    /// Handle a timer wake-up at `now_ms`.
    pub fn fire(&mut self, engine: &mut RoundEngine, now_ms: u64) -> Verdict {
        let Some(armed) = self.armed else {
            return Verdict::Disarmed;
        };

        let state = engine.state();
        if state.status() != GameStatus::Active || state.round_id() != armed.round_id {
            log::warn!(
                "judge wake for round {} ignored (current round {} is {})",
                armed.round_id, state.round_id(), state.status()
            );
            self.armed = None;
            return Verdict::Stale;
        }

        // A move since arming pushed the deadline back.
        let deadline_ms = self.deadline_for(engine);
        if now_ms < deadline_ms {
            self.armed = Some(Armed { deadline_ms, ..armed });
            return Verdict::Pending { deadline_ms };
        }

        self.armed = None;
        if engine.force_timeout() {
            Verdict::TimedOut
        } else {
            Verdict::Stale
        }
    }

    /// Convenience for hosts that tick anyway: arm if needed, then fire when due.
    pub fn poll(&mut self, engine: &mut RoundEngine, now_ms: u64) -> Verdict {
        match self.sync(engine) {
            Some(deadline_ms) if now_ms >= deadline_ms => self.fire(engine, now_ms),
            Some(deadline_ms) => Verdict::Pending { deadline_ms },
            None => Verdict::Disarmed,
        }
    }
}
