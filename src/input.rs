// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Resonance Round Engine - Input Dispatch
//
// Keyboard keys and buttons become `Intent`s; `dispatch` turns an intent into
// the same engine call the matching button makes. The guards here mirror the
// engine's own so that keys pressed outside an active round are swallowed.

use serde::{Deserialize, Serialize};

use crate::engine::{ActionError, PlayOutcome, RoundEngine};
use crate::types::{Direction, GameStatus, MAX_NUMBERS};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("input ignored while round is {0}")]
    Inactive(GameStatus),
    #[error("no token selected")]
    NothingSelected,
    #[error(transparent)]
    Action(#[from] ActionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    Select { idx: usize },
    Play { dir: Direction },
    Buy,
    Join,
    Reset,
}

impl Intent {
    /// Keys that only make sense mid-round.
    fn needs_active(&self) -> bool {
        matches!(self, Self::Select { .. } | Self::Play { .. })
    }
}

/// Map a `KeyboardEvent.key` value to an intent. Digits `1..` pick a slot.
pub fn intent_for_key(key: &str) -> Option<Intent> {
    match key {
        "+" | "=" => Some(Intent::Play { dir: Direction::Add }),
        "-" => Some(Intent::Play { dir: Direction::Sub }),
        _ => {
            let mut chars = key.chars();
            let digit = chars.next()?.to_digit(10)? as usize;
            if chars.next().is_some() || digit == 0 || digit > MAX_NUMBERS {
                return None;
            }
            Some(Intent::Select { idx: digit - 1 })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dispatched {
    Selected { idx: usize },
    Played(PlayOutcome),
    Bought { token: i64 },
    Joined,
    Reset,
}

pub fn dispatch(engine: &mut RoundEngine, intent: Intent) -> Result<Dispatched, DispatchError> {
    let status = engine.state().status();
    if intent.needs_active() && status != GameStatus::Active {
        return Err(DispatchError::Inactive(status));
    }

    match intent {
        Intent::Select { idx } => {
            engine.select_idx(Some(idx));
            Ok(Dispatched::Selected { idx })
        }
        Intent::Play { dir } => {
            let idx = engine.state().selected_idx().ok_or(DispatchError::NothingSelected)?;
            Ok(Dispatched::Played(engine.play(idx, dir)?))
        }
        Intent::Buy => Ok(Dispatched::Bought { token: engine.buy_number()? }),
        Intent::Join => {
            engine.join_with_initial_pack()?;
            Ok(Dispatched::Joined)
        }
        Intent::Reset => {
            engine.reset_round();
            Ok(Dispatched::Reset)
        }
    }
}

/// `intent_for_key` + `dispatch`. Unmapped keys yield `None`.
pub fn dispatch_key(engine: &mut RoundEngine, key: &str) -> Option<Result<Dispatched, DispatchError>> {
    intent_for_key(key).map(|intent| dispatch(engine, intent))
}
