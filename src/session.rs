// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Resonance Round Engine - Session
//
// One engine plus the collaborators that watch it: the timeout judge and the
// near-window tracker. Every mutation funnels through `after_change` so the
// judge deadline and the chime edge are recomputed on each state change.

use wasm_bindgen::prelude::*;

use crate::engine::RoundEngine;
use crate::input::{self, DispatchError, Dispatched, Intent};
use crate::judge::{TimeoutJudge, Verdict};
use crate::projections::{NearWindowTracker, Readout};

// ─── ResonanceGame struct ────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct ResonanceGame {
    pub(crate) engine: RoundEngine,
    pub(crate) judge: TimeoutJudge,
    pub(crate) near: NearWindowTracker,
    /// Latched until the host collects it.
    pub(crate) near_chime: bool,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl ResonanceGame {
    pub fn from_engine(engine: RoundEngine) -> Self {
        let judge = TimeoutJudge::for_engine(&engine);
        let near = NearWindowTracker::new(engine.state(), engine.config().near_threshold);
        let mut game = Self { engine, judge, near, near_chime: false };
        game.after_change();
        game
    }

    pub fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    pub fn judge(&self) -> &TimeoutJudge {
        &self.judge
    }

    pub(crate) fn after_change(&mut self) {
        self.judge.sync(&self.engine);
        if self.near.observe(self.engine.state()) {
            self.near_chime = true;
        }
    }

    /// Run an intent through the dispatcher and refresh the watchers.
    pub fn apply(&mut self, intent: Intent) -> Result<Dispatched, DispatchError> {
        let result = input::dispatch(&mut self.engine, intent);
        if result.is_ok() {
            self.after_change();
        }
        result
    }

    pub fn apply_key(&mut self, key: &str) -> Option<Result<Dispatched, DispatchError>> {
        let intent = input::intent_for_key(key)?;
        Some(self.apply(intent))
    }

    pub fn with_engine<R>(&mut self, f: impl FnOnce(&mut RoundEngine) -> R) -> R {
        let out = f(&mut self.engine);
        self.after_change();
        out
    }

    /// Timer callback: the host's single pending timeout elapsed at `now_ms`.
    pub fn fire_judge_at(&mut self, now_ms: u64) -> Verdict {
        let verdict = self.judge.fire(&mut self.engine, now_ms);
        if verdict == Verdict::TimedOut {
            self.after_change();
        }
        verdict
    }

    pub fn readout_at(&self, now_ms: u64, meter_width: f64) -> Readout {
        Readout::capture(&self.engine, &self.judge, now_ms, meter_width)
    }

    pub fn take_near_chime(&mut self) -> bool {
        std::mem::take(&mut self.near_chime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::GameConfig;
    use crate::rng::FrequencyRng;
    use crate::types::{Direction, GameStatus};

    fn game(clock: &ManualClock) -> ResonanceGame {
        let engine =
            RoundEngine::new(GameConfig::default(), clock.clone(), FrequencyRng::from_seed(5)).unwrap();
        ResonanceGame::from_engine(engine)
    }

    #[test]
    fn judge_follows_lifecycle() {
        let clock = ManualClock::new(10_000);
        let mut game = game(&clock);
        assert_eq!(game.judge().deadline(), None);

        game.apply(Intent::Join).unwrap();
        assert_eq!(game.judge().deadline(), Some(610_000));

        clock.advance(30_000);
        game.apply(Intent::Play { dir: Direction::Add }).unwrap();
        assert_eq!(game.judge().deadline(), Some(640_000));

        assert_eq!(game.fire_judge_at(640_000), Verdict::TimedOut);
        assert_eq!(game.engine().state().status(), GameStatus::Timeout);
        assert_eq!(game.judge().deadline(), None);
    }

    #[test]
    fn near_chime_latches_once() {
        let clock = ManualClock::new(0);
        let mut game = game(&clock);
        game.apply(Intent::Join).unwrap();
        assert!(!game.take_near_chime());

        game.with_engine(|e| {
            let target = e.state().target_hz();
            e.set_resonance(target - 10);
        });
        assert!(game.take_near_chime());
        assert!(!game.take_near_chime());
    }

    #[test]
    fn debug_target_far_outside_band_keeps_session_usable() {
        let clock = ManualClock::new(0);
        let mut game = game(&clock);
        game.apply(Intent::Join).unwrap();

        game.with_engine(|e| e.set_target(i64::MIN));
        assert!(!game.take_near_chime());
        assert!(!game.readout_at(0, 360.0).is_near);
        assert_eq!(game.apply(Intent::Reset), Ok(Dispatched::Reset));
        assert!((3000..=7000).contains(&game.engine().state().target_hz()));
    }

    #[test]
    fn rejected_intent_leaves_watchers_alone() {
        let clock = ManualClock::new(0);
        let mut game = game(&clock);
        assert!(game.apply(Intent::Buy).is_err());
        assert_eq!(game.judge().deadline(), None);
    }
}
