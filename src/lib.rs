// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Resonance Round Engine

pub mod types;
pub mod config;
pub mod rng;
pub mod clock;
pub mod engine;
pub mod judge;
pub mod input;
pub mod projections;
pub mod session;

pub use types::*;
pub use config::{ConfigError, GameConfig, PotIncrements, ValueRange};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{ActionError, PlayOutcome, RoundEngine, RoundState};
pub use input::{DispatchError, Dispatched, Intent};
pub use judge::{TimeoutJudge, Verdict};
pub use rng::FrequencyRng;
pub use session::ResonanceGame;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

// ─── Console Logging ─────────────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl ::log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &::log::Metadata) -> bool {
        metadata.level() <= ::log::max_level()
    }

    fn log(&self, record: &::log::Record) {
        if self.enabled(record.metadata()) {
            log(&format!("[{}] {}: {}", record.level(), record.target(), record.args()));
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

#[cfg(target_arch = "wasm32")]
fn install_browser_hooks() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    // A second session on the same page keeps the first logger.
    if ::log::set_logger(&CONSOLE_LOGGER).is_ok() {
        ::log::set_max_level(::log::LevelFilter::Info);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn install_browser_hooks() {}

fn js_result<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl ResonanceGame {
    /// Session with the default config. `seed` drives every random draw.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> Result<ResonanceGame, JsError> {
        Self::with_config("{}", seed)
    }

    /// Session from a (possibly partial) JSON config.
    pub fn with_config(config_json: &str, seed: f64) -> Result<ResonanceGame, JsError> {
        install_browser_hooks();
        let config = GameConfig::from_json(config_json)?;
        let engine = RoundEngine::new(config, SystemClock, FrequencyRng::from_seed(seed as u64))?;
        Ok(Self::from_engine(engine))
    }

    pub fn state(&self) -> JsValue {
        js_result(self.engine.state())
    }

    pub fn initial_pack_cost(&self) -> f64 {
        self.engine.initial_pack_cost() as f64
    }

    pub fn single_number_cost(&self) -> f64 {
        self.engine.single_number_cost() as f64
    }

    pub fn max_numbers(&self) -> u32 {
        MAX_NUMBERS as u32
    }

    pub fn readout(&self, meter_width: f64) -> JsValue {
        js_result(&self.readout_at(self.engine.now_ms(), meter_width))
    }

    pub fn chip_slots(&self) -> JsValue {
        js_result(&projections::chip_slots(self.engine.state()))
    }

    pub fn remaining_ms(&self) -> f64 {
        self.judge.remaining_ms(&self.engine, self.engine.now_ms()) as f64
    }

    pub fn timer_label(&self) -> String {
        projections::format_timer(self.judge.remaining_ms(&self.engine, self.engine.now_ms()))
    }

    pub fn select(&mut self, idx: Option<u32>) {
        self.with_engine(|e| e.select_idx(idx.map(|i| i as usize)));
    }

    pub fn join(&mut self) -> bool {
        self.apply(Intent::Join).is_ok()
    }

    pub fn can_buy_number(&self) -> bool {
        self.engine.can_buy_number()
    }

    /// Value of the bought token, or `undefined` when the purchase was declined.
    pub fn buy_number(&mut self) -> Option<i32> {
        match self.apply(Intent::Buy) {
            Ok(Dispatched::Bought { token }) => Some(token as i32),
            _ => None,
        }
    }

    /// `PlayOutcome` as an object, or `null` when the move was declined.
    pub fn play(&mut self, idx: u32, add: bool) -> JsValue {
        let dir = if add { Direction::Add } else { Direction::Sub };
        match self.with_engine(|e| e.play(idx as usize, dir)) {
            Ok(outcome) => js_result(&outcome),
            Err(_) => JsValue::NULL,
        }
    }

    pub fn reset_round(&mut self) {
        self.with_engine(|e| e.reset_round());
    }

    pub fn set_target(&mut self, hz: i32) {
        self.with_engine(|e| e.set_target(hz as i64));
    }

    pub fn set_resonance(&mut self, hz: i32) {
        self.with_engine(|e| e.set_resonance(hz as i64));
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.with_engine(|e| e.toggle_sound())
    }

    /// Feed a `KeyboardEvent.key`. Returns `true` when it changed the round.
    pub fn press_key(&mut self, key: &str) -> bool {
        matches!(self.apply_key(key), Some(Ok(_)))
    }

    /// Instant (ms since epoch) for the host's single pending `setTimeout`,
    /// or `undefined` when no timer should be pending.
    pub fn judge_deadline(&self) -> Option<f64> {
        self.judge.deadline().map(|d| d as f64)
    }

    pub fn judge_fire(&mut self) -> JsValue {
        let now = self.engine.now_ms();
        js_result(&self.fire_judge_at(now))
    }

    /// `true` once each time the resonance enters the near window.
    pub fn near_chime(&mut self) -> bool {
        self.take_near_chime()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(config: GameConfig) -> ResonanceGame {
        let engine = RoundEngine::new(config, ManualClock::new(0), FrequencyRng::from_seed(4)).unwrap();
        ResonanceGame::from_engine(engine)
    }

    #[test]
    fn facade_exposes_economy_constants() {
        let default_game = game(GameConfig::default());
        assert_eq!(default_game.initial_pack_cost(), 2000.0);
        assert_eq!(default_game.single_number_cost(), 500.0);
        assert_eq!(default_game.max_numbers(), 3);

        let custom = game(GameConfig { initial_pack_cost: 750, single_number_cost: 40, ..GameConfig::default() });
        assert_eq!(custom.initial_pack_cost(), 750.0);
        assert_eq!(custom.single_number_cost(), 40.0);
    }

    #[test]
    fn facade_reset_activates_idle_session() {
        let mut game = game(GameConfig::default());
        assert_eq!(game.judge_deadline(), None);
        game.reset_round();
        assert_eq!(game.engine().state().status(), GameStatus::Active);
        assert_eq!(game.judge_deadline(), Some(600_000.0));
    }
}
