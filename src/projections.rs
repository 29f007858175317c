// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Resonance Round Engine - Read-only Projections
//
// Values the presentation layer derives from engine state. Nothing here
// writes to the engine.

use serde::{Deserialize, Serialize};

use crate::engine::{RoundEngine, RoundState};
use crate::judge::TimeoutJudge;
use crate::types::MAX_NUMBERS;

// ─── Distance ────────────────────────────────────────────────────────────────

/// `|target - resonance|`. Exact for any target, including extreme debug values.
pub fn distance(state: &RoundState) -> u64 {
    state.target_hz().abs_diff(state.resonance_hz())
}

pub fn is_near(state: &RoundState, threshold: u64) -> bool {
    distance(state) <= threshold
}

pub fn is_over(state: &RoundState) -> bool {
    state.resonance_hz() > state.target_hz()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TuningHint {
    Add,
    Subtract,
    OnTarget,
}

pub fn tuning_hint(state: &RoundState) -> TuningHint {
    use std::cmp::Ordering::*;
    match state.resonance_hz().cmp(&state.target_hz()) {
        Less => TuningHint::Add,
        Greater => TuningHint::Subtract,
        Equal => TuningHint::OnTarget,
    }
}

// ─── Timer ───────────────────────────────────────────────────────────────────

/// `mm:ss`, both fields floor-divided and zero-padded.
pub fn format_timer(remaining_ms: u64) -> String {
    let mm = remaining_ms / 60_000;
    let ss = (remaining_ms % 60_000) / 1_000;
    format!("{:02}:{:02}", mm, ss)
}

// ─── Meter ───────────────────────────────────────────────────────────────────

/// Linear map of `v` from `[in_min, in_max]` onto `[out_min, out_max]`,
/// clamped to the output range.
pub fn map_range(v: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    if in_max == in_min {
        return out_min;
    }
    let t = ((v - in_min) / (in_max - in_min)).clamp(0.0, 1.0);
    out_min + t * (out_max - out_min)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeterPositions {
    pub goal_x: f64,
    pub handle_x: f64,
    pub domain_max: f64,
}

/// Goal and handle positions on a meter `width` wide. The domain tops out a
/// little past the target so the goal never sits on the right edge.
pub fn meter_positions(state: &RoundState, width: f64) -> MeterPositions {
    let target = state.target_hz() as f64;
    let domain_max = (target * 1.2).max(target + 50.0);
    MeterPositions {
        goal_x: map_range(target, 0.0, domain_max, 0.0, width),
        handle_x: map_range(state.resonance_hz() as f64, 0.0, domain_max, 0.0, width),
        domain_max,
    }
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChipSlot {
    Token { idx: usize, value: i64, selected: bool },
    Empty,
}

/// Always `MAX_NUMBERS` slots; missing tokens show as placeholders.
pub fn chip_slots(state: &RoundState) -> [ChipSlot; MAX_NUMBERS] {
    let mut slots = [ChipSlot::Empty; MAX_NUMBERS];
    for (idx, (slot, &value)) in slots.iter_mut().zip(state.numbers()).enumerate() {
        *slot = ChipSlot::Token {
            idx,
            value,
            selected: state.selected_idx() == Some(idx),
        };
    }
    slots
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectedToken {
    pub idx: usize,
    pub value: i64,
    /// Dial needle angle: -90° at the bottom of the token range, +90° at the top.
    pub dial_degrees: f64,
}

pub fn selected_token(state: &RoundState) -> Option<SelectedToken> {
    let idx = state.selected_idx()?;
    let value = state.selected_token()?;
    Some(SelectedToken {
        idx,
        value,
        dial_degrees: (value as f64 - 250.0) / 250.0 * 90.0,
    })
}

// ─── Near Window ─────────────────────────────────────────────────────────────

/// Remembers the last observed distance and reports when the resonance
/// enters the near window. Drives the proximity chime.
#[derive(Debug, Clone)]
pub struct NearWindowTracker {
    threshold: u64,
    prev_distance: u64,
}

impl NearWindowTracker {
    pub fn new(state: &RoundState, threshold: u64) -> Self {
        Self { threshold, prev_distance: distance(state) }
    }

    /// `true` only on the transition from outside to inside the window.
    pub fn observe(&mut self, state: &RoundState) -> bool {
        let d = distance(state);
        let entered = self.prev_distance > self.threshold && d <= self.threshold;
        self.prev_distance = d;
        entered
    }
}

// ─── Readout ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readout {
    pub distance: u64,
    pub is_near: bool,
    pub is_over: bool,
    pub hint: TuningHint,
    pub remaining_ms: u64,
    pub timer_label: String,
    pub meter: MeterPositions,
    pub selected: Option<SelectedToken>,
    pub can_buy: bool,
}

impl Readout {
    pub fn capture(engine: &RoundEngine, judge: &TimeoutJudge, now_ms: u64, meter_width: f64) -> Self {
        let state = engine.state();
        let remaining_ms = judge.remaining_ms(engine, now_ms);
        Self {
            distance: distance(state),
            is_near: is_near(state, engine.config().near_threshold),
            is_over: is_over(state),
            hint: tuning_hint(state),
            remaining_ms,
            timer_label: format_timer(remaining_ms),
            meter: meter_positions(state, meter_width),
            selected: selected_token(state),
            can_buy: engine.can_buy_number(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::GameConfig;
    use crate::rng::FrequencyRng;
    use crate::types::Direction;

    fn engine() -> RoundEngine {
        let mut engine =
            RoundEngine::new(GameConfig::default(), ManualClock::new(0), FrequencyRng::from_seed(77)).unwrap();
        engine.join_with_initial_pack().unwrap();
        engine
    }

    #[test]
    fn distance_flags() {
        let mut engine = engine();
        engine.set_target(5000);
        engine.set_resonance(4950);
        let s = engine.state();
        assert_eq!(distance(s), 50);
        assert!(is_near(s, 100));
        assert!(!is_near(s, 3));
        assert!(!is_over(s));
        assert_eq!(tuning_hint(s), TuningHint::Add);

        engine.set_resonance(5001);
        assert!(is_over(engine.state()));
        assert_eq!(tuning_hint(engine.state()), TuningHint::Subtract);

        engine.set_resonance(5000);
        assert_eq!(tuning_hint(engine.state()), TuningHint::OnTarget);
    }

    #[test]
    fn distance_holds_for_extreme_targets() {
        let mut engine = engine();
        engine.set_resonance(10_000);
        engine.set_target(i64::MIN);
        assert_eq!(distance(engine.state()), i64::MIN.unsigned_abs() + 10_000);
        assert!(!is_near(engine.state(), 100));

        engine.set_resonance(0);
        engine.set_target(i64::MAX);
        assert_eq!(distance(engine.state()), i64::MAX as u64);

        let judge = TimeoutJudge::for_engine(&engine);
        let r = Readout::capture(&engine, &judge, 0, 360.0);
        assert_eq!(r.distance, i64::MAX as u64);
        assert_eq!(r.hint, TuningHint::Add);
    }

    #[test]
    fn timer_label_floors() {
        assert_eq!(format_timer(600_000), "10:00");
        assert_eq!(format_timer(599_999), "09:59");
        assert_eq!(format_timer(61_000), "01:01");
        assert_eq!(format_timer(999), "00:00");
        assert_eq!(format_timer(0), "00:00");
    }

    #[test]
    fn meter_maps_and_clamps() {
        let mut engine = engine();
        engine.set_target(5000);
        engine.set_resonance(10_000);
        let m = meter_positions(engine.state(), 360.0);
        assert!((m.domain_max - 6000.0).abs() < 1e-9);
        assert!((m.goal_x - 300.0).abs() < 1e-9);
        assert_eq!(m.handle_x, 360.0);

        engine.set_target(0);
        let m = meter_positions(engine.state(), 360.0);
        assert_eq!(m.domain_max, 50.0);
        assert_eq!(m.goal_x, 0.0);
    }

    #[test]
    fn chips_pad_with_placeholders() {
        let mut engine = engine();
        engine.play(1, Direction::Add).unwrap();
        engine.select_idx(Some(1));
        let slots = chip_slots(engine.state());
        assert!(matches!(slots[0], ChipSlot::Token { idx: 0, selected: false, .. }));
        assert!(matches!(slots[1], ChipSlot::Token { idx: 1, selected: true, .. }));
        assert_eq!(slots[2], ChipSlot::Empty);
    }

    #[test]
    fn selected_token_ignores_stale_index() {
        let mut engine = engine();
        engine.select_idx(Some(2));
        let value = engine.state().numbers()[2];
        let sel = selected_token(engine.state()).unwrap();
        assert_eq!(sel.value, value);
        assert!((-90.0..=90.0).contains(&sel.dial_degrees));

        engine.play(0, Direction::Add).unwrap();
        engine.select_idx(Some(2));
        assert_eq!(selected_token(engine.state()), None);
    }

    #[test]
    fn near_tracker_fires_on_entry_only() {
        let mut engine = engine();
        engine.set_target(5000);
        engine.set_resonance(4000);
        let mut tracker = NearWindowTracker::new(engine.state(), 100);

        engine.set_resonance(4500);
        assert!(!tracker.observe(engine.state()));
        engine.set_resonance(4920);
        assert!(tracker.observe(engine.state()));
        engine.set_resonance(4990);
        assert!(!tracker.observe(engine.state()));
        engine.set_resonance(5300);
        assert!(!tracker.observe(engine.state()));
        engine.set_resonance(5100);
        assert!(tracker.observe(engine.state()));
    }

    #[test]
    fn readout_bundles_everything() {
        let mut engine = engine();
        let judge = TimeoutJudge::for_engine(&engine);
        engine.set_target(5000);
        engine.set_resonance(5050);
        let r = Readout::capture(&engine, &judge, 61_000, 360.0);
        assert_eq!(r.distance, 50);
        assert!(r.is_near);
        assert!(r.is_over);
        assert_eq!(r.remaining_ms, 539_000);
        assert_eq!(r.timer_label, "08:59");
        assert!(!r.can_buy);
        assert_eq!(r.selected.map(|s| s.idx), Some(0));
    }
}
