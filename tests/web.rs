#![cfg(target_arch = "wasm32")]

use resonance_engine::ResonanceGame;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn join_select_play_through_facade() {
    let Ok(mut game) = ResonanceGame::new(7.0) else { panic!("session construction failed") };
    assert!(game.judge_deadline().is_none());
    assert!(game.join());
    assert!(game.judge_deadline().is_some());
    assert!(!game.join(), "second join is declined");

    assert!(game.press_key("1"));
    let outcome = game.play(0, true);
    assert!(!outcome.is_null());
    assert!(game.can_buy_number());
    assert!(game.buy_number().is_some());
    assert!(game.buy_number().is_none(), "inventory is full again");
}

#[wasm_bindgen_test]
fn bad_config_is_rejected() {
    assert!(ResonanceGame::with_config(r#"{"timeout_window_ms": 0}"#, 1.0).is_err());
}

#[wasm_bindgen_test]
fn snapshots_serialize() {
    let Ok(mut game) = ResonanceGame::new(3.0) else { panic!("session construction failed") };
    game.join();
    assert_ne!(game.state(), JsValue::NULL);
    assert_ne!(game.readout(360.0), JsValue::NULL);
    let label = game.timer_label();
    assert!(label == "10:00" || label.starts_with("09:5"), "fresh round label {}", label);
}

#[wasm_bindgen_test]
fn economy_constants_are_readable() {
    let Ok(game) = ResonanceGame::new(5.0) else { panic!("session construction failed") };
    assert_eq!(game.initial_pack_cost(), 2000.0);
    assert_eq!(game.single_number_cost(), 500.0);
    assert_eq!(game.max_numbers(), 3);
}
