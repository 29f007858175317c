// Monte Carlo Infrastructure — N rounds per strategy with statistical aggregation
// Each strategy plays N rounds with seeds base..base+N, computing mean ± 95% CI

use resonance_engine::*;

use crate::autoplayer::Strategy;
use crate::report::*;

use std::time::Instant;

/// Simulated wall-clock start for every round.
const START_MS: u64 = 1_700_000_000_000;

/// Keeps the player's choices off the engine's own random stream.
const PLAYER_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone)]
pub struct RunParams {
    pub config: GameConfig,
    pub min_think_ms: u64,
    pub max_think_ms: u64,
    pub max_moves: u32,
    pub keep_rounds: bool,
}

/// Play a single round to its end with a specific seed.
pub fn run_single(strategy: Strategy, seed: u64, params: &RunParams) -> Result<RoundResult, ConfigError> {
    let clock = ManualClock::new(START_MS);
    let engine = RoundEngine::new(params.config.clone(), clock.clone(), FrequencyRng::from_seed(seed))?;
    let mut game = ResonanceGame::from_engine(engine);
    let mut player = FrequencyRng::from_seed(seed ^ PLAYER_SEED_SALT);

    let starting_balance = game.engine().state().ngt_balance();
    let mut moves = 0u32;
    let mut buys = 0u32;

    let end = if game.apply(Intent::Join).is_err() {
        RoundEnd::Declined
    } else {
        loop {
            if moves >= params.max_moves {
                break RoundEnd::MoveCap;
            }

            // Think, unless the judge's single pending timer goes off first.
            let think = player.random_int(params.min_think_ms as i64, params.max_think_ms as i64) as u64;
            let wake = clock.now_ms() + think;
            if let Some(deadline) = game.judge().deadline() {
                if deadline <= wake {
                    clock.set(deadline);
                    if game.fire_judge_at(deadline) == Verdict::TimedOut {
                        break RoundEnd::Timeout;
                    }
                }
            }
            clock.set(wake);

            if strategy.wants_token(game.engine().state()) && game.engine().can_buy_number() {
                if game.apply(Intent::Buy).is_ok() {
                    buys += 1;
                    continue;
                }
            }

            let Some((idx, dir)) = strategy.choose(game.engine().state(), &mut player) else {
                break RoundEnd::Exhausted;
            };
            if game.apply(Intent::Select { idx }).is_err() {
                break RoundEnd::Exhausted;
            }
            match game.apply(Intent::Play { dir }) {
                Ok(Dispatched::Played(outcome)) => {
                    moves += 1;
                    if outcome.won {
                        break RoundEnd::Win;
                    }
                }
                Ok(other) => log::warn!("unexpected dispatch result {:?}", other),
                Err(e) => {
                    log::debug!("seed {}: move declined: {}", seed, e);
                    break RoundEnd::Exhausted;
                }
            }
        }
    };

    let state = game.engine().state();
    Ok(RoundResult {
        seed,
        end,
        moves,
        buys,
        target_hz: state.target_hz(),
        final_distance: projections::distance(state),
        pot: state.pot(),
        spent: starting_balance.saturating_sub(state.ngt_balance()),
        sim_elapsed_ms: clock.now_ms() - START_MS,
    })
}

/// Run N rounds of one strategy and aggregate.
pub fn run_monte_carlo(
    strategy: Strategy,
    runs: usize,
    base_seed: u64,
    params: &RunParams,
) -> Result<StrategyReport, ConfigError> {
    let start = Instant::now();
    let mut rounds = Vec::with_capacity(runs);
    for i in 0..runs {
        rounds.push(run_single(strategy, base_seed + i as u64, params)?);
    }

    let rate = |end: RoundEnd| {
        if runs == 0 {
            0.0
        } else {
            rounds.iter().filter(|r| r.end == end).count() as f64 / runs as f64
        }
    };
    let collect = |f: fn(&RoundResult) -> f64| rounds.iter().map(f).collect::<Vec<f64>>();

    let wins: Vec<f64> = rounds
        .iter()
        .filter(|r| r.end == RoundEnd::Win)
        .map(|r| r.moves as f64)
        .collect();

    let report = StrategyReport {
        strategy: strategy.name().to_string(),
        runs,
        win_rate: rate(RoundEnd::Win),
        timeout_rate: rate(RoundEnd::Timeout),
        exhausted_rate: rate(RoundEnd::Exhausted),
        move_cap_rate: rate(RoundEnd::MoveCap),
        moves_to_win: Stats::from_samples(&wins),
        final_distance: Stats::from_samples(&collect(|r| r.final_distance as f64)),
        pot: Stats::from_samples(&collect(|r| r.pot as f64)),
        spent: Stats::from_samples(&collect(|r| r.spent as f64)),
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        rounds: if params.keep_rounds { rounds } else { Vec::new() },
    };
    Ok(report)
}
