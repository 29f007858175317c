// Round Bench Runner — Monte Carlo balance check for the resonance game
// N rounds per autoplayer strategy, seedable PRNG, simulated clock
//
// Usage:
//   cargo run --release --bin bench                      # All strategies (200 rounds each)
//   cargo run --release --bin bench -- --runs 20         # Quick mode
//   cargo run --release --bin bench -- greedy            # Filter by strategy name
//   cargo run --release --bin bench -- --seed 42         # Fixed base seed (default: drawn from OS entropy)
//   cargo run --release --bin bench -- --think-ms 90000  # Slowest think time per action
//   cargo run --release --bin bench -- --config cfg.json # Game config overrides
//   cargo run --release --bin bench -- --rounds          # Keep per-round results in the JSON

mod autoplayer;
mod monte_carlo;
mod report;

use autoplayer::Strategy;
use monte_carlo::RunParams;
use report::*;
use resonance_engine::{FrequencyRng, GameConfig};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: Option<u64>,
    think_ms: u64,
    max_moves: u32,
    config_path: Option<String>,
    keep_rounds: bool,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 200,
        seed: None,
        think_ms: 90_000,
        max_moves: 200,
        config_path: None,
        keep_rounds: false,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(200);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().ok();
                }
            }
            "--think-ms" => {
                i += 1;
                if i < args.len() {
                    cli.think_ms = args[i].parse().unwrap_or(90_000);
                }
            }
            "--max-moves" => {
                i += 1;
                if i < args.len() {
                    cli.max_moves = args[i].parse().unwrap_or(200);
                }
            }
            "--config" => {
                i += 1;
                if i < args.len() {
                    cli.config_path = Some(args[i].clone());
                }
            }
            "--rounds" => {
                cli.keep_rounds = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

fn load_config(path: Option<&str>) -> Result<GameConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(GameConfig::from_json(&std::fs::read_to_string(p)?)?),
        None => Ok(GameConfig::default()),
    }
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = parse_args();

    let config = match load_config(cli.config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Bad config: {}", e);
            std::process::exit(2);
        }
    };

    let to_run: Vec<Strategy> = Strategy::all()
        .into_iter()
        .filter(|s| match &cli.filter {
            Some(f) => s.name().contains(&f.to_lowercase()),
            None => true,
        })
        .collect();

    if to_run.is_empty() {
        eprintln!("No strategies match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    // Printed below so an entropy-seeded suite can be replayed with --seed.
    let seed = cli
        .seed
        .unwrap_or_else(|| FrequencyRng::from_entropy().random_int(0, u32::MAX as i64) as u64);

    let params = RunParams {
        config: config.clone(),
        min_think_ms: 1_000.min(cli.think_ms),
        max_think_ms: cli.think_ms,
        max_moves: cli.max_moves,
        keep_rounds: cli.keep_rounds,
    };

    println!("\n  Resonance Round Bench v0.3.0");
    println!("  PRNG: ChaCha8Rng | Rounds/strategy: {} | Base seed: {} | Think ≤ {}ms",
        cli.runs, seed, cli.think_ms);
    println!("  {:<10} {:>6} {:>9} {:>9} {:>13} {:>11} {:>10} {:>8}",
        "Strategy", "Win%", "Timeout%", "Broke%", "Moves→Win", "FinalDist", "Spent", "Time");
    println!("  {}", "-".repeat(84));

    let suite_start = Instant::now();
    let mut reports = Vec::new();

    for strategy in to_run {
        let report = match monte_carlo::run_monte_carlo(strategy, cli.runs, seed, &params) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Bad config: {}", e);
                std::process::exit(2);
            }
        };

        println!("  {:<10} {:>5.1}% {:>8.1}% {:>8.1}% {:>7.1}±{:<5.1} {:>11.0} {:>10.0} {:>6.0}ms",
            report.strategy,
            report.win_rate * 100.0,
            report.timeout_rate * 100.0,
            report.exhausted_rate * 100.0,
            report.moves_to_win.mean, report.moves_to_win.half_width(),
            report.final_distance.mean,
            report.spent.mean,
            report.elapsed_ms,
        );

        reports.push(report);
    }

    println!("  {}", "-".repeat(84));
    println!("  Suite time: {:.1}s\n", suite_start.elapsed().as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let timestamp = format!("{}", ts);

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: "0.3.0",
        prng: "ChaCha8Rng",
        runs_per_strategy: cli.runs,
        base_seed: seed,
        config,
        strategies: reports,
    };

    let dir = std::path::Path::new("bench-results");
    if !dir.exists() {
        std::fs::create_dir_all(dir).expect("Failed to create bench-results/");
    }
    let path = dir.join(format!("bench-{}.json", timestamp));
    let json = serde_json::to_string_pretty(&report).expect("Failed to serialize");
    std::fs::write(&path, &json).expect("Failed to write bench file");
    println!("  Results saved to: {}\n", path.display());
}
