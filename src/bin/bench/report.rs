// Bench Report Types
// Structured output for offline balance analysis

use serde::Serialize;

// ─── Statistics (per-metric Monte Carlo aggregation) ────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, ci_lower: 0.0, ci_upper: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (n as f64).sqrt();
        let z = 1.96; // 95% CI
        Self {
            mean,
            std_dev,
            ci_lower: mean - z * stderr,
            ci_upper: mean + z * stderr,
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }

    pub fn half_width(&self) -> f64 {
        (self.ci_upper - self.ci_lower) / 2.0
    }
}

// ─── Single-Round Result ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundEnd {
    Win,
    Timeout,
    /// Out of tokens and unable to buy more.
    Exhausted,
    /// Move budget spent with the round still active.
    MoveCap,
    /// Could not join at all.
    Declined,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundResult {
    pub seed: u64,
    pub end: RoundEnd,
    pub moves: u32,
    pub buys: u32,
    pub target_hz: i64,
    pub final_distance: u64,
    pub pot: u64,
    pub spent: u64,
    pub sim_elapsed_ms: u64,
}

// ─── Strategy Report (N rounds) ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct StrategyReport {
    pub strategy: String,
    pub runs: usize,
    pub win_rate: f64,
    pub timeout_rate: f64,
    pub exhausted_rate: f64,
    pub move_cap_rate: f64,
    pub moves_to_win: Stats,
    pub final_distance: Stats,
    pub pot: Stats,
    pub spent: Stats,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rounds: Vec<RoundResult>,
}

// ─── Full Bench Report ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub runs_per_strategy: usize,
    pub base_seed: u64,
    pub config: resonance_engine::GameConfig,
    pub strategies: Vec<StrategyReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_constant_samples() {
        let s = Stats::from_samples(&[4.0, 4.0, 4.0]);
        assert_eq!(s.mean, 4.0);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.half_width(), 0.0);
        assert_eq!(s.n, 3);
    }

    #[test]
    fn stats_of_nothing() {
        let s = Stats::from_samples(&[]);
        assert_eq!(s.n, 0);
        assert_eq!(s.mean, 0.0);
    }

    #[test]
    fn stats_bounds() {
        let s = Stats::from_samples(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert!(s.ci_lower < s.mean && s.mean < s.ci_upper);
    }
}
