// Autoplayer Strategies
// Decide which token to spend and in which direction

use resonance_engine::{clamp_hz, Direction, FrequencyRng, RoundState, MAX_NUMBERS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Spend the token/direction pair that lands closest to the target,
    /// and keep the inventory topped up.
    Greedy,
    /// Any token, either direction; buy only when empty-handed.
    Random,
}

impl Strategy {
    pub fn all() -> [Strategy; 2] {
        [Strategy::Greedy, Strategy::Random]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Random => "random",
        }
    }

    /// Whether to buy before the next move.
    pub fn wants_token(&self, state: &RoundState) -> bool {
        match self {
            Self::Greedy => state.numbers().len() < MAX_NUMBERS,
            Self::Random => state.numbers().is_empty(),
        }
    }

    /// `None` when the inventory is empty.
    pub fn choose(&self, state: &RoundState, rng: &mut FrequencyRng) -> Option<(usize, Direction)> {
        let numbers = state.numbers();
        if numbers.is_empty() {
            return None;
        }
        match self {
            Self::Greedy => {
                let target = state.target_hz();
                let resonance = state.resonance_hz();
                numbers
                    .iter()
                    .enumerate()
                    .flat_map(|(idx, _)| [(idx, Direction::Add), (idx, Direction::Sub)])
                    .min_by_key(|&(idx, dir)| {
                        let raw = resonance + dir.apply(numbers[idx]);
                        // An exact hit on the raw sum wins even if clamping would move it.
                        if raw == target { 0 } else { (target - clamp_hz(raw)).abs() + 1 }
                    })
            }
            Self::Random => {
                let idx = rng.pick(numbers.len());
                let dir = if rng.coin() { Direction::Add } else { Direction::Sub };
                Some((idx, dir))
            }
        }
    }
}
