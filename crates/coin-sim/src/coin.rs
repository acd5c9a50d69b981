use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of fair coin outcomes. Every flip must be an independent draw
/// with probability exactly 0.5; implementations own their own stream so
/// sessions never share state.
pub trait CoinSource {
    fn flip(&mut self) -> bool;
}

/// Entropy-seeded coin for normal operation.
#[derive(Debug, Clone)]
pub struct FairCoin {
    rng: StdRng,
}

impl FairCoin {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for FairCoin {
    fn default() -> Self {
        Self::new()
    }
}

impl CoinSource for FairCoin {
    fn flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

/// Deterministic coin for reproducible sessions and demos.
#[derive(Debug, Clone)]
pub struct SeededCoin {
    rng: StdRng,
}

impl SeededCoin {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl CoinSource for SeededCoin {
    fn flip(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

/// Test double that always lands the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedCoin(pub bool);

impl CoinSource for FixedCoin {
    fn flip(&mut self) -> bool {
        self.0
    }
}

/// Test double that replays a fixed outcome script in order.
#[derive(Debug, Clone)]
pub struct ScriptedCoin {
    outcomes: VecDeque<bool>,
}

impl ScriptedCoin {
    pub fn new(outcomes: impl IntoIterator<Item = bool>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.outcomes.len()
    }
}

impl CoinSource for ScriptedCoin {
    fn flip(&mut self) -> bool {
        self.outcomes
            .pop_front()
            .expect("scripted coin ran out of outcomes")
    }
}

#[cfg(test)]
mod tests {
    use super::{CoinSource, FixedCoin, ScriptedCoin, SeededCoin};

    #[test]
    fn seeded_coins_are_deterministic() {
        let mut coin_a = SeededCoin::new(42);
        let mut coin_b = SeededCoin::new(42);

        let flips_a: Vec<bool> = (0..64).map(|_| coin_a.flip()).collect();
        let flips_b: Vec<bool> = (0..64).map(|_| coin_b.flip()).collect();

        assert_eq!(flips_a, flips_b);
    }

    #[test]
    fn seeded_coin_mixes_both_outcomes() {
        let mut coin = SeededCoin::new(7);
        let flips: Vec<bool> = (0..256).map(|_| coin.flip()).collect();

        assert!(flips.iter().any(|&f| f));
        assert!(flips.iter().any(|&f| !f));
    }

    #[test]
    fn fixed_coin_always_returns_its_outcome() {
        let mut heads = FixedCoin(true);
        let mut tails = FixedCoin(false);

        for _ in 0..10 {
            assert!(heads.flip());
            assert!(!tails.flip());
        }
    }

    #[test]
    fn scripted_coin_replays_outcomes_in_order() {
        let mut coin = ScriptedCoin::new([true, false, true]);

        assert!(coin.flip());
        assert!(!coin.flip());
        assert!(coin.flip());
        assert_eq!(coin.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "scripted coin ran out of outcomes")]
    fn scripted_coin_panics_when_exhausted() {
        let mut coin = ScriptedCoin::new([true]);
        coin.flip();
        coin.flip();
    }
}
