use std::fmt;

use crate::coin::CoinSource;
use crate::config::EngineConfig;
use crate::state::{FlipRecord, SeriesPoint, SimulationState, HISTORY_WINDOW, OUTCOME_HEADS, OUTCOME_TAILS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    InvalidStakeFraction,
    InvalidInitialAmount,
    NonFiniteAmount,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStakeFraction => {
                write!(f, "stake fraction must be a finite value inside the configured stake bounds")
            }
            Self::InvalidInitialAmount => {
                write!(f, "initial amount must be finite and positive")
            }
            Self::NonFiniteAmount => {
                write!(f, "flip discarded: the resulting amount is not finite")
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Owns the simulation state. Callers trigger `flip`/`reset` and read
/// snapshots; nothing else mutates the containers.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: EngineConfig,
    state: SimulationState,
}

impl Simulation {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        if !config.initial_amount.is_finite() || config.initial_amount <= 0.0 {
            return Err(EngineError::InvalidInitialAmount);
        }

        Ok(Self {
            state: SimulationState::new(config.initial_amount),
            config,
        })
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Applies one flip. A win multiplies the amount by `1 + stake`, a loss
    /// by `1 - 0.4 * stake` (with the default payoffs). On error the state
    /// is left untouched.
    pub fn flip(
        &mut self,
        stake_fraction: f64,
        coin: &mut dyn CoinSource,
    ) -> Result<&SimulationState, EngineError> {
        if !stake_fraction.is_finite()
            || stake_fraction < self.config.stake_min
            || stake_fraction > self.config.stake_max
        {
            return Err(EngineError::InvalidStakeFraction);
        }

        let is_win = coin.flip();
        let multiplier = if is_win {
            1.0 + self.config.win_payoff * stake_fraction
        } else {
            1.0 - self.config.loss_payoff * stake_fraction
        };

        let amount_before = self.state.amount;
        let amount_after = amount_before * multiplier;
        if !amount_after.is_finite() {
            return Err(EngineError::NonFiniteAmount);
        }

        // No fallible work past this point; the updates below land as a group.
        self.state.recent_history.push_back(FlipRecord {
            is_win,
            amount_before,
            amount_after,
        });
        if self.state.recent_history.len() > HISTORY_WINDOW {
            self.state.recent_history.pop_front();
        }

        self.state.series.push(SeriesPoint {
            index: self.state.series.len() as u64,
            amount: amount_after,
            outcome: Some(if is_win { OUTCOME_HEADS } else { OUTCOME_TAILS }),
        });

        let stats = &mut self.state.stats;
        if is_win {
            stats.current_streak = if stats.current_streak > 0 {
                stats.current_streak + 1
            } else {
                1
            };
            stats.longest_win_streak = stats.longest_win_streak.max(stats.current_streak as u64);
            stats.total_wins += 1;
        } else {
            stats.current_streak = if stats.current_streak < 0 {
                stats.current_streak - 1
            } else {
                -1
            };
            stats.longest_lose_streak = stats.longest_lose_streak.min(stats.current_streak);
        }
        stats.total_flips += 1;
        stats.win_rate = stats.total_wins as f64 / stats.total_flips as f64 * 100.0;
        stats.max_amount = stats.max_amount.max(amount_after);
        stats.min_amount = stats.min_amount.min(amount_after);

        self.state.amount = amount_after;
        Ok(&self.state)
    }

    /// Replaces the state wholesale with a fresh lifecycle state at the
    /// configured initial amount.
    pub fn reset(&mut self) -> &SimulationState {
        self.state = SimulationState::new(self.config.initial_amount);
        &self.state
    }

    /// Like `reset`, but also rebases the session on a new initial amount.
    pub fn reset_with(&mut self, initial_amount: f64) -> Result<&SimulationState, EngineError> {
        if !initial_amount.is_finite() || initial_amount <= 0.0 {
            return Err(EngineError::InvalidInitialAmount);
        }

        self.config.initial_amount = initial_amount;
        self.state = SimulationState::new(initial_amount);
        Ok(&self.state)
    }
}
