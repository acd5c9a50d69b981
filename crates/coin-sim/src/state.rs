use std::collections::VecDeque;

use serde::Serialize;

/// Number of flips retained in `recent_history`; presentation-only window.
pub const HISTORY_WINDOW: usize = 5;

pub const OUTCOME_HEADS: &str = "Heads";
pub const OUTCOME_TAILS: &str = "Tails";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlipRecord {
    pub is_win: bool,
    pub amount_before: f64,
    pub amount_after: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub index: u64,
    pub amount: f64,
    pub outcome: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub current_streak: i64,
    pub longest_win_streak: u64,
    pub longest_lose_streak: i64,
    pub total_flips: u64,
    pub total_wins: u64,
    pub win_rate: f64,
    pub max_amount: f64,
    pub min_amount: f64,
}

impl Statistics {
    pub fn seeded(initial_amount: f64) -> Self {
        Self {
            current_streak: 0,
            longest_win_streak: 0,
            longest_lose_streak: 0,
            total_flips: 0,
            total_wins: 0,
            win_rate: 0.0,
            max_amount: initial_amount,
            min_amount: initial_amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationState {
    pub amount: f64,
    pub recent_history: VecDeque<FlipRecord>,
    pub series: Vec<SeriesPoint>,
    pub stats: Statistics,
}

impl SimulationState {
    pub fn new(initial_amount: f64) -> Self {
        Self {
            amount: initial_amount,
            recent_history: VecDeque::with_capacity(HISTORY_WINDOW),
            series: vec![SeriesPoint {
                index: 0,
                amount: initial_amount,
                outcome: None,
            }],
            stats: Statistics::seeded(initial_amount),
        }
    }
}
