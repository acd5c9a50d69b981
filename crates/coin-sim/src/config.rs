#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub initial_amount: f64,
    pub win_payoff: f64,
    pub loss_payoff: f64,
    pub stake_min: f64,
    pub stake_max: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_amount: 100.0,
            win_payoff: 1.0,
            loss_payoff: 0.4,
            stake_min: 0.1,
            stake_max: 1.0,
        }
    }
}
