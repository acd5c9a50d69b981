pub mod coin;
pub mod config;
pub mod export;
pub mod journal;
pub mod sim;
pub mod state;

pub use coin::{CoinSource, FairCoin, FixedCoin, ScriptedCoin, SeededCoin};
pub use config::EngineConfig;
pub use sim::{EngineError, Simulation};
pub use state::{FlipRecord, SeriesPoint, SimulationState, Statistics, HISTORY_WINDOW};

pub fn module_ready() -> bool {
    true
}
