use api::state::SessionSettings;
use axum::{routing::get, Router};

use crate::config::Config;

pub fn build_app(config: &Config) -> Router {
    debug_assert!(coin_sim::module_ready());
    debug_assert!(api::module_ready());
    debug_assert!(ui::module_ready());

    api::app_with(SessionSettings {
        initial_amount: config.initial_amount,
        coin_seed: config.coin_seed,
    })
    .route("/health", get(healthcheck))
}

async fn healthcheck() -> &'static str {
    "ok"
}
