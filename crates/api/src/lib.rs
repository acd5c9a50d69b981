pub mod routes;
pub mod state;
pub mod ws;

use axum::Router;

use crate::state::{AppState, SessionSettings};

pub fn module_ready() -> bool {
    true
}

pub fn app() -> Router {
    routes::router(AppState::new())
}

pub fn app_with(settings: SessionSettings) -> Router {
    routes::router(AppState::with_settings(settings))
}
