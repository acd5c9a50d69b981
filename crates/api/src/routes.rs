use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    state::{AppState, SessionOpError},
    ws,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/styles.css", get(styles_css))
        .route("/static/app.js", get(app_js))
        .route("/sessions", post(start_session))
        .route("/sessions/:id", get(session_snapshot))
        .route("/sessions/:id/flips", post(apply_flip))
        .route("/sessions/:id/reset", post(reset_session))
        .route("/sessions/:id/export.csv", get(export_csv))
        .route("/ws/events", get(ws::events_socket))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
struct FlipRequest {
    stake_fraction: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ResetRequest {
    initial_amount: Option<f64>,
}

async fn start_session(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let snapshot = state
        .start_session()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let location = format!("/sessions/{}", snapshot.session_id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(snapshot),
    ))
}

async fn session_snapshot(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
) -> Result<impl IntoResponse, StatusCode> {
    state
        .session_snapshot(session_id)
        .map(Json)
        .map_err(op_error_status)
}

async fn apply_flip(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
    payload: Option<Json<FlipRequest>>,
) -> Result<impl IntoResponse, StatusCode> {
    let stake_fraction = payload
        .and_then(|Json(request)| request.stake_fraction)
        .unwrap_or(1.0);

    state
        .apply_flip(session_id, stake_fraction)
        .map(Json)
        .map_err(op_error_status)
}

async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
    payload: Option<Json<ResetRequest>>,
) -> Result<impl IntoResponse, StatusCode> {
    let initial_amount = payload.and_then(|Json(request)| request.initial_amount);

    state
        .reset_session(session_id, initial_amount)
        .map(Json)
        .map_err(op_error_status)
}

async fn export_csv(
    State(state): State<AppState>,
    Path(session_id): Path<u64>,
) -> Result<impl IntoResponse, StatusCode> {
    let csv = state.export_csv(session_id).map_err(op_error_status)?;

    Ok(([(header::CONTENT_TYPE, "text/csv")], csv))
}

fn op_error_status(err: SessionOpError) -> StatusCode {
    match err {
        SessionOpError::NotFound => StatusCode::NOT_FOUND,
        SessionOpError::Engine(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SessionOpError::ExportFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn index() -> Html<&'static str> {
    Html(ui::index_html())
}

async fn styles_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], ui::styles_css())
}

async fn app_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        ui::app_js(),
    )
}
