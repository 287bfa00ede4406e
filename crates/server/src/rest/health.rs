use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::rest::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub tracked_carts: usize,
    pub active_products: usize,
}

pub async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    let ledger = state.baskets.ledger();
    Json(HealthResponse {
        status: "ok",
        tracked_carts: ledger.tracked_users(),
        active_products: ledger.active_products(),
    })
}

pub async fn ready() -> StatusCode {
    StatusCode::OK
}
