use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;

use crate::metrics::MetricsRegistry;
use crate::service::BasketService;

use super::{basket, health, metrics};

#[derive(Clone)]
pub struct AppState {
    pub baskets: BasketService,
    pub registry: Arc<MetricsRegistry>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/ready", get(health::ready))
        .route("/metrics", get(metrics::metrics))
        .route(
            "/v1/basket",
            get(basket::get_basket)
                .put(basket::update_basket)
                .delete(basket::delete_basket),
        )
        .route("/v1/basket/items/{product_id}", delete(basket::remove_item))
        .route("/v1/basket/checkout", post(basket::checkout))
        .with_state(state)
}
