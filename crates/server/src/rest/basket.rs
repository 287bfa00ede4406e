use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use basket_common::{BasketLine, CustomerBasket, ProductId};

use crate::rest::AppState;
use crate::service::BasketError;

/// Header carrying the identity resolved by the upstream auth layer.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Deserialize)]
pub struct UpdateBasketRequest {
    #[serde(default)]
    pub items: Vec<BasketLine>,
}

#[derive(Serialize)]
pub struct BasketResponse {
    pub buyer_id: String,
    pub items: Vec<BasketLine>,
}

impl From<CustomerBasket> for BasketResponse {
    fn from(b: CustomerBasket) -> Self {
        Self {
            buyer_id: b.buyer_id,
            items: b.items,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiError(BasketError);

impl From<BasketError> for ApiError {
    fn from(e: BasketError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            BasketError::Unauthenticated => StatusCode::UNAUTHORIZED,
            BasketError::NotFound { .. } => StatusCode::NOT_FOUND,
            BasketError::Store(e) => {
                tracing::error!(error = %e, "basket store failure");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn caller_id(headers: &HeaderMap) -> String {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

pub async fn get_basket(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<BasketResponse>, ApiError> {
    let basket = state.baskets.get_basket(&caller_id(&headers)).await?;
    Ok(Json(basket.into()))
}

pub async fn update_basket(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UpdateBasketRequest>,
) -> Result<Json<BasketResponse>, ApiError> {
    let basket = state
        .baskets
        .update_basket(&caller_id(&headers), req.items)
        .await?;
    Ok(Json(basket.into()))
}

pub async fn delete_basket(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.baskets.delete_basket(&caller_id(&headers)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(product_id): Path<ProductId>,
) -> Result<StatusCode, ApiError> {
    state
        .baskets
        .remove_item(&caller_id(&headers), product_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn checkout(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    state.baskets.mark_checkout_completed(&caller_id(&headers));
    StatusCode::NO_CONTENT
}
