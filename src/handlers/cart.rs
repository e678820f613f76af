use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{CartSummary, InventoryCount, ItemId, Username};
use crate::errors::AppError;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemToCartRequest {
    #[serde(default)]
    #[schema(value_type = String)]
    pub username: Value,
    #[serde(default)]
    #[schema(value_type = String)]
    pub item_id: Value,
    #[serde(default)]
    #[schema(value_type = u64)]
    pub quantity: Value,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GetCartRequest {
    #[serde(default)]
    #[schema(value_type = String)]
    pub username: Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub item_id: String,
    pub quantity: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartSummaryResponse {
    pub total_cost: f64,
    pub items: Vec<CartLineResponse>,
}

impl From<CartSummary> for CartSummaryResponse {
    fn from(summary: CartSummary) -> Self {
        Self {
            total_cost: summary.total_cost,
            items: summary
                .items
                .into_iter()
                .map(|i| CartLineResponse {
                    item_id: i.item_id.to_string(),
                    quantity: i.quantity,
                })
                .collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/v1/cart/add-item
///
/// Reserves `quantity` units for the user's cart, creating the cart on the
/// first add. Totals use the current catalog prices.
#[utoipa::path(
    post,
    path = "/api/v1/cart/add-item",
    request_body = AddItemToCartRequest,
    responses(
        (status = 200, description = "Cart after the addition", body = CartSummaryResponse),
        (status = 400, description = "Invalid input, unknown item or insufficient inventory"),
    ),
    tag = "cart"
)]
pub async fn add_item_to_cart(
    state: web::Data<AppState>,
    body: web::Json<AddItemToCartRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let username = Username::from_json(&body.username)?;
    let item_id = ItemId::from_json(&body.item_id)?;
    let quantity = InventoryCount::from_json(&body.quantity)?;

    let summary = state
        .repo
        .add_item_to_cart(&username, &item_id, quantity)?;

    Ok(HttpResponse::Ok().json(CartSummaryResponse::from(summary)))
}

/// POST /api/v1/cart
#[utoipa::path(
    post,
    path = "/api/v1/cart",
    request_body = GetCartRequest,
    responses(
        (status = 200, description = "Current cart", body = CartSummaryResponse),
        (status = 400, description = "Invalid username or no cart yet"),
    ),
    tag = "cart"
)]
pub async fn get_cart(
    state: web::Data<AppState>,
    body: web::Json<GetCartRequest>,
) -> Result<HttpResponse, AppError> {
    let username = Username::from_json(&body.username)?;

    match state.repo.cart_summary(&username)? {
        Some(summary) => Ok(HttpResponse::Ok().json(CartSummaryResponse::from(summary))),
        None => Err(AppError::bad_request(format!(
            "No cart found for username {}",
            username
        ))),
    }
}
