use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::Item;
use crate::errors::AppError;
use crate::handlers::auth::require_admin;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Fields are taken as raw JSON so that the domain types decide what is
/// valid, e.g. a price sent as the string `"100"` is an invalid price.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetItemRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub username: Value,
    #[serde(default)]
    #[schema(value_type = String)]
    pub item_id: Value,
    #[serde(default)]
    #[schema(value_type = f64)]
    pub price: Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    pub item_id: String,
    pub price: f64,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            item_id: item.item_id().to_string(),
            price: item.price().value(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/v1/item
///
/// Creates or replaces a catalog item. A new item starts with an inventory
/// of zero; replacing an item keeps its inventory.
#[utoipa::path(
    post,
    path = "/api/v1/item",
    request_body = SetItemRequest,
    responses(
        (status = 200, description = "Item stored", body = ItemResponse),
        (status = 400, description = "Invalid item id or price"),
        (status = 401, description = "Username is not the administrator"),
    ),
    tag = "items"
)]
pub async fn set_item(
    state: web::Data<AppState>,
    body: web::Json<SetItemRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    require_admin(&state.admin_username, &body.username)?;

    let item = Item::from_json(&body.item_id, &body.price)?;
    let response = ItemResponse::from(&item);
    state.repo.set_item(item)?;

    Ok(HttpResponse::Ok().json(response))
}
