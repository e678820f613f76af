use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::application::InventoryEntry;
use crate::domain::{DomainError, InventoryCount, ItemId};
use crate::errors::AppError;
use crate::handlers::auth::require_admin;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// `amount` sets the inventory; otherwise `add` increments it. With
/// neither, the current inventory is returned unchanged.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInventoryRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub username: Value,
    #[serde(default)]
    #[schema(value_type = String)]
    pub item_id: Value,
    #[serde(default)]
    #[schema(value_type = Option<u64>)]
    pub amount: Value,
    #[serde(default)]
    #[schema(value_type = Option<u64>)]
    pub add: Value,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ItemFilter {
    #[serde(default)]
    #[schema(value_type = String)]
    pub item_id: Value,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InventoryQueryRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub username: Value,
    #[serde(default)]
    pub items: Option<Vec<ItemFilter>>,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct InventoryResponse {
    pub item_id: String,
    pub inventory: u64,
}

impl From<InventoryEntry> for InventoryResponse {
    fn from(entry: InventoryEntry) -> Self {
        Self {
            item_id: entry.item_id.to_string(),
            inventory: entry.inventory.value(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryListResponse {
    pub items: Vec<InventoryResponse>,
}

fn optional_count(value: &Value) -> Result<Option<InventoryCount>, DomainError> {
    match value {
        Value::Null => Ok(None),
        v => InventoryCount::from_json(v).map(Some),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/v1/inventory
#[utoipa::path(
    post,
    path = "/api/v1/inventory",
    request_body = UpdateInventoryRequest,
    responses(
        (status = 200, description = "Inventory after the update", body = InventoryResponse),
        (status = 400, description = "Unknown item or invalid amount"),
        (status = 401, description = "Username is not the administrator"),
    ),
    tag = "inventory"
)]
pub async fn update_inventory(
    state: web::Data<AppState>,
    body: web::Json<UpdateInventoryRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    require_admin(&state.admin_username, &body.username)?;

    let item_id = ItemId::from_json(&body.item_id)?;
    let amount = optional_count(&body.amount)?;
    let add = optional_count(&body.add)?;

    if state.repo.get_item(&item_id)?.is_none() {
        return Err(AppError::bad_request(format!(
            "invalid item_id value: {}",
            item_id
        )));
    }

    let inventory = match (amount, add) {
        (Some(amount), _) => {
            state.repo.set_item_inventory(&item_id, amount)?;
            amount
        }
        (None, Some(add)) => state.repo.adjust_item_inventory(&item_id, add)?,
        (None, None) => state
            .repo
            .get_item_inventory(&item_id)?
            .ok_or_else(|| AppError::Internal(format!("item {} has no inventory", item_id)))?,
    };

    Ok(HttpResponse::Ok().json(InventoryResponse {
        item_id: item_id.to_string(),
        inventory: inventory.value(),
    }))
}

/// POST /api/v1/inventory/query
///
/// Without `items`, lists every known item. With `items`, lists exactly
/// those, in request order; any unknown id fails the request.
#[utoipa::path(
    post,
    path = "/api/v1/inventory/query",
    request_body = InventoryQueryRequest,
    responses(
        (status = 200, description = "Inventory per item", body = InventoryListResponse),
        (status = 400, description = "Filter names an unknown or invalid item id"),
        (status = 401, description = "Username is not the administrator"),
    ),
    tag = "inventory"
)]
pub async fn query_inventory(
    state: web::Data<AppState>,
    body: web::Json<InventoryQueryRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    require_admin(&state.admin_username, &body.username)?;

    let filter = body
        .items
        .map(|items| {
            items
                .iter()
                .map(|i| ItemId::from_json(&i.item_id))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    let entries = state.repo.query_inventory(filter.as_deref())?;

    Ok(HttpResponse::Ok().json(InventoryListResponse {
        items: entries.into_iter().map(InventoryResponse::from).collect(),
    }))
}
