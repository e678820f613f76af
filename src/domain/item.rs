use serde_json::Value;

use super::errors::DomainError;
use super::values::{ItemId, ItemPrice};

/// Catalog entry. Only obtainable from validated fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    item_id: ItemId,
    price: ItemPrice,
}

impl Item {
    pub fn new(item_id: ItemId, price: ItemPrice) -> Self {
        Self { item_id, price }
    }

    /// Builds an item from raw fields, failing with the first validation
    /// error (id before price).
    pub fn create(id: impl Into<String>, price: f64) -> Result<Self, DomainError> {
        Ok(Self::new(ItemId::new(id)?, ItemPrice::new(price)?))
    }

    pub fn from_json(id: &Value, price: &Value) -> Result<Self, DomainError> {
        Ok(Self::new(ItemId::from_json(id)?, ItemPrice::from_json(price)?))
    }

    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    pub fn price(&self) -> ItemPrice {
        self.price
    }
}
