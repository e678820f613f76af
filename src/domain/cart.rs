use super::errors::DomainError;
use super::values::{InventoryCount, ItemId, ItemPrice, Username};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub item_id: ItemId,
    pub quantity: u64,
}

impl CartItem {
    pub fn new(item_id: ItemId, quantity: InventoryCount) -> Self {
        Self {
            item_id,
            quantity: quantity.value(),
        }
    }
}

/// A customer's cart. Entries are unique per item id and kept in the order
/// they were first added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    owner: Username,
    items: Vec<CartItem>,
}

impl Cart {
    /// A cart always starts with the item whose addition created it.
    pub fn create(owner: Username, item_id: ItemId, quantity: InventoryCount) -> Self {
        Self {
            owner,
            items: vec![CartItem::new(item_id, quantity)],
        }
    }

    pub fn owner(&self) -> &Username {
        &self.owner
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn quantity_of(&self, item_id: &ItemId) -> Option<u64> {
        self.items
            .iter()
            .find(|i| &i.item_id == item_id)
            .map(|i| i.quantity)
    }

    /// Inserts a new entry or accumulates onto the existing one. Never
    /// lowers a quantity and never removes an entry. A total that would not
    /// fit in a count is rejected and leaves the cart untouched.
    pub fn add_item(&mut self, item: CartItem) -> Result<(), DomainError> {
        match self.items.iter_mut().find(|i| i.item_id == item.item_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(item.quantity).ok_or_else(|| {
                    DomainError::validation(format!(
                        "Invalid item inventory amount: {}",
                        item.quantity
                    ))
                })?;
            }
            None => self.items.push(item),
        }
        Ok(())
    }

    /// Prices every entry with `price_of`, evaluated now rather than at the
    /// time the entry was added.
    pub fn summary<F>(&self, mut price_of: F) -> Result<CartSummary, DomainError>
    where
        F: FnMut(&ItemId) -> Option<ItemPrice>,
    {
        let mut total_cost = 0.0;
        for item in &self.items {
            let price = price_of(&item.item_id).ok_or_else(|| {
                DomainError::Internal(format!(
                    "cart of {} references unknown item {}",
                    self.owner, item.item_id
                ))
            })?;
            total_cost += price.value() * item.quantity as f64;
        }

        Ok(CartSummary {
            total_cost,
            items: self.items.clone(),
        })
    }
}

/// Priced view of a cart at query time.
#[derive(Debug, Clone, PartialEq)]
pub struct CartSummary {
    pub total_cost: f64,
    pub items: Vec<CartItem>,
}
