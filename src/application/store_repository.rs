use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::ports::Table;
use crate::domain::{
    Cart, CartItem, CartSummary, DomainError, InventoryCount, Item, ItemId, Username,
};
use crate::infrastructure::MemoryTable;

/// Stock level of one catalog item, as reported by inventory queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub item_id: ItemId,
    pub inventory: InventoryCount,
}

struct Tables<I, N, C> {
    items: I,
    inventory: N,
    carts: C,
}

/// Single owner of the catalog, the inventory and every cart.
///
/// All three tables sit behind one lock. Queries share it; every write,
/// including the whole check/decrement/cart-update of a reservation, holds
/// it exclusively, so no caller ever observes a half-applied change and two
/// reservations can never both pass the stock check against the same count.
pub struct StoreRepository<
    I = MemoryTable<Item>,
    N = MemoryTable<InventoryCount>,
    C = MemoryTable<Cart>,
> {
    tables: RwLock<Tables<I, N, C>>,
}

impl StoreRepository {
    pub fn in_memory() -> Self {
        Self::with_tables(MemoryTable::new(), MemoryTable::new(), MemoryTable::new())
    }
}

impl Default for StoreRepository {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn no_item(item_id: &ItemId) -> DomainError {
    DomainError::validation(format!("No Item found for id {}", item_id))
}

impl<I, N, C> StoreRepository<I, N, C>
where
    I: Table<Item>,
    N: Table<InventoryCount>,
    C: Table<Cart>,
{
    pub fn with_tables(items: I, inventory: N, carts: C) -> Self {
        Self {
            tables: RwLock::new(Tables {
                items,
                inventory,
                carts,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables<I, N, C>>, DomainError> {
        self.tables
            .read()
            .map_err(|_| DomainError::Internal("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables<I, N, C>>, DomainError> {
        self.tables
            .write()
            .map_err(|_| DomainError::Internal("store lock poisoned".to_string()))
    }

    // ── Catalog ──────────────────────────────────────────────────────────────

    /// Inserts or overwrites a catalog entry. A new item gets an inventory
    /// of zero in the same critical section; an existing item keeps its
    /// count.
    pub fn set_item(&self, item: Item) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        let key = item.item_id().as_str().to_string();
        let is_new = tables.items.set(&key, item).is_none();
        if is_new {
            tables.inventory.set(&key, InventoryCount::ZERO);
        }
        log::info!("item {} stored (new: {})", key, is_new);
        Ok(())
    }

    pub fn get_item(&self, item_id: &ItemId) -> Result<Option<Item>, DomainError> {
        Ok(self.read()?.items.get(item_id.as_str()).cloned())
    }

    // ── Inventory ────────────────────────────────────────────────────────────

    /// Absolute set of an item's stock level.
    pub fn set_item_inventory(
        &self,
        item_id: &ItemId,
        count: InventoryCount,
    ) -> Result<(), DomainError> {
        let mut tables = self.write()?;
        if !tables.items.contains(item_id.as_str()) {
            return Err(no_item(item_id));
        }
        tables.inventory.set(item_id.as_str(), count);
        log::info!("inventory of {} set to {}", item_id, count);
        Ok(())
    }

    /// Increments an item's stock level by `add` and returns the new level.
    pub fn adjust_item_inventory(
        &self,
        item_id: &ItemId,
        add: InventoryCount,
    ) -> Result<InventoryCount, DomainError> {
        let mut tables = self.write()?;
        if !tables.items.contains(item_id.as_str()) {
            return Err(no_item(item_id));
        }
        let current = tables
            .inventory
            .get(item_id.as_str())
            .copied()
            .unwrap_or(InventoryCount::ZERO);
        let updated = current
            .value()
            .checked_add(add.value())
            .map(InventoryCount::from_raw)
            .ok_or_else(|| {
                DomainError::validation(format!("Invalid item inventory amount: {}", add))
            })?;
        tables.inventory.set(item_id.as_str(), updated);
        log::info!("inventory of {} raised by {} to {}", item_id, add, updated);
        Ok(updated)
    }

    /// `None` means the item has no inventory entry, which is distinct from
    /// a stock level of zero.
    pub fn get_item_inventory(
        &self,
        item_id: &ItemId,
    ) -> Result<Option<InventoryCount>, DomainError> {
        Ok(self.read()?.inventory.get(item_id.as_str()).copied())
    }

    pub fn get_all_inventory(&self) -> Result<Vec<InventoryEntry>, DomainError> {
        let tables = self.read()?;
        tables
            .inventory
            .list()
            .into_iter()
            .map(|(key, count)| {
                Ok(InventoryEntry {
                    item_id: ItemId::new(key)?,
                    inventory: *count,
                })
            })
            .collect()
    }

    /// Without a filter, every known item in catalog order. With one, the
    /// requested items in request order; any unknown id fails the whole
    /// query and every unknown id is named in the error.
    pub fn query_inventory(
        &self,
        filter: Option<&[ItemId]>,
    ) -> Result<Vec<InventoryEntry>, DomainError> {
        let Some(ids) = filter else {
            return self.get_all_inventory();
        };

        let tables = self.read()?;
        let mut entries = Vec::with_capacity(ids.len());
        let mut unknown = Vec::new();
        for id in ids {
            match tables.inventory.get(id.as_str()) {
                Some(count) => entries.push(InventoryEntry {
                    item_id: id.clone(),
                    inventory: *count,
                }),
                None => unknown.push(id.as_str()),
            }
        }

        if !unknown.is_empty() {
            return Err(DomainError::validation(format!(
                "items list contains invalid item_id's : {}",
                unknown.join(", ")
            )));
        }
        Ok(entries)
    }

    // ── Carts ────────────────────────────────────────────────────────────────

    pub fn get_user_cart(&self, username: &Username) -> Result<Option<Cart>, DomainError> {
        Ok(self.read()?.carts.get(username.as_str()).cloned())
    }

    /// Stores a fresh cart seeded with one item. The user must not have a
    /// cart yet. No inventory is reserved here; see `add_item_to_cart`.
    pub fn create_user_cart(
        &self,
        username: &Username,
        item_id: &ItemId,
        quantity: InventoryCount,
    ) -> Result<Cart, DomainError> {
        let mut tables = self.write()?;
        if tables.carts.contains(username.as_str()) {
            return Err(DomainError::validation(format!(
                "Cart already exists for username {}",
                username
            )));
        }
        let cart = Cart::create(username.clone(), item_id.clone(), quantity);
        tables.carts.set(username.as_str(), cart.clone());
        Ok(cart)
    }

    /// Reserves `quantity` units of an item for a user: checks stock,
    /// adds to (or creates) the user's cart and decrements stock as one
    /// step. On failure nothing is changed.
    pub fn add_item_to_cart(
        &self,
        username: &Username,
        item_id: &ItemId,
        quantity: InventoryCount,
    ) -> Result<CartSummary, DomainError> {
        let mut guard = self.write()?;
        let tables = &mut *guard;

        let available = tables
            .inventory
            .get(item_id.as_str())
            .copied()
            .ok_or_else(|| no_item(item_id))?;
        if available < quantity {
            log::warn!(
                "{} requested {} of {}, only {} available",
                username,
                quantity,
                item_id,
                available
            );
            return Err(DomainError::InsufficientStock {
                available: available.value(),
            });
        }

        match tables.carts.get_mut(username.as_str()) {
            Some(cart) => cart.add_item(CartItem::new(item_id.clone(), quantity))?,
            None => {
                let cart = Cart::create(username.clone(), item_id.clone(), quantity);
                tables.carts.set(username.as_str(), cart);
            }
        }
        let remaining = InventoryCount::from_raw(available.value() - quantity.value());
        tables.inventory.set(item_id.as_str(), remaining);
        log::debug!(
            "reserved {} of {} for {}, {} left",
            quantity,
            item_id,
            username,
            remaining
        );

        let cart = tables
            .carts
            .get(username.as_str())
            .ok_or_else(|| DomainError::Internal(format!("cart of {} vanished", username)))?;
        let items = &tables.items;
        cart.summary(|id| items.get(id.as_str()).map(Item::price))
    }

    /// Summary of the user's cart priced with current catalog prices, or
    /// `None` if the user has no cart.
    pub fn cart_summary(&self, username: &Username) -> Result<Option<CartSummary>, DomainError> {
        let tables = self.read()?;
        let Some(cart) = tables.carts.get(username.as_str()) else {
            return Ok(None);
        };
        cart.summary(|id| tables.items.get(id.as_str()).map(Item::price))
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemPrice;

    fn id(s: &str) -> ItemId {
        ItemId::new(s).unwrap()
    }

    fn count(n: i64) -> InventoryCount {
        InventoryCount::new(n).unwrap()
    }

    fn user(s: &str) -> Username {
        Username::new(s).unwrap()
    }

    fn store_with(item: &str, price: f64, stock: i64) -> StoreRepository {
        let repo = StoreRepository::in_memory();
        repo.set_item(Item::create(item, price).unwrap()).unwrap();
        repo.set_item_inventory(&id(item), count(stock)).unwrap();
        repo
    }

    #[test]
    fn set_item_then_get_item() {
        let repo = StoreRepository::in_memory();
        repo.set_item(Item::create("387", 50.0).unwrap()).unwrap();

        let item = repo.get_item(&id("387")).unwrap().expect("item stored");
        assert_eq!(item.item_id().as_str(), "387");
        assert_eq!(item.price(), ItemPrice::new(50.0).unwrap());
        assert!(repo.get_item(&id("388")).unwrap().is_none());
    }

    #[test]
    fn new_item_starts_with_zero_inventory() {
        let repo = StoreRepository::in_memory();
        assert_eq!(repo.get_item_inventory(&id("387")).unwrap(), None);
        repo.set_item(Item::create("387", 50.0).unwrap()).unwrap();
        assert_eq!(repo.get_item_inventory(&id("387")).unwrap(), Some(count(0)));
    }

    #[test]
    fn resetting_item_keeps_inventory_and_updates_price() {
        let repo = store_with("387", 50.0, 10);
        repo.set_item(Item::create("387", 75.0).unwrap()).unwrap();
        assert_eq!(repo.get_item_inventory(&id("387")).unwrap(), Some(count(10)));
        assert_eq!(repo.get_item(&id("387")).unwrap().unwrap().price().value(), 75.0);
    }

    #[test]
    fn set_inventory_requires_known_item() {
        let repo = StoreRepository::in_memory();
        let err = repo.set_item_inventory(&id("NotValid"), count(5)).unwrap_err();
        assert_eq!(err, DomainError::validation("No Item found for id NotValid"));
        assert!(repo.get_all_inventory().unwrap().is_empty());
    }

    #[test]
    fn set_inventory_overwrites() {
        let repo = store_with("387", 50.0, 10);
        repo.set_item_inventory(&id("387"), count(3)).unwrap();
        assert_eq!(repo.get_item_inventory(&id("387")).unwrap(), Some(count(3)));
    }

    #[test]
    fn adjust_inventory_adds() {
        let repo = store_with("AddTest", 50.0, 0);
        assert_eq!(repo.adjust_item_inventory(&id("AddTest"), count(10)).unwrap(), count(10));
        assert_eq!(repo.adjust_item_inventory(&id("AddTest"), count(5)).unwrap(), count(15));
        assert!(repo.adjust_item_inventory(&id("missing"), count(1)).is_err());
    }

    #[test]
    fn query_inventory_all_and_filtered() {
        let repo = store_with("387", 50.0, 10);
        repo.set_item(Item::create("388", 100.0).unwrap()).unwrap();

        let all = repo.query_inventory(None).unwrap();
        assert_eq!(
            all,
            vec![
                InventoryEntry { item_id: id("387"), inventory: count(10) },
                InventoryEntry { item_id: id("388"), inventory: count(0) },
            ]
        );

        let filtered = repo.query_inventory(Some(&[id("388"), id("387")][..])).unwrap();
        assert_eq!(filtered[0].item_id, id("388"));
        assert_eq!(filtered[1].inventory, count(10));
    }

    #[test]
    fn query_inventory_names_every_unknown_id() {
        let repo = store_with("387", 50.0, 10);
        let err = repo
            .query_inventory(Some(&[id("NotValid"), id("387"), id("Other")][..]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "items list contains invalid item_id's : NotValid, Other"
        );
    }

    #[test]
    fn add_to_cart_reserves_and_accumulates() {
        let repo = store_with("387", 50.0, 10);
        let mike = user("mike");

        let summary = repo.add_item_to_cart(&mike, &id("387"), count(2)).unwrap();
        assert_eq!(summary.total_cost, 100.0);
        assert_eq!(summary.items, vec![CartItem { item_id: id("387"), quantity: 2 }]);
        assert_eq!(repo.get_item_inventory(&id("387")).unwrap(), Some(count(8)));

        let summary = repo.add_item_to_cart(&mike, &id("387"), count(2)).unwrap();
        assert_eq!(summary.total_cost, 200.0);
        assert_eq!(summary.items, vec![CartItem { item_id: id("387"), quantity: 4 }]);
        assert_eq!(repo.get_item_inventory(&id("387")).unwrap(), Some(count(6)));
    }

    #[test]
    fn insufficient_stock_changes_nothing() {
        let repo = store_with("387", 50.0, 3);
        let mike = user("mike");
        repo.add_item_to_cart(&mike, &id("387"), count(1)).unwrap();

        let err = repo.add_item_to_cart(&mike, &id("387"), count(5)).unwrap_err();
        assert_eq!(err, DomainError::InsufficientStock { available: 2 });
        assert_eq!(repo.get_item_inventory(&id("387")).unwrap(), Some(count(2)));
        let cart = repo.get_user_cart(&mike).unwrap().unwrap();
        assert_eq!(cart.quantity_of(&id("387")), Some(1));

        let err = repo.add_item_to_cart(&user("anna"), &id("387"), count(3)).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));
        assert!(repo.get_user_cart(&user("anna")).unwrap().is_none());
    }

    #[test]
    fn cart_overflow_leaves_inventory_and_cart_untouched() {
        let repo = store_with("387", 50.0, 0);
        let mike = user("mike");
        let max = InventoryCount::from_raw(u64::MAX);
        repo.set_item_inventory(&id("387"), max).unwrap();
        repo.add_item_to_cart(&mike, &id("387"), max).unwrap();
        repo.set_item_inventory(&id("387"), count(10)).unwrap();

        let err = repo.add_item_to_cart(&mike, &id("387"), count(5)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(repo.get_item_inventory(&id("387")).unwrap(), Some(count(10)));
        let cart = repo.get_user_cart(&mike).unwrap().unwrap();
        assert_eq!(cart.quantity_of(&id("387")), Some(u64::MAX));
    }

    #[test]
    fn unknown_item_is_not_a_stock_failure() {
        let repo = StoreRepository::in_memory();
        let err = repo
            .add_item_to_cart(&user("mike"), &id("ghost"), count(1))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(repo.get_user_cart(&user("mike")).unwrap().is_none());
    }

    #[test]
    fn summary_uses_current_price() {
        let repo = store_with("387", 50.0, 10);
        let mike = user("mike");
        repo.add_item_to_cart(&mike, &id("387"), count(2)).unwrap();
        repo.set_item(Item::create("387", 20.0).unwrap()).unwrap();

        let summary = repo.cart_summary(&mike).unwrap().unwrap();
        assert_eq!(summary.total_cost, 40.0);
        assert!(repo.cart_summary(&user("nobody")).unwrap().is_none());
    }

    #[test]
    fn create_user_cart_refuses_existing_cart() {
        let repo = store_with("387", 50.0, 10);
        let mike = user("mike");
        let cart = repo.create_user_cart(&mike, &id("387"), count(1)).unwrap();
        assert_eq!(cart.owner(), &mike);
        assert_eq!(repo.get_user_cart(&mike).unwrap(), Some(cart));
        assert!(repo.create_user_cart(&mike, &id("387"), count(1)).is_err());
    }

    #[test]
    fn concurrent_reservations_never_oversell() {
        const STOCK: i64 = 7;
        const CALLERS: usize = 20;

        let repo = store_with("387", 50.0, STOCK);
        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..CALLERS)
                .map(|n| {
                    let repo = &repo;
                    s.spawn(move || {
                        let buyer = user(&format!("user-{}", n % 4));
                        repo.add_item_to_cart(&buyer, &id("387"), count(1))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let ok = results.iter().filter(|r| r.is_ok()).count();
        let short = results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::InsufficientStock { .. })))
            .count();
        assert_eq!(ok, STOCK as usize);
        assert_eq!(short, CALLERS - STOCK as usize);
        assert_eq!(repo.get_item_inventory(&id("387")).unwrap(), Some(count(0)));

        let reserved: u64 = (0..4)
            .filter_map(|n| repo.get_user_cart(&user(&format!("user-{}", n))).unwrap())
            .filter_map(|cart| cart.quantity_of(&id("387")))
            .sum();
        assert_eq!(reserved, STOCK as u64);
    }
}
