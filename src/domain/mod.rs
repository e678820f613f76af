pub mod cart;
pub mod errors;
pub mod item;
pub mod ports;
pub mod values;

pub use cart::{Cart, CartItem, CartSummary};
pub use errors::DomainError;
pub use item::Item;
pub use values::{InventoryCount, ItemId, ItemPrice, Username};
