pub mod store_repository;

pub use store_repository::{InventoryEntry, StoreRepository};
