pub mod memory_table;

pub use memory_table::MemoryTable;
