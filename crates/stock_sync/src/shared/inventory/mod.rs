pub mod loader;
pub mod sheet;

pub use loader::InventoryLoader;
