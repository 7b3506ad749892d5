mod inventory_store;
pub mod models;
mod schema;
mod sqlite_inventory_store;

pub use inventory_store::{InventoryError, InventoryResult, InventoryStore};
pub use models::{
    normalize_sku, Batch, EditSource, NewBatch, NewProduct, Product, ProductWithBatches,
    ProductWithQuantity, MAX_BATCH_QUANTITY,
};
pub use sqlite_inventory_store::SqliteInventoryStore;
