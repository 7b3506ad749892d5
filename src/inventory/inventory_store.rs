use super::models::{Batch, NewBatch, NewProduct, Product, ProductWithBatches, ProductWithQuantity};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("product with sku {0} not found")]
    ProductNotFound(String),

    #[error("product with id {0} not found")]
    ProductMissingForBatch(i64),

    #[error("product with sku {0} already exists")]
    DuplicateSku(String),

    #[error("total stock of {0} is too large to count")]
    StockOverflow(String),

    #[error("data store error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Products and their stock batches. SKU arguments are normalized by the
/// implementation, callers may pass them in any case.
pub trait InventoryStore: Send + Sync {
    /// Fails with `DuplicateSku` when the SKU is taken.
    fn create_product(&self, product: &NewProduct) -> InventoryResult<Product>;

    fn get_product(&self, product_id: i64) -> InventoryResult<Option<Product>>;

    fn get_product_by_sku(&self, sku: &str) -> InventoryResult<Option<Product>>;

    /// The product with every batch recorded for it, oldest batch first.
    fn get_product_with_batches(&self, sku: &str) -> InventoryResult<Option<ProductWithBatches>>;

    fn list_products(&self, warehouse_id: i64) -> InventoryResult<Vec<Product>>;

    /// Products of a warehouse with their summed batch quantities.
    fn list_products_with_quantity(
        &self,
        warehouse_id: i64,
    ) -> InventoryResult<Vec<ProductWithQuantity>>;

    fn get_batches(&self, product_id: i64) -> InventoryResult<Vec<Batch>>;

    /// Fails with `ProductMissingForBatch` when no product has this id.
    fn add_batch(&self, product_id: i64, batch: &NewBatch) -> InventoryResult<Batch>;
}
