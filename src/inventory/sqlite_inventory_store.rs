use super::inventory_store::{InventoryError, InventoryResult, InventoryStore};
use super::models::{
    normalize_sku, Batch, EditSource, NewBatch, NewProduct, Product, ProductWithBatches,
    ProductWithQuantity,
};
use super::schema::INVENTORY_VERSIONED_SCHEMAS;
use crate::sqlite_persistence::{open_in_memory, open_versioned};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

const PRODUCT_COLUMNS: &str = "id, sku, name, restock_level, warehouse_id, created";
const BATCH_COLUMNS: &str = "id, product_id, quantity, expiry_date, edited_by, created";

pub struct SqliteInventoryStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteInventoryStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = open_versioned(db_path, INVENTORY_VERSIONED_SCHEMAS)?;
        Ok(SqliteInventoryStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = open_in_memory(INVENTORY_VERSIONED_SCHEMAS)?;
        Ok(SqliteInventoryStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn from_unix_seconds(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

fn product_from_row(row: &Row) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        sku: row.get(1)?,
        name: row.get(2)?,
        restock_level: row.get(3)?,
        warehouse_id: row.get(4)?,
        created_at: from_unix_seconds(row.get(5)?),
    })
}

fn batch_from_row(row: &Row) -> rusqlite::Result<Batch> {
    let edited_by = row
        .get::<_, String>(4)?
        .parse::<EditSource>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, e.into()))?;
    Ok(Batch {
        id: row.get(0)?,
        product_id: row.get(1)?,
        quantity: row.get(2)?,
        expiry_date: row.get::<_, Option<i64>>(3)?.map(from_unix_seconds),
        edited_by,
        created_at: from_unix_seconds(row.get(5)?),
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn query_product_by_id(conn: &Connection, product_id: i64) -> rusqlite::Result<Option<Product>> {
    conn.query_row(
        &format!("SELECT {} FROM product WHERE id = ?1", PRODUCT_COLUMNS),
        params![product_id],
        product_from_row,
    )
    .optional()
}

fn query_product_by_sku(conn: &Connection, sku: &str) -> rusqlite::Result<Option<Product>> {
    conn.query_row(
        &format!("SELECT {} FROM product WHERE sku = ?1", PRODUCT_COLUMNS),
        params![normalize_sku(sku)],
        product_from_row,
    )
    .optional()
}

fn query_batches(conn: &Connection, product_id: i64) -> rusqlite::Result<Vec<Batch>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM product_batch WHERE product_id = ?1 ORDER BY id",
        BATCH_COLUMNS
    ))?;
    let batches = stmt
        .query_map(params![product_id], batch_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(batches)
}

fn insert_batch(conn: &Connection, product_id: i64, batch: &NewBatch) -> rusqlite::Result<Batch> {
    conn.execute(
        "INSERT INTO product_batch (product_id, quantity, expiry_date, edited_by) VALUES (?1, ?2, ?3, ?4)",
        params![
            product_id,
            batch.quantity,
            batch.expiry_date.map(|d| d.timestamp()),
            batch.edited_by.as_str()
        ],
    )?;
    let batch_id = conn.last_insert_rowid();
    debug!(
        "Added batch {} of {} units to product {}",
        batch_id, batch.quantity, product_id
    );
    conn.query_row(
        &format!("SELECT {} FROM product_batch WHERE id = ?1", BATCH_COLUMNS),
        params![batch_id],
        batch_from_row,
    )
}

impl InventoryStore for SqliteInventoryStore {
    fn create_product(&self, product: &NewProduct) -> InventoryResult<Product> {
        let sku = normalize_sku(&product.sku);
        let conn = self.conn.lock().unwrap();
        match conn.execute(
            "INSERT INTO product (sku, name, restock_level, warehouse_id) VALUES (?1, ?2, ?3, ?4)",
            params![
                sku,
                product.name,
                product.restock_level,
                product.warehouse_id
            ],
        ) {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(InventoryError::DuplicateSku(sku)),
            Err(e) => return Err(e.into()),
        }
        let product_id = conn.last_insert_rowid();
        debug!("Created product {} with sku {}", product_id, sku);
        Ok(conn.query_row(
            &format!("SELECT {} FROM product WHERE id = ?1", PRODUCT_COLUMNS),
            params![product_id],
            product_from_row,
        )?)
    }

    fn get_product(&self, product_id: i64) -> InventoryResult<Option<Product>> {
        let conn = self.conn.lock().unwrap();
        Ok(query_product_by_id(&conn, product_id)?)
    }

    fn get_product_by_sku(&self, sku: &str) -> InventoryResult<Option<Product>> {
        let conn = self.conn.lock().unwrap();
        Ok(query_product_by_sku(&conn, sku)?)
    }

    fn get_product_with_batches(&self, sku: &str) -> InventoryResult<Option<ProductWithBatches>> {
        let conn = self.conn.lock().unwrap();
        let product = match query_product_by_sku(&conn, sku)? {
            Some(product) => product,
            None => return Ok(None),
        };
        let batches = query_batches(&conn, product.id)?;
        Ok(Some(ProductWithBatches { product, batches }))
    }

    fn list_products(&self, warehouse_id: i64) -> InventoryResult<Vec<Product>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM product WHERE warehouse_id = ?1 ORDER BY id",
            PRODUCT_COLUMNS
        ))?;
        let products = stmt
            .query_map(params![warehouse_id], product_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(products)
    }

    fn list_products_with_quantity(
        &self,
        warehouse_id: i64,
    ) -> InventoryResult<Vec<ProductWithQuantity>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT p.id, p.sku, p.name, p.restock_level, COALESCE(SUM(b.quantity), 0)
             FROM product p LEFT JOIN product_batch b ON b.product_id = p.id
             WHERE p.warehouse_id = ?1
             GROUP BY p.id
             ORDER BY p.id",
        )?;
        let products = stmt
            .query_map(params![warehouse_id], |row| {
                Ok(ProductWithQuantity {
                    id: row.get(0)?,
                    sku: row.get(1)?,
                    name: row.get(2)?,
                    restock_level: row.get(3)?,
                    quantity: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(products)
    }

    fn get_batches(&self, product_id: i64) -> InventoryResult<Vec<Batch>> {
        let conn = self.conn.lock().unwrap();
        Ok(query_batches(&conn, product_id)?)
    }

    fn add_batch(&self, product_id: i64, batch: &NewBatch) -> InventoryResult<Batch> {
        let conn = self.conn.lock().unwrap();
        if query_product_by_id(&conn, product_id)?.is_none() {
            return Err(InventoryError::ProductMissingForBatch(product_id));
        }
        Ok(insert_batch(&conn, product_id, batch)?)
    }
}
