//! Test fixture creation for the inventory and user databases

use super::constants::*;
use anyhow::Result;
use chrono::{Duration, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use warehouse_inventory_server::inventory::{
    EditSource, InventoryStore, NewBatch, NewProduct, SqliteInventoryStore,
};
use warehouse_inventory_server::user::{SqliteUserStore, TokenIssuer, UserManager};

pub const TEST_JWT_SECRET: &str = "e2e-test-secret";

/// Creates the inventory database with pens and milk in warehouse 1 and
/// staplers in warehouse 2.
/// Returns (temp_dir, inventory_db_path)
pub fn create_test_inventory() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("inventory.db");
    let store = SqliteInventoryStore::new(&db_path)?;

    let pen = store.create_product(&NewProduct {
        sku: PEN_SKU.to_string(),
        name: PEN_NAME.to_string(),
        restock_level: Some(PEN_RESTOCK_LEVEL),
        warehouse_id: WAREHOUSE_1_ID,
    })?;
    for quantity in [50, 70] {
        store.add_batch(
            pen.id,
            &NewBatch {
                quantity,
                expiry_date: None,
                edited_by: EditSource::Manual,
            },
        )?;
    }

    let milk = store.create_product(&NewProduct {
        sku: MILK_SKU.to_string(),
        name: MILK_NAME.to_string(),
        restock_level: Some(MILK_RESTOCK_LEVEL),
        warehouse_id: WAREHOUSE_1_ID,
    })?;
    for (quantity, days) in [(10, 3), (20, 60)] {
        store.add_batch(
            milk.id,
            &NewBatch {
                quantity,
                expiry_date: Some(Utc::now() + Duration::days(days)),
                edited_by: EditSource::Manual,
            },
        )?;
    }

    store.create_product(&NewProduct {
        sku: STAPLER_SKU.to_string(),
        name: STAPLER_NAME.to_string(),
        restock_level: None,
        warehouse_id: WAREHOUSE_2_ID,
    })?;

    Ok((dir, db_path))
}

/// Creates the user database with one user per warehouse.
/// Returns (temp_dir, user_db_path)
pub fn create_test_db_with_users() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let db_path = dir.path().join("users.db");
    let manager = UserManager::new(
        Arc::new(SqliteUserStore::new(&db_path)?),
        TokenIssuer::new(TEST_JWT_SECRET, chrono::Duration::days(1)),
    );
    manager.signup(TEST_USER, TEST_PASS, TEST_EMAIL, WAREHOUSE_1_ID)?;
    manager.signup(OTHER_USER, OTHER_PASS, OTHER_EMAIL, WAREHOUSE_2_ID)?;
    Ok((dir, db_path))
}
