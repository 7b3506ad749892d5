//! Shared constants for end-to-end tests
//!
//! Seeded users, warehouses and products live here so a change to the
//! fixtures only touches this file.

// ============================================================================
// Test User Credentials
// ============================================================================

/// Regular test user, working in `WAREHOUSE_1_ID`
pub const TEST_USER: &str = "testuser";

pub const TEST_PASS: &str = "testpass123";

pub const TEST_EMAIL: &str = "testuser@example.com";

/// A user of the second warehouse
pub const OTHER_USER: &str = "otheruser";

pub const OTHER_PASS: &str = "otherpass123";

pub const OTHER_EMAIL: &str = "other@example.com";

// ============================================================================
// Test Warehouses
// ============================================================================

pub const WAREHOUSE_1_ID: i64 = 1;

pub const WAREHOUSE_2_ID: i64 = 2;

// ============================================================================
// Test Inventory
// ============================================================================

/// Blue pens, two batches of 50 and 70 units, restock level 100
pub const PEN_SKU: &str = "PEN-001";
pub const PEN_NAME: &str = "Blue pen";
pub const PEN_RESTOCK_LEVEL: i64 = 100;
pub const PEN_TOTAL_STOCK: i64 = 120;

/// Milk, one batch expiring in 3 days and one in 60 days, restock level 40
pub const MILK_SKU: &str = "MILK-1L";
pub const MILK_NAME: &str = "Milk 1L";
pub const MILK_RESTOCK_LEVEL: i64 = 40;
pub const MILK_TOTAL_STOCK: i64 = 30;

/// Staplers, stored in the second warehouse
pub const STAPLER_SKU: &str = "STAPLER-9";
pub const STAPLER_NAME: &str = "Stapler";

// ============================================================================
// Timeouts
// ============================================================================

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

pub const REQUEST_TIMEOUT_SECS: u64 = 10;

pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
