use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Who recorded a batch: a human through the API, or the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditSource {
    Manual,
    Ai,
}

impl EditSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditSource::Manual => "manual",
            EditSource::Ai => "ai",
        }
    }
}

impl FromStr for EditSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "manual" => Ok(EditSource::Manual),
            "ai" => Ok(EditSource::Ai),
            _ => bail!("Unknown edit source {}", s),
        }
    }
}

/// Largest quantity a single batch may carry.
pub const MAX_BATCH_QUANTITY: i64 = 1_000_000_000;

/// SKUs are stored upper-cased so lookups are case-insensitive.
pub fn normalize_sku(sku: &str) -> String {
    sku.trim().to_uppercase()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub restock_level: Option<i64>,
    pub warehouse_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub expiry_date: Option<DateTime<Utc>>,
    pub edited_by: EditSource,
    pub created_at: DateTime<Utc>,
}

impl Batch {
    /// Batches without an expiry date never expire. Already expired batches
    /// count as expiring. A window reaching past the calendar covers every
    /// dated batch.
    pub fn expires_within(&self, now: DateTime<Utc>, days: i64) -> bool {
        match Duration::try_days(days).and_then(|window| now.checked_add_signed(window)) {
            Some(limit) => self.expiry_date.is_some_and(|expiry| expiry <= limit),
            None => self.expiry_date.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithBatches {
    #[serde(flatten)]
    pub product: Product,
    pub batches: Vec<Batch>,
}

impl ProductWithBatches {
    /// `None` when the sum does not fit in an `i64`.
    pub fn total_stock(&self) -> Option<i64> {
        self.batches
            .iter()
            .try_fold(0i64, |total, b| total.checked_add(b.quantity))
    }

    /// A product without a restock level never needs restocking. Neither does
    /// one whose stock is too large to count.
    pub fn needs_restock(&self) -> bool {
        match (self.product.restock_level, self.total_stock()) {
            (Some(level), Some(total)) => total < level,
            _ => false,
        }
    }

    pub fn expiring_within(&self, now: DateTime<Utc>, days: i64) -> Vec<&Batch> {
        self.batches
            .iter()
            .filter(|b| b.expires_within(now, days))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithQuantity {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub restock_level: Option<i64>,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub restock_level: Option<i64>,
    pub warehouse_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBatch {
    pub quantity: i64,
    pub expiry_date: Option<DateTime<Utc>>,
    pub edited_by: EditSource,
}
