//! Argument payloads of the inventory tools.
//!
//! Models are loose with numbers (`14`, `14.0` and `"14"` all show up), so
//! integer fields accept any of those spellings.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    value_to_i64(&value)
        .ok_or_else(|| D::Error::custom(format!("expected an integer, got {}", value)))
}

fn lenient_optional_i64<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => value_to_i64(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected an integer, got {}", value))),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkuArgs {
    pub sku: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringSoonArgs {
    pub sku: String,
    #[serde(default, deserialize_with = "lenient_optional_i64")]
    pub within_days: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductArgs {
    pub sku: String,
    pub name: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub restock_level: i64,
    #[serde(default, deserialize_with = "lenient_optional_i64")]
    pub warehouse_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductBatchArgs {
    pub sku: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub quantity: i64,
    #[serde(default)]
    pub expiry_date: Option<String>,
}
