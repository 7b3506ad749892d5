use super::args::{CreateProductArgs, CreateProductBatchArgs, ExpiringSoonArgs, SkuArgs};
use super::dates::parse_expiry_date;
use super::{ToolDefinition, ToolError};
use crate::inventory::{
    normalize_sku, EditSource, InventoryError, InventoryStore, NewBatch, NewProduct,
    ProductWithBatches, MAX_BATCH_QUANTITY,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

pub const DEFAULT_EXPIRY_WINDOW_DAYS: i64 = 30;
pub const MAX_EXPIRY_WINDOW_DAYS: i64 = 36_500;

/// Who a tool call runs for, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolContext {
    /// The caller's warehouse. Products of other warehouses are invisible.
    pub warehouse_id: i64,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryTool {
    GetTotalStock,
    ShouldRestock,
    GetExpiringSoon,
    CreateProduct,
    CreateProductBatch,
}

impl InventoryTool {
    pub const ALL: [InventoryTool; 5] = [
        InventoryTool::GetTotalStock,
        InventoryTool::ShouldRestock,
        InventoryTool::GetExpiringSoon,
        InventoryTool::CreateProduct,
        InventoryTool::CreateProductBatch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InventoryTool::GetTotalStock => "getTotalStock",
            InventoryTool::ShouldRestock => "shouldRestock",
            InventoryTool::GetExpiringSoon => "getExpiringSoon",
            InventoryTool::CreateProduct => "createProduct",
            InventoryTool::CreateProductBatch => "createProductBatch",
        }
    }

    /// `getExpiryDate` is an older name of `getExpiringSoon` that models still emit.
    pub fn from_name(name: &str) -> Result<Self, ToolError> {
        match name {
            "getExpiryDate" => Ok(InventoryTool::GetExpiringSoon),
            _ => Self::ALL
                .into_iter()
                .find(|tool| tool.name() == name)
                .ok_or_else(|| ToolError::UnknownTool(name.to_string())),
        }
    }

    fn description(self) -> &'static str {
        match self {
            InventoryTool::GetTotalStock => {
                "Get the total quantity in stock of a product, summed over all of its batches, looking it up by sku."
            }
            InventoryTool::ShouldRestock => {
                "Tell whether a product needs restocking, i.e. its total stock is below its restock level, looking it up by sku."
            }
            InventoryTool::GetExpiringSoon => {
                "List the batches of a product that expire within a given number of days (default 30), looking it up by sku."
            }
            InventoryTool::CreateProduct => {
                "Create a new product with no stock in the caller's warehouse."
            }
            InventoryTool::CreateProductBatch => {
                "Add a batch of stock to an existing product, looking it up by sku. The expiry date is optional."
            }
        }
    }

    fn parameters(self) -> Value {
        let sku = json!({ "type": "string", "description": "The product SKU, e.g. PEN-BLUE-01" });
        match self {
            InventoryTool::GetTotalStock | InventoryTool::ShouldRestock => json!({
                "type": "object",
                "properties": { "sku": sku },
                "required": ["sku"]
            }),
            InventoryTool::GetExpiringSoon => json!({
                "type": "object",
                "properties": {
                    "sku": sku,
                    "withinDays": {
                        "type": "integer",
                        "description": "Size of the window in days, defaults to 30, at most 36500"
                    }
                },
                "required": ["sku"]
            }),
            InventoryTool::CreateProduct => json!({
                "type": "object",
                "properties": {
                    "sku": sku,
                    "name": { "type": "string", "description": "Human readable product name" },
                    "restockLevel": {
                        "type": "integer",
                        "description": "Stock level below which the product needs restocking"
                    },
                    "warehouseId": {
                        "type": "integer",
                        "description": "Warehouse holding the product, defaults to the caller's"
                    }
                },
                "required": ["sku", "name", "restockLevel"]
            }),
            InventoryTool::CreateProductBatch => json!({
                "type": "object",
                "properties": {
                    "sku": sku,
                    "quantity": {
                        "type": "integer",
                        "description": "Number of units in the batch, at most 1000000000"
                    },
                    "expiryDate": {
                        "type": "string",
                        "description": "Expiry date, e.g. 2025-06-30, tomorrow or in 3 months"
                    }
                },
                "required": ["sku", "quantity"]
            }),
        }
    }

    pub fn definition(self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.parameters())
    }

    /// Every tool, in the order offered to the model.
    pub fn catalogue() -> Vec<ToolDefinition> {
        Self::ALL.into_iter().map(Self::definition).collect()
    }

    /// Parses the raw argument text the model emitted for this tool.
    pub fn parse_arguments(
        self,
        raw_arguments: &str,
        context: &ToolContext,
    ) -> Result<ToolInvocation, ToolError> {
        let value: Value = if raw_arguments.trim().is_empty() {
            json!({})
        } else {
            serde_json::from_str(raw_arguments)
                .map_err(|e| ToolError::MalformedArguments(e.to_string()))?
        };

        match self {
            InventoryTool::GetTotalStock => {
                let args: SkuArgs = typed_arguments(value)?;
                Ok(ToolInvocation::GetTotalStock {
                    sku: required_sku(&args.sku)?,
                })
            }
            InventoryTool::ShouldRestock => {
                let args: SkuArgs = typed_arguments(value)?;
                Ok(ToolInvocation::ShouldRestock {
                    sku: required_sku(&args.sku)?,
                })
            }
            InventoryTool::GetExpiringSoon => {
                let args: ExpiringSoonArgs = typed_arguments(value)?;
                Ok(ToolInvocation::GetExpiringSoon {
                    sku: required_sku(&args.sku)?,
                    within_days: in_range(
                        "withinDays",
                        args.within_days.unwrap_or(DEFAULT_EXPIRY_WINDOW_DAYS),
                        MAX_EXPIRY_WINDOW_DAYS,
                    )?,
                })
            }
            InventoryTool::CreateProduct => {
                let args: CreateProductArgs = typed_arguments(value)?;
                let name = args.name.trim();
                if name.is_empty() {
                    return Err(ToolError::InvalidArguments(
                        "name must not be empty".to_string(),
                    ));
                }
                let warehouse_id = match args.warehouse_id {
                    None => context.warehouse_id,
                    Some(id) if id == context.warehouse_id => id,
                    Some(id) => {
                        return Err(ToolError::InvalidArguments(format!(
                            "warehouseId {} is not the caller's warehouse {}",
                            id, context.warehouse_id
                        )))
                    }
                };
                Ok(ToolInvocation::CreateProduct(NewProduct {
                    sku: required_sku(&args.sku)?,
                    name: name.to_string(),
                    restock_level: Some(non_negative("restockLevel", args.restock_level)?),
                    warehouse_id,
                }))
            }
            InventoryTool::CreateProductBatch => {
                let args: CreateProductBatchArgs = typed_arguments(value)?;
                let expiry_date = match args.expiry_date.as_deref().map(str::trim) {
                    None | Some("") => None,
                    Some(text) => Some(parse_expiry_date(text, context.now).ok_or_else(|| {
                        ToolError::InvalidArguments(format!("unrecognized expiry date: {}", text))
                    })?),
                };
                Ok(ToolInvocation::CreateProductBatch {
                    sku: required_sku(&args.sku)?,
                    batch: NewBatch {
                        quantity: in_range("quantity", args.quantity, MAX_BATCH_QUANTITY)?,
                        expiry_date,
                        edited_by: EditSource::Ai,
                    },
                })
            }
        }
    }
}

fn typed_arguments<T: DeserializeOwned>(value: Value) -> Result<T, ToolError> {
    serde_json::from_value(value).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

fn required_sku(sku: &str) -> Result<String, ToolError> {
    let sku = normalize_sku(sku);
    if sku.is_empty() {
        return Err(ToolError::InvalidArguments(
            "sku must not be empty".to_string(),
        ));
    }
    Ok(sku)
}

fn non_negative(field: &str, value: i64) -> Result<i64, ToolError> {
    if value < 0 {
        return Err(ToolError::InvalidArguments(format!(
            "{} must not be negative",
            field
        )));
    }
    Ok(value)
}

fn in_range(field: &str, value: i64, max: i64) -> Result<i64, ToolError> {
    if non_negative(field, value)? > max {
        return Err(ToolError::InvalidArguments(format!(
            "{} must be at most {}",
            field, max
        )));
    }
    Ok(value)
}

/// A tool call with validated arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    GetTotalStock { sku: String },
    ShouldRestock { sku: String },
    GetExpiringSoon { sku: String, within_days: i64 },
    CreateProduct(NewProduct),
    CreateProductBatch { sku: String, batch: NewBatch },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Ok,
    NotFound,
    DuplicateSku,
    DataStoreError,
    UnknownTool,
    MalformedArguments,
    InvalidArguments,
}

impl ToolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Ok => "ok",
            ToolStatus::NotFound => "not_found",
            ToolStatus::DuplicateSku => "duplicate_sku",
            ToolStatus::DataStoreError => "data_store_error",
            ToolStatus::UnknownTool => "unknown_tool",
            ToolStatus::MalformedArguments => "malformed_arguments",
            ToolStatus::InvalidArguments => "invalid_arguments",
        }
    }
}

/// What a tool call produced. Failures are results too, the model sees them
/// as regular tool output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutcome {
    pub status: ToolStatus,
    pub result: Value,
}

impl ToolOutcome {
    fn ok(result: Value) -> Self {
        ToolOutcome {
            status: ToolStatus::Ok,
            result,
        }
    }

    fn from_store_error(err: InventoryError) -> Self {
        match err {
            InventoryError::ProductNotFound(sku) => ToolOutcome {
                status: ToolStatus::NotFound,
                result: json!({ "error": "product not found", "kind": "not_found", "sku": sku }),
            },
            InventoryError::ProductMissingForBatch(product_id) => ToolOutcome {
                status: ToolStatus::NotFound,
                result: json!({
                    "error": "product not found",
                    "kind": "not_found",
                    "productId": product_id
                }),
            },
            InventoryError::DuplicateSku(sku) => ToolOutcome {
                status: ToolStatus::DuplicateSku,
                result: json!({
                    "error": "product with this sku already exists",
                    "kind": "duplicate_sku",
                    "sku": sku
                }),
            },
            err @ (InventoryError::StockOverflow(_) | InventoryError::Storage(_)) => {
                warn!("Inventory tool failed on the data store: {}", err);
                ToolOutcome {
                    status: ToolStatus::DataStoreError,
                    result: json!({ "error": err.to_string(), "kind": "data_store_error" }),
                }
            }
        }
    }
}

/// Products of other warehouses are reported exactly like unknown SKUs.
fn find_product(
    store: &dyn InventoryStore,
    sku: &str,
    warehouse_id: i64,
) -> Result<ProductWithBatches, InventoryError> {
    store
        .get_product_with_batches(sku)?
        .filter(|product| product.product.warehouse_id == warehouse_id)
        .ok_or_else(|| InventoryError::ProductNotFound(sku.to_string()))
}

fn total_stock(product: &ProductWithBatches) -> Result<i64, InventoryError> {
    product
        .total_stock()
        .ok_or_else(|| InventoryError::StockOverflow(product.product.sku.clone()))
}

impl ToolInvocation {
    pub fn tool(&self) -> InventoryTool {
        match self {
            ToolInvocation::GetTotalStock { .. } => InventoryTool::GetTotalStock,
            ToolInvocation::ShouldRestock { .. } => InventoryTool::ShouldRestock,
            ToolInvocation::GetExpiringSoon { .. } => InventoryTool::GetExpiringSoon,
            ToolInvocation::CreateProduct(_) => InventoryTool::CreateProduct,
            ToolInvocation::CreateProductBatch { .. } => InventoryTool::CreateProductBatch,
        }
    }

    /// Runs against the store. Never fails, store errors become error outcomes.
    pub fn execute(&self, store: &dyn InventoryStore, context: &ToolContext) -> ToolOutcome {
        match self.run(store, context) {
            Ok(result) => ToolOutcome::ok(result),
            Err(err) => ToolOutcome::from_store_error(err),
        }
    }

    fn run(
        &self,
        store: &dyn InventoryStore,
        context: &ToolContext,
    ) -> Result<Value, InventoryError> {
        let warehouse_id = context.warehouse_id;
        match self {
            ToolInvocation::GetTotalStock { sku } => {
                let product = find_product(store, sku, warehouse_id)?;
                Ok(json!({ "sku": product.product.sku, "total": total_stock(&product)? }))
            }
            ToolInvocation::ShouldRestock { sku } => {
                let product = find_product(store, sku, warehouse_id)?;
                Ok(json!({
                    "sku": product.product.sku,
                    "total": total_stock(&product)?,
                    "restockLevel": product.product.restock_level,
                    "verdict": product.needs_restock(),
                }))
            }
            ToolInvocation::GetExpiringSoon { sku, within_days } => {
                let product = find_product(store, sku, warehouse_id)?;
                let expiring: Vec<Value> = product
                    .expiring_within(context.now, *within_days)
                    .into_iter()
                    .map(|batch| {
                        json!({
                            "id": batch.id,
                            "expiryDate": batch.expiry_date,
                            "quantity": batch.quantity,
                        })
                    })
                    .collect();
                Ok(json!({
                    "sku": product.product.sku,
                    "productName": product.product.name,
                    "withinDays": within_days,
                    "expiringCount": expiring.len(),
                    "expiringBatches": expiring,
                }))
            }
            ToolInvocation::CreateProduct(new_product) => {
                let product = store.create_product(new_product)?;
                Ok(json!({ "created": true, "product": product }))
            }
            ToolInvocation::CreateProductBatch { sku, batch } => {
                let product = find_product(store, sku, warehouse_id)?;
                let batch = store.add_batch(product.product.id, batch)?;
                Ok(json!({ "created": true, "batch": batch }))
            }
        }
    }
}

/// Resolves, parses and executes one tool call from the model.
pub fn run_tool_call(
    name: &str,
    raw_arguments: &str,
    store: &dyn InventoryStore,
    context: &ToolContext,
) -> ToolOutcome {
    InventoryTool::from_name(name)
        .and_then(|tool| tool.parse_arguments(raw_arguments, context))
        .map_or_else(ToolError::into_outcome, |invocation| {
            invocation.execute(store, context)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::SqliteInventoryStore;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_750_000_000, 0).unwrap()
    }

    fn ctx() -> ToolContext {
        ToolContext {
            warehouse_id: 1,
            now: now(),
        }
    }

    fn store_with_pens() -> SqliteInventoryStore {
        let store = SqliteInventoryStore::in_memory().unwrap();
        let product = store
            .create_product(&NewProduct {
                sku: "PEN-BLUE".to_string(),
                name: "Blue pen".to_string(),
                restock_level: Some(200),
                warehouse_id: 1,
            })
            .unwrap();
        for (quantity, expiry_days) in [(50, Some(10)), (70, Some(45)), (0, None)] {
            store
                .add_batch(
                    product.id,
                    &NewBatch {
                        quantity,
                        expiry_date: expiry_days.map(|d| now() + Duration::days(d)),
                        edited_by: EditSource::Manual,
                    },
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn names_round_trip_and_alias_resolves() {
        for tool in InventoryTool::ALL {
            assert_eq!(InventoryTool::from_name(tool.name()), Ok(tool));
        }
        assert_eq!(
            InventoryTool::from_name("getExpiryDate"),
            Ok(InventoryTool::GetExpiringSoon)
        );
        assert_eq!(
            InventoryTool::from_name("deleteEverything"),
            Err(ToolError::UnknownTool("deleteEverything".to_string()))
        );
    }

    #[test]
    fn catalogue_lists_every_tool_with_object_schema() {
        let catalogue = InventoryTool::catalogue();
        assert_eq!(catalogue.len(), 5);
        for definition in &catalogue {
            assert_eq!(definition.parameters["type"], "object");
            assert!(definition.parameters["required"]
                .as_array()
                .unwrap()
                .contains(&json!("sku")));
        }
    }

    #[test]
    fn total_stock_sums_batches() {
        let store = store_with_pens();
        let outcome = run_tool_call("getTotalStock", r#"{"sku":"pen-blue"}"#, &store, &ctx());
        assert_eq!(outcome.status, ToolStatus::Ok);
        assert_eq!(outcome.result, json!({ "sku": "PEN-BLUE", "total": 120 }));
    }

    #[test]
    fn restock_verdict_follows_threshold() {
        let store = store_with_pens();
        let outcome = run_tool_call("shouldRestock", r#"{"sku":"PEN-BLUE"}"#, &store, &ctx());
        assert_eq!(outcome.result["verdict"], true);
        assert_eq!(outcome.result["restockLevel"], 200);

        store
            .create_product(&NewProduct {
                sku: "NO-LEVEL".to_string(),
                name: "Untracked".to_string(),
                restock_level: None,
                warehouse_id: 1,
            })
            .unwrap();
        let outcome = run_tool_call("shouldRestock", r#"{"sku":"NO-LEVEL"}"#, &store, &ctx());
        assert_eq!(outcome.result["verdict"], false);
        assert_eq!(outcome.result["restockLevel"], Value::Null);
    }

    #[test]
    fn expiring_soon_uses_default_window() {
        let store = store_with_pens();

        let outcome = run_tool_call("getExpiringSoon", r#"{"sku":"PEN-BLUE"}"#, &store, &ctx());
        assert_eq!(outcome.result["withinDays"], 30);
        assert_eq!(outcome.result["expiringCount"], 1);
        assert_eq!(outcome.result["expiringBatches"][0]["quantity"], 50);
        assert_eq!(outcome.result["productName"], "Blue pen");

        let outcome = run_tool_call(
            "getExpiryDate",
            r#"{"sku":"PEN-BLUE","withinDays":45}"#,
            &store,
            &ctx(),
        );
        assert_eq!(outcome.result["expiringCount"], 2);
    }

    #[test]
    fn created_product_starts_empty() {
        let store = SqliteInventoryStore::in_memory().unwrap();
        let outcome = run_tool_call(
            "createProduct",
            r#"{"sku":"tape-01","name":"Tape","restockLevel":10}"#,
            &store,
            &ctx(),
        );
        assert_eq!(outcome.status, ToolStatus::Ok);
        assert_eq!(outcome.result["created"], true);
        assert_eq!(outcome.result["product"]["sku"], "TAPE-01");

        let outcome = run_tool_call("getTotalStock", r#"{"sku":"TAPE-01"}"#, &store, &ctx());
        assert_eq!(outcome.result["total"], 0);

        let outcome = run_tool_call(
            "createProduct",
            r#"{"sku":"TAPE-01","name":"Tape","restockLevel":10,"warehouseId":1}"#,
            &store,
            &ctx(),
        );
        assert_eq!(outcome.status, ToolStatus::DuplicateSku);
        assert_eq!(outcome.result["kind"], "duplicate_sku");
    }

    #[test]
    fn batch_on_unknown_sku_is_not_found_and_inserts_nothing() {
        let store = store_with_pens();
        let outcome = run_tool_call(
            "createProductBatch",
            r#"{"sku":"GHOST","quantity":5}"#,
            &store,
            &ctx(),
        );
        assert_eq!(outcome.status, ToolStatus::NotFound);
        assert_eq!(
            outcome.result,
            json!({ "error": "product not found", "kind": "not_found", "sku": "GHOST" })
        );
        assert!(store.get_product_by_sku("GHOST").unwrap().is_none());
    }

    #[test]
    fn batch_is_recorded_as_ai_with_parsed_expiry() {
        let store = store_with_pens();
        let outcome = run_tool_call(
            "createProductBatch",
            r#"{"sku":"PEN-BLUE","quantity":"30","expiryDate":"in 2 weeks"}"#,
            &store,
            &ctx(),
        );
        assert_eq!(outcome.status, ToolStatus::Ok);
        assert_eq!(outcome.result["batch"]["editedBy"], "ai");
        assert_eq!(outcome.result["batch"]["quantity"], 30);

        let product = store.get_product_with_batches("PEN-BLUE").unwrap().unwrap();
        let added = product.batches.last().unwrap();
        assert_eq!(added.edited_by, EditSource::Ai);
        assert!(added.expiry_date.unwrap() > now() + Duration::days(13));
        assert_eq!(product.total_stock(), Some(150));
    }

    #[test]
    fn argument_failures_become_structured_results() {
        let store = store_with_pens();

        let outcome = run_tool_call("getTotalStock", r#"{"sku": "PEN"#, &store, &ctx());
        assert_eq!(outcome.status, ToolStatus::MalformedArguments);
        assert_eq!(outcome.result["kind"], "malformed_arguments");

        let outcome = run_tool_call("getTotalStock", r#"{"product":"PEN"}"#, &store, &ctx());
        assert_eq!(outcome.status, ToolStatus::InvalidArguments);

        let outcome = run_tool_call(
            "createProductBatch",
            r#"{"sku":"PEN-BLUE","quantity":-3}"#,
            &store,
            &ctx(),
        );
        assert_eq!(outcome.status, ToolStatus::InvalidArguments);

        let outcome = run_tool_call(
            "createProductBatch",
            r#"{"sku":"PEN-BLUE","quantity":3,"expiryDate":"whenever"}"#,
            &store,
            &ctx(),
        );
        assert_eq!(outcome.status, ToolStatus::InvalidArguments);
        assert_eq!(
            store.get_product_with_batches("PEN-BLUE").unwrap().unwrap().batches.len(),
            3
        );

        let outcome = run_tool_call("launchRocket", "{}", &store, &ctx());
        assert_eq!(outcome.status, ToolStatus::UnknownTool);
        assert_eq!(outcome.result["error"], "unknown tool: launchRocket");
    }

    #[test]
    fn parsed_invocation_reports_its_tool() {
        let invocation = InventoryTool::GetExpiringSoon
            .parse_arguments(r#"{"sku":"x","withinDays":7}"#, &ctx())
            .unwrap();
        assert_eq!(
            invocation,
            ToolInvocation::GetExpiringSoon {
                sku: "X".to_string(),
                within_days: 7
            }
        );
        assert_eq!(invocation.tool(), InventoryTool::GetExpiringSoon);
    }

    #[test]
    fn oversized_windows_and_quantities_are_rejected() {
        let store = store_with_pens();

        for within_days in ["9223372036854775807", "1000000000", "36501"] {
            let outcome = run_tool_call(
                "getExpiringSoon",
                &format!(r#"{{"sku":"PEN-BLUE","withinDays":{}}}"#, within_days),
                &store,
                &ctx(),
            );
            assert_eq!(outcome.status, ToolStatus::InvalidArguments);
            assert_eq!(
                outcome.result["error"],
                "invalid arguments: withinDays must be at most 36500"
            );
        }

        let outcome = run_tool_call(
            "getExpiringSoon",
            r#"{"sku":"PEN-BLUE","withinDays":36500}"#,
            &store,
            &ctx(),
        );
        assert_eq!(outcome.status, ToolStatus::Ok);
        assert_eq!(outcome.result["expiringCount"], 2);

        let outcome = run_tool_call(
            "createProductBatch",
            r#"{"sku":"PEN-BLUE","quantity":9223372036854775807}"#,
            &store,
            &ctx(),
        );
        assert_eq!(outcome.status, ToolStatus::InvalidArguments);
        assert_eq!(
            store.get_product_with_batches("PEN-BLUE").unwrap().unwrap().batches.len(),
            3
        );
    }

    #[test]
    fn stock_too_large_to_count_is_a_structured_error() {
        let store = store_with_pens();
        let pen = store.get_product_by_sku("PEN-BLUE").unwrap().unwrap();
        for _ in 0..2 {
            store
                .add_batch(
                    pen.id,
                    &NewBatch {
                        quantity: i64::MAX,
                        expiry_date: None,
                        edited_by: EditSource::Manual,
                    },
                )
                .unwrap();
        }

        for tool in ["getTotalStock", "shouldRestock"] {
            let outcome = run_tool_call(tool, r#"{"sku":"PEN-BLUE"}"#, &store, &ctx());
            assert_eq!(outcome.status, ToolStatus::DataStoreError);
            assert_eq!(outcome.result["kind"], "data_store_error");
        }
    }

    #[test]
    fn other_warehouses_are_invisible() {
        let store = store_with_pens();
        let stapler = store
            .create_product(&NewProduct {
                sku: "STAPLER".to_string(),
                name: "Stapler".to_string(),
                restock_level: Some(5),
                warehouse_id: 2,
            })
            .unwrap();

        for (tool, args) in [
            ("getTotalStock", r#"{"sku":"stapler"}"#),
            ("shouldRestock", r#"{"sku":"STAPLER"}"#),
            ("getExpiringSoon", r#"{"sku":"STAPLER"}"#),
            ("createProductBatch", r#"{"sku":"STAPLER","quantity":5}"#),
        ] {
            let outcome = run_tool_call(tool, args, &store, &ctx());
            assert_eq!(outcome.status, ToolStatus::NotFound, "{}", tool);
            assert_eq!(outcome.result["sku"], "STAPLER");
        }
        assert!(store.get_batches(stapler.id).unwrap().is_empty());

        let other = ToolContext {
            warehouse_id: 2,
            now: now(),
        };
        let outcome = run_tool_call("getTotalStock", r#"{"sku":"STAPLER"}"#, &store, &other);
        assert_eq!(outcome.result["total"], 0);
    }

    #[test]
    fn created_product_lands_in_callers_warehouse() {
        let store = SqliteInventoryStore::in_memory().unwrap();

        let outcome = run_tool_call(
            "createProduct",
            r#"{"sku":"GLUE","name":"Glue","restockLevel":3,"warehouseId":2}"#,
            &store,
            &ctx(),
        );
        assert_eq!(outcome.status, ToolStatus::InvalidArguments);
        assert!(store.get_product_by_sku("GLUE").unwrap().is_none());

        let outcome = run_tool_call(
            "createProduct",
            r#"{"sku":"GLUE","name":"Glue","restockLevel":3,"warehouseId":"1"}"#,
            &store,
            &ctx(),
        );
        assert_eq!(outcome.status, ToolStatus::Ok);
        assert_eq!(outcome.result["product"]["warehouseId"], 1);
    }
}
