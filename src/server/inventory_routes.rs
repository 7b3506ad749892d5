use super::api_error::ApiError;
use super::session::Session;
use super::state::GuardedInventoryStore;
use super::validation::ValidationErrors;
use crate::agent::tools::parse_expiry_date;
use crate::inventory::{
    normalize_sku, EditSource, NewBatch, NewProduct, Product, MAX_BATCH_QUANTITY,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

#[derive(Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateProductBody {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub restock_level: Option<i64>,
    /// Defaults to the caller's warehouse, any other value is rejected.
    pub warehouse_id: Option<i64>,
}

impl CreateProductBody {
    fn validate(self, session: &Session) -> Result<NewProduct, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = errors.require(
            self.name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            "name",
        );
        let sku = errors.require(
            self.sku.map(|s| normalize_sku(&s)).filter(|s| !s.is_empty()),
            "sku",
        );
        let restock_level = errors.require(self.restock_level, "restockLevel");
        if let Some(level) = restock_level {
            errors.check(level >= 0, "restockLevel", "must not be negative");
        }
        errors.check(
            self.warehouse_id
                .map_or(true, |warehouse_id| warehouse_id == session.warehouse_id),
            "warehouseId",
            "must be your own warehouse",
        );

        match (name, sku) {
            (Some(name), Some(sku)) if errors.is_empty() => Ok(NewProduct {
                sku,
                name,
                restock_level,
                warehouse_id: session.warehouse_id,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RestockBody {
    pub quantity: Option<i64>,
    pub expiry_date: Option<String>,
    pub edited_by: Option<String>,
}

impl RestockBody {
    fn validate(self) -> Result<NewBatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let quantity = errors.require(self.quantity, "quantity");
        if let Some(quantity) = quantity {
            errors.check(quantity >= 0, "quantity", "must not be negative");
            errors.check(
                quantity <= MAX_BATCH_QUANTITY,
                "quantity",
                format!("must be at most {}", MAX_BATCH_QUANTITY),
            );
        }

        let edited_by = errors.require(self.edited_by, "editedBy");
        let edited_by = edited_by.and_then(|source| {
            let parsed = source.parse::<EditSource>().ok();
            errors.check(parsed.is_some(), "editedBy", "must be one of manual, ai");
            parsed
        });

        let expiry_date = match self.expiry_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => {
                let parsed = parse_expiry_date(text, Utc::now());
                errors.check(parsed.is_some(), "expiryDate", "must be a valid date");
                parsed
            }
        };

        match (quantity, edited_by) {
            (Some(quantity), Some(edited_by)) if errors.is_empty() => Ok(NewBatch {
                quantity,
                expiry_date,
                edited_by,
            }),
            _ => Err(errors),
        }
    }
}

/// The product, if it exists and belongs to the caller's warehouse.
fn find_visible_product(
    store: &GuardedInventoryStore,
    session: &Session,
    product_id: i64,
) -> Result<Product, ApiError> {
    store
        .get_product(product_id)?
        .filter(|product| product.warehouse_id == session.warehouse_id)
        .ok_or_else(|| ApiError::NotFound("product not found".to_string()))
}

pub async fn post_product(
    session: Session,
    State(store): State<GuardedInventoryStore>,
    Json(body): Json<CreateProductBody>,
) -> Result<impl IntoResponse, ApiError> {
    let new_product = body.validate(&session)?;
    let product = store.create_product(&new_product)?;
    info!(
        "User {} created product {} ({})",
        session.user_id, product.sku, product.id
    );
    Ok(Json(json!({ "message": "Product created successfully" })))
}

pub async fn get_products(
    session: Session,
    State(store): State<GuardedInventoryStore>,
) -> Result<impl IntoResponse, ApiError> {
    let products = store.list_products(session.warehouse_id)?;
    Ok(Json(json!({ "data": products })))
}

pub async fn get_products_with_quantity(
    session: Session,
    State(store): State<GuardedInventoryStore>,
) -> Result<impl IntoResponse, ApiError> {
    let products = store.list_products_with_quantity(session.warehouse_id)?;
    Ok(Json(json!({ "data": products })))
}

pub async fn get_product_batches(
    session: Session,
    State(store): State<GuardedInventoryStore>,
    Path(product_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let product = find_visible_product(&store, &session, product_id)?;
    let batches = store.get_batches(product.id)?;
    Ok(Json(json!({ "data": batches })))
}

pub async fn post_restock(
    session: Session,
    State(store): State<GuardedInventoryStore>,
    Path(product_id): Path<i64>,
    Json(body): Json<RestockBody>,
) -> Result<impl IntoResponse, ApiError> {
    let new_batch = body.validate()?;
    let product = find_visible_product(&store, &session, product_id)?;
    let batch = store.add_batch(product.id, &new_batch)?;
    info!(
        "User {} restocked {} with {} units (batch {})",
        session.user_id, product.sku, batch.quantity, batch.id
    );
    Ok(Json(json!({ "message": "Product restocked successfully" })))
}
