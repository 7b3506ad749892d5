use crate::sqlite_column;
use crate::sqlite_persistence::{
    ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP,
};

pub const PRODUCT_TABLE_V_0: Table = Table {
    name: "product",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("sku", &SqlType::Text, non_null = true, is_unique = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("restock_level", &SqlType::Integer),
        sqlite_column!("warehouse_id", &SqlType::Integer, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_product_warehouse", "warehouse_id")],
};

const PRODUCT_FK: ForeignKey = ForeignKey {
    foreign_table: "product",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

/// `expiry_date` holds unix seconds, NULL for non-perishable stock.
pub const PRODUCT_BATCH_TABLE_V_0: Table = Table {
    name: "product_batch",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "product_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&PRODUCT_FK)
        ),
        sqlite_column!("quantity", &SqlType::Integer, non_null = true),
        sqlite_column!("expiry_date", &SqlType::Integer),
        sqlite_column!("edited_by", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created",
            &SqlType::Integer,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_product_batch_product", "product_id")],
};

pub const INVENTORY_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[PRODUCT_TABLE_V_0, PRODUCT_BATCH_TABLE_V_0],
    migration: None,
}];
