//! Database operations for the `g5_shop_item` table.
//!
//! Items are provisioned by the storefront; this service only rewrites
//! quantities on rows that already exist.

use serde::Serialize;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `g5_shop_item` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ItemRow {
    pub id: String,
    pub quantity: i64,
}

/// Sets an item's stock quantity and returns the updated row.
///
/// Returns `Ok(None)` when no row matches the code; a code the storefront
/// never registered is a valid terminal state, not an error.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn update_item_quantity(
    pool: &PgPool,
    id: &str,
    quantity: i64,
) -> Result<Option<ItemRow>, DbError> {
    let row = sqlx::query_as::<_, ItemRow>(
        "UPDATE g5_shop_item \
         SET it_stock_qty = $2 \
         WHERE it_id = $1 \
         RETURNING it_id AS id, it_stock_qty AS quantity",
    )
    .bind(id)
    .bind(quantity)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
