//! Database operations for the `g5_shop_item_option` table.

use serde::Serialize;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `g5_shop_item_option` table. `id` is the full option code;
/// `item_id` the owning item's code.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ItemOptionRow {
    pub id: String,
    pub item_id: String,
    pub quantity: i64,
}

/// Sets an option's stock quantity and returns the updated row.
///
/// The match is scoped by both the option code and the derived item code, so
/// an option code whose prefix disagrees with its stored owner never updates.
/// Returns `Ok(None)` when no row matches.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn update_option_quantity(
    pool: &PgPool,
    option_id: &str,
    item_id: &str,
    quantity: i64,
) -> Result<Option<ItemOptionRow>, DbError> {
    let row = sqlx::query_as::<_, ItemOptionRow>(
        "UPDATE g5_shop_item_option \
         SET io_stock_qty = $3 \
         WHERE io_no = $1 AND it_id = $2 \
         RETURNING io_no AS id, it_id AS item_id, io_stock_qty AS quantity",
    )
    .bind(option_id)
    .bind(item_id)
    .bind(quantity)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Lists an item's option rows, ordered by option code so per-option sync
/// passes iterate deterministically.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_item_options(
    pool: &PgPool,
    item_id: &str,
) -> Result<Vec<ItemOptionRow>, DbError> {
    let rows = sqlx::query_as::<_, ItemOptionRow>(
        "SELECT io_no AS id, it_id AS item_id, io_stock_qty AS quantity \
         FROM g5_shop_item_option \
         WHERE it_id = $1 \
         ORDER BY io_no",
    )
    .bind(item_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
