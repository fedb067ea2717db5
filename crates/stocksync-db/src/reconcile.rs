//! Routing of fetched stock records onto the shop tables.
//!
//! A stock code addresses either an item row or an item-option row; the
//! classification happens once, in [`stocksync_core::CodeKind::parse`], and
//! this module performs the matching conditional update.

use serde::Serialize;
use sqlx::PgPool;

use stocksync_core::{CodeKind, StockRecord};

use crate::item_options::{update_option_quantity, ItemOptionRow};
use crate::items::{update_item_quantity, ItemRow};
use crate::DbError;

/// A row updated by a reconciliation, from either shop table.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum UpdatedRow {
    Item(ItemRow),
    ItemOption(ItemOptionRow),
}

/// Applies a stock record to the table its code addresses.
///
/// Item codes update `g5_shop_item`; option codes update
/// `g5_shop_item_option`, scoped by the item code derived from the prefix.
/// Returns `Ok(None)` when no row matched; stock for codes the storefront
/// never registered is silently skipped.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the underlying update fails.
pub async fn apply(pool: &PgPool, record: &StockRecord) -> Result<Option<UpdatedRow>, DbError> {
    match CodeKind::parse(&record.code) {
        CodeKind::Item(id) => Ok(update_item_quantity(pool, &id, record.quantity)
            .await?
            .map(UpdatedRow::Item)),
        CodeKind::ItemOption { item_id, option_id } => {
            Ok(update_option_quantity(pool, &option_id, &item_id, record.quantity)
                .await?
                .map(UpdatedRow::ItemOption))
        }
    }
}
