//! Stock records and product-code classification.
//!
//! The ERP reports stock for both top-level items and their options through a
//! single flat code space. Item codes are fixed-width; option codes append an
//! option suffix to the owning item's code, so anything longer than the item
//! width addresses an option. [`CodeKind::parse`] is the only place that rule
//! lives.

use serde::{Deserialize, Serialize};

/// Fixed width of a top-level item code in the ERP's code space.
pub const ITEM_CODE_WIDTH: usize = 10;

/// A (product code, quantity) pair reported by the ERP for a base date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub code: String,
    pub quantity: i64,
}

/// Classification of a stock code into the table it addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeKind {
    /// The code addresses a top-level item row.
    Item(String),
    /// The code addresses an item-option row; `item_id` is the leading
    /// [`ITEM_CODE_WIDTH`]-character prefix and `option_id` the full code.
    ItemOption { item_id: String, option_id: String },
}

impl CodeKind {
    /// Classifies `code` by width: longer than [`ITEM_CODE_WIDTH`] means an
    /// option code, otherwise a plain item code.
    #[must_use]
    pub fn parse(code: &str) -> Self {
        if code.chars().count() > ITEM_CODE_WIDTH {
            let item_id = code.chars().take(ITEM_CODE_WIDTH).collect();
            CodeKind::ItemOption {
                item_id,
                option_id: code.to_owned(),
            }
        } else {
            CodeKind::Item(code.to_owned())
        }
    }
}
