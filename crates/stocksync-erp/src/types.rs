//! ERP API wire types.
//!
//! The ERP wraps every response in a `Data`/`Error` envelope with
//! SCREAMING_SNAKE field names. These types decode only the fields this
//! service consumes; everything else in the payload is ignored.

use serde::Deserialize;

use stocksync_core::StockRecord;

/// Login response: `{"Data": {"Datas": {"SESSION_ID": "..."}}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginEnvelope {
    #[serde(rename = "Data")]
    pub data: LoginData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginData {
    #[serde(rename = "Datas")]
    pub datas: LoginDatas,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginDatas {
    #[serde(rename = "SESSION_ID")]
    pub session_id: String,
}

/// Inventory response envelope. A quota-exceeded condition arrives as an
/// `Error.Message` inside a 200-status body, alongside or instead of `Data`.
#[derive(Debug, Deserialize)]
pub(crate) struct InventoryEnvelope {
    #[serde(rename = "Error", default)]
    pub error: Option<InventoryError>,
    #[serde(rename = "Data", default)]
    pub data: Option<InventoryData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InventoryError {
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

/// `Result` is kept as a raw value: an absent or non-array value is a
/// "no stock registered" condition, not a decode failure.
#[derive(Debug, Deserialize)]
pub(crate) struct InventoryData {
    #[serde(rename = "Result", default)]
    pub result: Option<serde_json::Value>,
}

/// A single inventory balance entry.
#[derive(Debug, Deserialize)]
pub(crate) struct RawStockEntry {
    #[serde(rename = "PROD_CD")]
    pub product_code: String,
    /// The ERP reports balances as decimal numbers even for unit-counted
    /// goods; quantities are whole units locally.
    #[serde(rename = "BAL_QTY")]
    pub balance_quantity: f64,
}

impl From<RawStockEntry> for StockRecord {
    #[allow(clippy::cast_possible_truncation)]
    fn from(entry: RawStockEntry) -> Self {
        StockRecord {
            code: entry.product_code,
            quantity: entry.balance_quantity as i64,
        }
    }
}
