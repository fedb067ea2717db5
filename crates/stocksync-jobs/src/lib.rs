//! Stock sync orchestration.
//!
//! Sequences the ERP fetch and the shop-table reconciliation for the two
//! entry points the HTTP surface and the scheduler invoke: a full sync over
//! the ERP's positive-stock list, and a single-item sync that also walks the
//! item's option rows.
//!
//! Runs are stateless and idempotent at the record level; a failed run is
//! simply re-run later. Errors from the fetch or the store are propagated,
//! never swallowed.

use std::time::Duration;

use sqlx::PgPool;
use thiserror::Error;

use stocksync_db::{list_item_options, reconcile, DbError, UpdatedRow};
use stocksync_erp::{ErpClient, ErpError};

/// Errors surfaced by an orchestration run.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Erp(#[from] ErpError),
    #[error(transparent)]
    Db(#[from] DbError),
}

/// Syncs every positive-stock record the ERP reports.
///
/// The fetch happens first and aborts the run on failure, before any write.
/// Reconciliations then fan out concurrently; records address distinct keys,
/// so the store's row-level updates keep them independent. The run always
/// drains the full fan-out before surfacing a store error.
///
/// Returns the updated rows in the ERP's reporting order; records with no
/// matching row are omitted.
///
/// # Errors
///
/// - [`JobError::Erp`] if the list fetch fails (quota, no stock, transport).
/// - [`JobError::Db`] if any reconciliation fails.
pub async fn execute_all(pool: &PgPool, erp: &ErpClient) -> Result<Vec<UpdatedRow>, JobError> {
    tracing::info!(action = "execute_all", "starting stock sync");

    let records = erp.fetch_all().await?;
    tracing::info!(
        action = "execute_all",
        fetched = records.len(),
        "fetched positive stock records"
    );

    let results = futures::future::join_all(
        records
            .iter()
            .map(|record| reconcile::apply(pool, record)),
    )
    .await;

    let mut rows = Vec::with_capacity(results.len());
    for result in results {
        if let Some(row) = result? {
            rows.push(row);
        }
    }

    log_outcome("execute_all", &rows);
    Ok(rows)
}

/// Syncs a single item and each of its option rows.
///
/// The item itself is reconciled first when the ERP reports positive stock
/// for it. The item's known options are then walked strictly one at a time,
/// pausing before each option fetch to keep the call rate against the remote
/// API low. Options whose fetched stock is absent or non-positive are
/// skipped.
///
/// Returns the reconciled rows: item first, then options in lookup order.
///
/// # Errors
///
/// - [`JobError::Erp`] if any fetch fails.
/// - [`JobError::Db`] if the option lookup or a reconciliation fails.
pub async fn execute_one(
    pool: &PgPool,
    erp: &ErpClient,
    item_id: &str,
    inter_request_delay: Duration,
) -> Result<Vec<UpdatedRow>, JobError> {
    tracing::info!(action = "execute_one", item_id, "starting stock sync");

    let mut rows = Vec::new();

    if let Some(record) = erp.fetch_one(item_id).await? {
        if let Some(row) = reconcile::apply(pool, &record).await? {
            rows.push(row);
        }
    }

    let options = list_item_options(pool, item_id).await?;
    for option in &options {
        if !inter_request_delay.is_zero() {
            tokio::time::sleep(inter_request_delay).await;
        }

        let Some(record) = erp.fetch_one(&option.id).await? else {
            continue;
        };
        if let Some(row) = reconcile::apply(pool, &record).await? {
            rows.push(row);
        }
    }

    log_outcome("execute_one", &rows);
    Ok(rows)
}

/// Structured success checkpoint: action, row count, and the serialized rows
/// for operational traceability of what a run actually wrote.
fn log_outcome(action: &str, rows: &[UpdatedRow]) {
    match serde_json::to_string(rows) {
        Ok(serialized) => {
            tracing::info!(action, updated = rows.len(), rows = %serialized, "stock sync finished");
        }
        Err(e) => {
            tracing::warn!(action, error = %e, "updated rows could not be serialized for logging");
        }
    }
}
