//! Running generated batches against a database.
//!
//! Generation never touches a connection. This module is the seam where a
//! driver plugs in: implement [`BulkExecutor`] once and the `execute_bulk_*`
//! helpers run generated statements in order under an asupersync [`Cx`].

use asupersync::{Cx, Outcome};
use bulksql_core::Error;
use bulksql_query::GeneratedBatch;

/// A driver able to run one generated statement with its named parameters.
///
/// Implementations bind each entry of [`GeneratedBatch::params`] by name
/// (placeholders in the text are the name with a leading `@`) and return the
/// number of affected rows.
pub trait BulkExecutor: Send + Sync {
    /// Execute `batch` and return rows affected.
    fn execute(
        &self,
        cx: &Cx,
        batch: &GeneratedBatch,
    ) -> impl Future<Output = Outcome<u64, Error>> + Send;
}

/// Run every INSERT batch in order and return total rows affected.
///
/// Stops at the first batch that does not complete with `Ok`; earlier
/// batches are not rolled back.
#[tracing::instrument(level = "debug", skip_all, fields(batches = batches.len()))]
pub async fn execute_bulk_insert<E: BulkExecutor>(
    cx: &Cx,
    executor: &E,
    batches: &[GeneratedBatch],
) -> Outcome<u64, Error> {
    let mut total = 0_u64;
    for (index, batch) in batches.iter().enumerate() {
        match executor.execute(cx, batch).await {
            Outcome::Ok(count) => {
                tracing::debug!(batch = index, affected = count, "Insert batch executed");
                total = total.saturating_add(count);
            }
            Outcome::Err(e) => {
                tracing::debug!(batch = index, error = %e, "Insert batch failed");
                return Outcome::Err(e);
            }
            Outcome::Cancelled(r) => return Outcome::Cancelled(r),
            Outcome::Panicked(p) => return Outcome::Panicked(p),
        }
    }
    Outcome::Ok(total)
}

/// Run a generated UPDATE batch. An empty batch is skipped and reports 0.
#[tracing::instrument(level = "debug", skip_all, fields(rows = batch.row_count()))]
pub async fn execute_bulk_update<E: BulkExecutor>(
    cx: &Cx,
    executor: &E,
    batch: &GeneratedBatch,
) -> Outcome<u64, Error> {
    if batch.is_empty() {
        tracing::debug!("Skipping empty update");
        return Outcome::Ok(0);
    }
    executor.execute(cx, batch).await
}

/// Run a generated DELETE batch. A delete with no values is skipped and
/// reports 0, since `IN ()` is rejected by most engines.
#[tracing::instrument(level = "debug", skip_all, fields(values = batch.row_count()))]
pub async fn execute_bulk_delete<E: BulkExecutor>(
    cx: &Cx,
    executor: &E,
    batch: &GeneratedBatch,
) -> Outcome<u64, Error> {
    if batch.is_empty() {
        tracing::debug!("Skipping delete with no values");
        return Outcome::Ok(0);
    }
    executor.execute(cx, batch).await
}
