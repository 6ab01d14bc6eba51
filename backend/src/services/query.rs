use sqlx::Executor;

use crate::{
    db::{
        connection::{GuestPool, RolePool},
        rows::rows_to_json,
    },
    error::{database_message, AppError},
    models::QueryOutcome,
};

/// Runs caller-supplied SQL under the guest role.
///
/// The text is sent unprepared and unmodified. Statement errors become a
/// failed [`QueryOutcome`]; only a failed checkout is returned as `Err`.
pub async fn run_query(pool: &GuestPool, sql: &str) -> Result<QueryOutcome, AppError> {
    let mut conn = pool.acquire().await?;

    let outcome = match conn.fetch_all(sqlx::raw_sql(sql)).await {
        Ok(rows) => match rows_to_json(&rows) {
            Ok(data) => QueryOutcome::rows(data),
            Err(err) => QueryOutcome::failed(database_message(&err)),
        },
        Err(err) => QueryOutcome::failed(database_message(&err)),
    };

    match &outcome {
        QueryOutcome::Rows { row_count, .. } => {
            tracing::debug!(row_count, "Guest query succeeded");
        }
        QueryOutcome::Failed { error, .. } => {
            tracing::warn!(error = %error, "Guest query failed");
        }
    }

    Ok(outcome)
}
