use axum::{extract::State, http::Uri, Json};
use percent_encoding::percent_decode_str;

use crate::{error::AppError, models::QueryOutcome, services::query::run_query, state::AppState};

const SQL_SEGMENT: &str = "/sql/";

/// `GET /api/v1/sql/<url-encoded SQL>`
pub async fn execute_sql(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<QueryOutcome>, AppError> {
    let sql = extract_sql_text(uri.path())?;
    tracing::debug!(sql = %sql, "Running guest query");
    let outcome = run_query(state.guest_pool(), &sql).await?;
    Ok(Json(outcome))
}

/// Percent-decodes everything after the first `/sql/` in `path`.
///
/// `+` is left as is. A `%` not followed by two hex digits, or bytes that do
/// not form UTF-8, are rejected.
pub fn extract_sql_text(path: &str) -> Result<String, AppError> {
    let encoded = path
        .split_once(SQL_SEGMENT)
        .map(|(_, rest)| rest)
        .ok_or_else(|| AppError::MalformedPath(format!("path has no {SQL_SEGMENT} segment")))?;

    if has_bad_escape(encoded) {
        return Err(AppError::MalformedPath("URI malformed".to_string()));
    }

    percent_decode_str(encoded)
        .decode_utf8()
        .map(|text| text.into_owned())
        .map_err(|_| AppError::MalformedPath("URI malformed".to_string()))
}

fn has_bad_escape(encoded: &str) -> bool {
    let bytes = encoded.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}
