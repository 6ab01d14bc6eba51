//! Result envelopes returned by the database operations and serialized
//! verbatim into response bodies.

use serde::Serialize;

use crate::db::rows::JsonRow;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub success: bool,
    pub rows_inserted: usize,
}

impl InsertOutcome {
    pub fn inserted(rows_inserted: usize) -> Self {
        Self {
            success: true,
            rows_inserted,
        }
    }
}

/// Outcome of a caller-supplied query. Statement errors are reported here
/// rather than as an HTTP error, so callers must inspect `success`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryOutcome {
    Rows {
        success: bool,
        data: Vec<JsonRow>,
        #[serde(rename = "rowCount")]
        row_count: usize,
    },
    Failed {
        success: bool,
        error: String,
    },
}

impl QueryOutcome {
    pub fn rows(data: Vec<JsonRow>) -> Self {
        QueryOutcome::Rows {
            success: true,
            row_count: data.len(),
            data,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        QueryOutcome::Failed {
            success: false,
            error: error.into(),
        }
    }
}
