//! Query and aggregate handlers
//!
//! Read-only views over the collection: name search, field sort, and the
//! average/median aggregates.

use crate::error::AppError;
use crate::services::collection;
use crate::state::{AppState, Collection};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Serialize;
use serde_json::Value;

/// Query string of `GET /search`
#[derive(Debug, Default)]
pub struct SearchParams {
    /// Substring to look for in `name`; missing means the empty string
    pub q: Option<String>,
}

impl SearchParams {
    /// Collect `q` from raw query pairs.
    ///
    /// A repeated `q` is joined with `,` (`?q=A&q=l` searches for `A,l`).
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let values: Vec<String> = pairs
            .into_iter()
            .filter(|(key, _)| key == "q")
            .map(|(_, value)| value)
            .collect();
        let q = if values.is_empty() {
            None
        } else {
            Some(values.join(","))
        };
        Self { q }
    }
}

/// Response of `GET /average/:field`
#[derive(Debug, Serialize)]
pub struct AverageResponse {
    /// Field that was averaged
    pub field: String,
    /// Mean of the numeric values, `null` when there were none
    pub average: Value,
}

/// Response of `GET /median/:field`
#[derive(Debug, Serialize)]
pub struct MedianResponse {
    /// Field whose median was taken
    pub field: String,
    /// Median of the numeric values, `null` when there were none
    pub median: Value,
}

/// GET /search?q= - Records whose name contains the query
pub async fn search_records(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Collection>, AppError> {
    let records = state.store().load().await?;
    let query = SearchParams::from_pairs(pairs).q.unwrap_or_default();
    Ok(Json(collection::search_by_name(records, &query)))
}

/// GET /sort/:field - Records sorted ascending by a field
pub async fn sort_records(
    State(state): State<AppState>,
    Path(field): Path<String>,
) -> Result<Json<Collection>, AppError> {
    let records = state.store().load().await?;
    Ok(Json(collection::sort_by_field(records, &field)))
}

/// GET /average/:field - Mean of a numeric field
pub async fn average_field(
    State(state): State<AppState>,
    Path(field): Path<String>,
) -> Result<Json<AverageResponse>, AppError> {
    let records = state.store().load().await?;
    let values = collection::numeric_values(&records, &field);
    let average = collection::aggregate_value(collection::average(&values));

    Ok(Json(AverageResponse { field, average }))
}

/// GET /median/:field - Median of a numeric field
pub async fn median_field(
    State(state): State<AppState>,
    Path(field): Path<String>,
) -> Result<Json<MedianResponse>, AppError> {
    let records = state.store().load().await?;
    let values = collection::numeric_values(&records, &field);
    let median = collection::aggregate_value(collection::median(values));

    Ok(Json(MedianResponse { field, median }))
}
