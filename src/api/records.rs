//! Record CRUD handlers
//!
//! Every handler loads the whole collection from the store. Mutating
//! handlers write the whole collection back before answering.

use super::utils::RecordBody;
use crate::error::{AppError, WriteOp};
use crate::services::collection;
use crate::state::{AppState, Collection, Record};
use axum::{
    extract::{Path, State},
    response::Json,
};
use tracing::info;

/// Body returned by a successful `POST /data`
pub const SAVED_MESSAGE: &str = "Data saved successfully";
/// Body returned by a successful `PUT /data/:id`
pub const UPDATED_MESSAGE: &str = "Data updated successfully";
/// Body returned by a successful `DELETE /data/:id`
pub const DELETED_MESSAGE: &str = "Data deleted successfully";

/// GET /data - List all records in stored order
pub async fn list_records(State(state): State<AppState>) -> Result<Json<Collection>, AppError> {
    let records = state.store().load().await?;
    Ok(Json(records))
}

/// GET /data/:id - Get the first record with the given id
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record>, AppError> {
    let records = state.store().load().await?;
    let record = collection::find_by_id(&records, &id)
        .cloned()
        .ok_or(AppError::ItemNotFound(id))?;

    Ok(Json(record))
}

/// POST /data - Append a record
///
/// The body is stored as given: no shape check, no duplicate-id check.
pub async fn create_record(
    State(state): State<AppState>,
    RecordBody(record): RecordBody,
) -> Result<&'static str, AppError> {
    let _guard = state.write_guard().await;

    let mut records = state.store().load().await?;
    records.push(record);
    state
        .store()
        .save(&records)
        .await
        .map_err(|e| AppError::write(WriteOp::Create, e))?;

    info!(count = records.len(), "Record appended");
    Ok(SAVED_MESSAGE)
}

/// PUT /data/:id - Replace the first record with the given id
///
/// The replacement keeps the old record's position. Its own `id` is not
/// forced to match the path.
pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RecordBody(record): RecordBody,
) -> Result<&'static str, AppError> {
    let _guard = state.write_guard().await;

    let mut records = state.store().load().await?;
    if !collection::replace_by_id(&mut records, &id, record) {
        return Err(AppError::ItemNotFound(id));
    }
    state
        .store()
        .save(&records)
        .await
        .map_err(|e| AppError::write(WriteOp::Update, e))?;

    info!(id = %id, "Record replaced");
    Ok(UPDATED_MESSAGE)
}

/// DELETE /data/:id - Remove every record with the given id
///
/// Succeeds even when nothing matched; the collection is written either way.
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<&'static str, AppError> {
    let _guard = state.write_guard().await;

    let mut records = state.store().load().await?;
    let removed = collection::remove_by_id(&mut records, &id);
    state
        .store()
        .save(&records)
        .await
        .map_err(|e| AppError::write(WriteOp::Delete, e))?;

    info!(id = %id, removed, "Records removed");
    Ok(DELETED_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStore;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn collection(value: Value) -> Collection {
        serde_json::from_value(value).unwrap()
    }

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    fn seeded() -> Collection {
        collection(json!([
            {"id": "1", "name": "Alice", "age": 30},
            {"id": "2", "name": "Bob", "age": 40}
        ]))
    }

    fn create_test_state(store: Arc<MemoryStore>) -> AppState {
        AppState::new(store)
    }

    #[tokio::test]
    async fn test_list_records() {
        let store = Arc::new(MemoryStore::new(seeded()));
        let Json(records) = list_records(State(create_test_state(store))).await.unwrap();
        assert_eq!(records, seeded());
    }

    #[tokio::test]
    async fn test_get_record_not_found() {
        let store = Arc::new(MemoryStore::new(seeded()));
        let result = get_record(State(create_test_state(store)), Path("9".to_string())).await;
        match result {
            Err(AppError::ItemNotFound(id)) => assert_eq!(id, "9"),
            other => panic!("Expected ItemNotFound error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_record_appends() {
        let store = Arc::new(MemoryStore::new(seeded()));
        let state = create_test_state(store.clone());

        let body = record(json!({"id": "3", "name": "Carol"}));
        let message = create_record(State(state), RecordBody(body.clone()))
            .await
            .unwrap();

        assert_eq!(message, SAVED_MESSAGE);
        let stored = store.snapshot().await;
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[2], body);
    }

    #[tokio::test]
    async fn test_update_record_missing_leaves_store() {
        let store = Arc::new(MemoryStore::new(seeded()));
        let state = create_test_state(store.clone());

        let result = update_record(
            State(state),
            Path("404".to_string()),
            RecordBody(record(json!({"id": "404"}))),
        )
        .await;

        assert!(matches!(result, Err(AppError::ItemNotFound(_))));
        assert_eq!(store.snapshot().await, seeded());
    }

    #[tokio::test]
    async fn test_update_record_replaces_in_place() {
        let store = Arc::new(MemoryStore::new(seeded()));
        let state = create_test_state(store.clone());

        let replacement = record(json!({"id": "one", "name": "Alicia"}));
        update_record(
            State(state),
            Path("1".to_string()),
            RecordBody(replacement.clone()),
        )
        .await
        .unwrap();

        let stored = store.snapshot().await;
        assert_eq!(stored[0], replacement);
        assert_eq!(stored[1]["id"], "2");
    }

    #[tokio::test]
    async fn test_delete_record_without_match_still_succeeds() {
        let store = Arc::new(MemoryStore::new(seeded()));
        let state = create_test_state(store.clone());

        let message = delete_record(State(state), Path("nope".to_string()))
            .await
            .unwrap();
        assert_eq!(message, DELETED_MESSAGE);
        assert_eq!(store.snapshot().await, seeded());
    }

    #[tokio::test]
    async fn test_write_failure_reports_operation() {
        let state = AppState::new(MemoryStore::new(seeded()).with_failing_writes());

        let result = delete_record(State(state), Path("1".to_string())).await;
        match result {
            Err(AppError::WriteFailed { op, .. }) => assert_eq!(op, WriteOp::Delete),
            other => panic!("Expected WriteFailed error, got: {:?}", other),
        }
    }
}
