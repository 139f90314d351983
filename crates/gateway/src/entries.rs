//! `/entries` and `/search` handlers.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use metodo_core::entry::{CreatedEntry, Entry, EntryPatch, NewEntry};
use metodo_library::MAX_LIMIT;
use serde::{Deserialize, Serialize};

use crate::SharedState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub tipo: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct EntryList {
    pub count: usize,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub results: Vec<Entry>,
}

#[derive(Debug, Serialize)]
pub struct Updated {
    pub id: String,
    pub updated: bool,
}

#[derive(Debug, Serialize)]
pub struct Archived {
    pub id: String,
    pub archived: bool,
}

pub async fn list_entries(
    State(state): State<SharedState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<EntryList>, ApiError> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(MAX_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {MAX_LIMIT}"
        )));
    }

    let entries = state
        .repository
        .list(params.tipo.as_deref(), limit)
        .await?;
    Ok(Json(EntryList {
        count: entries.len(),
        entries,
    }))
}

pub async fn get_entry(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Entry>, ApiError> {
    Ok(Json(state.repository.get(&id).await?))
}

pub async fn create_entry(
    State(state): State<SharedState>,
    body: Result<Json<NewEntry>, JsonRejection>,
) -> Result<Json<CreatedEntry>, ApiError> {
    let Json(entry) = body?;
    Ok(Json(state.repository.create(entry).await?))
}

pub async fn update_entry(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<EntryPatch>, JsonRejection>,
) -> Result<Json<Updated>, ApiError> {
    let Json(patch) = body?;
    state.repository.update(&id, patch).await?;
    Ok(Json(Updated { id, updated: true }))
}

pub async fn delete_entry(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Archived>, ApiError> {
    state.repository.archive(&id).await?;
    Ok(Json(Archived { id, archived: true }))
}

pub async fn search(
    State(state): State<SharedState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResults>, ApiError> {
    let Query(params) = params?;
    let q = params
        .q
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("q must be a non-empty string".into()))?;

    let results = state.repository.search(&q).await?;
    Ok(Json(SearchResults {
        count: results.len(),
        results,
    }))
}
