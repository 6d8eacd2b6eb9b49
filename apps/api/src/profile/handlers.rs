use std::collections::HashSet;

use axum::Json;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::normalize::layout::FlatFormLayout;
use crate::normalize::table::{add_row, extract_rows, remove_rows, stringify_cell, Row};
use crate::profile::builder::{build_from_flat, build_profile};
use crate::profile::loader::{load_from_bytes, load_from_external};
use crate::profile::merge::merge_revision;
use crate::profile::models::{CanonicalRecord, FlatFormValues, ProfileForm};

#[derive(Deserialize)]
pub struct MergeRequest {
    pub original: CanonicalRecord,
    #[serde(default)]
    pub proposed: Value,
}

#[derive(Deserialize)]
pub struct AddRowRequest {
    #[serde(default)]
    pub table: Value,
    #[serde(default)]
    pub row: Vec<Value>,
}

#[derive(Deserialize)]
pub struct RemoveRowsRequest {
    #[serde(default)]
    pub table: Value,
    #[serde(default)]
    pub indices: Vec<usize>,
}

/// GET /api/v1/profile/layout
pub async fn handle_layout() -> Json<&'static FlatFormLayout> {
    Json(FlatFormLayout::current())
}

/// POST /api/v1/profile/load
pub async fn handle_load(Json(document): Json<Value>) -> Json<FlatFormValues> {
    Json(load_from_external(&document))
}

/// POST /api/v1/profile/import
/// Body is the raw uploaded file; its encoding is detected.
pub async fn handle_import(body: Bytes) -> Result<Json<FlatFormValues>, AppError> {
    let values = load_from_bytes(&body)?;
    info!(bytes = body.len(), "imported profile document");
    Ok(Json(values))
}

/// POST /api/v1/profile/build
pub async fn handle_build(Json(form): Json<ProfileForm>) -> Json<CanonicalRecord> {
    Json(build_profile(&form))
}

/// POST /api/v1/profile/build-flat
pub async fn handle_build_flat(
    Json(slots): Json<Vec<Value>>,
) -> Result<Json<CanonicalRecord>, AppError> {
    let values = FlatFormValues::from_slots(slots)?;
    Ok(Json(build_from_flat(&values)))
}

/// POST /api/v1/profile/merge
pub async fn handle_merge(Json(req): Json<MergeRequest>) -> Json<CanonicalRecord> {
    Json(merge_revision(&req.original, &req.proposed))
}

/// POST /api/v1/tables/add-row
pub async fn handle_add_row(Json(req): Json<AddRowRequest>) -> Json<Vec<Row>> {
    let row: Row = req.row.iter().map(stringify_cell).collect();
    Json(add_row(row, &req.table))
}

/// POST /api/v1/tables/remove-rows
pub async fn handle_remove_rows(Json(req): Json<RemoveRowsRequest>) -> Json<Vec<Row>> {
    let indices: HashSet<usize> = req.indices.into_iter().collect();
    Json(remove_rows(&extract_rows(&req.table), &indices))
}
