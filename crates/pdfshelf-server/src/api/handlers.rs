//! Route handlers.
//!
//! Every handler answers with the `{"ok": ...}` envelope. Disk and PDF work
//! runs on the blocking pool through [`run_blocking`].

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::extract::multipart::MultipartRejection;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use pdfshelf::Shelf;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::info;

use super::AppState;
use super::error::ApiError;
use super::extract::LenientJson;

const INDEX_HTML: &str = include_str!("../../static/index.html");

type ApiResult<T> = Result<T, ApiError>;

/// Run a shelf operation on the blocking pool.
async fn run_blocking<T, F>(shelf: &Arc<Shelf>, op: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Shelf) -> pdfshelf::Result<T> + Send + 'static,
{
    let shelf = Arc::clone(shelf);
    let result = tokio::task::spawn_blocking(move || op(&shelf)).await?;
    Ok(result?)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({
        "ok": true,
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// GET /api/files
pub async fn list_files(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let files = run_blocking(&state.shelf, |shelf| shelf.list()).await?;
    Ok(Json(json!({"ok": true, "files": files})))
}

// GET /files/{name}
pub async fn download(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let lookup = name.clone();
    let path = run_blocking(&state.shelf, move |shelf| shelf.locate(&lookup))
        .await
        .map_err(|_| ApiError::not_found("File not found"))?;

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| ApiError::not_found("File not found"))?;
    let length = file
        .metadata()
        .await
        .map_err(|_| ApiError::not_found("File not found"))?
        .len();

    let disposition = format!("attachment; filename=\"{}\"", name.replace('"', ""));
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_LENGTH, length.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(ReaderStream::new(file)),
    ))
}

// POST /api/upload
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Value>> {
    let mut multipart = multipart.map_err(|_| ApiError::bad_request("No files part"))?;

    let mut files = Vec::new();
    let mut saw_files_part = false;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        if !matches!(field.name(), Some("files" | "files[]")) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        saw_files_part = true;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
        files.push((file_name, bytes.to_vec()));
    }

    if !saw_files_part {
        return Err(ApiError::bad_request("No files part"));
    }

    let received = files.len();
    let saved = run_blocking(&state.shelf, move |shelf| shelf.upload(files)).await?;
    info!(received, saved = saved.len(), "upload finished");
    Ok(Json(json!({"ok": true, "saved": saved})))
}

// POST /api/update
pub async fn update(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Value>> {
    let mut multipart = multipart.map_err(|_| ApiError::bad_request("Missing filename"))?;

    let mut existing: Option<String> = None;
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("filename") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
                existing = Some(text);
            }
            Some("file") => {
                let Some(file_name) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
                upload = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let existing = non_empty(existing).ok_or_else(|| ApiError::bad_request("Missing filename"))?;
    let (incoming, bytes) = upload.ok_or_else(|| ApiError::bad_request("Missing file"))?;

    let name = existing.clone();
    run_blocking(&state.shelf, move |shelf| shelf.replace(&name, &incoming, &bytes)).await?;
    Ok(Json(json!({"ok": true, "replaced": existing})))
}

#[derive(Debug, Default, Deserialize)]
pub struct RenameRequest {
    old_name: Option<String>,
    new_name: Option<String>,
}

// POST /api/rename
pub async fn rename(
    State(state): State<AppState>,
    LenientJson(req): LenientJson<RenameRequest>,
) -> ApiResult<Json<Value>> {
    let (Some(old), Some(new)) = (non_empty(req.old_name), non_empty(req.new_name)) else {
        return Err(ApiError::bad_request("old_name/new_name required"));
    };

    let from = old.clone();
    let to = run_blocking(&state.shelf, move |shelf| shelf.rename(&old, &new)).await?;
    Ok(Json(json!({"ok": true, "renamed": {"from": from, "to": to}})))
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteRequest {
    name: Option<String>,
}

// POST /api/delete
pub async fn delete(
    State(state): State<AppState>,
    LenientJson(req): LenientJson<DeleteRequest>,
) -> ApiResult<Json<Value>> {
    let name = non_empty(req.name).ok_or_else(|| ApiError::bad_request("name required"))?;

    let target = name.clone();
    run_blocking(&state.shelf, move |shelf| shelf.delete(&target)).await?;
    Ok(Json(json!({"ok": true, "deleted": name})))
}

#[derive(Debug, Default, Deserialize)]
pub struct MergeRequest {
    #[serde(default)]
    files: Vec<String>,
    output_name: Option<String>,
}

// POST /api/merge
pub async fn merge(
    State(state): State<AppState>,
    LenientJson(req): LenientJson<MergeRequest>,
) -> ApiResult<Json<Value>> {
    if req.files.is_empty() {
        return Err(ApiError::bad_request("No files selected"));
    }

    let merged = run_blocking(&state.shelf, move |shelf| {
        shelf.merge(&req.files, req.output_name.as_deref())
    })
    .await?;
    Ok(Json(json!({"ok": true, "merged": merged})))
}

#[derive(Debug, Default, Deserialize)]
pub struct OrganizeRequest {
    mode: Option<String>,
    map: Option<BTreeMap<String, String>>,
}

// POST /api/organize
pub async fn organize(
    State(state): State<AppState>,
    LenientJson(req): LenientJson<OrganizeRequest>,
) -> ApiResult<Json<Value>> {
    let mode = non_empty(req.mode).ok_or_else(|| ApiError::bad_request("mode required"))?;

    match mode.as_str() {
        "keyword" => {
            let map = req
                .map
                .filter(|map| !map.is_empty())
                .ok_or_else(|| ApiError::bad_request("map required for keyword mode"))?;
            let result = run_blocking(&state.shelf, move |shelf| shelf.organize_keywords(&map)).await?;
            Ok(Json(json!({"ok": true, "result": result})))
        }
        "year" => {
            let placed = run_blocking(&state.shelf, |shelf| shelf.organize_by_year()).await?;
            Ok(Json(json!({
                "ok": true,
                "message": "Organized by year",
                "placed": placed,
            })))
        }
        _ => Err(ApiError::bad_request("Invalid mode")),
    }
}
