//! Route handlers.
//!
//! The parse → render pipeline and all file access are synchronous and run
//! on tokio's blocking pool. Failures surface as [`ApiError`], rendered as
//! `{"error": "..."}` with a matching status code.

use super::AppState;
use super::page;
use crate::artifacts::{self, Artifact, ArtifactError};
use crate::naming;
use crate::parse::parse_bytes;
use crate::render::{self, Edition};
use crate::types::Stats;
use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use chrono::Local;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge("File too large".to_string())
        } else {
            Self::BadRequest(format!("Invalid upload: {}", err.body_text()))
        }
    }
}

impl From<ArtifactError> for ApiError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::NotFound(_) => Self::NotFound("File not found".to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(format!("IO error: {err}"))
    }
}

/// Run synchronous work on the blocking pool.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("worker failed: {e}")))?
}

fn download_url(filename: &str) -> String {
    format!("/download/{filename}")
}

fn preview_url(filename: &str) -> String {
    format!("/preview/{filename}")
}

// ============================================================================
// Upload
// ============================================================================

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub output_file: String,
    pub stats: Stats,
    pub download_url: String,
    pub preview_url: String,
}

struct Upload {
    filename: String,
    bytes: Bytes,
    date: Option<String>,
}

pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut date = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("excel_file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                file = Some((filename, field.bytes().await?));
            }
            Some("newsletter_date") => date = Some(field.text().await?),
            _ => {}
        }
    }

    let (filename, bytes) = file.ok_or_else(|| ApiError::BadRequest("No file provided".into()))?;
    if filename.is_empty() {
        return Err(ApiError::BadRequest("No file selected".into()));
    }
    if !naming::allowed_file(&filename) {
        return Err(ApiError::BadRequest(
            "File type not allowed. Use .xls or .xlsx".into(),
        ));
    }

    let upload = Upload {
        filename,
        bytes,
        date,
    };
    let response = blocking(move || generate(&state, upload)).await?;
    Ok(Json(response))
}

/// Keep the upload, parse it, render it, and write the newsletter.
fn generate(state: &AppState, upload: Upload) -> Result<UploadResponse, ApiError> {
    let config = &state.config;
    let now = Local::now().naive_local();
    let stamp = naming::stamp(now);

    let kept = artifacts::write_new(
        &config.server.upload_dir,
        &naming::upload_filename(&stamp, &upload.filename),
        &upload.bytes,
    )?;
    tracing::info!(file = %kept, bytes = upload.bytes.len(), "upload saved");

    let resources = parse_bytes(&upload.bytes, &config.defaults)
        .map_err(|e| ApiError::BadRequest(format!("Unable to read the spreadsheet: {e}")))?;
    if resources.is_empty() {
        return Err(ApiError::BadRequest(
            "No resources found in the spreadsheet".into(),
        ));
    }

    let edition = Edition::new(upload.date.as_deref(), now, state.renderer.locale());
    let html = state.renderer.render(&resources, &edition);
    let output_file = artifacts::write_new(
        &config.server.output_dir,
        &naming::newsletter_filename(&stamp),
        html.as_bytes(),
    )?;

    let stats = render::stats(&resources);
    tracing::info!(
        output = %output_file,
        resources = stats.total,
        date = %edition.date,
        "newsletter generated"
    );

    Ok(UploadResponse {
        success: true,
        message: "Newsletter generated successfully!".to_string(),
        download_url: download_url(&output_file),
        preview_url: preview_url(&output_file),
        output_file,
        stats,
    })
}

// ============================================================================
// Artifacts
// ============================================================================

pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    let output_dir = state.config.server.output_dir.clone();
    let name = filename.clone();
    let archive = blocking(move || Ok(artifacts::zip(&output_dir, &name)?)).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        naming::zip_filename(&filename)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        archive,
    )
        .into_response())
}

pub async fn preview(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Html<String>, ApiError> {
    let output_dir = state.config.server.output_dir.clone();
    let html = blocking(move || Ok(artifacts::read(&output_dir, &filename)?)).await?;
    Ok(Html(html))
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub filename: String,
    pub size: u64,
    /// `dd/mm/YYYY HH:MM`, local time.
    pub created: String,
    pub download_url: String,
    pub preview_url: String,
}

impl From<Artifact> for HistoryEntry {
    fn from(artifact: Artifact) -> Self {
        Self {
            download_url: download_url(&artifact.filename),
            preview_url: preview_url(&artifact.filename),
            created: artifact.created.format("%d/%m/%Y %H:%M").to_string(),
            size: artifact.size,
            filename: artifact.filename,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub files: Vec<HistoryEntry>,
}

pub async fn history(State(state): State<AppState>) -> Result<Json<HistoryResponse>, ApiError> {
    let output_dir = state.config.server.output_dir.clone();
    let listed = blocking(move || Ok(artifacts::list(&output_dir)?)).await?;
    Ok(Json(HistoryResponse {
        files: listed.into_iter().map(HistoryEntry::from).collect(),
    }))
}

// ============================================================================
// Pages
// ============================================================================

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::index(&state.config).into_string())
}

pub async fn health() -> &'static str {
    "ok"
}
