//! HTTP request handlers
//!
//! Upload handlers stream the multipart payload to a staging temp file
//! in bounded chunks rather than buffering it in memory; the staging
//! file is removed when the handler returns. Lifecycle handlers relay
//! the inference server's response body.

use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::info;

use common::Error;
use crate::error::ApiError;
use crate::AppState;

/// Query parameters for `POST /set_version/{model_name}`
#[derive(Debug, Deserialize)]
pub struct SetVersionParams {
    pub version: u32,
}

/// Query parameters for `POST /set_semantic_version/`
#[derive(Debug, Deserialize)]
pub struct SetSemanticVersionParams {
    pub model_name: String,
    pub semantic_version: String,
}

/// Streams a multipart file field into a staging temp file.
///
/// The returned handle removes the file on drop, after extraction has
/// finished or the request has failed.
async fn stage_upload(field: &mut Field<'_>) -> Result<NamedTempFile, ApiError> {
    let staged = NamedTempFile::new().map_err(Error::Io)?;
    let mut file = tokio::fs::File::from_std(staged.reopen().map_err(Error::Io)?);

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| Error::InvalidArgument(format!("Malformed multipart payload: {}", e)))?
    {
        file.write_all(&chunk).await.map_err(Error::Io)?;
    }
    file.flush().await.map_err(Error::Io)?;

    Ok(staged)
}

fn field_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError(Error::InvalidArgument(format!(
        "Malformed multipart payload: {}",
        e
    )))
}

fn missing_field(name: &str) -> ApiError {
    ApiError(Error::InvalidArgument(format!("Missing field '{}'", name)))
}

/// `POST /upload_model`: upload an archive into a fixed version slot
pub async fn upload_model(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut model_name = None;
    let mut version = None;
    let mut staged = None;

    while let Some(mut field) = multipart.next_field().await.map_err(field_error)? {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("model_name") => model_name = Some(field.text().await.map_err(field_error)?),
            Some("version") => {
                let text = field.text().await.map_err(field_error)?;
                let parsed = text.trim().parse::<u32>().map_err(|_| {
                    Error::InvalidArgument(format!("Invalid version number '{}'", text))
                })?;
                version = Some(parsed);
            }
            Some("file") => staged = Some(stage_upload(&mut field).await?),
            _ => {}
        }
    }

    let model_name = model_name.ok_or_else(|| missing_field("model_name"))?;
    let staged = staged.ok_or_else(|| missing_field("file"))?;

    let version = state
        .repository
        .upload(&model_name, version, staged.path())
        .await?;

    info!("Uploaded model '{}' version {}", model_name, version);

    Ok(Json(json!({
        "message": format!("Model '{}' uploaded successfully with version {}", model_name, version)
    }))
    .into_response())
}

/// `POST /upload_new_version/`: upload an archive under a semantic label
pub async fn upload_new_version(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut model_name = None;
    let mut model_version = None;
    let mut staged = None;

    while let Some(mut field) = multipart.next_field().await.map_err(field_error)? {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("model_name") => model_name = Some(field.text().await.map_err(field_error)?),
            Some("model_version") => {
                model_version = Some(field.text().await.map_err(field_error)?)
            }
            Some("src_file") => staged = Some(stage_upload(&mut field).await?),
            _ => {}
        }
    }

    let model_name = model_name.ok_or_else(|| missing_field("model_name"))?;
    let model_version = model_version.ok_or_else(|| missing_field("model_version"))?;
    let staged = staged.ok_or_else(|| missing_field("src_file"))?;

    let slot = state
        .repository
        .upload_new_version(&model_name, &model_version, staged.path())
        .await?;

    info!(
        "Uploaded model '{}' label '{}' as version {}",
        model_name, model_version, slot
    );

    Ok(Json(json!({ "version": slot })).into_response())
}

/// `POST /set_version/{model_name}`: pin the active version number
pub async fn set_version(
    State(state): State<AppState>,
    Path(model_name): Path<String>,
    Query(params): Query<SetVersionParams>,
) -> Result<Response, ApiError> {
    state.repository.set_version(&model_name, params.version).await?;

    Ok(Json(json!({
        "message": format!("Version set to {} for model '{}'", params.version, model_name)
    }))
    .into_response())
}

/// `POST /set_semantic_version/`: pin the version a semantic label maps to
pub async fn set_semantic_version(
    State(state): State<AppState>,
    Query(params): Query<SetSemanticVersionParams>,
) -> Result<Response, ApiError> {
    let resolved = state
        .repository
        .set_semantic_version(&params.model_name, &params.semantic_version)
        .await?;

    Ok(Json(json!({ "version": resolved })).into_response())
}

/// `GET /get_version/{model_name}`: report the pinned version
pub async fn get_version(
    State(state): State<AppState>,
    Path(model_name): Path<String>,
) -> Result<Response, ApiError> {
    let version = state.repository.active_version(&model_name).await?;

    Ok(Json(json!({ "model_name": model_name, "version": version })).into_response())
}

/// `GET /get_meta/{model_name}`: report the pinned version's metadata
pub async fn get_meta(
    State(state): State<AppState>,
    Path(model_name): Path<String>,
) -> Result<Response, ApiError> {
    let meta = state.repository.active_metadata(&model_name).await?;

    Ok(Json(Value::Object(meta)).into_response())
}

/// `POST /load_model/{model_name}`: proxy to the inference server
pub async fn load_model(
    State(state): State<AppState>,
    Path(model_name): Path<String>,
) -> Result<Response, ApiError> {
    let body = state.gateway.load_model(&model_name).await?;

    Ok(relay(body))
}

/// `POST /unload_model/{model_name}`: proxy to the inference server
pub async fn unload_model(
    State(state): State<AppState>,
    Path(model_name): Path<String>,
) -> Result<Response, ApiError> {
    let body = state.gateway.unload_model(&model_name).await?;

    Ok(relay(body))
}

/// `GET /index/`: proxy the inference server's model index
pub async fn index(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = state.gateway.index().await?;

    Ok(relay(body))
}

fn relay(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
