//! File handlers for the HTTP API.

use axum::{
    body::Body,
    extract::{multipart::MultipartError, rejection::JsonRejection, Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::file::UploadRequest;
use crate::web::dto::{
    FileDetailResponse, FileSummaryResponse, MessageResponse, UpdateDescriptionRequest,
    UploadResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::StashError;

/// `Content-Disposition` value for serving `file_name` as an attachment.
///
/// The plain `filename` parameter is restricted to printable ASCII, with
/// quotes, backslashes and non-ASCII characters replaced by `_`. Names that
/// needed replacing also carry the exact name as an RFC 5987 `filename*`.
fn attachment_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| {
            if c.is_ascii() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if fallback == file_name {
        format!("attachment; filename=\"{fallback}\"")
    } else {
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            urlencoding::encode(file_name)
        )
    }
}

/// Fields collected from an upload form.
#[derive(Default)]
struct UploadForm {
    file_name: Option<String>,
    content_type: Option<String>,
    content: Option<Vec<u8>>,
    file_type: Option<String>,
    description: Option<String>,
}

impl UploadForm {
    /// Drain the multipart stream. Unknown fields are ignored.
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            tracing::warn!("Malformed multipart body: {}", e);
            ApiError::bad_request("Invalid multipart data")
        })? {
            let field_name = field.name().map(str::to_owned);
            let invalid = |e: MultipartError| {
                tracing::warn!(field = ?field_name, "Failed to read form field: {}", e);
                ApiError::bad_request(format!(
                    "Invalid {} field",
                    field_name.as_deref().unwrap_or("form")
                ))
            };

            match field_name.as_deref() {
                Some("file") => {
                    form.file_name = field.file_name().map(str::to_owned);
                    form.content_type = field.content_type().map(str::to_owned);
                    form.content = Some(field.bytes().await.map_err(invalid)?.to_vec());
                }
                Some("file_type") => form.file_type = Some(field.text().await.map_err(invalid)?),
                Some("description") => {
                    form.description = Some(field.text().await.map_err(invalid)?)
                }
                _ => {}
            }
        }

        Ok(form)
    }

    fn into_request(self) -> Result<UploadRequest, ApiError> {
        let content = self
            .content
            .ok_or_else(|| ApiError::bad_request("No file part"))?;
        let file_name = self
            .file_name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApiError::bad_request("No selected file"))?;

        let mut request = UploadRequest::new(file_name, content);
        request.file_type = self.file_type;
        request.content_type = self.content_type;
        request.description = self.description;
        Ok(request)
    }
}

/// POST /upload - Store a file and its metadata.
///
/// Expects multipart/form-data with a `file` part and optional `file_type`
/// and `description` text fields.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let request = UploadForm::read(multipart).await?.into_request()?;
    let record = state.file_service().upload(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            file_id: record.id,
        }),
    ))
}

/// GET /files - List all file records.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FileSummaryResponse>>, ApiError> {
    let summaries = state.file_service().list().await?;

    Ok(Json(summaries.into_iter().map(Into::into).collect()))
}

/// GET /files/:id - Get file details with inline image data.
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<Json<FileDetailResponse>, ApiError> {
    let detail = state.file_service().get(&file_id).await?;

    Ok(Json(detail.into()))
}

/// PATCH /files/:id - Update the description of a file.
pub async fn update_file_description(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
    payload: Result<Json<UpdateDescriptionRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let description = payload
        .ok()
        .and_then(|Json(req)| req.description)
        .ok_or_else(|| ApiError::bad_request("Description not provided"))?;

    match state
        .file_service()
        .update_description(&file_id, &description)
        .await
    {
        Ok(()) => Ok(Json(MessageResponse::new(
            "File description updated successfully",
        ))),
        Err(StashError::NotFound(_)) => Err(ApiError::not_found("File not found")),
        Err(e) => {
            tracing::error!("Failed to update description: {}", e);
            Err(ApiError::internal(e.to_string()))
        }
    }
}

/// GET /download/:id - Download the raw file as an attachment.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let download = state.file_service().download(&file_id).await?;
    let record = download.record;

    let content_type = if record.content_type.is_empty() {
        mime_guess::from_path(&record.file_name)
            .first_or_octet_stream()
            .to_string()
    } else {
        record.content_type.clone()
    };

    let response = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&record.file_name),
        )
        .header(header::CONTENT_LENGTH, download.size)
        .body(Body::from_stream(ReaderStream::new(download.file)))
        .map_err(|e| {
            tracing::error!(file_id = %record.id, "Invalid download headers: {}", e);
            ApiError::internal("An internal error occurred")
        })?;

    Ok(response)
}

/// DELETE /files/:id - Delete a file record and its blob.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.file_service().delete(&file_id).await?;

    Ok(Json(MessageResponse::new("File deleted successfully")))
}
