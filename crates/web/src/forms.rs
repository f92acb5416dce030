//! Form submission plumbing shared by the record-creation handlers.

use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;
use safewatch_client::ApiError;
use safewatch_core::attachments::{
    validate_files, FileRejection, UploadFile, ATTACHMENTS_FIELD, MAX_FILES, MAX_FILE_SIZE,
};
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

/// Request body limit for upload routes: every attachment at full size plus
/// headroom for the JSON field and multipart framing.
pub const UPLOAD_BODY_LIMIT: usize = MAX_FILES * MAX_FILE_SIZE as usize + 1024 * 1024;

/// Outcome of streaming one `attachments` part.
enum Streamed {
    Complete(UploadFile),
    /// Over the per-file limit; the rest of the part was drained unbuffered.
    Oversized(FileRejection),
    /// The body limit cut the request off inside this part.
    CutOff(FileRejection),
}

/// Split a multipart submission into its JSON record and attachment files.
///
/// The record travels as JSON text in `data_field`; files come from
/// `attachments` parts. File inputs left empty by the browser (no name, no
/// bytes) are skipped. No file is buffered past [`MAX_FILE_SIZE`]: an
/// oversized part is drained and reported as `INVALID_FILES` naming the
/// file, together with whatever the remaining files fail. Other files are
/// returned unchecked; the backend client validates them before building
/// its own request.
pub async fn read_upload<T: DeserializeOwned>(
    mut multipart: Multipart,
    data_field: &str,
) -> AppResult<(T, Vec<UploadFile>)> {
    let mut data: Option<T> = None;
    let mut files = Vec::new();
    let mut rejections = Vec::new();

    while let Some(mut field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == data_field {
            let text = field.text().await.map_err(malformed)?;
            let parsed = serde_json::from_str(&text)
                .map_err(|e| AppError::BadRequest(format!("Invalid {data_field}: {e}")))?;
            data = Some(parsed);
        } else if name == ATTACHMENTS_FIELD {
            match stream_attachment(&mut field).await? {
                Streamed::Complete(file) => {
                    if file.file_name.is_empty() && file.data.is_empty() {
                        continue;
                    }
                    files.push(file);
                }
                Streamed::Oversized(rejection) => rejections.push(rejection),
                Streamed::CutOff(rejection) => {
                    rejections.push(rejection);
                    break;
                }
            }
        } else {
            tracing::debug!(field = %name, "Ignoring unexpected multipart field");
        }
    }

    if !rejections.is_empty() {
        if let Err(more) = validate_files(&files) {
            rejections.extend(more);
        }
        tracing::debug!(rejected = rejections.len(), "Upload refused while streaming");
        return Err(ApiError::InvalidFiles(rejections).into());
    }

    let data = data.ok_or_else(|| AppError::BadRequest(format!("Missing {data_field} field")))?;
    Ok((data, files))
}

async fn stream_attachment(field: &mut Field<'_>) -> AppResult<Streamed> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);
    let mut data = Vec::new();
    let mut seen: u64 = 0;

    loop {
        match field.chunk().await {
            Ok(Some(chunk)) => {
                seen += chunk.len() as u64;
                if seen <= MAX_FILE_SIZE {
                    data.extend_from_slice(&chunk);
                } else if !data.is_empty() {
                    data = Vec::new();
                }
            }
            Ok(None) => break,
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                return Ok(Streamed::CutOff(FileRejection::too_large(&file_name, seen)));
            }
            Err(e) => return Err(malformed(e)),
        }
    }

    if seen > MAX_FILE_SIZE {
        return Ok(Streamed::Oversized(FileRejection::too_large(&file_name, seen)));
    }
    Ok(Streamed::Complete(UploadFile::new(file_name, content_type, data)))
}

fn malformed(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(e.body_text());
    }
    AppError::BadRequest(format!("Malformed upload: {}", e.body_text()))
}
