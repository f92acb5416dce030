//! Multipart bodies for record creation with attachments.
//!
//! The record itself travels as a JSON string in a named text field
//! (`incidentData`, `hazardData`, ...) next to one `attachments` part per
//! file. Files are checked before anything is built, so a rejected upload
//! never reaches the network.

use reqwest::multipart::{Form, Part};
use safewatch_core::attachments::{validate_files, UploadFile, ATTACHMENTS_FIELD};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};

pub fn upload_form<B: Serialize + ?Sized>(
    data_field: &'static str,
    data: &B,
    files: Vec<UploadFile>,
) -> ApiResult<Form> {
    validate_files(&files).map_err(ApiError::InvalidFiles)?;

    let json = serde_json::to_string(data)
        .map_err(|e| ApiError::unknown(format!("Failed to encode {data_field}: {e}")))?;
    let mut form = Form::new().text(data_field, json);

    for file in files {
        let mime = file.mime_type();
        let part = Part::bytes(file.data)
            .file_name(file.file_name)
            .mime_str(&mime)
            .map_err(|e| ApiError::unknown(format!("Invalid content type '{mime}': {e}")))?;
        form = form.part(ATTACHMENTS_FIELD, part);
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use safewatch_core::attachments::MAX_FILE_SIZE;

    use super::*;

    #[test]
    fn oversized_file_is_rejected_before_building() {
        let big = UploadFile::new(
            "scan.pdf",
            Some("application/pdf".into()),
            vec![0; MAX_FILE_SIZE as usize + 1],
        );
        let result = upload_form("incidentData", &serde_json::json!({}), vec![big]);
        assert_matches!(result, Err(ApiError::InvalidFiles(rejections)) => {
            assert_eq!(rejections.len(), 1);
            assert!(rejections[0].message.contains("scan.pdf"));
        });
    }

    #[test]
    fn allowed_files_build_a_form() {
        let photo = UploadFile::new("site.png", Some("image/png".into()), vec![1, 2, 3]);
        assert!(upload_form("hazardData", &serde_json::json!({"title": "x"}), vec![photo]).is_ok());
    }
}
