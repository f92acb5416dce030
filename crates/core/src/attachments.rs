//! Pre-upload checks for attachment files.
//!
//! Every upload form runs [`validate_files`] before any network call so that
//! oversized or disallowed files are rejected without a wasted round trip.

use std::fmt;

use serde::Serialize;

/// Maximum size of a single attachment (5 MiB).
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum number of attachments per submission.
pub const MAX_FILES: usize = 5;

/// Multipart field name carrying attachment parts.
pub const ATTACHMENTS_FIELD: &str = "attachments";

/// MIME types accepted for attachments: images, PDF and Word documents.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// An uploaded file held in memory between the form and the backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    /// Content type declared by the browser, if any.
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Effective MIME type.
    ///
    /// The declared type wins unless it is missing or the generic
    /// `application/octet-stream`, in which case the type is guessed from the
    /// file extension.
    pub fn mime_type(&self) -> String {
        match self.content_type.as_deref().map(normalize_mime) {
            Some(declared) if !declared.is_empty() && declared != "application/octet-stream" => {
                declared
            }
            _ => mime_guess::from_path(&self.file_name)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string(),
        }
    }
}

/// Strip parameters (`; charset=...`) and lowercase.
fn normalize_mime(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}

pub fn is_allowed_mime(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RejectionReason {
    TooLarge { size: u64, max: u64 },
    DisallowedType { mime_type: String },
    Empty,
    TooMany { max: usize },
}

/// Why a particular file was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRejection {
    pub file_name: String,
    #[serde(flatten)]
    pub reason: RejectionReason,
    pub message: String,
}

impl FileRejection {
    fn new(file_name: &str, reason: RejectionReason) -> Self {
        let message = match &reason {
            RejectionReason::TooLarge { size, max } => format!(
                "{file_name} is too large ({}); the limit is {}",
                format_size(*size),
                format_size(*max)
            ),
            RejectionReason::DisallowedType { mime_type } => format!(
                "{file_name} has an unsupported type ({mime_type}); allowed: images, PDF, Word"
            ),
            RejectionReason::Empty => format!("{file_name} is empty"),
            RejectionReason::TooMany { max } => {
                format!("{file_name} exceeds the limit of {max} attachments")
            }
        };
        Self {
            file_name: file_name.to_string(),
            reason,
            message,
        }
    }

    /// Rejection for a file that was cut off while streaming, `size` being
    /// the bytes seen so far.
    pub fn too_large(file_name: &str, size: u64) -> Self {
        Self::new(
            file_name,
            RejectionReason::TooLarge {
                size,
                max: MAX_FILE_SIZE,
            },
        )
    }
}

impl fmt::Display for FileRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Check every file against the size, type and count limits.
///
/// Returns all rejections, not just the first, so the form can flag each
/// offending file.
pub fn validate_files(files: &[UploadFile]) -> Result<(), Vec<FileRejection>> {
    let mut rejections = Vec::new();

    for (index, file) in files.iter().enumerate() {
        if index >= MAX_FILES {
            rejections.push(FileRejection::new(
                &file.file_name,
                RejectionReason::TooMany { max: MAX_FILES },
            ));
            continue;
        }
        if file.data.is_empty() {
            rejections.push(FileRejection::new(&file.file_name, RejectionReason::Empty));
            continue;
        }
        if file.size() > MAX_FILE_SIZE {
            rejections.push(FileRejection::new(
                &file.file_name,
                RejectionReason::TooLarge {
                    size: file.size(),
                    max: MAX_FILE_SIZE,
                },
            ));
            continue;
        }
        let mime_type = file.mime_type();
        if !is_allowed_mime(&mime_type) {
            rejections.push(FileRejection::new(
                &file.file_name,
                RejectionReason::DisallowedType { mime_type },
            ));
        }
    }

    if rejections.is_empty() {
        Ok(())
    } else {
        Err(rejections)
    }
}

/// Human-readable byte size (`512 B`, `1.5 KB`, `5.0 MB`).
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}
