//! The backend error contract.
//!
//! Every outbound call resolves to a parsed payload or exactly one
//! [`ApiError`]. Raw backend payloads never leave this module except as the
//! extracted human-readable message.

use safewatch_core::attachments::FileRejection;
use safewatch_core::error::FieldErrors;
use serde::Deserialize;

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const AUTH_REQUIRED: &str = "AUTH_REQUIRED";
pub const AUTH_EXPIRED: &str = "AUTH_EXPIRED";
pub const FORBIDDEN: &str = "FORBIDDEN";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const INVALID_FILES: &str = "INVALID_FILES";
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
pub const SERVER_ERROR: &str = "SERVER_ERROR";
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Backend codes that mark a 401 as an expired (rather than missing) token.
const EXPIRY_CODES: &[&str] = &["AUTH_EXPIRED", "TOKEN_EXPIRED", "SESSION_EXPIRED", "JWT_EXPIRED"];

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Validation { message: String, fields: FieldErrors },

    #[error("Authentication required")]
    AuthRequired,

    #[error("Your session has expired")]
    AuthExpired,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{} file(s) rejected", .0.len())]
    InvalidFiles(Vec<FileRejection>),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected backend response: {message}")]
    Unknown { status: Option<u16>, message: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Machine-readable code used in page error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => VALIDATION_ERROR,
            ApiError::AuthRequired => AUTH_REQUIRED,
            ApiError::AuthExpired => AUTH_EXPIRED,
            ApiError::Forbidden(_) => FORBIDDEN,
            ApiError::NotFound(_) => NOT_FOUND,
            ApiError::InvalidFiles(_) => INVALID_FILES,
            ApiError::Network(_) => NETWORK_ERROR,
            ApiError::Server { .. } => SERVER_ERROR,
            ApiError::Unknown { .. } => UNKNOWN_ERROR,
        }
    }

    /// Only transport failures are worth retrying as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// Whether the session must be discarded and the user sent to login.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::AuthRequired | ApiError::AuthExpired)
    }

    pub(crate) fn unknown(message: impl Into<String>) -> Self {
        ApiError::Unknown {
            status: None,
            message: message.into(),
        }
    }

    /// Classify a non-2xx response from its status and raw body.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .clone()
            .or_else(|| parsed.error.clone())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {status}"));

        match status {
            400 | 422 => ApiError::Validation {
                fields: parsed.field_errors(),
                message,
            },
            401 if parsed.marks_expiry() => ApiError::AuthExpired,
            401 => ApiError::AuthRequired,
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Unknown {
                status: Some(status),
                message,
            },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Unknown {
                status: err.status().map(|s| s.as_u16()),
                message: format!("Malformed response body: {err}"),
            }
        } else if err.is_builder() {
            ApiError::unknown(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Error payload as sent by the backend. Every field is optional because
/// proxies and crashed upstreams send whatever they like.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

impl ErrorBody {
    fn marks_expiry(&self) -> bool {
        let code_marks = self
            .code
            .as_deref()
            .is_some_and(|c| EXPIRY_CODES.iter().any(|e| e.eq_ignore_ascii_case(c)));
        let message_marks = self
            .message
            .as_deref()
            .is_some_and(|m| m.to_ascii_lowercase().contains("expired"));
        code_marks || message_marks
    }

    /// Accepts `{field: [msg]}`, `{field: msg}` and `[{field|path, message|msg}]`.
    fn field_errors(&self) -> FieldErrors {
        let mut fields = FieldErrors::new();
        match &self.errors {
            Some(serde_json::Value::Object(map)) => {
                for (field, value) in map {
                    match value {
                        serde_json::Value::String(msg) => fields.add(field.clone(), msg.clone()),
                        serde_json::Value::Array(msgs) => {
                            for msg in msgs.iter().filter_map(|m| m.as_str()) {
                                fields.add(field.clone(), msg);
                            }
                        }
                        _ => {}
                    }
                }
            }
            Some(serde_json::Value::Array(items)) => {
                for item in items {
                    let field = item
                        .get("field")
                        .or_else(|| item.get("path"))
                        .and_then(|f| f.as_str());
                    let msg = item
                        .get("message")
                        .or_else(|| item.get("msg"))
                        .and_then(|m| m.as_str());
                    if let (Some(field), Some(msg)) = (field, msg) {
                        fields.add(field, msg);
                    }
                }
            }
            _ => {}
        }
        fields
    }
}
