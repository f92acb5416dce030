//! Shared field validators used by `#[derive(Validate)]` form types.

use std::borrow::Cow;

use chrono::Utc;
use validator::ValidationError;

use crate::types::{Date, Timestamp};

/// Clock skew tolerated between the browser and this server.
const FUTURE_TOLERANCE_SECS: i64 = 300;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Occurrence timestamps may not lie in the future.
pub fn not_in_future(value: &Timestamp) -> Result<(), ValidationError> {
    if value.timestamp() > Utc::now().timestamp() + FUTURE_TOLERANCE_SECS {
        return Err(error("future_timestamp", "Date cannot be in the future"));
    }
    Ok(())
}

/// Text fields must contain something other than whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "This field is required"));
    }
    Ok(())
}

/// Validate an inclusive date range.
pub fn validate_date_range(start: Date, end: Date) -> Result<(), ValidationError> {
    if start > end {
        return Err(error("date_range", "Start date must be on or before end date"));
    }
    Ok(())
}
