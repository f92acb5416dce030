pub mod auth;
pub mod corrective_actions;
pub mod dashboard;
pub mod departments;
pub mod hazards;
pub mod incidents;
pub mod investigations;
pub mod notifications;
pub mod options;
pub mod pages;
pub mod reports;
pub mod temporary_employees;
pub mod users;
pub mod vpcs;

use safewatch_core::pagination::{clamp_limit, clamp_page};
use safewatch_core::types::Date;

/// Normalize list paging before it is forwarded to the backend.
pub(crate) fn paging(page: Option<u32>, limit: Option<u32>) -> (Option<u32>, Option<u32>) {
    (Some(clamp_page(page)), Some(clamp_limit(limit)))
}

/// Today's date in UTC, for due-date and validity checks.
pub(crate) fn today() -> Date {
    chrono::Utc::now().date_naive()
}
