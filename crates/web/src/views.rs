//! Page view models.
//!
//! Backend records are reshaped into rows with badges and pre-formatted
//! dates, so the browser only lays them out.

use chrono::{DateTime, Utc};
use safewatch_client::Paged;
use safewatch_core::attachments::{format_size, ALLOWED_MIME_TYPES, MAX_FILES, MAX_FILE_SIZE};
use safewatch_core::corrective_action::CorrectiveAction;
use safewatch_core::display::{format_date, format_datetime, relative_time, truncate, Badge, BadgeView};
use safewatch_core::hazard::Hazard;
use safewatch_core::incident::Incident;
use safewatch_core::investigation::Investigation;
use safewatch_core::notification::Notification;
use safewatch_core::pagination::Pagination;
use safewatch_core::people::{TemporaryEmployee, User};
use safewatch_core::search::SelectOption;
use safewatch_core::types::{Date, RecordId, UserRef};
use safewatch_core::vpc::Vpc;
use serde::Serialize;

/// Table cells never show more than this many characters of free text.
const CELL_TEXT_LIMIT: usize = 120;

/// One page of rows plus the page controls.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<T: Serialize> {
    pub items: Vec<T>,
    pub total: u64,
    pub pagination: Pagination,
}

impl<T: Serialize> ListPage<T> {
    pub fn from_paged<S>(paged: Paged<S>, row: impl Fn(S) -> T) -> Self {
        Self {
            total: paged.page_info.total,
            pagination: Pagination::from_info(&paged.page_info),
            items: paged.items.into_iter().map(row).collect(),
        }
    }
}

/// Dropdown options for an enum, valued by its wire name.
pub fn enum_options<E: Badge + Serialize>(values: &[E]) -> Vec<SelectOption> {
    values
        .iter()
        .filter_map(|v| {
            let wire = serde_json::to_value(v).ok()?;
            Some(SelectOption::new(wire.as_str()?, v.label()))
        })
        .collect()
}

/// Attachment limits shown next to upload inputs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRules {
    pub max_file_size: u64,
    pub max_file_size_label: String,
    pub max_files: usize,
    pub allowed_types: &'static [&'static str],
}

impl UploadRules {
    pub fn current() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            max_file_size_label: format_size(MAX_FILE_SIZE),
            max_files: MAX_FILES,
            allowed_types: ALLOWED_MIME_TYPES,
        }
    }
}

fn user_label(user: &Option<UserRef>) -> Option<String> {
    user.as_ref().map(|u| u.label().to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRow {
    pub id: RecordId,
    pub reference_number: String,
    pub title: String,
    #[serde(rename = "type")]
    pub incident_type: BadgeView,
    pub severity: BadgeView,
    pub status: BadgeView,
    pub location: String,
    pub occurred_at: String,
    pub reported_by: Option<String>,
    pub assigned_to: Option<String>,
}

impl From<Incident> for IncidentRow {
    fn from(incident: Incident) -> Self {
        Self {
            incident_type: incident.incident_type.badge(),
            severity: incident.severity_level.badge(),
            status: incident.status.badge(),
            occurred_at: format_datetime(&incident.occurred_at),
            reported_by: user_label(&incident.reported_by),
            assigned_to: user_label(&incident.assigned_to),
            id: incident.id,
            reference_number: incident.reference_number,
            title: incident.title,
            location: incident.location,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardRow {
    pub id: RecordId,
    pub reference_number: String,
    pub title: String,
    pub location: String,
    pub risk_level: BadgeView,
    pub status: BadgeView,
    pub reported_by: Option<String>,
    pub reported_on: String,
}

impl From<Hazard> for HazardRow {
    fn from(hazard: Hazard) -> Self {
        Self {
            risk_level: hazard.risk_level.badge(),
            status: hazard.status.badge(),
            reported_by: user_label(&hazard.reported_by),
            reported_on: format_date(&hazard.created_at),
            id: hazard.id,
            reference_number: hazard.reference_number,
            title: hazard.title,
            location: hazard.location,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationRow {
    pub id: RecordId,
    pub incident_id: RecordId,
    pub status: BadgeView,
    pub lead_investigator: Option<String>,
    pub root_cause: Option<String>,
    pub started_on: String,
    pub completed_on: Option<String>,
}

impl From<Investigation> for InvestigationRow {
    fn from(investigation: Investigation) -> Self {
        Self {
            status: investigation.status.badge(),
            lead_investigator: user_label(&investigation.lead_investigator),
            root_cause: investigation
                .root_cause
                .as_deref()
                .map(|c| truncate(c, CELL_TEXT_LIMIT)),
            started_on: format_date(&investigation.created_at),
            completed_on: investigation.completed_at.as_ref().map(format_date),
            id: investigation.id,
            incident_id: investigation.incident_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRow {
    pub id: RecordId,
    pub incident_id: RecordId,
    pub description: String,
    pub action_type: BadgeView,
    pub priority: BadgeView,
    pub status: BadgeView,
    pub assigned_to: Option<String>,
    pub due_date: Date,
    pub overdue: bool,
    pub extension_pending: bool,
}

impl ActionRow {
    pub fn new(action: CorrectiveAction, today: Date) -> Self {
        Self {
            description: truncate(&action.description, CELL_TEXT_LIMIT),
            action_type: action.action_type.badge(),
            priority: action.priority.badge(),
            status: action.status.badge(),
            assigned_to: user_label(&action.assigned_to),
            overdue: action.is_overdue(today),
            extension_pending: action.has_pending_extension(),
            due_date: action.due_date,
            id: action.id,
            incident_id: action.incident_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcRow {
    pub id: RecordId,
    pub report_number: String,
    #[serde(rename = "type")]
    pub vpc_type: BadgeView,
    pub department: Option<String>,
    pub description: String,
    pub reported_by: Option<String>,
    pub reported_on: String,
}

impl From<Vpc> for VpcRow {
    fn from(vpc: Vpc) -> Self {
        Self {
            vpc_type: vpc.vpc_type.badge(),
            description: truncate(&vpc.description, CELL_TEXT_LIMIT),
            reported_by: user_label(&vpc.reported_by),
            reported_on: format_date(&vpc.created_at),
            id: vpc.id,
            report_number: vpc.report_number,
            department: vpc.department,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub role: BadgeView,
    pub department: Option<String>,
    pub is_active: bool,
}

impl From<User> for UserRow {
    fn from(user: User) -> Self {
        Self {
            name: user.display_name(),
            role: user.role.badge(),
            department: user.employee.as_ref().and_then(|p| p.department.clone()),
            is_active: user.is_active,
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryEmployeeRow {
    pub id: RecordId,
    pub name: String,
    pub company: Option<String>,
    pub department: Option<String>,
    pub valid_from: Date,
    pub valid_until: Date,
    /// Whether today falls inside the validity period.
    pub current: bool,
}

impl TemporaryEmployeeRow {
    pub fn new(employee: TemporaryEmployee, today: Date) -> Self {
        Self {
            name: safewatch_core::display::full_name(&employee.first_name, &employee.last_name),
            current: employee.is_current(today),
            id: employee.id,
            company: employee.company,
            department: employee.department,
            valid_from: employee.valid_from,
            valid_until: employee.valid_until,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRow {
    pub id: RecordId,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    /// `5 minutes ago`, `3 days ago`, ...
    pub received: String,
}

impl NotificationRow {
    pub fn new(notification: Notification, now: DateTime<Utc>) -> Self {
        Self {
            received: relative_time(&notification.created_at, now),
            id: notification.id,
            title: notification.title,
            message: notification.message,
            link: notification.link,
            is_read: notification.is_read,
        }
    }
}

/// Who is signed in, for the page header.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub id: RecordId,
    pub email: String,
    pub role: BadgeView,
    pub is_supervisor: bool,
}

impl From<&crate::middleware::session::SessionUser> for Viewer {
    fn from(user: &crate::middleware::session::SessionUser) -> Self {
        Self {
            id: user.user_id.clone(),
            email: user.email.clone(),
            role: user.role.badge(),
            is_supervisor: user.role.is_supervisor(),
        }
    }
}

#[cfg(test)]
mod tests {
    use safewatch_core::incident::Severity;
    use safewatch_core::pagination::PageInfo;
    use serde_json::json;

    use super::*;

    fn incident(reference: &str) -> Incident {
        serde_json::from_value(json!({
            "id": reference.to_lowercase(),
            "referenceNumber": reference,
            "type": "near_miss",
            "severityLevel": "high",
            "status": "new",
            "title": "Pallet fell from rack",
            "description": "A pallet slid off the top shelf in aisle 4",
            "location": "Warehouse B",
            "occurredAt": "2026-10-14T09:30:00Z",
            "reportedBy": {"id": "u-7", "name": "Sam Reyes"},
            "createdAt": "2026-10-14T09:45:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn incident_rows_carry_badges_and_dates() {
        let row = IncidentRow::from(incident("INC-2026-0001"));
        assert_eq!(row.incident_type.label, "Near Miss");
        assert_eq!(row.severity, Severity::High.badge());
        assert_eq!(row.occurred_at, "14 Oct 2026, 09:30");
        assert_eq!(row.reported_by.as_deref(), Some("Sam Reyes"));
        assert_eq!(row.assigned_to, None);
    }

    #[test]
    fn list_page_keeps_count_and_pages() {
        let paged = Paged {
            items: vec![incident("INC-1"), incident("INC-2")],
            page_info: PageInfo {
                page: 9,
                limit: 2,
                total: 6,
                total_pages: 3,
            },
        };
        let page = ListPage::from_paged(paged, IncidentRow::from);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 6);
        assert_eq!(page.pagination.current_page, 3);
    }

    #[test]
    fn enum_options_use_wire_values() {
        let options = enum_options(&Severity::ALL);
        assert_eq!(options.len(), 4);
        assert_eq!(options[3].value, "critical");
        assert_eq!(options[3].label, "Critical");
    }
}
