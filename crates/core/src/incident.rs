//! Incident records, report/edit forms, and status transition rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::display::{Badge, Tone};
use crate::error::CoreError;
use crate::types::{Attachment, RecordId, Timestamp, UserRef};
use crate::validation::{not_blank, not_in_future};

/// Multipart field carrying the JSON incident payload.
pub const INCIDENT_DATA_FIELD: &str = "incidentData";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
    Injury,
    NearMiss,
    PropertyDamage,
    Environmental,
    Security,
}

impl IncidentType {
    pub const ALL: [IncidentType; 5] = [
        IncidentType::Injury,
        IncidentType::NearMiss,
        IncidentType::PropertyDamage,
        IncidentType::Environmental,
        IncidentType::Security,
    ];
}

impl Badge for IncidentType {
    fn label(&self) -> &'static str {
        match self {
            IncidentType::Injury => "Injury",
            IncidentType::NearMiss => "Near Miss",
            IncidentType::PropertyDamage => "Property Damage",
            IncidentType::Environmental => "Environmental",
            IncidentType::Security => "Security",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            IncidentType::Injury => Tone::Danger,
            IncidentType::NearMiss => Tone::Warning,
            _ => Tone::Info,
        }
    }
}

/// Severity of an incident, also used as corrective-action priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];
}

impl Badge for Severity {
    fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            Severity::Low => Tone::Success,
            Severity::Medium => Tone::Warning,
            Severity::High | Severity::Critical => Tone::Danger,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    New,
    Investigating,
    ActionRequired,
    Resolved,
    Closed,
}

impl IncidentStatus {
    pub const ALL: [IncidentStatus; 5] = [
        IncidentStatus::New,
        IncidentStatus::Investigating,
        IncidentStatus::ActionRequired,
        IncidentStatus::Resolved,
        IncidentStatus::Closed,
    ];

    /// Statuses this one may move to.
    ///
    /// - `new`             -> `investigating`, `closed`
    /// - `investigating`   -> `action_required`, `resolved`
    /// - `action_required` -> `investigating`, `resolved`
    /// - `resolved`        -> `closed`, `investigating` (re-open)
    /// - `closed`          -> `investigating` (re-open)
    pub fn transitions(self) -> &'static [IncidentStatus] {
        use IncidentStatus::*;
        match self {
            New => &[Investigating, Closed],
            Investigating => &[ActionRequired, Resolved],
            ActionRequired => &[Investigating, Resolved],
            Resolved => &[Closed, Investigating],
            Closed => &[Investigating],
        }
    }
}

impl Badge for IncidentStatus {
    fn label(&self) -> &'static str {
        match self {
            IncidentStatus::New => "New",
            IncidentStatus::Investigating => "Investigating",
            IncidentStatus::ActionRequired => "Action Required",
            IncidentStatus::Resolved => "Resolved",
            IncidentStatus::Closed => "Closed",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            IncidentStatus::New => Tone::Info,
            IncidentStatus::Investigating => Tone::Warning,
            IncidentStatus::ActionRequired => Tone::Danger,
            IncidentStatus::Resolved => Tone::Success,
            IncidentStatus::Closed => Tone::Neutral,
        }
    }
}

/// Validate an incident status change before it is sent to the backend.
pub fn validate_transition(current: IncidentStatus, next: IncidentStatus) -> Result<(), CoreError> {
    if current.transitions().contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot move incident from '{}' to '{}'",
            current.label(),
            next.label()
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: RecordId,
    pub reference_number: String,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub severity_level: Severity,
    pub status: IncidentStatus,
    pub title: String,
    pub description: String,
    pub location: String,
    pub occurred_at: Timestamp,
    #[serde(default)]
    pub reported_by: Option<UserRef>,
    #[serde(default)]
    pub assigned_to: Option<UserRef>,
    #[serde(default)]
    pub witnesses: Vec<String>,
    #[serde(default)]
    pub environmental_conditions: Option<String>,
    #[serde(default)]
    pub equipment_involved: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub closed_at: Option<Timestamp>,
}

/// Payload of the "report incident" form, sent as the `incidentData` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewIncident {
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub severity_level: Severity,
    #[validate(
        length(min = 3, max = 200, message = "Title must be between 3 and 200 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,
    #[validate(length(min = 10, max = 5000, message = "Description must be between 10 and 5000 characters"))]
    pub description: String,
    #[validate(
        length(max = 200, message = "Location must be at most 200 characters"),
        custom(function = "not_blank")
    )]
    pub location: String,
    #[validate(custom(function = "not_in_future"))]
    pub occurred_at: Timestamp,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub witnesses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Environmental conditions must be at most 1000 characters"))]
    pub environmental_conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Equipment involved must be at most 1000 characters"))]
    pub equipment_involved: Option<String>,
}

/// Partial update from the edit form; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncident {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<IncidentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_level: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 200, message = "Title must be between 3 and 200 characters"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 10, max = 5000, message = "Description must be between 10 and 5000 characters"))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "Location must be between 1 and 200 characters"))]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witnesses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environmental_conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_involved: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IncidentStatusChange {
    pub status: IncidentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Note must be at most 1000 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[validate(length(min = 1, message = "Assignee is required"))]
    pub assignee_id: RecordId,
}

/// Aggregate counters shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentStats {
    pub total: u64,
    #[serde(default)]
    pub open: u64,
    #[serde(default)]
    pub by_status: BTreeMap<IncidentStatus, u64>,
    #[serde(default)]
    pub by_severity: BTreeMap<Severity, u64>,
    #[serde(default)]
    pub by_type: BTreeMap<IncidentType, u64>,
}

/// List filters, shared by the page query string and the backend query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IncidentStatus>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub incident_type: Option<IncidentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}
