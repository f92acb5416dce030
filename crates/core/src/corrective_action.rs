//! Corrective actions assigned after an incident, with due-date extensions
//! and completion evidence.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::display::{Badge, Tone};
use crate::error::{CoreError, FieldErrors};
use crate::types::{Attachment, Date, RecordId, Timestamp, UserRef};
use crate::validation::not_blank;

pub use crate::incident::Severity as Priority;

/// Multipart field carrying the JSON completion-evidence payload.
pub const EVIDENCE_DATA_FIELD: &str = "evidenceData";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Immediate,
    Corrective,
    Preventive,
}

impl ActionType {
    pub const ALL: [ActionType; 3] = [
        ActionType::Immediate,
        ActionType::Corrective,
        ActionType::Preventive,
    ];
}

impl Badge for ActionType {
    fn label(&self) -> &'static str {
        match self {
            ActionType::Immediate => "Immediate",
            ActionType::Corrective => "Corrective",
            ActionType::Preventive => "Preventive",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            ActionType::Immediate => Tone::Danger,
            ActionType::Corrective => Tone::Warning,
            ActionType::Preventive => Tone::Info,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Pending,
    InProgress,
    Completed,
    Overdue,
    Verified,
}

impl ActionStatus {
    pub const ALL: [ActionStatus; 5] = [
        ActionStatus::Pending,
        ActionStatus::InProgress,
        ActionStatus::Completed,
        ActionStatus::Overdue,
        ActionStatus::Verified,
    ];

    pub fn is_done(self) -> bool {
        matches!(self, ActionStatus::Completed | ActionStatus::Verified)
    }

    /// Statuses a user may set directly. `overdue` is derived by the backend
    /// and `completed` goes through the evidence form.
    pub fn transitions(self) -> &'static [ActionStatus] {
        use ActionStatus::*;
        match self {
            Pending | Overdue => &[InProgress],
            InProgress => &[Pending],
            Completed => &[Verified, InProgress],
            Verified => &[],
        }
    }
}

impl Badge for ActionStatus {
    fn label(&self) -> &'static str {
        match self {
            ActionStatus::Pending => "Pending",
            ActionStatus::InProgress => "In Progress",
            ActionStatus::Completed => "Completed",
            ActionStatus::Overdue => "Overdue",
            ActionStatus::Verified => "Verified",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            ActionStatus::Pending => Tone::Neutral,
            ActionStatus::InProgress => Tone::Info,
            ActionStatus::Completed => Tone::Success,
            ActionStatus::Overdue => Tone::Danger,
            ActionStatus::Verified => Tone::Success,
        }
    }
}

pub fn validate_transition(current: ActionStatus, next: ActionStatus) -> Result<(), CoreError> {
    if current.transitions().contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot move corrective action from '{}' to '{}'",
            current.label(),
            next.label()
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionRequest {
    pub requested_due_date: Date,
    pub reason: String,
    pub status: ExtensionStatus,
    #[serde(default)]
    pub requested_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvidence {
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectiveAction {
    pub id: RecordId,
    pub incident_id: RecordId,
    pub description: String,
    pub action_type: ActionType,
    pub priority: Priority,
    pub status: ActionStatus,
    #[serde(default)]
    pub assigned_to: Option<UserRef>,
    pub due_date: Date,
    #[serde(default)]
    pub extension_request: Option<ExtensionRequest>,
    #[serde(default)]
    pub completion_evidence: Option<CompletionEvidence>,
    pub created_at: Timestamp,
}

impl CorrectiveAction {
    /// Past due and not done, regardless of what status the backend reports.
    pub fn is_overdue(&self, today: Date) -> bool {
        !self.status.is_done() && self.due_date < today
    }

    pub fn has_pending_extension(&self) -> bool {
        self.extension_request
            .as_ref()
            .is_some_and(|r| r.status == ExtensionStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCorrectiveAction {
    #[validate(
        length(min = 5, max = 2000, message = "Description must be between 5 and 2000 characters"),
        custom(function = "not_blank")
    )]
    pub description: String,
    pub action_type: ActionType,
    pub priority: Priority,
    #[validate(length(min = 1, message = "Assignee is required"))]
    pub assignee_id: RecordId,
    pub due_date: Date,
}

impl NewCorrectiveAction {
    /// Field validation plus the "due date not in the past" rule.
    pub fn check(&self, today: Date) -> Result<(), CoreError> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(&e),
        };
        if self.due_date < today {
            errors.add("dueDate", "Due date cannot be in the past");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActionStatusChange {
    pub status: ActionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewExtensionRequest {
    pub requested_due_date: Date,
    #[validate(
        length(min = 10, max = 1000, message = "Reason must be between 10 and 1000 characters"),
        custom(function = "not_blank")
    )]
    pub reason: String,
}

impl NewExtensionRequest {
    /// The new due date must move the deadline later, and only one request
    /// may be pending at a time.
    pub fn check(&self, action: &CorrectiveAction) -> Result<(), CoreError> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(&e),
        };
        if self.requested_due_date <= action.due_date {
            errors.add(
                "requestedDueDate",
                "Requested date must be later than the current due date",
            );
        }
        if action.has_pending_extension() {
            errors.add("requestedDueDate", "An extension request is already pending");
        }
        if action.status.is_done() {
            errors.add("requestedDueDate", "Completed actions cannot be extended");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionDecision {
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompletionReport {
    #[validate(length(min = 5, max = 5000, message = "Completion notes must be between 5 and 5000 characters"))]
    pub notes: String,
}

/// Filters for the corrective action lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ActionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}
