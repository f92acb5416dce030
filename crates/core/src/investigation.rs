//! Incident investigations (one per incident).

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::display::{Badge, Tone};
use crate::types::{RecordId, Timestamp, UserRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestigationStatus {
    InProgress,
    PendingReview,
    Completed,
    Reopened,
}

impl InvestigationStatus {
    pub const ALL: [InvestigationStatus; 4] = [
        InvestigationStatus::InProgress,
        InvestigationStatus::PendingReview,
        InvestigationStatus::Completed,
        InvestigationStatus::Reopened,
    ];

    pub fn is_active(self) -> bool {
        matches!(
            self,
            InvestigationStatus::InProgress
                | InvestigationStatus::PendingReview
                | InvestigationStatus::Reopened
        )
    }
}

impl Badge for InvestigationStatus {
    fn label(&self) -> &'static str {
        match self {
            InvestigationStatus::InProgress => "In Progress",
            InvestigationStatus::PendingReview => "Pending Review",
            InvestigationStatus::Completed => "Completed",
            InvestigationStatus::Reopened => "Reopened",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            InvestigationStatus::InProgress => Tone::Info,
            InvestigationStatus::PendingReview => Tone::Warning,
            InvestigationStatus::Completed => Tone::Success,
            InvestigationStatus::Reopened => Tone::Danger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investigation {
    pub id: RecordId,
    pub incident_id: RecordId,
    #[serde(default)]
    pub root_cause: Option<String>,
    #[serde(default)]
    pub contributing_factors: Vec<String>,
    #[serde(default)]
    pub findings: Option<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
    pub status: InvestigationStatus,
    #[serde(default)]
    pub lead_investigator: Option<UserRef>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestigation {
    #[validate(length(min = 1, message = "Lead investigator is required"))]
    pub lead_investigator_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Initial notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvestigation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000, message = "Root cause must be at most 5000 characters"))]
    pub root_cause: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributing_factors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 10000, message = "Findings must be at most 10000 characters"))]
    pub findings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 10000, message = "Recommendations must be at most 10000 characters"))]
    pub recommendations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InvestigationStatus>,
}

impl UpdateInvestigation {
    /// Completing an investigation requires a recorded root cause.
    pub fn check_completion(&self, existing: &Investigation) -> Result<(), crate::error::CoreError> {
        if self.status != Some(InvestigationStatus::Completed) {
            return Ok(());
        }
        let root_cause = self
            .root_cause
            .as_deref()
            .or(existing.root_cause.as_deref())
            .unwrap_or("");
        if root_cause.trim().is_empty() {
            let mut errors = crate::error::FieldErrors::new();
            errors.add("rootCause", "Root cause is required to complete an investigation");
            return errors.into_result();
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<InvestigationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn existing(root_cause: Option<&str>) -> Investigation {
        Investigation {
            id: "inv-1".into(),
            incident_id: "inc-1".into(),
            root_cause: root_cause.map(str::to_string),
            contributing_factors: vec![],
            findings: None,
            recommendations: None,
            status: InvestigationStatus::InProgress,
            lead_investigator: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn completion_needs_root_cause() {
        let update = UpdateInvestigation {
            status: Some(InvestigationStatus::Completed),
            ..Default::default()
        };
        assert!(update.check_completion(&existing(None)).is_err());
        assert!(update.check_completion(&existing(Some("Worn brake pads"))).is_ok());
    }

    #[test]
    fn non_completion_updates_pass() {
        let update = UpdateInvestigation {
            findings: Some("Driver visibility obstructed".into()),
            ..Default::default()
        };
        assert!(update.check_completion(&existing(None)).is_ok());
    }
}
