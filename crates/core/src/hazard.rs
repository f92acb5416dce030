//! Hazard reports and their status rules.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::display::{Badge, Tone};
use crate::error::CoreError;
use crate::types::{Attachment, RecordId, Timestamp, UserRef};
use crate::validation::not_blank;

/// Multipart field carrying the JSON hazard payload.
pub const HAZARD_DATA_FIELD: &str = "hazardData";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Extreme,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Extreme,
    ];
}

impl Badge for RiskLevel {
    fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Extreme => "Extreme",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            RiskLevel::Low => Tone::Success,
            RiskLevel::Medium => Tone::Warning,
            RiskLevel::High | RiskLevel::Extreme => Tone::Danger,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardStatus {
    New,
    Assessing,
    ActionRequired,
    Resolved,
    Closed,
}

impl HazardStatus {
    pub const ALL: [HazardStatus; 5] = [
        HazardStatus::New,
        HazardStatus::Assessing,
        HazardStatus::ActionRequired,
        HazardStatus::Resolved,
        HazardStatus::Closed,
    ];

    /// Same shape as the incident table, with `assessing` in place of
    /// `investigating`.
    pub fn transitions(self) -> &'static [HazardStatus] {
        use HazardStatus::*;
        match self {
            New => &[Assessing, Closed],
            Assessing => &[ActionRequired, Resolved],
            ActionRequired => &[Assessing, Resolved],
            Resolved => &[Closed, Assessing],
            Closed => &[Assessing],
        }
    }
}

impl Badge for HazardStatus {
    fn label(&self) -> &'static str {
        match self {
            HazardStatus::New => "New",
            HazardStatus::Assessing => "Assessing",
            HazardStatus::ActionRequired => "Action Required",
            HazardStatus::Resolved => "Resolved",
            HazardStatus::Closed => "Closed",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            HazardStatus::New => Tone::Info,
            HazardStatus::Assessing => Tone::Warning,
            HazardStatus::ActionRequired => Tone::Danger,
            HazardStatus::Resolved => Tone::Success,
            HazardStatus::Closed => Tone::Neutral,
        }
    }
}

pub fn validate_transition(current: HazardStatus, next: HazardStatus) -> Result<(), CoreError> {
    if current.transitions().contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot move hazard from '{}' to '{}'",
            current.label(),
            next.label()
        )))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hazard {
    pub id: RecordId,
    pub reference_number: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub risk_level: RiskLevel,
    pub status: HazardStatus,
    #[serde(default)]
    pub reported_by: Option<UserRef>,
    #[serde(default)]
    pub assigned_to: Option<UserRef>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewHazard {
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
    pub risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Suggested action must be at most 1000 characters"))]
    pub suggested_action: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HazardStatusChange {
    pub status: HazardStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Note must be at most 1000 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<HazardStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_mirror_incidents() {
        use HazardStatus::*;
        assert!(validate_transition(New, Assessing).is_ok());
        assert!(validate_transition(Assessing, Resolved).is_ok());
        assert!(validate_transition(New, Resolved).is_err());
    }

    #[test]
    fn extreme_risk_is_danger() {
        assert_eq!(RiskLevel::Extreme.badge().tone, Tone::Danger);
    }

    #[test]
    fn new_hazard_requires_description() {
        let form = NewHazard {
            title: "Loose cable".into(),
            description: "short".into(),
            location: "Office 2".into(),
            risk_level: RiskLevel::Low,
            suggested_action: None,
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("description"));
    }
}
