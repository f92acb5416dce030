//! Visible Person Commitments: proactive safe/unsafe observation reports.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::display::{Badge, Tone};
use crate::types::{Attachment, RecordId, Timestamp, UserRef};
use crate::validation::not_blank;

/// Multipart field carrying the JSON VPC payload.
pub const VPC_DATA_FIELD: &str = "vpcData";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VpcType {
    Safe,
    Unsafe,
}

impl VpcType {
    pub const ALL: [VpcType; 2] = [VpcType::Safe, VpcType::Unsafe];
}

impl Badge for VpcType {
    fn label(&self) -> &'static str {
        match self {
            VpcType::Safe => "Safe",
            VpcType::Unsafe => "Unsafe",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            VpcType::Safe => Tone::Success,
            VpcType::Unsafe => Tone::Danger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vpc {
    pub id: RecordId,
    pub report_number: String,
    #[serde(default)]
    pub reported_by: Option<UserRef>,
    #[serde(default)]
    pub department: Option<String>,
    pub description: String,
    #[serde(rename = "type")]
    pub vpc_type: VpcType,
    #[serde(default)]
    pub action_taken: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewVpc {
    #[serde(rename = "type")]
    pub vpc_type: VpcType,
    #[validate(length(min = 1, message = "Department is required"))]
    pub department_id: RecordId,
    #[validate(
        length(min = 10, max = 5000, message = "Description must be between 10 and 5000 characters"),
        custom(function = "not_blank")
    )]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Action taken must be at most 2000 characters"))]
    pub action_taken: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcFilter {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub vpc_type: Option<VpcType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Safe/unsafe tallies for the VPC list header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VpcTally {
    pub safe: usize,
    pub unsafe_count: usize,
}

pub fn tally(vpcs: &[Vpc]) -> VpcTally {
    vpcs.iter().fold(VpcTally::default(), |mut acc, v| {
        match v.vpc_type {
            VpcType::Safe => acc.safe += 1,
            VpcType::Unsafe => acc.unsafe_count += 1,
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn vpc(kind: &str, department: &str) -> Vpc {
        serde_json::from_value(json!({
            "id": "v1",
            "reportNumber": "VPC-0001",
            "department": department,
            "description": "Observed correct use of fall arrest harness",
            "type": kind,
            "createdAt": "2026-10-01T08:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn tally_counts_each_type() {
        let list = vec![vpc("safe", "Ops"), vpc("unsafe", "Ops"), vpc("safe", "Maint")];
        assert_eq!(
            tally(&list),
            VpcTally {
                safe: 2,
                unsafe_count: 1
            }
        );
    }
}
