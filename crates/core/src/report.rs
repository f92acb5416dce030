//! Report generation requests and downloaded report files.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, FieldErrors};
use crate::types::Date;
use crate::validation::validate_date_range;

/// Longest range a single report may cover.
pub const MAX_RANGE_DAYS: i64 = 366;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Incidents,
    Hazards,
    Investigations,
    CorrectiveActions,
    Vpcs,
    Summary,
}

impl ReportType {
    pub const ALL: [ReportType; 6] = [
        ReportType::Incidents,
        ReportType::Hazards,
        ReportType::Investigations,
        ReportType::CorrectiveActions,
        ReportType::Vpcs,
        ReportType::Summary,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ReportType::Incidents => "incidents",
            ReportType::Hazards => "hazards",
            ReportType::Investigations => "investigations",
            ReportType::CorrectiveActions => "corrective-actions",
            ReportType::Vpcs => "vpcs",
            ReportType::Summary => "safety-summary",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportType::Incidents => "Incident Report",
            ReportType::Hazards => "Hazard Register",
            ReportType::Investigations => "Investigation Report",
            ReportType::CorrectiveActions => "Corrective Action Tracker",
            ReportType::Vpcs => "VPC Report",
            ReportType::Summary => "Safety Performance Summary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Pdf,
    Excel,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Excel => "xlsx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "application/pdf",
            ReportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub start_date: Date,
    pub end_date: Date,
    pub format: ReportFormat,
}

impl ReportRequest {
    /// The range must be ordered, end no later than `today`, and span at
    /// most [`MAX_RANGE_DAYS`].
    pub fn check(&self, today: Date) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        if validate_date_range(self.start_date, self.end_date).is_err() {
            errors.add("startDate", "Start date must be on or before end date");
        } else if (self.end_date - self.start_date).num_days() >= MAX_RANGE_DAYS {
            errors.add(
                "endDate",
                format!("Reports may cover at most {MAX_RANGE_DAYS} days"),
            );
        }
        if self.end_date > today {
            errors.add("endDate", "End date cannot be in the future");
        }
        errors.into_result()
    }

    /// Download name, e.g. `incidents_2026-01-01_2026-03-31.pdf`.
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}.{}",
            self.report_type.slug(),
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d"),
            self.format.extension()
        )
    }
}

/// A generated report as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}
