//! Report generation for supervisors.

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use safewatch_core::report::{ReportFormat, ReportRequest, ReportType, MAX_RANGE_DAYS};
use safewatch_core::search::SelectOption;
use serde::Serialize;

use super::today;
use crate::error::{AppError, AppResult};
use crate::middleware::gate::{Gate, Supervisors};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFormPage {
    pub report_types: Vec<SelectOption>,
    pub formats: Vec<SelectOption>,
    pub max_range_days: i64,
}

/// GET /reports
pub async fn report_form(Gate(_user, _): Gate<Supervisors>) -> Json<DataResponse<ReportFormPage>> {
    Json(DataResponse {
        data: ReportFormPage {
            report_types: ReportType::ALL
                .iter()
                .filter_map(|t| wire_option(t, t.label()))
                .collect(),
            formats: [ReportFormat::Pdf, ReportFormat::Excel]
                .iter()
                .filter_map(|f| wire_option(f, format_label(*f)))
                .collect(),
            max_range_days: MAX_RANGE_DAYS,
        },
    })
}

/// POST /reports/generate
///
/// Responds with the generated file as an attachment download.
pub async fn generate_report(
    State(state): State<AppState>,
    Gate(user, _): Gate<Supervisors>,
    Form(request): Form<ReportRequest>,
) -> AppResult<Response> {
    request.check(today())?;
    let file = user.api(&state).generate_report(&request).await?;
    tracing::info!(
        user_id = %user.user_id,
        report = request.report_type.slug(),
        file_name = %file.file_name,
        bytes = file.data.len(),
        "Report generated"
    );

    let content_type = HeaderValue::from_str(&file.content_type)
        .map_err(|_| AppError::InternalError(format!("Unusable report content type {}", file.content_type)))?;
    let disposition = HeaderValue::from_str(&attachment_disposition(&file.file_name))
        .map_err(|_| AppError::InternalError(format!("Unusable report file name {}", file.file_name)))?;

    Ok(([(CONTENT_TYPE, content_type), (CONTENT_DISPOSITION, disposition)], file.data).into_response())
}

fn format_label(format: ReportFormat) -> &'static str {
    match format {
        ReportFormat::Pdf => "PDF",
        ReportFormat::Excel => "Excel",
    }
}

fn wire_option<T: Serialize>(value: &T, label: &str) -> Option<SelectOption> {
    let wire = serde_json::to_value(value).ok()?;
    Some(SelectOption::new(wire.as_str()?, label))
}

/// `attachment; filename="..."` with quotes and control characters dropped.
fn attachment_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_strips_quotes() {
        assert_eq!(
            attachment_disposition("incidents_2026-01-01_2026-03-31.pdf"),
            "attachment; filename=\"incidents_2026-01-01_2026-03-31.pdf\""
        );
        assert_eq!(attachment_disposition("a\"b\r\n.pdf"), "attachment; filename=\"ab.pdf\"");
    }

    #[test]
    fn options_use_wire_values() {
        let option = wire_option(&ReportType::CorrectiveActions, "Tracker").unwrap();
        assert_eq!(option.value, "corrective_actions");
        let option = wire_option(&ReportFormat::Excel, format_label(ReportFormat::Excel)).unwrap();
        assert_eq!(option.value, "excel");
        assert_eq!(option.label, "Excel");
    }
}
