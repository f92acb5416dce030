//! Handlers for investigations (safety officers and admins).

use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::Json;
use safewatch_core::investigation::{
    Investigation, InvestigationFilter, InvestigationStatus, NewInvestigation, UpdateInvestigation,
};
use safewatch_core::search::SelectOption;
use serde::Serialize;
use validator::Validate;

use super::{paging, today};
use crate::error::AppResult;
use crate::middleware::gate::{Gate, SafetyTeam};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::{enum_options, ActionRow, IncidentRow, InvestigationRow, ListPage};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationListPage {
    pub filter: InvestigationFilter,
    pub statuses: Vec<SelectOption>,
    #[serde(flatten)]
    pub list: ListPage<InvestigationRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestigationDetailPage {
    pub investigation: Investigation,
    pub summary: InvestigationRow,
    pub incident: IncidentRow,
    pub corrective_actions: Vec<ActionRow>,
    pub statuses: Vec<SelectOption>,
}

/// GET /investigations
pub async fn list_investigations(
    State(state): State<AppState>,
    Gate(user, _): Gate<SafetyTeam>,
    Query(mut filter): Query<InvestigationFilter>,
) -> AppResult<Json<DataResponse<InvestigationListPage>>> {
    (filter.page, filter.limit) = paging(filter.page, filter.limit);
    let page = user.api(&state).list_investigations(&filter).await?;

    Ok(Json(DataResponse {
        data: InvestigationListPage {
            filter,
            statuses: enum_options(&InvestigationStatus::ALL),
            list: ListPage::from_paged(page, InvestigationRow::from),
        },
    }))
}

/// GET /investigations/{id}
///
/// The investigation, with its incident and the incident's corrective
/// actions.
pub async fn investigation_detail(
    State(state): State<AppState>,
    Gate(user, _): Gate<SafetyTeam>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<InvestigationDetailPage>>> {
    let api = user.api(&state);
    let investigation = api.get_investigation(&id).await?;

    let (incident, actions) = tokio::join!(
        api.get_incident(&investigation.incident_id),
        api.incident_corrective_actions(&investigation.incident_id),
    );
    let today = today();

    Ok(Json(DataResponse {
        data: InvestigationDetailPage {
            summary: InvestigationRow::from(investigation.clone()),
            investigation,
            incident: IncidentRow::from(incident?),
            corrective_actions: actions?.into_iter().map(|a| ActionRow::new(a, today)).collect(),
            statuses: enum_options(&InvestigationStatus::ALL),
        },
    }))
}

/// POST /incidents/{id}/investigation
pub async fn start_investigation(
    State(state): State<AppState>,
    Gate(user, _): Gate<SafetyTeam>,
    Path(incident_id): Path<String>,
    Json(form): Json<NewInvestigation>,
) -> AppResult<Redirect> {
    form.validate()?;
    let investigation = user.api(&state).start_investigation(&incident_id, &form).await?;
    tracing::info!(
        user_id = %user.user_id,
        incident_id = %incident_id,
        investigation_id = %investigation.id,
        "Investigation started"
    );
    Ok(Redirect::to(&format!("/investigations/{}", investigation.id)))
}

/// POST /investigations/{id}
///
/// Completing an investigation requires a root cause, either in this update
/// or already recorded.
pub async fn update_investigation(
    State(state): State<AppState>,
    Gate(user, _): Gate<SafetyTeam>,
    Path(id): Path<String>,
    Json(update): Json<UpdateInvestigation>,
) -> AppResult<Redirect> {
    update.validate()?;
    let api = user.api(&state);
    if update.status == Some(InvestigationStatus::Completed) {
        let existing = api.get_investigation(&id).await?;
        update.check_completion(&existing)?;
    }

    let investigation = api.update_investigation(&id, &update).await?;
    tracing::info!(
        user_id = %user.user_id,
        investigation_id = %investigation.id,
        status = ?investigation.status,
        "Investigation updated"
    );
    Ok(Redirect::to(&format!("/investigations/{}", investigation.id)))
}
