//! Handlers for incident pages and forms.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::Redirect;
use axum::Json;
use safewatch_core::display::Badge;
use safewatch_core::incident::{
    self, Assignment, Incident, IncidentFilter, IncidentStatus, IncidentStatusChange, IncidentType,
    NewIncident, Severity, UpdateIncident, INCIDENT_DATA_FIELD,
};
use safewatch_core::investigation::Investigation;
use safewatch_core::roles::Role;
use safewatch_core::search::SelectOption;
use serde::Serialize;
use validator::Validate;

use super::{paging, today};
use crate::error::AppResult;
use crate::forms::read_upload;
use crate::middleware::gate::{AdminOnly, Gate, IncidentRegister, SafetyTeam, Supervisors};
use crate::middleware::session::SessionUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::{enum_options, ActionRow, IncidentRow, InvestigationRow, ListPage, UploadRules};

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentFilterOptions {
    pub statuses: Vec<SelectOption>,
    pub types: Vec<SelectOption>,
    pub severities: Vec<SelectOption>,
}

impl IncidentFilterOptions {
    fn all() -> Self {
        Self {
            statuses: enum_options(&IncidentStatus::ALL),
            types: enum_options(&IncidentType::ALL),
            severities: enum_options(&Severity::ALL),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentListPage {
    pub filter: IncidentFilter,
    pub options: IncidentFilterOptions,
    #[serde(flatten)]
    pub list: ListPage<IncidentRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentFormPage {
    pub options: IncidentFilterOptions,
    pub uploads: UploadRules,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDetailPage {
    pub incident: Incident,
    pub summary: IncidentRow,
    /// Statuses the incident may move to, for supervisors.
    pub next_statuses: Vec<SelectOption>,
    pub investigation: Option<InvestigationRow>,
    pub corrective_actions: Vec<ActionRow>,
    pub can_assign: bool,
    pub can_delete: bool,
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// GET /incidents
///
/// Full incident register. Employees are redirected to `/incidents/my`.
pub async fn list_incidents(
    State(state): State<AppState>,
    Gate(user, _): Gate<IncidentRegister>,
    Query(mut filter): Query<IncidentFilter>,
) -> AppResult<Json<DataResponse<IncidentListPage>>> {
    (filter.page, filter.limit) = paging(filter.page, filter.limit);
    let page = user.api(&state).list_incidents(&filter).await?;
    Ok(list_page(filter, page))
}

/// GET /incidents/my
pub async fn my_incidents(
    State(state): State<AppState>,
    user: SessionUser,
    Query(mut filter): Query<IncidentFilter>,
) -> AppResult<Json<DataResponse<IncidentListPage>>> {
    (filter.page, filter.limit) = paging(filter.page, filter.limit);
    let page = user.api(&state).my_incidents(&filter).await?;
    Ok(list_page(filter, page))
}

fn list_page(
    filter: IncidentFilter,
    page: safewatch_client::Paged<Incident>,
) -> Json<DataResponse<IncidentListPage>> {
    Json(DataResponse {
        data: IncidentListPage {
            filter,
            options: IncidentFilterOptions::all(),
            list: ListPage::from_paged(page, IncidentRow::from),
        },
    })
}

/// GET /incidents/new
pub async fn new_incident_form(_user: SessionUser) -> Json<DataResponse<IncidentFormPage>> {
    Json(DataResponse {
        data: IncidentFormPage {
            options: IncidentFilterOptions::all(),
            uploads: UploadRules::current(),
        },
    })
}

/// GET /incidents/{id}
///
/// Supervisors also see the investigation and corrective actions, fetched
/// alongside the incident.
pub async fn incident_detail(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<IncidentDetailPage>>> {
    let api = user.api(&state);

    let (incident, investigation, actions) = if user.role.is_supervisor() {
        let (incident, investigation, actions) = tokio::join!(
            api.get_incident(&id),
            api.incident_investigation(&id),
            api.incident_corrective_actions(&id),
        );
        (incident?, investigation?, actions?)
    } else {
        (api.get_incident(&id).await?, None::<Investigation>, Vec::new())
    };

    let today = today();
    let next_statuses = if user.role.is_supervisor() {
        enum_options(incident.status.transitions())
    } else {
        Vec::new()
    };

    Ok(Json(DataResponse {
        data: IncidentDetailPage {
            summary: IncidentRow::from(incident.clone()),
            incident,
            next_statuses,
            investigation: investigation.map(InvestigationRow::from),
            corrective_actions: actions.into_iter().map(|a| ActionRow::new(a, today)).collect(),
            can_assign: matches!(user.role, Role::SafetyOfficer | Role::Admin),
            can_delete: user.role == Role::Admin,
        },
    }))
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// POST /incidents
///
/// Report an incident: multipart with the `incidentData` JSON field and up
/// to five `attachments`. Files are checked before anything is sent.
pub async fn create_incident(
    State(state): State<AppState>,
    user: SessionUser,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let (form, files): (NewIncident, _) = read_upload(multipart, INCIDENT_DATA_FIELD).await?;
    form.validate()?;

    let attachments = files.len();
    let incident = user.api(&state).create_incident(&form, files).await?;
    tracing::info!(
        user_id = %user.user_id,
        incident_id = %incident.id,
        reference = %incident.reference_number,
        attachments,
        "Incident reported"
    );
    Ok(Redirect::to("/incidents"))
}

/// POST /incidents/{id}/edit
pub async fn update_incident(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
    Json(update): Json<UpdateIncident>,
) -> AppResult<Redirect> {
    update.validate()?;
    let incident = user.api(&state).update_incident(&id, &update).await?;
    tracing::info!(user_id = %user.user_id, incident_id = %incident.id, "Incident updated");
    Ok(Redirect::to(&format!("/incidents/{}", incident.id)))
}

/// POST /incidents/{id}/status
///
/// The move is checked against the transition rules before the backend
/// sees it.
pub async fn change_incident_status(
    State(state): State<AppState>,
    Gate(user, _): Gate<Supervisors>,
    Path(id): Path<String>,
    Json(change): Json<IncidentStatusChange>,
) -> AppResult<Redirect> {
    change.validate()?;
    let api = user.api(&state);
    let current = api.get_incident(&id).await?;
    incident::validate_transition(current.status, change.status)?;

    let incident = api.update_incident_status(&id, &change).await?;
    tracing::info!(
        user_id = %user.user_id,
        incident_id = %incident.id,
        from = current.status.label(),
        to = incident.status.label(),
        "Incident status changed"
    );
    Ok(Redirect::to(&format!("/incidents/{}", incident.id)))
}

/// POST /incidents/{id}/assign
pub async fn assign_incident(
    State(state): State<AppState>,
    Gate(user, _): Gate<SafetyTeam>,
    Path(id): Path<String>,
    Json(assignment): Json<Assignment>,
) -> AppResult<Redirect> {
    assignment.validate()?;
    let incident = user.api(&state).assign_incident(&id, &assignment).await?;
    tracing::info!(
        user_id = %user.user_id,
        incident_id = %incident.id,
        assignee_id = %assignment.assignee_id,
        "Incident assigned"
    );
    Ok(Redirect::to(&format!("/incidents/{}", incident.id)))
}

/// POST /incidents/{id}/delete
pub async fn delete_incident(
    State(state): State<AppState>,
    Gate(user, _): Gate<AdminOnly>,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    user.api(&state).delete_incident(&id).await?;
    tracing::info!(user_id = %user.user_id, incident_id = %id, "Incident deleted");
    Ok(Redirect::to("/incidents"))
}
