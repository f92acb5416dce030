//! Handlers for corrective actions: lists, status, extensions and
//! completion evidence.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::Redirect;
use axum::Json;
use safewatch_core::corrective_action::{
    self, ActionFilter, ActionStatus, ActionStatusChange, ActionType, CompletionReport, CorrectiveAction,
    ExtensionDecision, NewCorrectiveAction, NewExtensionRequest, Priority, EVIDENCE_DATA_FIELD,
};
use safewatch_core::error::CoreError;
use safewatch_core::roles::SAFETY_ROLES;
use safewatch_core::search::SelectOption;
use serde::Serialize;
use validator::Validate;

use super::{paging, today};
use crate::error::AppResult;
use crate::forms::read_upload;
use crate::middleware::gate::{ActionRegister, Gate, SafetyTeam};
use crate::middleware::session::SessionUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::{enum_options, ActionRow, ListPage, UploadRules};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionFilterOptions {
    pub statuses: Vec<SelectOption>,
    pub priorities: Vec<SelectOption>,
    pub action_types: Vec<SelectOption>,
}

impl ActionFilterOptions {
    fn all() -> Self {
        Self {
            statuses: enum_options(&ActionStatus::ALL),
            priorities: enum_options(&Priority::ALL),
            action_types: enum_options(&ActionType::ALL),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionListPage {
    pub filter: ActionFilter,
    pub options: ActionFilterOptions,
    #[serde(flatten)]
    pub list: ListPage<ActionRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDetailPage {
    pub action: CorrectiveAction,
    pub summary: ActionRow,
    pub next_statuses: Vec<SelectOption>,
    pub can_request_extension: bool,
    pub can_decide_extension: bool,
    pub can_complete: bool,
    pub uploads: UploadRules,
}

/// GET /corrective-actions
pub async fn list_actions(
    State(state): State<AppState>,
    Gate(user, _): Gate<ActionRegister>,
    Query(mut filter): Query<ActionFilter>,
) -> AppResult<Json<DataResponse<ActionListPage>>> {
    (filter.page, filter.limit) = paging(filter.page, filter.limit);
    let page = user.api(&state).list_corrective_actions(&filter).await?;
    Ok(list_page(filter, page))
}

/// GET /corrective-actions/assigned
pub async fn assigned_actions(
    State(state): State<AppState>,
    user: SessionUser,
    Query(mut filter): Query<ActionFilter>,
) -> AppResult<Json<DataResponse<ActionListPage>>> {
    (filter.page, filter.limit) = paging(filter.page, filter.limit);
    let page = user.api(&state).assigned_corrective_actions(&filter).await?;
    Ok(list_page(filter, page))
}

fn list_page(
    filter: ActionFilter,
    page: safewatch_client::Paged<CorrectiveAction>,
) -> Json<DataResponse<ActionListPage>> {
    let today = today();
    Json(DataResponse {
        data: ActionListPage {
            filter,
            options: ActionFilterOptions::all(),
            list: ListPage::from_paged(page, |a| ActionRow::new(a, today)),
        },
    })
}

/// GET /corrective-actions/{id}
pub async fn action_detail(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<ActionDetailPage>>> {
    let action = user.api(&state).get_corrective_action(&id).await?;
    let is_assignee = action
        .assigned_to
        .as_ref()
        .is_some_and(|a| a.id == user.user_id);
    let safety = SAFETY_ROLES.contains(&user.role);

    let next_statuses = action
        .status
        .transitions()
        .iter()
        .copied()
        .filter(|s| safety || *s != ActionStatus::Verified)
        .collect::<Vec<_>>();

    Ok(Json(DataResponse {
        data: ActionDetailPage {
            next_statuses: enum_options(&next_statuses),
            can_request_extension: is_assignee && !action.status.is_done() && !action.has_pending_extension(),
            can_decide_extension: safety && action.has_pending_extension(),
            can_complete: is_assignee && !action.status.is_done(),
            uploads: UploadRules::current(),
            summary: ActionRow::new(action.clone(), today()),
            action,
        },
    }))
}

/// POST /incidents/{id}/corrective-actions
pub async fn create_action(
    State(state): State<AppState>,
    Gate(user, _): Gate<SafetyTeam>,
    Path(incident_id): Path<String>,
    Json(form): Json<NewCorrectiveAction>,
) -> AppResult<Redirect> {
    form.check(today())?;
    let action = user.api(&state).create_corrective_action(&incident_id, &form).await?;
    tracing::info!(
        user_id = %user.user_id,
        incident_id = %incident_id,
        action_id = %action.id,
        assignee_id = %form.assignee_id,
        "Corrective action created"
    );
    Ok(Redirect::to(&format!("/incidents/{}", action.incident_id)))
}

/// POST /corrective-actions/{id}/status
///
/// Only the safety team may verify a completed action.
pub async fn change_action_status(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
    Json(change): Json<ActionStatusChange>,
) -> AppResult<Redirect> {
    if change.status == ActionStatus::Verified && !SAFETY_ROLES.contains(&user.role) {
        return Err(CoreError::Forbidden("Only the safety team can verify corrective actions".into()).into());
    }
    let api = user.api(&state);
    let current = api.get_corrective_action(&id).await?;
    corrective_action::validate_transition(current.status, change.status)?;

    let action = api.update_action_status(&id, &change).await?;
    tracing::info!(
        user_id = %user.user_id,
        action_id = %action.id,
        status = ?action.status,
        "Corrective action status changed"
    );
    Ok(Redirect::to(&format!("/corrective-actions/{}", action.id)))
}

/// POST /corrective-actions/{id}/extension
pub async fn request_extension(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
    Json(form): Json<NewExtensionRequest>,
) -> AppResult<Redirect> {
    let api = user.api(&state);
    let action = api.get_corrective_action(&id).await?;
    form.check(&action)?;

    let action = api.request_extension(&id, &form).await?;
    tracing::info!(
        user_id = %user.user_id,
        action_id = %action.id,
        requested_due_date = %form.requested_due_date,
        "Extension requested"
    );
    Ok(Redirect::to(&format!("/corrective-actions/{}", action.id)))
}

/// POST /corrective-actions/{id}/extension/decision
pub async fn decide_extension(
    State(state): State<AppState>,
    Gate(user, _): Gate<SafetyTeam>,
    Path(id): Path<String>,
    Json(decision): Json<ExtensionDecision>,
) -> AppResult<Redirect> {
    let api = user.api(&state);
    let action = api.get_corrective_action(&id).await?;
    if !action.has_pending_extension() {
        return Err(CoreError::Validation("No extension request is pending for this action".into()).into());
    }

    let action = api.decide_extension(&id, &decision).await?;
    tracing::info!(
        user_id = %user.user_id,
        action_id = %action.id,
        approved = decision.approved,
        "Extension decided"
    );
    Ok(Redirect::to(&format!("/corrective-actions/{}", action.id)))
}

/// POST /corrective-actions/{id}/complete
///
/// Multipart: `evidenceData` JSON with completion notes plus evidence files.
pub async fn complete_action(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let (report, files): (CompletionReport, _) = read_upload(multipart, EVIDENCE_DATA_FIELD).await?;
    report.validate()?;

    let action = user.api(&state).complete_corrective_action(&id, &report, files).await?;
    tracing::info!(user_id = %user.user_id, action_id = %action.id, "Corrective action completed");
    Ok(Redirect::to(&format!("/corrective-actions/{}", action.id)))
}
