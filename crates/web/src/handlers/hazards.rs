//! Handlers for hazard pages and forms.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::Redirect;
use axum::Json;
use safewatch_core::display::Badge;
use safewatch_core::hazard::{
    self, Hazard, HazardFilter, HazardStatus, HazardStatusChange, NewHazard, RiskLevel, HAZARD_DATA_FIELD,
};
use safewatch_core::roles::Role;
use safewatch_core::search::SelectOption;
use serde::Serialize;
use validator::Validate;

use super::paging;
use crate::error::AppResult;
use crate::forms::read_upload;
use crate::middleware::gate::{AdminOnly, Gate, HazardRegister, Supervisors};
use crate::middleware::session::SessionUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::{enum_options, HazardRow, ListPage, UploadRules};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardFilterOptions {
    pub statuses: Vec<SelectOption>,
    pub risk_levels: Vec<SelectOption>,
}

impl HazardFilterOptions {
    fn all() -> Self {
        Self {
            statuses: enum_options(&HazardStatus::ALL),
            risk_levels: enum_options(&RiskLevel::ALL),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardListPage {
    pub filter: HazardFilter,
    pub options: HazardFilterOptions,
    #[serde(flatten)]
    pub list: ListPage<HazardRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardFormPage {
    pub risk_levels: Vec<SelectOption>,
    pub uploads: UploadRules,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardDetailPage {
    pub hazard: Hazard,
    pub summary: HazardRow,
    pub next_statuses: Vec<SelectOption>,
    pub can_delete: bool,
}

/// GET /hazards
pub async fn list_hazards(
    State(state): State<AppState>,
    Gate(user, _): Gate<HazardRegister>,
    Query(mut filter): Query<HazardFilter>,
) -> AppResult<Json<DataResponse<HazardListPage>>> {
    (filter.page, filter.limit) = paging(filter.page, filter.limit);
    let page = user.api(&state).list_hazards(&filter).await?;
    Ok(list_page(filter, page))
}

/// GET /hazards/my
pub async fn my_hazards(
    State(state): State<AppState>,
    user: SessionUser,
    Query(mut filter): Query<HazardFilter>,
) -> AppResult<Json<DataResponse<HazardListPage>>> {
    (filter.page, filter.limit) = paging(filter.page, filter.limit);
    let page = user.api(&state).my_hazards(&filter).await?;
    Ok(list_page(filter, page))
}

fn list_page(filter: HazardFilter, page: safewatch_client::Paged<Hazard>) -> Json<DataResponse<HazardListPage>> {
    Json(DataResponse {
        data: HazardListPage {
            filter,
            options: HazardFilterOptions::all(),
            list: ListPage::from_paged(page, HazardRow::from),
        },
    })
}

/// GET /hazards/new
pub async fn new_hazard_form(_user: SessionUser) -> Json<DataResponse<HazardFormPage>> {
    Json(DataResponse {
        data: HazardFormPage {
            risk_levels: enum_options(&RiskLevel::ALL),
            uploads: UploadRules::current(),
        },
    })
}

/// GET /hazards/{id}
pub async fn hazard_detail(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<HazardDetailPage>>> {
    let hazard = user.api(&state).get_hazard(&id).await?;
    let next_statuses = if user.role.is_supervisor() {
        enum_options(hazard.status.transitions())
    } else {
        Vec::new()
    };

    Ok(Json(DataResponse {
        data: HazardDetailPage {
            summary: HazardRow::from(hazard.clone()),
            hazard,
            next_statuses,
            can_delete: user.role == Role::Admin,
        },
    }))
}

/// POST /hazards
///
/// Multipart: `hazardData` JSON plus optional `attachments`.
pub async fn create_hazard(
    State(state): State<AppState>,
    user: SessionUser,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let (form, files): (NewHazard, _) = read_upload(multipart, HAZARD_DATA_FIELD).await?;
    form.validate()?;

    let hazard = user.api(&state).create_hazard(&form, files).await?;
    tracing::info!(
        user_id = %user.user_id,
        hazard_id = %hazard.id,
        reference = %hazard.reference_number,
        "Hazard reported"
    );
    Ok(Redirect::to("/hazards"))
}

/// POST /hazards/{id}/status
pub async fn change_hazard_status(
    State(state): State<AppState>,
    Gate(user, _): Gate<Supervisors>,
    Path(id): Path<String>,
    Json(change): Json<HazardStatusChange>,
) -> AppResult<Redirect> {
    change.validate()?;
    let api = user.api(&state);
    let current = api.get_hazard(&id).await?;
    hazard::validate_transition(current.status, change.status)?;

    let hazard = api.update_hazard_status(&id, &change).await?;
    tracing::info!(
        user_id = %user.user_id,
        hazard_id = %hazard.id,
        from = current.status.label(),
        to = hazard.status.label(),
        "Hazard status changed"
    );
    Ok(Redirect::to(&format!("/hazards/{}", hazard.id)))
}

/// POST /hazards/{id}/delete
pub async fn delete_hazard(
    State(state): State<AppState>,
    Gate(user, _): Gate<AdminOnly>,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    user.api(&state).delete_hazard(&id).await?;
    tracing::info!(user_id = %user.user_id, hazard_id = %id, "Hazard deleted");
    Ok(Redirect::to("/hazards"))
}
