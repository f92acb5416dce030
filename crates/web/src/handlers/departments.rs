//! Admin handlers for departments.

use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::Json;
use safewatch_core::pagination::PageQuery;
use safewatch_core::people::{Department, DepartmentForm};
use validator::Validate;

use super::paging;
use crate::error::AppResult;
use crate::middleware::gate::{AdminOnly, Gate};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::ListPage;

const DEPARTMENTS_PATH: &str = "/admin/departments";

/// GET /admin/departments
pub async fn list_departments(
    State(state): State<AppState>,
    Gate(admin, _): Gate<AdminOnly>,
    Query(mut query): Query<PageQuery>,
) -> AppResult<Json<DataResponse<ListPage<Department>>>> {
    (query.page, query.limit) = paging(query.page, query.limit);
    let page = admin.api(&state).list_departments(&query).await?;
    Ok(Json(DataResponse {
        data: ListPage::from_paged(page, |d| d),
    }))
}

/// GET /admin/departments/{id}
pub async fn department_detail(
    State(state): State<AppState>,
    Gate(admin, _): Gate<AdminOnly>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Department>>> {
    let department = admin.api(&state).get_department(&id).await?;
    Ok(Json(DataResponse { data: department }))
}

/// POST /admin/departments
pub async fn create_department(
    State(state): State<AppState>,
    Gate(admin, _): Gate<AdminOnly>,
    Json(form): Json<DepartmentForm>,
) -> AppResult<Redirect> {
    form.validate()?;
    let department = admin.api(&state).create_department(&form).await?;
    tracing::info!(
        admin_id = %admin.user_id,
        department_id = %department.id,
        name = %department.name,
        "Department created"
    );
    Ok(Redirect::to(DEPARTMENTS_PATH))
}

/// POST /admin/departments/{id}
pub async fn update_department(
    State(state): State<AppState>,
    Gate(admin, _): Gate<AdminOnly>,
    Path(id): Path<String>,
    Json(form): Json<DepartmentForm>,
) -> AppResult<Redirect> {
    form.validate()?;
    let department = admin.api(&state).update_department(&id, &form).await?;
    tracing::info!(admin_id = %admin.user_id, department_id = %department.id, "Department updated");
    Ok(Redirect::to(DEPARTMENTS_PATH))
}

/// POST /admin/departments/{id}/delete
pub async fn delete_department(
    State(state): State<AppState>,
    Gate(admin, _): Gate<AdminOnly>,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    admin.api(&state).delete_department(&id).await?;
    tracing::info!(admin_id = %admin.user_id, department_id = %id, "Department deleted");
    Ok(Redirect::to(DEPARTMENTS_PATH))
}
