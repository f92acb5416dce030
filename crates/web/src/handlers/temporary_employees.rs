//! Admin handlers for temporary employees (contractors and visitors with a
//! validity period).

use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::Json;
use safewatch_core::pagination::PageQuery;
use safewatch_core::people::{TemporaryEmployee, TemporaryEmployeeForm};
use serde::Serialize;

use super::{paging, today};
use crate::error::AppResult;
use crate::middleware::gate::{AdminOnly, Gate};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::{ListPage, TemporaryEmployeeRow};

const TEMPORARY_EMPLOYEES_PATH: &str = "/admin/temporary-employees";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryEmployeeDetailPage {
    pub employee: TemporaryEmployee,
    pub summary: TemporaryEmployeeRow,
}

/// GET /admin/temporary-employees
pub async fn list_temporary_employees(
    State(state): State<AppState>,
    Gate(admin, _): Gate<AdminOnly>,
    Query(mut query): Query<PageQuery>,
) -> AppResult<Json<DataResponse<ListPage<TemporaryEmployeeRow>>>> {
    (query.page, query.limit) = paging(query.page, query.limit);
    let page = admin.api(&state).list_temporary_employees(&query).await?;
    let today = today();
    Ok(Json(DataResponse {
        data: ListPage::from_paged(page, |e| TemporaryEmployeeRow::new(e, today)),
    }))
}

/// GET /admin/temporary-employees/{id}
pub async fn temporary_employee_detail(
    State(state): State<AppState>,
    Gate(admin, _): Gate<AdminOnly>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<TemporaryEmployeeDetailPage>>> {
    let employee = admin.api(&state).get_temporary_employee(&id).await?;
    Ok(Json(DataResponse {
        data: TemporaryEmployeeDetailPage {
            summary: TemporaryEmployeeRow::new(employee.clone(), today()),
            employee,
        },
    }))
}

/// POST /admin/temporary-employees
pub async fn create_temporary_employee(
    State(state): State<AppState>,
    Gate(admin, _): Gate<AdminOnly>,
    Json(form): Json<TemporaryEmployeeForm>,
) -> AppResult<Redirect> {
    form.check()?;
    let employee = admin.api(&state).create_temporary_employee(&form).await?;
    tracing::info!(
        admin_id = %admin.user_id,
        employee_id = %employee.id,
        valid_until = %employee.valid_until,
        "Temporary employee registered"
    );
    Ok(Redirect::to(TEMPORARY_EMPLOYEES_PATH))
}

/// POST /admin/temporary-employees/{id}
pub async fn update_temporary_employee(
    State(state): State<AppState>,
    Gate(admin, _): Gate<AdminOnly>,
    Path(id): Path<String>,
    Json(form): Json<TemporaryEmployeeForm>,
) -> AppResult<Redirect> {
    form.check()?;
    let employee = admin.api(&state).update_temporary_employee(&id, &form).await?;
    tracing::info!(admin_id = %admin.user_id, employee_id = %employee.id, "Temporary employee updated");
    Ok(Redirect::to(TEMPORARY_EMPLOYEES_PATH))
}

/// POST /admin/temporary-employees/{id}/delete
pub async fn delete_temporary_employee(
    State(state): State<AppState>,
    Gate(admin, _): Gate<AdminOnly>,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    admin.api(&state).delete_temporary_employee(&id).await?;
    tracing::info!(admin_id = %admin.user_id, employee_id = %id, "Temporary employee removed");
    Ok(Redirect::to(TEMPORARY_EMPLOYEES_PATH))
}
