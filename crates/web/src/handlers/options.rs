//! Searchable dropdown sources (assignees, departments).

use axum::extract::{Query, State};
use axum::Json;
use safewatch_core::pagination::{PageQuery, MAX_PAGE_SIZE};
use safewatch_core::people::UserFilter;
use safewatch_core::search::{filter_options, SelectOption, DEFAULT_OPTION_LIMIT};

use crate::error::AppResult;
use crate::middleware::gate::{Gate, Supervisors};
use crate::middleware::session::SessionUser;
use crate::query::OptionSearchParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /options/users?q=
///
/// Active users only; used by assignment forms.
pub async fn user_options(
    State(state): State<AppState>,
    Gate(user, _): Gate<Supervisors>,
    Query(params): Query<OptionSearchParams>,
) -> AppResult<Json<DataResponse<Vec<SelectOption>>>> {
    let filter = UserFilter {
        is_active: Some(true),
        page: Some(1),
        limit: Some(MAX_PAGE_SIZE),
        ..Default::default()
    };
    let users = user.api(&state).list_users(&filter).await?;
    let options: Vec<SelectOption> = users.items.iter().map(|u| u.to_option()).collect();

    Ok(Json(DataResponse {
        data: filter_options(&options, &params.q, option_limit(&params)),
    }))
}

/// GET /options/departments?q=
pub async fn department_options(
    State(state): State<AppState>,
    user: SessionUser,
    Query(params): Query<OptionSearchParams>,
) -> AppResult<Json<DataResponse<Vec<SelectOption>>>> {
    let query = PageQuery {
        page: Some(1),
        limit: Some(MAX_PAGE_SIZE),
    };
    let departments = user.api(&state).list_departments(&query).await?;
    let options: Vec<SelectOption> = departments
        .items
        .iter()
        .filter(|d| d.is_active)
        .map(|d| d.to_option())
        .collect();

    Ok(Json(DataResponse {
        data: filter_options(&options, &params.q, option_limit(&params)),
    }))
}

fn option_limit(params: &OptionSearchParams) -> usize {
    params
        .limit
        .unwrap_or(DEFAULT_OPTION_LIMIT)
        .clamp(1, MAX_PAGE_SIZE as usize)
}
