//! Admin handlers for user accounts.

use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::Json;
use safewatch_core::people::{NewUser, UpdateUser, User, UserFilter};
use safewatch_core::roles::Role;
use safewatch_core::search::SelectOption;
use serde::Serialize;
use validator::Validate;

use super::paging;
use crate::error::AppResult;
use crate::middleware::gate::{AdminOnly, Gate};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::{enum_options, ListPage, UserRow};

const USERS_PATH: &str = "/admin/users";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListPage {
    pub filter: UserFilter,
    pub roles: Vec<SelectOption>,
    #[serde(flatten)]
    pub list: ListPage<UserRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailPage {
    pub user: User,
    pub summary: UserRow,
    pub roles: Vec<SelectOption>,
    /// False on the admin's own record: no self-demotion or deactivation.
    pub can_change_role: bool,
}

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Gate(admin, _): Gate<AdminOnly>,
    Query(mut filter): Query<UserFilter>,
) -> AppResult<Json<DataResponse<UserListPage>>> {
    (filter.page, filter.limit) = paging(filter.page, filter.limit);
    let page = admin.api(&state).list_users(&filter).await?;

    Ok(Json(DataResponse {
        data: UserListPage {
            filter,
            roles: enum_options(&Role::ALL),
            list: ListPage::from_paged(page, UserRow::from),
        },
    }))
}

/// GET /admin/users/{id}
pub async fn user_detail(
    State(state): State<AppState>,
    Gate(admin, _): Gate<AdminOnly>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<UserDetailPage>>> {
    let user = admin.api(&state).get_user(&id).await?;
    Ok(Json(DataResponse {
        data: UserDetailPage {
            can_change_role: user.id != admin.user_id,
            summary: UserRow::from(user.clone()),
            user,
            roles: enum_options(&Role::ALL),
        },
    }))
}

/// POST /admin/users
pub async fn create_user(
    State(state): State<AppState>,
    Gate(admin, _): Gate<AdminOnly>,
    Json(form): Json<NewUser>,
) -> AppResult<Redirect> {
    form.validate()?;
    let user = admin.api(&state).create_user(&form).await?;
    tracing::info!(
        admin_id = %admin.user_id,
        user_id = %user.id,
        role = %user.role,
        "User created"
    );
    Ok(Redirect::to(USERS_PATH))
}

/// POST /admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Gate(admin, _): Gate<AdminOnly>,
    Path(id): Path<String>,
    Json(update): Json<UpdateUser>,
) -> AppResult<Redirect> {
    update.validate()?;
    update.check_self_edit(&admin.user_id, &id)?;

    let user = admin.api(&state).update_user(&id, &update).await?;
    tracing::info!(admin_id = %admin.user_id, user_id = %user.id, "User updated");
    Ok(Redirect::to(USERS_PATH))
}

/// POST /admin/users/{id}/deactivate
///
/// The backend keeps the record; the account simply can no longer sign in.
pub async fn deactivate_user(
    State(state): State<AppState>,
    Gate(admin, _): Gate<AdminOnly>,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    UpdateUser {
        is_active: Some(false),
        ..Default::default()
    }
    .check_self_edit(&admin.user_id, &id)?;

    admin.api(&state).deactivate_user(&id).await?;
    tracing::info!(admin_id = %admin.user_id, user_id = %id, "User deactivated");
    Ok(Redirect::to(USERS_PATH))
}
