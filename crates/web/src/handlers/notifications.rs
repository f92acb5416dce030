//! Handlers for the signed-in user's notifications.

use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::Json;
use safewatch_core::pagination::PageQuery;
use serde::Serialize;

use super::paging;
use crate::error::AppResult;
use crate::middleware::session::SessionUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::{ListPage, NotificationRow};

const NOTIFICATIONS_PATH: &str = "/notifications";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListPage {
    pub unread: u64,
    #[serde(flatten)]
    pub list: ListPage<NotificationRow>,
}

/// GET /notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    user: SessionUser,
    Query(mut query): Query<PageQuery>,
) -> AppResult<Json<DataResponse<NotificationListPage>>> {
    (query.page, query.limit) = paging(query.page, query.limit);
    let api = user.api(&state);
    let (page, unread) = tokio::join!(api.list_notifications(&query), api.unread_notification_count());
    let now = chrono::Utc::now();

    Ok(Json(DataResponse {
        data: NotificationListPage {
            unread: unread?.count,
            list: ListPage::from_paged(page?, |n| NotificationRow::new(n, now)),
        },
    }))
}

/// POST /notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
) -> AppResult<Redirect> {
    user.api(&state).mark_notification_read(&id).await?;
    tracing::debug!(user_id = %user.user_id, notification_id = %id, "Notification read");
    Ok(Redirect::to(NOTIFICATIONS_PATH))
}

/// POST /notifications/read-all
pub async fn mark_all_read(State(state): State<AppState>, user: SessionUser) -> AppResult<Redirect> {
    user.api(&state).mark_all_notifications_read().await?;
    tracing::debug!(user_id = %user.user_id, "All notifications read");
    Ok(Redirect::to(NOTIFICATIONS_PATH))
}
