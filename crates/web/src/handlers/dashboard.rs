//! Handlers for the dashboard page.
//!
//! The dashboard is assembled from independent sections fetched
//! concurrently. Each section settles on its own: a slow or failing section
//! does not hold back or break the others. The one exception is an auth
//! failure, which ends the whole page with a login redirect.

use std::future::Future;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use safewatch_client::{ApiError, ApiResult, ApiSession};
use safewatch_core::corrective_action::ActionFilter;
use safewatch_core::error::CoreError;
use safewatch_core::incident::{IncidentFilter, IncidentStats};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::session::SessionUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::views::{ActionRow, IncidentRow, Viewer};

/// Rows shown in the "recent" lists.
const RECENT_LIMIT: u32 = 5;

/// Actions fetched for the open-actions list before dropping finished ones.
const ACTIONS_FETCH_LIMIT: u32 = 20;

// ---------------------------------------------------------------------------
// Section model
// ---------------------------------------------------------------------------

/// State of one dashboard section.
#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Section<T> {
    Loaded {
        data: T,
    },
    Failed {
        code: &'static str,
        message: String,
        retryable: bool,
    },
    /// Not ready within the page budget; fetch again from `retryUrl`.
    Loading {
        #[serde(rename = "retryUrl")]
        retry_url: String,
    },
}

/// Named sections, addressable for retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionName {
    Stats,
    RecentIncidents,
    Notifications,
    OpenActions,
}

impl SectionName {
    pub fn slug(self) -> &'static str {
        match self {
            SectionName::Stats => "stats",
            SectionName::RecentIncidents => "recent-incidents",
            SectionName::Notifications => "notifications",
            SectionName::OpenActions => "open-actions",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        [
            SectionName::Stats,
            SectionName::RecentIncidents,
            SectionName::Notifications,
            SectionName::OpenActions,
        ]
        .into_iter()
        .find(|s| s.slug() == slug)
    }

    fn retry_url(self) -> String {
        format!("/dashboard/sections/{}", self.slug())
    }
}

/// Turn a finished fetch into a section. Auth failures are passed up.
fn settle<T>(name: SectionName, result: ApiResult<T>) -> Result<Section<T>, ApiError> {
    match result {
        Ok(data) => Ok(Section::Loaded { data }),
        Err(e) if e.is_auth() => Err(e),
        Err(e) => {
            tracing::warn!(section = name.slug(), code = e.code(), error = %e, "Dashboard section failed");
            Ok(Section::Failed {
                code: e.code(),
                message: e.to_string(),
                retryable: e.is_retryable(),
            })
        }
    }
}

/// Fetch one section within `budget`; past it the section is left loading.
///
/// Dropping the timed-out future cancels its backend request.
async fn load_section<T, F>(name: SectionName, budget: Duration, fetch: F) -> Result<Section<T>, ApiError>
where
    F: Future<Output = ApiResult<T>>,
{
    match tokio::time::timeout(budget, fetch).await {
        Ok(result) => settle(name, result),
        Err(_) => {
            tracing::debug!(section = name.slug(), budget_ms = budget.as_millis() as u64, "Section over budget");
            Ok(Section::Loading {
                retry_url: name.retry_url(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Section fetchers
// ---------------------------------------------------------------------------

async fn fetch_recent_incidents(api: ApiSession<'_>, supervisor: bool) -> ApiResult<Vec<IncidentRow>> {
    let filter = IncidentFilter {
        limit: Some(RECENT_LIMIT),
        ..Default::default()
    };
    let page = if supervisor {
        api.list_incidents(&filter).await?
    } else {
        api.my_incidents(&filter).await?
    };
    Ok(page.items.into_iter().map(IncidentRow::from).collect())
}

async fn fetch_unread(api: ApiSession<'_>) -> ApiResult<u64> {
    Ok(api.unread_notification_count().await?.count)
}

/// Unfinished actions: all of them for supervisors, assigned ones otherwise.
async fn fetch_open_actions(api: ApiSession<'_>, supervisor: bool) -> ApiResult<Vec<ActionRow>> {
    let filter = ActionFilter {
        limit: Some(ACTIONS_FETCH_LIMIT),
        ..Default::default()
    };
    let page = if supervisor {
        api.list_corrective_actions(&filter).await?
    } else {
        api.assigned_corrective_actions(&filter).await?
    };
    let today = chrono::Utc::now().date_naive();
    Ok(page
        .items
        .into_iter()
        .filter(|a| !a.status.is_done())
        .take(RECENT_LIMIT as usize)
        .map(|a| ActionRow::new(a, today))
        .collect())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPage {
    pub viewer: Viewer,
    pub stats: Section<IncidentStats>,
    pub recent_incidents: Section<Vec<IncidentRow>>,
    pub unread_notifications: Section<u64>,
    pub open_actions: Section<Vec<ActionRow>>,
}

/// GET /dashboard
pub async fn dashboard(State(state): State<AppState>, user: SessionUser) -> AppResult<Json<DataResponse<DashboardPage>>> {
    let api = user.api(&state);
    let supervisor = user.role.is_supervisor();
    let budget = Duration::from_millis(state.config.backend.section_timeout_ms);

    let (stats, recent_incidents, unread_notifications, open_actions) = tokio::join!(
        load_section(SectionName::Stats, budget, api.incident_stats()),
        load_section(SectionName::RecentIncidents, budget, fetch_recent_incidents(api, supervisor)),
        load_section(SectionName::Notifications, budget, fetch_unread(api)),
        load_section(SectionName::OpenActions, budget, fetch_open_actions(api, supervisor)),
    );

    Ok(Json(DataResponse {
        data: DashboardPage {
            viewer: Viewer::from(&user),
            stats: stats?,
            recent_incidents: recent_incidents?,
            unread_notifications: unread_notifications?,
            open_actions: open_actions?,
        },
    }))
}

/// GET /dashboard/sections/{name}
///
/// Re-fetch a single section without the page budget.
pub async fn section(
    State(state): State<AppState>,
    user: SessionUser,
    Path(name): Path<String>,
) -> AppResult<Response> {
    let section = SectionName::from_slug(&name).ok_or_else(|| CoreError::NotFound {
        entity: "Dashboard section",
        id: name.clone(),
    })?;
    let api = user.api(&state);
    let supervisor = user.role.is_supervisor();

    let response = match section {
        SectionName::Stats => section_response(settle(section, api.incident_stats().await)?),
        SectionName::RecentIncidents => {
            section_response(settle(section, fetch_recent_incidents(api, supervisor).await)?)
        }
        SectionName::Notifications => section_response(settle(section, fetch_unread(api).await)?),
        SectionName::OpenActions => {
            section_response(settle(section, fetch_open_actions(api, supervisor).await)?)
        }
    };
    Ok(response)
}

fn section_response<T: Serialize>(section: Section<T>) -> Response {
    Json(DataResponse { data: section }).into_response()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn slugs_round_trip() {
        for name in [
            SectionName::Stats,
            SectionName::RecentIncidents,
            SectionName::Notifications,
            SectionName::OpenActions,
        ] {
            assert_eq!(SectionName::from_slug(name.slug()), Some(name));
        }
        assert_eq!(SectionName::from_slug("weather"), None);
    }

    #[test]
    fn failures_become_failed_sections() {
        let section = settle::<u64>(SectionName::Stats, Err(ApiError::Network("refused".into())));
        assert_matches!(section, Ok(Section::Failed { code: "NETWORK_ERROR", retryable: true, .. }));
    }

    #[test]
    fn auth_failures_are_passed_up() {
        let section = settle::<u64>(SectionName::Stats, Err(ApiError::AuthExpired));
        assert_matches!(section, Err(ApiError::AuthExpired));
    }

    #[tokio::test]
    async fn slow_sections_are_left_loading() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<u64, ApiError>(1)
        };
        let section = load_section(SectionName::Notifications, Duration::from_millis(10), slow).await;
        assert_matches!(section, Ok(Section::Loading { retry_url }) => {
            assert_eq!(retry_url, "/dashboard/sections/notifications");
        });
    }

    #[test]
    fn sections_serialize_with_state_tag() {
        let json = serde_json::to_value(Section::<u64>::Loading {
            retry_url: "/dashboard/sections/stats".into(),
        })
        .unwrap();
        assert_eq!(json["state"], "loading");
        assert_eq!(json["retryUrl"], "/dashboard/sections/stats");
    }
}
