//! Incident and dashboard pages against a mocked backend.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, get_as, incident_json, location, post_json_as, set_cookies, BACKEND_TOKEN};
use httpmock::prelude::*;
use safewatch_core::roles::Role;
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: a mocked incident list renders the same count and references
// ---------------------------------------------------------------------------

#[tokio::test]
async fn incident_list_renders_backend_rows() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/incidents")
                .header("authorization", format!("Bearer {BACKEND_TOKEN}"))
                .query_param("severity", "critical");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "data": [
                        incident_json("1", "INC-2026-0001"),
                        incident_json("2", "INC-2026-0002"),
                        incident_json("3", "INC-2026-0003"),
                    ],
                    "pagination": { "page": 1, "limit": 10, "total": 3, "totalPages": 1 }
                }));
        })
        .await;

    let app = common::build_test_app(&server.base_url());
    let response = get_as(app, "/incidents?severity=critical", Role::Manager).await;

    assert_eq!(response.status(), StatusCode::OK);
    list.assert_async().await;

    let json = body_json(response).await;
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    let references: Vec<&str> = items
        .iter()
        .map(|i| i["referenceNumber"].as_str().unwrap())
        .collect();
    assert_eq!(references, ["INC-2026-0001", "INC-2026-0002", "INC-2026-0003"]);
    assert_eq!(items[0]["severity"]["label"], "Critical");
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["pagination"]["totalPages"], 1);
    assert_eq!(json["data"]["pagination"]["items"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: a backend 401 ends the page with the session-expired redirect
// ---------------------------------------------------------------------------

#[tokio::test]
async fn backend_401_redirects_to_login_and_hides_payload() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/incidents/my");
            then.status(401)
                .header("content-type", "application/json")
                .json_body(json!({ "code": "TOKEN_EXPIRED", "message": "jwt expired at 2026-10-16T09:00:00Z" }));
        })
        .await;

    let app = common::build_test_app(&server.base_url());
    let response = get_as(app, "/incidents/my", Role::Employee).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?error=SessionExpired");
    assert!(set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("safewatch_session=") && c.contains("Max-Age=0")));

    let body = body_text(response).await;
    assert!(!body.contains("jwt expired"));
}

// ---------------------------------------------------------------------------
// Test: status changes are checked before the backend sees them
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_status_transition_is_rejected_locally() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/incidents/1");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "data": incident_json("1", "INC-2026-0001") }));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT).path("/api/v1/incidents/1/status");
            then.status(200);
        })
        .await;

    let app = common::build_test_app(&server.base_url());
    let response = post_json_as(app, "/incidents/1/status", Role::Manager, json!({ "status": "resolved" })).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    update.assert_calls_async(0).await;
}

// ---------------------------------------------------------------------------
// Test: backend failures map to the error contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn backend_404_is_a_404_page() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/hazards/missing");
            then.status(404)
                .header("content-type", "application/json")
                .json_body(json!({ "code": "NOT_FOUND", "message": "Hazard not found" }));
        })
        .await;

    let app = common::build_test_app(&server.base_url());
    let response = get_as(app, "/hazards/missing", Role::Employee).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unreachable_backend_is_retryable_503() {
    // Nothing listens on port 9 (discard) in the test environment.
    let app = common::build_test_app("http://127.0.0.1:9");
    let response = get_as(app, "/incidents/my", Role::Employee).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NETWORK_ERROR");
    assert_eq!(json["retryable"], true);
}

// ---------------------------------------------------------------------------
// Test: dashboard sections settle independently
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dashboard_keeps_loaded_sections_when_one_fails() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/incidents/stats");
            then.status(500)
                .header("content-type", "application/json")
                .json_body(json!({ "code": "INTERNAL", "message": "stats unavailable" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/incidents/my");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "data": [incident_json("7", "INC-2026-0007")] }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/notifications/unread-count");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "data": { "count": 4 } }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/corrective-actions/assigned");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "data": [] }));
        })
        .await;

    let app = common::build_test_app(&server.base_url());
    let response = get_as(app, "/dashboard", Role::Employee).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let page = &json["data"];
    assert_eq!(page["stats"]["state"], "failed");
    assert_eq!(page["stats"]["code"], "SERVER_ERROR");
    assert_eq!(page["stats"]["retryable"], false);
    assert_eq!(page["recentIncidents"]["state"], "loaded");
    assert_eq!(page["recentIncidents"]["data"][0]["referenceNumber"], "INC-2026-0007");
    assert_eq!(page["unreadNotifications"]["data"], 4);
    assert_eq!(page["openActions"]["state"], "loaded");
    assert_eq!(page["viewer"]["isSupervisor"], false);
}

#[tokio::test]
async fn unknown_dashboard_section_is_404() {
    let server = MockServer::start_async().await;
    let app = common::build_test_app(&server.base_url());

    let response = get_as(app, "/dashboard/sections/weather", Role::Manager).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
