//! Page gate behaviour: who is sent where, before any backend call.

mod common;

use axum::body::Body;
use axum::http::header::COOKIE;
use axum::http::{Method, Request, StatusCode};
use common::{get, get_as, location, send, set_cookies};
use httpmock::prelude::*;
use safewatch_core::roles::Role;

// ---------------------------------------------------------------------------
// Test: non-admin roles on admin pages are sent to /unauthorized
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_admins_cannot_open_admin_pages() {
    let server = MockServer::start_async().await;
    let backend = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(200);
        })
        .await;

    for role in [Role::Employee, Role::Manager, Role::SafetyOfficer] {
        for path in ["/admin/users", "/admin/departments", "/admin/temporary-employees"] {
            let app = common::build_test_app(&server.base_url());
            let response = get_as(app, path, role).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{role} on {path}");
            assert_eq!(location(&response), "/unauthorized", "{role} on {path}");
        }
    }

    backend.assert_calls_async(0).await;
}

// ---------------------------------------------------------------------------
// Test: employees opening a register are sent to their own view
// ---------------------------------------------------------------------------

#[tokio::test]
async fn employees_see_their_own_registers() {
    let server = MockServer::start_async().await;
    let cases = [
        ("/incidents", "/incidents/my"),
        ("/hazards", "/hazards/my"),
        ("/vpcs", "/vpcs/my"),
        ("/corrective-actions", "/corrective-actions/assigned"),
    ];

    for (path, alternate) in cases {
        let app = common::build_test_app(&server.base_url());
        let response = get_as(app, path, Role::Employee).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), alternate);
    }
}

#[tokio::test]
async fn managers_cannot_open_investigations() {
    let server = MockServer::start_async().await;
    let app = common::build_test_app(&server.base_url());

    let response = get_as(app, "/investigations", Role::Manager).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/unauthorized");
}

#[tokio::test]
async fn employees_cannot_open_reports() {
    let server = MockServer::start_async().await;
    let app = common::build_test_app(&server.base_url());

    let response = get_as(app, "/reports", Role::Employee).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/unauthorized");
}

// ---------------------------------------------------------------------------
// Test: unauthenticated requests go to login with a callback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn anonymous_page_request_redirects_to_login_with_callback() {
    let server = MockServer::start_async().await;
    let app = common::build_test_app(&server.base_url());

    let response = get(app, "/incidents?status=new&page=2").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/login?callbackUrl=%2Fincidents%3Fstatus%3Dnew%26page%3D2"
    );
}

#[tokio::test]
async fn expired_session_is_treated_as_absent() {
    let server = MockServer::start_async().await;
    let app = common::build_test_app(&server.base_url());

    let request = Request::builder()
        .uri("/dashboard")
        .header(COOKIE, common::expired_session_cookie(Role::Manager))
        .body(Body::empty())
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?callbackUrl=%2Fdashboard");
    assert!(set_cookies(&response).iter().any(|c| c.contains("Max-Age=0")));
}

#[tokio::test]
async fn anonymous_form_post_redirects_to_login_without_callback() {
    let server = MockServer::start_async().await;
    let app = common::build_test_app(&server.base_url());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/incidents/42/delete")
        .body(Body::empty())
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn tampered_session_cookie_redirects_to_login() {
    let server = MockServer::start_async().await;
    let app = common::build_test_app(&server.base_url());

    let request = Request::builder()
        .uri("/notifications")
        .header(COOKIE, "safewatch_session=not.a.jwt")
        .body(Body::empty())
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?callbackUrl=%2Fnotifications");
}

// ---------------------------------------------------------------------------
// Test: root and login page follow the session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn root_sends_each_role_home() {
    let server = MockServer::start_async().await;

    let response = get(common::build_test_app(&server.base_url()), "/").await;
    assert_eq!(location(&response), "/login");

    let response = get_as(common::build_test_app(&server.base_url()), "/", Role::Employee).await;
    assert_eq!(location(&response), "/incidents/my");

    let response = get_as(common::build_test_app(&server.base_url()), "/", Role::SafetyOfficer).await;
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn signed_in_user_on_login_page_follows_local_callback_only() {
    let server = MockServer::start_async().await;

    let response = get_as(
        common::build_test_app(&server.base_url()),
        "/login?callbackUrl=%2Fhazards%2Fmy",
        Role::Employee,
    )
    .await;
    assert_eq!(location(&response), "/hazards/my");

    let response = get_as(
        common::build_test_app(&server.base_url()),
        "/login?callbackUrl=https%3A%2F%2Fevil.example%2F",
        Role::Employee,
    )
    .await;
    assert_eq!(location(&response), "/incidents/my");
}

#[tokio::test]
async fn unauthorized_page_is_403() {
    let server = MockServer::start_async().await;
    let app = common::build_test_app(&server.base_url());

    let response = get_as(app, "/unauthorized", Role::Employee).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = common::body_json(response).await;
    assert_eq!(json["data"]["home"], "/incidents/my");
    assert_eq!(json["data"]["viewer"]["role"]["label"], "Employee");
}
