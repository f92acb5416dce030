//! Multipart record creation: forwarding to the backend and rejecting bad
//! files before any network call.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, SecondsFormat, Utc};
use common::{body_json, incident_json, location, post_multipart_as, Part};
use httpmock::prelude::*;
use safewatch_core::attachments::MAX_FILE_SIZE;
use safewatch_core::roles::Role;
use serde_json::json;

fn forklift_incident() -> String {
    let occurred_at = (Utc::now() - Duration::hours(2)).to_rfc3339_opts(SecondsFormat::Secs, true);
    json!({
        "type": "injury",
        "severityLevel": "critical",
        "title": "Forklift collision",
        "description": "Forklift struck a racking upright in aisle 4; operator bruised.",
        "location": "Warehouse 1, aisle 4",
        "occurredAt": occurred_at,
        "equipmentInvolved": "Forklift FL-07"
    })
    .to_string()
}

fn jpeg(size: usize) -> Vec<u8> {
    let mut data = vec![0u8; size];
    data[..3].copy_from_slice(&[0xFF, 0xD8, 0xFF]);
    data
}

// ---------------------------------------------------------------------------
// Test: the forklift report produces one multipart POST and a redirect
// ---------------------------------------------------------------------------

#[tokio::test]
async fn forklift_report_is_forwarded_once_and_redirects() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/incidents")
                .body_includes("name=\"incidentData\"")
                .body_includes("Forklift collision")
                .body_includes("name=\"attachments\"; filename=\"forklift.jpg\"");
            then.status(201)
                .header("content-type", "application/json")
                .json_body(json!({ "data": incident_json("42", "INC-2026-0042") }));
        })
        .await;

    let app = common::build_test_app(&server.base_url());
    let response = post_multipart_as(
        app,
        "/incidents",
        Role::Employee,
        vec![
            Part::Text {
                name: "incidentData",
                value: forklift_incident(),
            },
            Part::File {
                name: "attachments",
                file_name: "forklift.jpg",
                content_type: "image/jpeg",
                data: jpeg(2 * 1024 * 1024),
            },
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/incidents");
    create.assert_calls_async(1).await;
}

// ---------------------------------------------------------------------------
// Test: rejected files never reach the backend
// ---------------------------------------------------------------------------

#[tokio::test]
async fn oversized_file_is_rejected_without_backend_call() {
    let server = MockServer::start_async().await;
    let backend = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(201);
        })
        .await;

    let app = common::build_test_app(&server.base_url());
    let response = post_multipart_as(
        app,
        "/incidents",
        Role::Employee,
        vec![
            Part::Text {
                name: "incidentData",
                value: forklift_incident(),
            },
            Part::File {
                name: "attachments",
                file_name: "site-survey.jpg",
                content_type: "image/jpeg",
                data: jpeg(MAX_FILE_SIZE as usize + 1),
            },
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_FILES");
    assert_eq!(json["files"][0]["fileName"], "site-survey.jpg");
    assert_eq!(json["files"][0]["reason"], "too_large");
    assert!(json["error"].as_str().unwrap().contains("site-survey.jpg"));
    backend.assert_calls_async(0).await;
}

#[tokio::test]
async fn file_past_the_body_limit_is_still_named() {
    let server = MockServer::start_async().await;
    let backend = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(201);
        })
        .await;

    let app = common::build_test_app(&server.base_url());
    let response = post_multipart_as(
        app,
        "/incidents",
        Role::Employee,
        vec![
            Part::Text {
                name: "incidentData",
                value: forklift_incident(),
            },
            Part::File {
                name: "attachments",
                file_name: "drone-footage.jpg",
                content_type: "image/jpeg",
                data: jpeg(30 * 1024 * 1024),
            },
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_FILES");
    assert_eq!(json["files"][0]["fileName"], "drone-footage.jpg");
    assert_eq!(json["files"][0]["reason"], "too_large");
    assert!(json["error"].as_str().unwrap().contains("drone-footage.jpg"));
    backend.assert_calls_async(0).await;
}

#[tokio::test]
async fn oversized_file_is_reported_with_other_bad_files() {
    let server = MockServer::start_async().await;
    let backend = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(201);
        })
        .await;

    let app = common::build_test_app(&server.base_url());
    let response = post_multipart_as(
        app,
        "/incidents",
        Role::Employee,
        vec![
            Part::File {
                name: "attachments",
                file_name: "panorama.jpg",
                content_type: "image/jpeg",
                data: jpeg(MAX_FILE_SIZE as usize + 512 * 1024),
            },
            Part::File {
                name: "attachments",
                file_name: "macro.exe",
                content_type: "application/x-msdownload",
                data: vec![0x4D, 0x5A],
            },
            Part::Text {
                name: "incidentData",
                value: forklift_incident(),
            },
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_FILES");
    let names: Vec<&str> = json["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["fileName"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["panorama.jpg", "macro.exe"]);
    backend.assert_calls_async(0).await;
}

#[tokio::test]
async fn disallowed_type_is_rejected_without_backend_call() {
    let server = MockServer::start_async().await;
    let backend = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(201);
        })
        .await;

    let app = common::build_test_app(&server.base_url());
    let response = post_multipart_as(
        app,
        "/hazards",
        Role::Employee,
        vec![
            Part::Text {
                name: "hazardData",
                value: json!({
                    "title": "Frayed cable",
                    "description": "Extension cable frayed near the paint booth.",
                    "location": "Paint shop",
                    "riskLevel": "high"
                })
                .to_string(),
            },
            Part::File {
                name: "attachments",
                file_name: "installer.exe",
                content_type: "application/x-msdownload",
                data: vec![0x4D, 0x5A, 0x90, 0x00],
            },
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_FILES");
    assert!(json["error"].as_str().unwrap().contains("installer.exe"));
    backend.assert_calls_async(0).await;
}

#[tokio::test]
async fn missing_record_field_is_a_bad_request() {
    let server = MockServer::start_async().await;
    let app = common::build_test_app(&server.base_url());

    let response = post_multipart_as(
        app,
        "/vpcs",
        Role::Employee,
        vec![Part::File {
            name: "attachments",
            file_name: "photo.png",
            content_type: "image/png",
            data: vec![1, 2, 3],
        }],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn invalid_record_fields_are_422_with_field_errors() {
    let server = MockServer::start_async().await;
    let backend = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(201);
        })
        .await;

    let mut record: serde_json::Value = serde_json::from_str(&forklift_incident()).unwrap();
    record["title"] = json!("ab");

    let app = common::build_test_app(&server.base_url());
    let response = post_multipart_as(
        app,
        "/incidents",
        Role::Employee,
        vec![Part::Text {
            name: "incidentData",
            value: record.to_string(),
        }],
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["fields"]["title"].is_array());
    backend.assert_calls_async(0).await;
}
