//! Client behaviour against a mocked backend.

use std::time::Duration;

use assert_matches::assert_matches;
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use httpmock::prelude::*;
use safewatch_client::{ApiError, BackendClient};
use safewatch_core::attachments::{UploadFile, MAX_FILE_SIZE};
use safewatch_core::incident::{IncidentFilter, IncidentStatus, IncidentType, NewIncident, Severity};
use safewatch_core::report::{ReportFormat, ReportRequest, ReportType};
use serde_json::json;

const TOKEN: &str = "backend-token";

fn client(server: &MockServer) -> BackendClient {
    BackendClient::new(&server.base_url(), Duration::from_secs(5)).unwrap()
}

fn incident_json(id: &str, reference: &str) -> serde_json::Value {
    json!({
        "id": id,
        "referenceNumber": reference,
        "type": "injury",
        "severityLevel": "high",
        "status": "new",
        "title": "Slip near loading bay",
        "description": "Worker slipped on spilled hydraulic fluid.",
        "location": "Warehouse 2",
        "occurredAt": "2026-10-01T08:30:00Z",
        "createdAt": "2026-10-01T09:00:00Z"
    })
}

fn forklift_incident() -> NewIncident {
    NewIncident {
        incident_type: IncidentType::Injury,
        severity_level: Severity::Critical,
        title: "Forklift collision".into(),
        description: "Forklift struck a racking upright in aisle 4.".into(),
        location: "Warehouse 1".into(),
        occurred_at: Utc::now() - ChronoDuration::hours(1),
        witnesses: vec![],
        environmental_conditions: None,
        equipment_involved: Some("Forklift FL-07".into()),
    }
}

#[tokio::test]
async fn list_incidents_parses_data_and_pagination() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/incidents")
                .header("authorization", format!("Bearer {TOKEN}"))
                .query_param("status", "new");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "data": [incident_json("1", "INC-2026-0001"), incident_json("2", "INC-2026-0002")],
                    "pagination": { "page": 1, "limit": 10, "total": 2, "totalPages": 1 }
                }));
        })
        .await;

    let backend = client(&server);
    let filter = IncidentFilter {
        status: Some(IncidentStatus::New),
        ..Default::default()
    };
    let page = backend.session(TOKEN).list_incidents(&filter).await.unwrap();

    mock.assert_async().await;
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[1].reference_number, "INC-2026-0002");
    assert_eq!(page.page_info.total_pages, 1);
}

#[tokio::test]
async fn expired_token_is_reported_as_auth_expired() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/incidents/stats");
            then.status(401)
                .header("content-type", "application/json")
                .json_body(json!({ "code": "TOKEN_EXPIRED", "message": "jwt expired" }));
        })
        .await;

    let err = client(&server).session(TOKEN).incident_stats().await.unwrap_err();
    assert_matches!(err, ApiError::AuthExpired);
}

#[tokio::test]
async fn missing_token_never_calls_backend() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(200);
        })
        .await;

    let err = client(&server).session("").me().await.unwrap_err();
    assert_matches!(err, ApiError::AuthRequired);
    mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn html_success_response_is_unknown_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/incidents/42");
            then.status(200)
                .header("content-type", "text/html")
                .body("<html>login</html>");
        })
        .await;

    let err = client(&server).session(TOKEN).get_incident("42").await.unwrap_err();
    assert_matches!(err, ApiError::Unknown { status: Some(200), .. });
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn server_errors_are_not_retryable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/hazards/h-1");
            then.status(500)
                .header("content-type", "application/json")
                .json_body(json!({ "code": "INTERNAL", "message": "database unavailable" }));
        })
        .await;

    let err = client(&server).session(TOKEN).get_hazard("h-1").await.unwrap_err();
    assert_matches!(err, ApiError::Server { status: 500, ref message } if message == "database unavailable");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn unreachable_backend_is_retryable_network_error() {
    let backend = BackendClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = backend.session(TOKEN).incident_stats().await.unwrap_err();
    assert_matches!(err, ApiError::Network(_));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn missing_investigation_is_none() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/incidents/7/investigation");
            then.status(404)
                .header("content-type", "application/json")
                .json_body(json!({ "code": "NOT_FOUND", "message": "No investigation" }));
        })
        .await;

    let found = client(&server)
        .session(TOKEN)
        .incident_investigation("7")
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn incident_upload_sends_one_multipart_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/incidents")
                .header_exists("content-type")
                .body_includes("name=\"incidentData\"")
                .body_includes("Forklift collision")
                .body_includes("name=\"attachments\"; filename=\"forklift.jpg\"");
            then.status(201)
                .header("content-type", "application/json")
                .json_body(json!({ "data": incident_json("9", "INC-2026-0009") }));
        })
        .await;

    // ASCII payload keeps the multipart body matchable as text.
    let photo = UploadFile::new("forklift.jpg", Some("image/jpeg".into()), vec![b'a'; 2 * 1024 * 1024]);
    let created = client(&server)
        .session(TOKEN)
        .create_incident(&forklift_incident(), vec![photo])
        .await
        .unwrap();

    mock.assert_calls_async(1).await;
    assert_eq!(created.reference_number, "INC-2026-0009");
}

#[tokio::test]
async fn rejected_files_never_reach_backend() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(201);
        })
        .await;

    let oversized = UploadFile::new(
        "huge.png",
        Some("image/png".into()),
        vec![b'a'; MAX_FILE_SIZE as usize + 1],
    );
    let script = UploadFile::new("payload.exe", None, b"MZ".to_vec());

    let err = client(&server)
        .session(TOKEN)
        .create_incident(&forklift_incident(), vec![oversized, script])
        .await
        .unwrap_err();

    assert_matches!(err, ApiError::InvalidFiles(ref rejections) => {
        assert_eq!(rejections.len(), 2);
        assert!(rejections[0].message.contains("huge.png"));
        assert!(rejections[1].message.contains("payload.exe"));
    });
    mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn report_download_keeps_backend_file_name() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/reports/generate")
                .body_includes("\"format\":\"pdf\"");
            then.status(200)
                .header("content-type", "application/pdf")
                .header("content-disposition", "attachment; filename=\"incident-report.pdf\"")
                .body("%PDF-1.7");
        })
        .await;

    let request = ReportRequest {
        report_type: ReportType::Incidents,
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        format: ReportFormat::Pdf,
    };
    let file = client(&server).session(TOKEN).generate_report(&request).await.unwrap();

    assert_eq!(file.file_name, "incident-report.pdf");
    assert_eq!(file.content_type, "application/pdf");
    assert_eq!(file.data, b"%PDF-1.7");
}
