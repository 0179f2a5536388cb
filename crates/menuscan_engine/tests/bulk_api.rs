use std::io::Write;

use menuscan_engine::{download_export, submit_batch, ExportError, RequestError};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_client() -> reqwest::Client {
    reqwest::Client::new()
}

fn csv_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("restaurants.csv");
    let mut file = std::fs::File::create(&path).expect("create csv");
    writeln!(file, "Restaurant Name,Location").expect("write header");
    writeln!(file, "Roll House,Indiranagar").expect("write row");
    path
}

#[tokio::test]
async fn accepted_upload_yields_job_id_and_roster() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bulk/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "job-42",
            "items": [
                { "id": "0", "name": "Roll House", "location": "Indiranagar", "status": "Queued" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let batch = submit_batch(&http_client(), &server.uri(), &csv_file(&dir))
        .await
        .expect("upload accepted");

    assert_eq!(batch.job_id, "job-42");
    assert_eq!(batch.items.len(), 1);
    assert_eq!(batch.items[0].name, "Roll House");
    assert_eq!(batch.items[0].status.as_deref(), Some("Queued"));
}

#[tokio::test]
async fn rejected_upload_surfaces_the_detail_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bulk/upload"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Missing columns: ['Location']"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let err = submit_batch(&http_client(), &server.uri(), &csv_file(&dir))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RequestError::Rejected("Missing columns: ['Location']".to_string())
    );
}

#[tokio::test]
async fn rejection_without_detail_falls_back_to_the_status_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bulk/upload"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let err = submit_batch(&http_client(), &server.uri(), &csv_file(&dir))
        .await
        .unwrap_err();

    assert_eq!(err, RequestError::HttpStatus(500));
}

#[tokio::test]
async fn missing_input_file_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bulk/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = submit_batch(
        &http_client(),
        &server.uri(),
        std::path::Path::new("/no/such/file.csv"),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RequestError::Io(_)));
}

#[tokio::test]
async fn export_downloads_to_the_requested_file() {
    let server = MockServer::start().await;
    let body = "Restaurant Name,Location,Status\nRoll House,Indiranagar,Completed\n";
    Mock::given(method("GET"))
        .and(path("/bulk/download/job-42"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let saved = download_export(
        &http_client(),
        &server.uri(),
        "job-42",
        dir.path(),
        "results.csv",
    )
    .await
    .expect("export ok");

    assert_eq!(saved, dir.path().join("results.csv"));
    assert_eq!(std::fs::read_to_string(&saved).expect("read back"), body);
}

#[tokio::test]
async fn export_of_an_unknown_job_is_a_request_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bulk/download/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let err = download_export(&http_client(), &server.uri(), "nope", dir.path(), "out.csv")
        .await
        .unwrap_err();

    assert_eq!(err, ExportError::Request(RequestError::HttpStatus(404)));
}
