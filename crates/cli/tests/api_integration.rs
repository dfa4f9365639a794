use futures::StreamExt;
use omicia_cli_api::{ApiClient, Payload, PatchOperation, QueryParams};
use wiremock::matchers::{basic_auth, body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri())
        .unwrap()
        .with_basic_auth("user@example.com", "fake-password")
}

#[tokio::test]
async fn test_get_sends_basic_auth_and_repeated_query_pairs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reports/1542/variants"))
        .and(basic_auth("user@example.com", "fake-password"))
        .and(query_param("status", "FAILED_CONFIRMATION"))
        .and(query_param("status", "REVIEWED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "objects": [{"id": 1, "status": "REVIEWED"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut query = QueryParams::new();
    query.push_list("status", "FAILED_CONFIRMATION,REVIEWED");

    let response = client(&mock_server)
        .get("/reports/1542/variants", &query)
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(response.json().unwrap()["objects"][0]["id"], 1);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query(),
        Some("status=FAILED_CONFIRMATION&status=REVIEWED")
    );
}

#[tokio::test]
async fn test_get_without_query_has_no_question_mark() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/assay_types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"objects": []})))
        .mount(&mock_server)
        .await;

    client(&mock_server)
        .get("/assay_types", &QueryParams::new())
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_post_json_serializes_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reports/9/variants/77/internal_notes"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({"note": "Confirmed by Sanger"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 5,
            "note": "Confirmed by Sanger"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client(&mock_server)
        .post_json(
            "/reports/9/variants/77/internal_notes",
            &serde_json::json!({"note": "Confirmed by Sanger"}),
        )
        .await
        .unwrap();

    assert_eq!(response.status.as_u16(), 201);
    assert_eq!(response.json().unwrap()["id"], 5);
}

#[tokio::test]
async fn test_post_raw_sends_body_verbatim() {
    let mock_server = MockServer::start().await;
    let raw = r#"{"Patient Name": "Eric",  "Gender": "Male"}"#;

    Mock::given(method("POST"))
        .and(path("/reports/2029/patient_fields"))
        .and(body_string(raw))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Patient Name": "Eric"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client(&mock_server)
        .post_raw("/reports/2029/patient_fields", raw)
        .await
        .unwrap();

    assert!(response.is_success());
}

#[tokio::test]
async fn test_patch_sends_json_patch_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/reports/2029/update_status/"))
        .and(header("content-type", "application/json-patch+json"))
        .and(body_json(serde_json::json!([
            {"op": "replace", "path": "/status", "value": "REVIEWED"}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 2029,
            "status": "REVIEWED"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client(&mock_server)
        .patch(
            "/reports/2029/update_status/",
            &[PatchOperation::replace("/status", "REVIEWED")],
        )
        .await
        .unwrap();

    assert_eq!(response.json().unwrap()["status"], "REVIEWED");
}

#[tokio::test]
async fn test_structured_error_is_returned_not_raised() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reports/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "description": "invalid panel_id"
        })))
        .mount(&mock_server)
        .await;

    let response = client(&mock_server)
        .post_json("/reports/", &serde_json::json!({"panel_id": -1}))
        .await
        .unwrap();

    assert!(!response.is_success());
    assert_eq!(response.description(), Some("invalid panel_id"));
}

#[tokio::test]
async fn test_non_json_body_is_kept_as_raw_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/assay_types/3"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let response = client(&mock_server)
        .get("/assay_types/3", &QueryParams::new())
        .await
        .unwrap();

    assert_eq!(
        response.payload,
        Payload::Raw("<html>Bad Gateway</html>".to_string())
    );
}

#[tokio::test]
async fn test_stream_yields_bounded_chunks() {
    let mock_server = MockServer::start().await;
    let vcf: String = std::iter::once("##fileformat=VCFv4.1\n".to_string())
        .chain((0..200).map(|i| format!("1\t{}\t.\tA\tG\t50\tPASS\t.\n", 1000 + i)))
        .collect();

    Mock::given(method("GET"))
        .and(path("/reports/1542/variants"))
        .and(query_param("format", "VCF"))
        .respond_with(ResponseTemplate::new(200).set_body_string(vcf.clone()))
        .mount(&mock_server)
        .await;

    let mut query = QueryParams::new();
    query.push("format", "VCF");

    let response = client(&mock_server)
        .get_stream("/reports/1542/variants", &query)
        .await
        .unwrap();

    let chunks: Vec<_> = response
        .into_chunks()
        .map(|chunk| chunk.unwrap())
        .collect()
        .await;

    assert!(chunks.iter().all(|chunk| chunk.len() <= 1024));
    assert_eq!(chunks.concat(), vcf.into_bytes());
}

#[tokio::test]
async fn test_connection_failure_is_an_error() {
    let client = ApiClient::new("http://127.0.0.1:1")
        .unwrap()
        .with_basic_auth("u", "p");
    let result = client.get("/assay_types", &QueryParams::new()).await;

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("HTTP request failed"));
    assert!(err.suggestion().is_some());
}
