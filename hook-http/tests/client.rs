use hook_http::{Auth, HttpClient, HttpError, RequestOpts, StatusCode};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> HttpClient {
    HttpClient::new(&format!("{}/api/", server.uri())).expect("mock base url")
}

#[tokio::test]
async fn post_json_decodes_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/echo"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"ping": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pong": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let got: Value = client
        .post_json_opts("echo", &json!({"ping": true}), RequestOpts::default())
        .await
        .expect("decoded");
    assert_eq!(got, json!({"pong": 1}));
}

#[tokio::test]
async fn post_json_maps_rejection_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/echo"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-request-id", "abc-123")
                .set_body_json(json!({"message": "not allowed"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .post_json_opts::<_, Value>("echo", &json!({}), RequestOpts::default())
        .await
        .unwrap_err();
    match err {
        HttpError::Api {
            status,
            message,
            request_id,
        } => {
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(message, "not allowed");
            assert_eq!(request_id, "abc-123");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn post_json_reports_decode_errors_with_snippet() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .post_json_opts::<_, Value>("echo", &json!({}), RequestOpts::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Decode(_, ref snippet) if snippet == "not json"));
}

#[tokio::test]
async fn raw_auth_is_sent_verbatim_to_absolute_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/elsewhere/hook"))
        .and(header("authorization", "tok-123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new("https://unused.invalid/").unwrap();
    let status = client
        .post_json_status(
            &format!("{}/elsewhere/hook", server.uri()),
            &json!({"x": 1}),
            RequestOpts {
                auth: Some(Auth::Raw("tok-123")),
                allow_absolute: true,
                ..Default::default()
            },
        )
        .await
        .expect("completed");
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn status_post_returns_rejections_as_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let status = client
        .post_json_status("echo", &json!({}), RequestOpts::default())
        .await
        .unwrap();
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn server_errors_surface_after_a_single_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(500)
                .insert_header("retry-after", "0")
                .set_body_json(json!({"error": {"message": "boom"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client
        .post_json_opts::<_, Value>("echo", &json!({}), RequestOpts::default())
        .await
        .unwrap_err();
    assert!(
        matches!(err, HttpError::Api { status, ref message, .. } if status == StatusCode::INTERNAL_SERVER_ERROR && message == "boom"),
        "{err:?}"
    );
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Nothing listens on port 1.
    let client = HttpClient::new("http://127.0.0.1:1/").unwrap();
    let err = client
        .post_json_status("echo", &json!({}), RequestOpts::default())
        .await
        .unwrap_err();
    assert!(err.is_transport(), "got {err:?}");
}
