use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, EchoedFile, EchoedRequest};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn multipart_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::ACCEPT, "application/json")
        .header(http::header::CONTENT_TYPE, "multipart/form-data; boundary=XYZ")
        .body(body.to_string())
        .unwrap()
}

const FILE_BODY: &str = "--XYZ\r\n\
Content-Disposition: form-data; name=\"file\"; filename=\"IMAGEO1.JPG\"\r\n\
Content-Type: image/jpeg\r\n\r\n\
JPEG\r\n\
--XYZ--\r\n";

// --- echo ---

#[tokio::test]
async fn echo_reports_file_field() {
    let resp = app()
        .oneshot(multipart_request("PUT", "/request", FILE_BODY))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: EchoedRequest = body_json(resp).await;
    assert_eq!(echoed.method, "PUT");
    assert_eq!(echoed.headers["accept"], "application/json");
    assert!(echoed.post_data.mime_type.starts_with("multipart/form-data"));

    let file: EchoedFile = serde_json::from_value(echoed.post_data.params["file"].clone()).unwrap();
    assert_eq!(
        file,
        EchoedFile {
            file_name: "IMAGEO1.JPG".to_string(),
            content_type: "image/jpeg".to_string(),
            size: 4,
        }
    );
    assert_eq!(echoed.body_size, FILE_BODY.len());
}

#[tokio::test]
async fn echo_reports_text_fields_as_strings() {
    let body = "--XYZ\r\n\
Content-Disposition: form-data; name=\"note\"\r\n\r\n\
hello\r\n\
--XYZ--\r\n";
    let resp = app()
        .oneshot(multipart_request("POST", "/request", body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: EchoedRequest = body_json(resp).await;
    assert_eq!(echoed.post_data.params["note"], "hello");
    assert!(echoed.post_data.params.get("file").is_none());
}

#[tokio::test]
async fn echo_plain_body_has_no_params() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/request?x=1")
                .header(http::header::CONTENT_TYPE, "text/plain")
                .body("just text".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: EchoedRequest = body_json(resp).await;
    assert!(echoed.post_data.params.is_empty());
    assert_eq!(echoed.post_data.text, "just text");
    assert_eq!(echoed.query_string["x"], "1");
    assert_eq!(echoed.url, "/request?x=1");
}

#[tokio::test]
async fn echo_without_body_uses_octet_stream() {
    let resp = app()
        .oneshot(Request::builder().uri("/request").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echoed: EchoedRequest = body_json(resp).await;
    assert_eq!(echoed.method, "GET");
    assert_eq!(echoed.post_data.mime_type, "application/octet-stream");
    assert_eq!(echoed.body_size, 0);
}

// --- status ---

#[tokio::test]
async fn status_route_returns_requested_code() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/status/503")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["code"], 503);
    assert_eq!(body["message"], "Service Unavailable");
}

#[tokio::test]
async fn status_route_rejects_non_numeric_code() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/status/teapot")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- empty ---

#[tokio::test]
async fn empty_route_returns_no_body() {
    let resp = app()
        .oneshot(multipart_request("PUT", "/empty", FILE_BODY))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());
}
