//! Echo endpoint used as the upload target in tests and local runs.
//!
//! `ANY /request` answers with a JSON description of the request it
//! received, in the shape mockbin uses: form fields land in
//! `postData.params` keyed by field name. `ANY /status/{code}` answers with
//! the given status and `ANY /empty` with an empty 200. `bodySize` is the
//! length of the raw request body, framing included.

use std::collections::BTreeMap;

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, FromRequest, Multipart, Path, Query, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tracing::info;

const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoedRequest {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub query_string: BTreeMap<String, String>,
    pub post_data: PostData,
    pub body_size: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostData {
    pub mime_type: String,
    pub text: String,
    pub params: Map<String, Value>,
}

/// How a file field appears under `postData.params`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EchoedFile {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

pub fn app() -> Router {
    Router::new()
        .route("/request", any(echo_request))
        .route("/status/{code}", any(status))
        .route("/empty", any(empty))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo_request(request: Request) -> Result<Json<EchoedRequest>, Response> {
    let method = request.method().to_string();
    let url = request.uri().to_string();
    let headers: BTreeMap<String, String> = request
        .headers()
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
        .collect();
    let query_string = Query::<BTreeMap<String, String>>::try_from_uri(request.uri())
        .map(|Query(q)| q)
        .unwrap_or_default();
    let mime_type = headers
        .get(header::CONTENT_TYPE.as_str())
        .cloned()
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let bytes = <Bytes as FromRequest<()>>::from_request(request, &())
        .await
        .map_err(IntoResponse::into_response)?;
    let body_size = bytes.len();

    let mut params = Map::new();
    let mut text = String::new();

    if mime_type.starts_with("multipart/form-data") {
        let request = Request::builder()
            .header(header::CONTENT_TYPE, mime_type.as_str())
            .body(Body::from(bytes))
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())?;
        let mut multipart = <Multipart as FromRequest<()>>::from_request(request, &())
            .await
            .map_err(IntoResponse::into_response)?;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(IntoResponse::into_response)?
        {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field.bytes().await.map_err(IntoResponse::into_response)?;

            let value = match file_name {
                Some(file_name) => serde_json::to_value(EchoedFile {
                    file_name,
                    content_type,
                    size: data.len(),
                })
                .unwrap_or(Value::Null),
                None => Value::String(String::from_utf8_lossy(&data).into_owned()),
            };
            params.insert(name, value);
        }
    } else {
        text = String::from_utf8_lossy(&bytes).into_owned();
    }

    info!(%method, %url, params = params.len(), body_size, "echoing request");
    Ok(Json(EchoedRequest {
        method,
        url,
        headers,
        query_string,
        post_data: PostData {
            mime_type,
            text,
            params,
        },
        body_size,
    }))
}

async fn status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => {
            let message = status.canonical_reason().unwrap_or_default();
            (status, Json(serde_json::json!({ "code": code, "message": message }))).into_response()
        }
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn empty() -> StatusCode {
    StatusCode::OK
}
