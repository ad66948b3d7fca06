//! Stateless HTTP request builder and echo parser for the upload flows.
//!
//! # Design
//! `UploadClient` holds the endpoint and the pinning options and carries no
//! mutable state between calls. Each flow is split into `build_upload`,
//! which produces an `HttpRequest`, and `parse_upload`, which consumes an
//! `HttpResponse`. The host executes the round-trip in between, with a plain
//! client for `Plain` and a pinning-capable client for `Pinned`.

use serde_json::Value;
use tracing::info;

use crate::echo::{inspect_echo, EchoVerdict, FILE_FIELD};
use crate::error::UploadError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::{random_boundary, FormData};
use crate::types::{ImageDescriptor, PinningOptions, UploadVariant};

/// Public echo endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://mockbin.org/request";

/// Part content type the pinned flow always declares.
const PINNED_PART_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone)]
pub struct UploadClient {
    endpoint: String,
    pinning: PinningOptions,
}

impl Default for UploadClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl UploadClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            pinning: PinningOptions::default(),
        }
    }

    pub fn with_pinning(mut self, pinning: PinningOptions) -> Self {
        self.pinning = pinning;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Options a host must apply to the client executing `Pinned` requests.
    pub fn pinning(&self) -> &PinningOptions {
        &self.pinning
    }

    pub fn set_pinning(&mut self, pinning: PinningOptions) {
        self.pinning = pinning;
    }

    pub fn build_upload(
        &self,
        variant: UploadVariant,
        image: &ImageDescriptor,
        data: Vec<u8>,
    ) -> HttpRequest {
        self.build_upload_with_boundary(variant, image, data, &random_boundary())
    }

    /// Like `build_upload` with a caller-chosen multipart boundary.
    pub fn build_upload_with_boundary(
        &self,
        variant: UploadVariant,
        image: &ImageDescriptor,
        data: Vec<u8>,
        boundary: &str,
    ) -> HttpRequest {
        let part_type = match variant {
            UploadVariant::Plain => image.mime_type.as_str(),
            UploadVariant::Pinned => PINNED_PART_TYPE,
        };
        let mut form = FormData::with_boundary(boundary);
        form.append_file(FILE_FIELD, &image.name, part_type, data);
        HttpRequest {
            method: HttpMethod::Put,
            path: self.endpoint.clone(),
            headers: vec![
                ("accept".to_string(), "application/json".to_string()),
                ("content-type".to_string(), form.content_type()),
            ],
            body: Some(form.encode()),
        }
    }

    /// Decide whether the echo shows the file field, logging the echoed
    /// request for inspection.
    pub fn parse_upload(
        &self,
        variant: UploadVariant,
        response: &HttpResponse,
    ) -> Result<EchoVerdict, UploadError> {
        let echo = self.parse_echo(variant, response)?;
        info!(variant = ?variant, data = %echo, "sent data");
        inspect_echo(&echo)
    }

    /// Check the status and decode the echoed request as JSON. The plain
    /// flow requires a JSON body; the pinned flow reads an empty body as
    /// `{}`.
    fn parse_echo(
        &self,
        variant: UploadVariant,
        response: &HttpResponse,
    ) -> Result<Value, UploadError> {
        check_status(response)?;
        if variant == UploadVariant::Pinned && response.body.is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(&response.body)
            .map_err(|e| UploadError::Deserialization(e.to_string()))
    }
}

fn check_status(response: &HttpResponse) -> Result<(), UploadError> {
    if response.is_success() {
        return Ok(());
    }
    Err(UploadError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> UploadClient {
        UploadClient::new("http://localhost:3000/request")
    }

    fn image() -> ImageDescriptor {
        ImageDescriptor {
            uri: "file:///a.png".to_string(),
            mime_type: "image/png".to_string(),
            name: "a.png".to_string(),
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_upload_plain_produces_put_with_multipart_body() {
        let req = client().build_upload_with_boundary(
            UploadVariant::Plain,
            &image(),
            b"png".to_vec(),
            "B",
        );
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/request");
        assert_eq!(req.header("Accept"), Some("application/json"));
        assert_eq!(
            req.header("content-type"),
            Some("multipart/form-data; boundary=B")
        );
        let body = String::from_utf8(req.body.unwrap()).unwrap();
        assert!(body.contains("name=\"file\"; filename=\"a.png\""));
        assert!(body.contains("Content-Type: image/png"));
    }

    #[test]
    fn build_upload_pinned_forces_jpeg_part_type() {
        let req = client().build_upload_with_boundary(
            UploadVariant::Pinned,
            &image(),
            b"png".to_vec(),
            "B",
        );
        let body = String::from_utf8(req.body.unwrap()).unwrap();
        assert!(body.contains("Content-Type: image/jpeg"));
        assert!(!body.contains("image/png"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = UploadClient::new("http://localhost:3000/request/");
        assert_eq!(client.endpoint(), "http://localhost:3000/request");
    }

    #[test]
    fn default_client_targets_mockbin_with_pinning_disabled() {
        let client = UploadClient::default();
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
        assert!(client.pinning().disable_all_security);
        assert!(!client.pinning().pk_pinning);
        assert!(client.pinning().certs.is_empty());
    }

    #[test]
    fn parse_upload_plain_sent() {
        let verdict = client()
            .parse_upload(UploadVariant::Plain, &response(200, r#"{"postData":{"params":{"file":true}}}"#))
            .unwrap();
        assert_eq!(verdict, EchoVerdict::Sent);
    }

    #[test]
    fn parse_upload_plain_not_sent() {
        let verdict = client()
            .parse_upload(UploadVariant::Plain, &response(200, r#"{"postData":{"params":{}}}"#))
            .unwrap();
        assert_eq!(verdict, EchoVerdict::NotSent);
    }

    #[test]
    fn parse_upload_plain_empty_body_is_error() {
        let err = client().parse_upload(UploadVariant::Plain, &response(200, "")).unwrap_err();
        assert!(matches!(err, UploadError::Deserialization(_)));
    }

    #[test]
    fn parse_upload_pinned_empty_body_is_not_sent() {
        let verdict = client().parse_upload(UploadVariant::Pinned, &response(200, "")).unwrap();
        assert_eq!(verdict, EchoVerdict::NotSent);
    }

    #[test]
    fn parse_upload_pinned_bad_json_is_error() {
        let err = client().parse_upload(UploadVariant::Pinned, &response(200, "nope")).unwrap_err();
        assert!(matches!(err, UploadError::Deserialization(_)));
    }

    #[test]
    fn non_success_status_is_error_for_both_variants() {
        for variant in [UploadVariant::Plain, UploadVariant::Pinned] {
            let err = client()
                .parse_upload(variant, &response(500, "boom"))
                .unwrap_err();
            assert!(matches!(err, UploadError::HttpStatus { status: 500, .. }));
        }
    }

    #[test]
    fn created_status_counts_as_success() {
        let verdict = client()
            .parse_upload(UploadVariant::Plain, &response(201, r#"{"postData":{"params":{"file":"x"}}}"#))
            .unwrap();
        assert_eq!(verdict, EchoVerdict::Sent);
    }
}
