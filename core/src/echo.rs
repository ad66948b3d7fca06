//! Interpretation of the echo endpoint's reply.
//!
//! The endpoint sends back the request it received, with form fields under
//! `postData.params`. An upload counts as sent when `postData.params.file`
//! is truthy. Truthiness follows the loose rules a JSON consumer in a
//! browser would apply: `null`, `false`, `0`, `""` are falsy; objects and
//! arrays are truthy even when empty.

use serde_json::Value;

use crate::error::UploadError;

/// Name of the multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

/// Outcome of inspecting an echoed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoVerdict {
    Sent,
    NotSent,
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Decide whether the echo shows the file field.
///
/// A missing or falsy `postData` is `NotSent`. A truthy `postData` whose
/// `params` is missing is a malformed echo and reported as an error, as is a
/// top-level `null`.
pub fn inspect_echo(echo: &Value) -> Result<EchoVerdict, UploadError> {
    if echo.is_null() {
        return Err(UploadError::MalformedEcho("echo body is null".to_string()));
    }
    let post_data = match echo.get("postData") {
        Some(post_data) if is_truthy(post_data) => post_data,
        _ => return Ok(EchoVerdict::NotSent),
    };
    let params = match post_data.get("params") {
        Some(params) if !params.is_null() => params,
        _ => {
            return Err(UploadError::MalformedEcho(
                "postData has no params".to_string(),
            ))
        }
    };
    match params.get(FILE_FIELD) {
        Some(file) if is_truthy(file) => Ok(EchoVerdict::Sent),
        _ => Ok(EchoVerdict::NotSent),
    }
}
