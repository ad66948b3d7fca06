//! `multipart/form-data` encoding.
//!
//! Only what the upload flows need: file parts, CRLF framing and a closing
//! delimiter. Quotes and line breaks in names are percent-escaped
//! the way browsers do, so a hostile filename cannot break the framing.

use uuid::Uuid;

#[derive(Debug, Clone)]
struct FilePart {
    name: String,
    filename: String,
    content_type: String,
    data: Vec<u8>,
}

/// An in-memory multipart form.
#[derive(Debug, Clone)]
pub struct FormData {
    boundary: String,
    parts: Vec<FilePart>,
}

impl Default for FormData {
    fn default() -> Self {
        Self::new()
    }
}

impl FormData {
    pub fn new() -> Self {
        Self::with_boundary(random_boundary())
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn append_file(
        &mut self,
        name: &str,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> &mut Self {
        self.parts.push(FilePart {
            name: name.to_string(),
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            data,
        });
        self
    }

    /// Value for the request's `content-type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for part in &self.parts {
            out.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            out.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: {}\r\n\r\n",
                    escape(&part.name),
                    escape(&part.filename),
                    part.content_type
                )
                .as_bytes(),
            );
            out.extend_from_slice(&part.data);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        out
    }
}

pub fn random_boundary() -> String {
    format!("----upload-{}", Uuid::new_v4().simple())
}

fn escape(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
