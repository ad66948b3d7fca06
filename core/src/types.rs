//! Domain types shared by the picker, the upload flows and the screen.
//!
//! # Design
//! `ImageDescriptor` serializes with the field names a mobile form uses
//! (`uri`, `type`, `name`) so test vectors and host bindings read the same.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Filename used when the picker does not report one.
pub const FALLBACK_IMAGE_NAME: &str = "IMAGEO1.JPG";

/// Options handed to the image picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerOptions {
    pub width: u32,
    pub height: u32,
    pub cropping: bool,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            width: 300,
            height: 400,
            cropping: true,
        }
    }
}

/// Raw result of a successful pick, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedImage {
    pub path: String,
    pub mime: String,
    pub filename: Option<String>,
}

/// A selected image, normalized for upload and preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub uri: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub name: String,
}

impl ImageDescriptor {
    pub fn from_picked(picked: PickedImage) -> Self {
        let name = picked
            .filename
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FALLBACK_IMAGE_NAME.to_string());
        Self {
            uri: picked.path,
            mime_type: picked.mime,
            name,
        }
    }

    /// Filesystem path behind `uri`, with any `file://` scheme stripped.
    pub fn local_path(&self) -> PathBuf {
        PathBuf::from(self.uri.strip_prefix("file://").unwrap_or(&self.uri))
    }
}

/// Which HTTP client path an upload goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadVariant {
    Plain,
    Pinned,
}

impl UploadVariant {
    pub fn label(&self) -> &'static str {
        match self {
            UploadVariant::Plain => "HTTP client",
            UploadVariant::Pinned => "pinned client",
        }
    }
}

/// Pinning configuration for the pinned client.
///
/// `certs` names DER certificate files trusted as the only roots when
/// security is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinningOptions {
    pub disable_all_security: bool,
    pub pk_pinning: bool,
    pub certs: Vec<String>,
}

impl Default for PinningOptions {
    /// Everything off, so the sample talks to a plain-HTTP echo endpoint.
    fn default() -> Self {
        Self {
            disable_all_security: true,
            pk_pinning: false,
            certs: Vec::new(),
        }
    }
}
