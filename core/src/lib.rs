//! Core of the image upload verification screen.
//!
//! # Overview
//! A user picks an image and sends it to an echo endpoint through one of
//! two HTTP client paths, a plain client or a certificate-pinning client.
//! The echoed request tells us whether the file field arrived, and the
//! screen shows the outcome.
//!
//! # Design
//! - Host-does-IO: `UploadClient` builds `HttpRequest` values and parses
//!   `HttpResponse` values; the host owns the network and the filesystem,
//!   loads the image bytes and picks the client.
//! - `Screen` owns the selected image and a tagged `ResponseState`. Uploads
//!   are tickets, and only the latest ticket may write a result.
//! - `Screen::view` is the whole render model, so every host draws the same
//!   screen.
//! - `flow::run_upload` ties the pieces together for hosts that can block a
//!   thread on an `ImageSource` and a `Transport`.

pub mod client;
pub mod echo;
pub mod error;
pub mod flow;
pub mod http;
pub mod multipart;
pub mod picker;
pub mod screen;
pub mod types;
pub mod view;

pub use client::{UploadClient, DEFAULT_ENDPOINT};
pub use echo::{inspect_echo, EchoVerdict, FILE_FIELD};
pub use error::{PickerError, UploadError};
pub use flow::{run_upload, ImageSource, SharedScreen, Transport};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use multipart::FormData;
pub use picker::{pick_image, ImagePicker};
pub use screen::{PendingUpload, ResponseState, Screen, UploadTicket};
pub use types::{
    ImageDescriptor, PickedImage, PickerOptions, PinningOptions, UploadVariant,
    FALLBACK_IMAGE_NAME,
};
pub use view::{Palette, ResultLabel, ScreenView, SendButton, Tone};
