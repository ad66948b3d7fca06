//! Running an upload end to end against host-supplied I/O.
//!
//! The screen lock is taken twice, once to begin and once to complete, and
//! never held while the image is loaded or the request is in flight. Other
//! threads can render `InProgress` or start a competing send meanwhile.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::UploadError;
use crate::http::{HttpRequest, HttpResponse};
use crate::screen::{ResponseState, Screen};
use crate::types::{ImageDescriptor, UploadVariant};

pub type SharedScreen = Arc<Mutex<Screen>>;

/// Executes a request over some HTTP client.
///
/// Non-2xx responses are returned as data; only failures to obtain a
/// response at all are errors.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, UploadError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, UploadError> {
        (**self).execute(request)
    }
}

/// Loads the bytes behind a picked image's `uri`.
pub trait ImageSource: Send + Sync {
    fn load(&self, image: &ImageDescriptor) -> Result<Vec<u8>, UploadError>;
}

impl<S: ImageSource + ?Sized> ImageSource for Arc<S> {
    fn load(&self, image: &ImageDescriptor) -> Result<Vec<u8>, UploadError> {
        (**self).load(image)
    }
}

/// Begin, load, execute and complete one upload.
///
/// Errors only when no image is selected. A load or transport failure is
/// folded into the screen as `Errored`. `Ok(None)` means the result arrived
/// after a newer send or selection and was dropped.
pub fn run_upload<S, T>(
    screen: &Mutex<Screen>,
    source: &S,
    transport: &T,
    variant: UploadVariant,
) -> Result<Option<ResponseState>, UploadError>
where
    S: ImageSource + ?Sized,
    T: Transport + ?Sized,
{
    let pending = screen.lock().begin_upload(variant)?;
    let result = source
        .load(&pending.image)
        .and_then(|data| transport.execute(pending.request(data)));
    Ok(screen.lock().complete_upload(pending.ticket, result))
}
