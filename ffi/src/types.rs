//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations: `*mut
//! c_char` for text, pointer plus length for the binary request body, and
//! enums with explicit discriminants. Conversions live here so `lib.rs`
//! stays focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use upload_core::error::UploadError;
use upload_core::http::HttpMethod;
use upload_core::screen::{PendingUpload, ResponseState};
use upload_core::types::{PickerOptions, UploadVariant};
use upload_core::view::{Palette, Tone};

/// Opaque handle to a `Screen`. C callers receive a pointer to this and
/// pass it back into every `upload_screen_*` function.
pub struct FfiUploadScreen {
    pub(crate) inner: upload_core::Screen,
}

/// Opaque handle to one started upload. Turns the host's image bytes into
/// a request and identifies the attempt on completion.
pub struct FfiUploadHandle {
    pub(crate) inner: PendingUpload,
}

pub(crate) fn c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Put = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Put => FfiHttpMethod::Put,
        }
    }
}

/// Which client the host must execute the request with.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiUploadVariant {
    Plain = 0,
    Pinned = 1,
}

impl From<FfiUploadVariant> for UploadVariant {
    fn from(v: FfiUploadVariant) -> Self {
        match v {
            FfiUploadVariant::Plain => UploadVariant::Plain,
            FfiUploadVariant::Pinned => UploadVariant::Pinned,
        }
    }
}

impl From<UploadVariant> for FfiUploadVariant {
    fn from(v: UploadVariant) -> Self {
        match v {
            UploadVariant::Plain => FfiUploadVariant::Plain,
            UploadVariant::Pinned => FfiUploadVariant::Pinned,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiResponseState {
    Absent = 0,
    InProgress = 1,
    Succeeded = 2,
    Failed = 3,
    Errored = 4,
}

impl From<ResponseState> for FfiResponseState {
    fn from(s: ResponseState) -> Self {
        match s {
            ResponseState::Absent => FfiResponseState::Absent,
            ResponseState::InProgress => FfiResponseState::InProgress,
            ResponseState::Succeeded => FfiResponseState::Succeeded,
            ResponseState::Failed => FfiResponseState::Failed,
            ResponseState::Errored => FfiResponseState::Errored,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiTone {
    Neutral = 0,
    Good = 1,
    Bad = 2,
}

impl From<Tone> for FfiTone {
    fn from(t: Tone) -> Self {
        match t {
            Tone::Neutral => FfiTone::Neutral,
            Tone::Good => FfiTone::Good,
            Tone::Bad => FfiTone::Bad,
        }
    }
}

/// Error codes returned across the boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NoImage = 1,
    ReadImage = 2,
    Transport = 3,
    Http = 4,
    Deserialization = 5,
    MalformedEcho = 6,
    UnsupportedPinning = 7,
    Panic = 8,
    NullArg = 9,
    InvalidUtf8 = 10,
}

impl From<&UploadError> for FfiErrorCode {
    fn from(e: &UploadError) -> Self {
        match e {
            UploadError::NoImage => FfiErrorCode::NoImage,
            UploadError::ReadImage { .. } => FfiErrorCode::ReadImage,
            UploadError::Transport(_) => FfiErrorCode::Transport,
            UploadError::HttpStatus { .. } => FfiErrorCode::Http,
            UploadError::Deserialization(_) => FfiErrorCode::Deserialization,
            UploadError::MalformedEcho(_) => FfiErrorCode::MalformedEcho,
            UploadError::UnsupportedPinning(_) => FfiErrorCode::UnsupportedPinning,
        }
    }
}

// ---------------------------------------------------------------------------
// Picker and pinning
// ---------------------------------------------------------------------------

/// Options the host must open its native picker with.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FfiPickerOptions {
    pub width: u32,
    pub height: u32,
    pub cropping: bool,
}

impl From<PickerOptions> for FfiPickerOptions {
    fn from(o: PickerOptions) -> Self {
        FfiPickerOptions {
            width: o.width,
            height: o.height,
            cropping: o.cropping,
        }
    }
}

/// Pinning flags the host must apply to its pinned client. Certificate
/// names are read one at a time with `upload_screen_pinning_cert`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FfiPinningOptions {
    pub disable_all_security: bool,
    pub pk_pinning: bool,
    pub certs_len: u32,
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// `body` holds `body_len` raw bytes (multipart data is binary and may
/// contain NULs) and is null when the request has no body.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut u8,
    pub body_len: usize,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: upload_core::HttpRequest) -> Self {
        let path = c_string(req.path);

        let (body, body_len) = match req.body {
            Some(b) => {
                let len = b.len();
                let ptr = Box::into_raw(b.into_boxed_slice()) as *mut u8;
                (ptr, len)
            }
            None => (std::ptr::null_mut(), 0),
        };

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        FfiHttpRequest {
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
            body_len,
        }
    }

    /// Release every allocation owned by this request.
    ///
    /// # Safety
    /// The request must have been produced by `from_core` and not freed yet.
    pub(crate) unsafe fn free_fields(&mut self) {
        if !self.path.is_null() {
            drop(CString::from_raw(self.path));
            self.path = std::ptr::null_mut();
        }
        if !self.body.is_null() {
            let slice = std::ptr::slice_from_raw_parts_mut(self.body, self.body_len);
            drop(Box::from_raw(slice));
            self.body = std::ptr::null_mut();
        }
        if !self.headers.is_null() && self.headers_len > 0 {
            let slice =
                std::ptr::slice_from_raw_parts_mut(self.headers, self.headers_len as usize);
            let headers = Box::from_raw(slice);
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(CString::from_raw(h.key));
                }
                if !h.value.is_null() {
                    drop(CString::from_raw(h.value));
                }
            }
            self.headers = std::ptr::null_mut();
        }
    }
}

/// A started upload. The host loads the file at `image_uri`, passes its
/// bytes to `upload_pending_request`, executes the returned request with
/// the client matching `variant`, then hands this struct back to
/// `upload_screen_complete` or `upload_screen_fail`.
#[repr(C)]
pub struct FfiPendingUpload {
    pub ticket_id: u64,
    pub variant: FfiUploadVariant,
    pub image_uri: *mut c_char,
    pub handle: *mut FfiUploadHandle,
}

impl FfiPendingUpload {
    pub(crate) fn from_core(pending: PendingUpload) -> *mut Self {
        let ticket_id = pending.ticket.id();
        let variant = pending.ticket.variant().into();
        let image_uri = c_string(pending.image.uri.as_str());
        let handle = Box::into_raw(Box::new(FfiUploadHandle { inner: pending }));
        Box::into_raw(Box::new(FfiPendingUpload {
            ticket_id,
            variant,
            image_uri,
            handle,
        }))
    }
}

/// Colours for the result area, as CSS colour strings.
#[repr(C)]
pub struct FfiPalette {
    pub foreground: *mut c_char,
    pub background: *mut c_char,
    pub border: *mut c_char,
}

impl From<Palette> for FfiPalette {
    fn from(p: Palette) -> Self {
        FfiPalette {
            foreground: c_string(p.foreground),
            background: c_string(p.background),
            border: c_string(p.border),
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller builds this on the stack after executing a request. The
/// FFI layer reads but does not free these fields. A null `body` is an
/// empty body.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Result of `upload_screen_begin`.
///
/// On success `pending` is non-null and `error_code` is `Ok`. On failure
/// `pending` is null and `error_message` describes the fault. `state` is the
/// screen state after the call either way.
#[repr(C)]
pub struct FfiBeginResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub state: FfiResponseState,
    pub pending: *mut FfiPendingUpload,
}

impl FfiBeginResult {
    pub(crate) fn ok(pending: PendingUpload, state: ResponseState) -> *mut Self {
        Box::into_raw(Box::new(FfiBeginResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            state: state.into(),
            pending: FfiPendingUpload::from_core(pending),
        }))
    }

    pub(crate) fn from_error(err: &UploadError, state: ResponseState) -> *mut Self {
        Box::into_raw(Box::new(FfiBeginResult {
            error_code: err.into(),
            error_message: c_string(err.to_string()),
            state: state.into(),
            pending: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, &format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, msg)
    }

    fn failure(error_code: FfiErrorCode, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiBeginResult {
            error_code,
            error_message: c_string(msg),
            state: FfiResponseState::Absent,
            pending: std::ptr::null_mut(),
        }))
    }
}

/// Result of completing or failing an upload. Returned by value.
///
/// `applied` is false when the ticket was stale and the screen ignored the
/// result; `state` is the screen state after the call.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct FfiCompletion {
    pub error_code: FfiErrorCode,
    pub applied: bool,
    pub state: FfiResponseState,
}

impl FfiCompletion {
    pub(crate) fn error(error_code: FfiErrorCode) -> Self {
        FfiCompletion {
            error_code,
            applied: false,
            state: FfiResponseState::Absent,
        }
    }
}
