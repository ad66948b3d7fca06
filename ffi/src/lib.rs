//! C-ABI wrapper around `upload-core`.
//!
//! # Overview
//! Lets a mobile shell drive the upload screen from any language with a C
//! FFI. The shell keeps its native picker, its file access and its own HTTP
//! stacks (plain and pinned); this library owns the screen state, builds the
//! multipart requests, interprets the echo and decides what the result area
//! says and how it is coloured.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - An upload is `upload_screen_begin` → host reads the bytes at
//!   `image_uri` → `upload_pending_request` → host executes the request
//!   with the client named by `variant` → `upload_screen_complete` (or
//!   `upload_screen_fail` if the image could not be read or no response was
//!   obtained).
//! - The C caller owns all returned pointers and must release them with the
//!   matching `upload_free_*` function.
//! - `build.rs` generates the C header into `OUT_DIR`; its path is exposed
//!   to the crate as the `UPLOAD_FFI_HEADER` compile-time variable.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use upload_core::error::UploadError;
use upload_core::http::HttpResponse;
use upload_core::types::{PickedImage, PickerOptions, PinningOptions};
use upload_core::{ImageDescriptor, Screen, UploadClient, DEFAULT_ENDPOINT};

use types::*;

/// Borrow a C string as `&str`. `None` for null or invalid UTF-8.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives the
/// returned borrow.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

// ---------------------------------------------------------------------------
// Screen lifecycle
// ---------------------------------------------------------------------------

/// Create a screen that uploads to `endpoint`.
///
/// A null `endpoint` selects the public echo endpoint. Returns null if
/// `endpoint` is not valid UTF-8 or an internal panic occurs. Free with
/// `upload_screen_free`.
#[unsafe(no_mangle)]
pub extern "C" fn upload_screen_new(endpoint: *const c_char) -> *mut FfiUploadScreen {
    catch_unwind(|| {
        let endpoint = if endpoint.is_null() {
            DEFAULT_ENDPOINT
        } else {
            match unsafe { borrow_str(endpoint) } {
                Some(e) => e,
                None => return std::ptr::null_mut(),
            }
        };
        let screen = Screen::new(UploadClient::new(endpoint));
        Box::into_raw(Box::new(FfiUploadScreen { inner: screen }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a screen created by `upload_screen_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn upload_screen_free(screen: *mut FfiUploadScreen) {
    if !screen.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(screen) });
        });
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Options the host must open its native picker with.
#[unsafe(no_mangle)]
pub extern "C" fn upload_picker_options() -> FfiPickerOptions {
    PickerOptions::default().into()
}

/// Replace the pinning options used for `Pinned` uploads.
///
/// `certs` points to `certs_len` certificate names; it may be null when
/// `certs_len` is 0.
#[unsafe(no_mangle)]
pub extern "C" fn upload_screen_set_pinning(
    screen: *mut FfiUploadScreen,
    disable_all_security: bool,
    pk_pinning: bool,
    certs: *const *const c_char,
    certs_len: u32,
) -> FfiErrorCode {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() || (certs.is_null() && certs_len > 0) {
            return FfiErrorCode::NullArg;
        }
        let mut names = Vec::with_capacity(certs_len as usize);
        for i in 0..certs_len as usize {
            let ptr = unsafe { *certs.add(i) };
            if ptr.is_null() {
                return FfiErrorCode::NullArg;
            }
            match unsafe { borrow_str(ptr) } {
                Some(name) => names.push(name.to_string()),
                None => return FfiErrorCode::InvalidUtf8,
            }
        }
        let screen = unsafe { &mut *screen };
        screen.inner.client_mut().set_pinning(PinningOptions {
            disable_all_security,
            pk_pinning,
            certs: names,
        });
        FfiErrorCode::Ok
    }))
    .unwrap_or(FfiErrorCode::Panic)
}

/// Current pinning flags. All false with `certs_len = 0` for a null screen.
#[unsafe(no_mangle)]
pub extern "C" fn upload_screen_pinning(screen: *const FfiUploadScreen) -> FfiPinningOptions {
    let empty = FfiPinningOptions {
        disable_all_security: false,
        pk_pinning: false,
        certs_len: 0,
    };
    catch_unwind(|| {
        if screen.is_null() {
            return empty;
        }
        let pinning = unsafe { &*screen }.inner.client().pinning();
        FfiPinningOptions {
            disable_all_security: pinning.disable_all_security,
            pk_pinning: pinning.pk_pinning,
            certs_len: pinning.certs.len() as u32,
        }
    })
    .unwrap_or(empty)
}

/// Name of the pinned certificate at `index`, or null when out of range.
/// Free with `upload_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn upload_screen_pinning_cert(
    screen: *const FfiUploadScreen,
    index: u32,
) -> *mut c_char {
    catch_unwind(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let pinning = unsafe { &*screen }.inner.client().pinning();
        match pinning.certs.get(index as usize) {
            Some(name) => c_string(name.as_str()),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Image selection
// ---------------------------------------------------------------------------

/// Record the image the native picker returned and clear the result area.
///
/// `path` and `mime` are required; `filename` may be null, in which case the
/// fallback name is used. Hosts should not call this on cancellation.
#[unsafe(no_mangle)]
pub extern "C" fn upload_screen_select_image(
    screen: *mut FfiUploadScreen,
    path: *const c_char,
    mime: *const c_char,
    filename: *const c_char,
) -> FfiErrorCode {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() || path.is_null() || mime.is_null() {
            return FfiErrorCode::NullArg;
        }
        let (Some(path), Some(mime)) = (unsafe { borrow_str(path) }, unsafe { borrow_str(mime) })
        else {
            return FfiErrorCode::InvalidUtf8;
        };
        let filename = if filename.is_null() {
            None
        } else {
            match unsafe { borrow_str(filename) } {
                Some(name) => Some(name.to_string()),
                None => return FfiErrorCode::InvalidUtf8,
            }
        };
        let screen = unsafe { &mut *screen };
        screen.inner.select_image(ImageDescriptor::from_picked(PickedImage {
            path: path.to_string(),
            mime: mime.to_string(),
            filename,
        }));
        FfiErrorCode::Ok
    }))
    .unwrap_or(FfiErrorCode::Panic)
}

/// True when an image is selected, i.e. when the send buttons are shown.
#[unsafe(no_mangle)]
pub extern "C" fn upload_screen_has_image(screen: *const FfiUploadScreen) -> bool {
    catch_unwind(|| !screen.is_null() && unsafe { &*screen }.inner.image().is_some())
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Upload flow
// ---------------------------------------------------------------------------

/// Start an upload through `variant`.
///
/// The screen is `InProgress` when this returns with a pending upload.
/// No file is read here; the host loads the image named by `image_uri`.
/// Free the result with `upload_free_begin_result`.
#[unsafe(no_mangle)]
pub extern "C" fn upload_screen_begin(
    screen: *mut FfiUploadScreen,
    variant: FfiUploadVariant,
) -> *mut FfiBeginResult {
    catch_unwind(AssertUnwindSafe(|| {
        if screen.is_null() {
            return FfiBeginResult::null_arg("screen");
        }
        let screen = unsafe { &mut *screen };
        match screen.inner.begin_upload(variant.into()) {
            Ok(pending) => FfiBeginResult::ok(pending, screen.inner.response()),
            Err(e) => FfiBeginResult::from_error(&e, screen.inner.response()),
        }
    }))
    .unwrap_or_else(|_| FfiBeginResult::panic("panic in upload_screen_begin"))
}

/// Build the request for `pending` around the `data_len` image bytes at
/// `data`. `data` may be null when `data_len` is 0.
///
/// Returns null for a null or already freed `pending`. Free with
/// `upload_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn upload_pending_request(
    pending: *const FfiPendingUpload,
    data: *const u8,
    data_len: usize,
) -> *mut FfiHttpRequest {
    catch_unwind(AssertUnwindSafe(|| {
        if pending.is_null() || (data.is_null() && data_len > 0) {
            return std::ptr::null_mut();
        }
        let pending = unsafe { &*pending };
        if pending.handle.is_null() {
            return std::ptr::null_mut();
        }
        let data = if data_len == 0 {
            Vec::new()
        } else {
            unsafe { std::slice::from_raw_parts(data, data_len) }.to_vec()
        };
        let request = unsafe { &*pending.handle }.inner.request(data);
        Box::into_raw(Box::new(FfiHttpRequest::from_core(request)))
    }))
    .unwrap_or(std::ptr::null_mut())
}

fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(resp.body) }
            .to_string_lossy()
            .into_owned()
    };
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    }
}

fn complete(
    screen: *mut FfiUploadScreen,
    pending: *const FfiPendingUpload,
    result: impl FnOnce() -> Result<HttpResponse, UploadError>,
) -> FfiCompletion {
    if screen.is_null() || pending.is_null() {
        return FfiCompletion::error(FfiErrorCode::NullArg);
    }
    let pending = unsafe { &*pending };
    if pending.handle.is_null() {
        return FfiCompletion::error(FfiErrorCode::NullArg);
    }
    let ticket = unsafe { &*pending.handle }.inner.ticket;
    let screen = unsafe { &mut *screen };
    let applied = screen.inner.complete_upload(ticket, result()).is_some();
    FfiCompletion {
        error_code: FfiErrorCode::Ok,
        applied,
        state: screen.inner.response().into(),
    }
}

/// Hand back the response the host received for `pending`.
#[unsafe(no_mangle)]
pub extern "C" fn upload_screen_complete(
    screen: *mut FfiUploadScreen,
    pending: *const FfiPendingUpload,
    response: *const FfiHttpResponse,
) -> FfiCompletion {
    catch_unwind(AssertUnwindSafe(|| {
        if response.is_null() {
            return FfiCompletion::error(FfiErrorCode::NullArg);
        }
        let response = ffi_response_to_core(unsafe { &*response });
        complete(screen, pending, || Ok(response))
    }))
    .unwrap_or(FfiCompletion::error(FfiErrorCode::Panic))
}

/// Report that no response was obtained for `pending`: the image could not
/// be read, the network failed or the pinned client refused the server.
/// `message` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn upload_screen_fail(
    screen: *mut FfiUploadScreen,
    pending: *const FfiPendingUpload,
    message: *const c_char,
) -> FfiCompletion {
    catch_unwind(AssertUnwindSafe(|| {
        let message = unsafe { borrow_str(message) }
            .unwrap_or("request rejected by host")
            .to_string();
        complete(screen, pending, || Err(UploadError::Transport(message)))
    }))
    .unwrap_or(FfiCompletion::error(FfiErrorCode::Panic))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn upload_screen_state(screen: *const FfiUploadScreen) -> FfiResponseState {
    catch_unwind(|| {
        if screen.is_null() {
            return FfiResponseState::Absent;
        }
        unsafe { &*screen }.inner.response().into()
    })
    .unwrap_or(FfiResponseState::Absent)
}

/// Result label text, or null while nothing has been sent.
/// Free with `upload_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn upload_screen_result_label(screen: *const FfiUploadScreen) -> *mut c_char {
    catch_unwind(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        match unsafe { &*screen }.inner.response().label() {
            Some(text) => c_string(text),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

#[unsafe(no_mangle)]
pub extern "C" fn upload_screen_result_tone(screen: *const FfiUploadScreen) -> FfiTone {
    catch_unwind(|| {
        if screen.is_null() {
            return FfiTone::Neutral;
        }
        unsafe { &*screen }.inner.response().tone().into()
    })
    .unwrap_or(FfiTone::Neutral)
}

/// Colours for the result area, or null while nothing has been sent.
/// Free with `upload_free_palette`.
#[unsafe(no_mangle)]
pub extern "C" fn upload_screen_result_palette(screen: *const FfiUploadScreen) -> *mut FfiPalette {
    catch_unwind(|| {
        if screen.is_null() {
            return std::ptr::null_mut();
        }
        let response = unsafe { &*screen }.inner.response();
        if response.label().is_none() {
            return std::ptr::null_mut();
        }
        Box::into_raw(Box::new(FfiPalette::from(response.tone().palette())))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiBeginResult` and the pending upload it carries.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn upload_free_begin_result(result: *mut FfiBeginResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.pending.is_null() {
            let pending = unsafe { Box::from_raw(result.pending) };
            if !pending.image_uri.is_null() {
                drop(unsafe { CString::from_raw(pending.image_uri) });
            }
            if !pending.handle.is_null() {
                drop(unsafe { Box::from_raw(pending.handle) });
            }
        }
    });
}

/// Free a request returned by `upload_pending_request`. Safe to call with
/// null.
#[unsafe(no_mangle)]
pub extern "C" fn upload_free_request(request: *mut FfiHttpRequest) {
    if request.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let mut request = unsafe { Box::from_raw(request) };
        unsafe { request.free_fields() };
    });
}

/// Free a palette returned by `upload_screen_result_palette`. Safe to call
/// with null.
#[unsafe(no_mangle)]
pub extern "C" fn upload_free_palette(palette: *mut FfiPalette) {
    if palette.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let palette = unsafe { Box::from_raw(palette) };
        for ptr in [palette.foreground, palette.background, palette.border] {
            if !ptr.is_null() {
                drop(unsafe { CString::from_raw(ptr) });
            }
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn upload_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
