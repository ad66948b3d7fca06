//! Desktop host for the upload screen.
//!
//! Performs the I/O the core leaves to its host: picking (and cropping) the
//! image, reading its bytes, executing requests with a plain or a pinned
//! ureq agent, and drawing the view as text.

pub mod picker;
pub mod render;
pub mod source;
pub mod transport;

#[cfg(feature = "dialog")]
pub use picker::DialogPicker;
pub use picker::PathPicker;
pub use render::render;
pub use source::FileSource;
pub use transport::{PinnedTransport, PlainTransport};
