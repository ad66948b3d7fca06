//! Image bytes from the local filesystem.

use tracing::debug;
use upload_core::{ImageDescriptor, ImageSource, UploadError};

/// Reads picked images from disk. `file://` URIs and bare paths both work.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl ImageSource for FileSource {
    fn load(&self, image: &ImageDescriptor) -> Result<Vec<u8>, UploadError> {
        let path = image.local_path();
        let data = std::fs::read(&path).map_err(|source| UploadError::ReadImage {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = data.len(), "loaded image");
        Ok(data)
    }
}
