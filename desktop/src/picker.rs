//! Desktop image pickers.
//!
//! Stand-ins for the native crop picker: with cropping on, the source is
//! center-cropped to the requested aspect ratio, resized to exactly the
//! requested size and written as a JPEG, which is what a mobile crop picker
//! hands back. Cropped results carry no filename.
//!
//! Each picker owns the JPEG of its latest crop. The file lives until the
//! next crop replaces it or the picker is dropped.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use parking_lot::Mutex;
use tempfile::TempPath;
use tracing::debug;
use upload_core::{ImagePicker, PickedImage, PickerError, PickerOptions};

const CROPPED_MIME: &str = "image/jpeg";

/// Where cropped JPEGs go, and the one currently handed out.
#[derive(Debug)]
struct CropStore {
    dir: PathBuf,
    current: Mutex<Option<TempPath>>,
}

impl CropStore {
    fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            current: Mutex::new(None),
        }
    }

    /// Turn a chosen file into what the picker reports.
    fn prepare(&self, path: &Path, options: &PickerOptions) -> Result<PickedImage, PickerError> {
        if !options.cropping {
            return sniff(path);
        }
        let out = crop_to_jpeg(path, options, &self.dir)?;
        let picked = PickedImage {
            path: format!("file://{}", out.display()),
            mime: CROPPED_MIME.to_string(),
            filename: None,
        };
        // Replacing the previous crop deletes its file.
        *self.current.lock() = Some(out);
        Ok(picked)
    }
}

/// Picks the image named on the command line. No path reads as a
/// cancellation.
pub struct PathPicker {
    path: Option<PathBuf>,
    crop: bool,
    crops: CropStore,
}

impl PathPicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            crop: true,
            crops: CropStore::new(std::env::temp_dir()),
        }
    }

    /// Send the file as-is even when the screen asks for cropping.
    pub fn without_cropping(mut self) -> Self {
        self.crop = false;
        self
    }

    /// Directory cropped images are written to.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.crops = CropStore::new(dir.into());
        self
    }
}

impl ImagePicker for PathPicker {
    fn open(&self, options: &PickerOptions) -> Result<Option<PickedImage>, PickerError> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        let options = PickerOptions {
            cropping: options.cropping && self.crop,
            ..*options
        };
        self.crops.prepare(path, &options).map(Some)
    }
}

/// Picks through the platform file dialog.
#[cfg(feature = "dialog")]
pub struct DialogPicker {
    crop: bool,
    crops: CropStore,
}

#[cfg(feature = "dialog")]
impl DialogPicker {
    pub fn new(crop: bool) -> Self {
        Self {
            crop,
            crops: CropStore::new(std::env::temp_dir()),
        }
    }
}

#[cfg(feature = "dialog")]
impl ImagePicker for DialogPicker {
    fn open(&self, options: &PickerOptions) -> Result<Option<PickedImage>, PickerError> {
        let picked = rfd::FileDialog::new()
            .add_filter("images", &["png", "jpg", "jpeg", "webp"])
            .set_title("Select Image")
            .pick_file();
        let Some(path) = picked else {
            return Ok(None);
        };
        let options = PickerOptions {
            cropping: options.cropping && self.crop,
            ..*options
        };
        self.crops.prepare(&path, &options).map(Some)
    }
}

fn load_error(path: &Path, message: impl ToString) -> PickerError {
    PickerError::Load {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

fn sniff(path: &Path) -> Result<PickedImage, PickerError> {
    let bytes = std::fs::read(path).map_err(|e| load_error(path, e))?;
    let mime = infer::get(&bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream");
    if !mime.starts_with("image/") {
        return Err(load_error(path, format!("not an image ({mime})")));
    }
    Ok(PickedImage {
        path: format!("file://{}", path.display()),
        mime: mime.to_string(),
        filename: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
    })
}

fn crop_to_jpeg(
    path: &Path,
    options: &PickerOptions,
    output_dir: &Path,
) -> Result<TempPath, PickerError> {
    let img = image::open(path).map_err(|e| load_error(path, e))?;
    let cropped = crop_to_aspect(img, options.width, options.height);
    let resized = cropped.resize_exact(options.width, options.height, FilterType::Lanczos3);

    let mut file = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(".jpg")
        .tempfile_in(output_dir)
        .map_err(|e| PickerError::Write(e.to_string()))?;
    resized
        .to_rgb8()
        .write_to(&mut file, ImageFormat::Jpeg)
        .map_err(|e| PickerError::Write(e.to_string()))?;
    let out = file.into_temp_path();
    debug!(source = %path.display(), output = %out.display(), "cropped image");
    Ok(out)
}

/// Largest centered region of `img` with the aspect ratio `width:height`.
pub fn crop_to_aspect(img: DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    let (tw, th) = if u64::from(w) * u64::from(height) > u64::from(h) * u64::from(width) {
        // Too wide: keep full height.
        ((u64::from(h) * u64::from(width) / u64::from(height)) as u32, h)
    } else {
        (w, (u64::from(w) * u64::from(height) / u64::from(width)) as u32)
    };
    let (tw, th) = (tw.max(1), th.max(1));

    let x = w.saturating_sub(tw) / 2;
    let y = h.saturating_sub(th) / 2;
    img.crop_imm(x, y, tw, th)
}
