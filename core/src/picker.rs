//! Image picker contract.
//!
//! The picker itself is platform code (a native crop picker on mobile, a
//! file dialog or a command-line path on desktop). The core only fixes the
//! options it is opened with and how its result becomes an
//! `ImageDescriptor`.

use crate::error::PickerError;
use crate::types::{ImageDescriptor, PickedImage, PickerOptions};

pub trait ImagePicker {
    /// Open the picker. `Ok(None)` means the user cancelled.
    fn open(&self, options: &PickerOptions) -> Result<Option<PickedImage>, PickerError>;
}

/// Open `picker` with the screen's fixed options and normalize the result.
pub fn pick_image<P: ImagePicker + ?Sized>(
    picker: &P,
) -> Result<Option<ImageDescriptor>, PickerError> {
    let picked = picker.open(&PickerOptions::default())?;
    Ok(picked.map(ImageDescriptor::from_picked))
}
