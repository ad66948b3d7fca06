//! Render model for the screen.
//!
//! Hosts draw whatever `Screen::view` returns; they make no decisions of
//! their own about which controls exist or what the result label says.

use crate::screen::{ResponseState, Screen};
use crate::types::{ImageDescriptor, UploadVariant};

pub const SELECT_PROMPT: &str = "1. Select an image from the device/camera";
pub const SELECT_BUTTON: &str = "Select Image";
pub const PREVIEW_HEADING: &str = "Selected Image";
pub const SEND_PROMPT: &str = "2. Send Image and inspect request/response";
pub const RESPONSE_HEADING: &str = "Response";
pub const CONSOLE_HINT: &str = "You can investigate the sent data in the console";

/// Colour treatment of the result label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Good,
    Bad,
}

/// CSS-style colours for a tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: &'static str,
    pub background: &'static str,
    pub border: &'static str,
}

impl Tone {
    pub fn palette(&self) -> Palette {
        match self {
            Tone::Neutral => Palette {
                foreground: "#909399",
                background: "rgb(233, 233, 235)",
                border: "#909399",
            },
            Tone::Good => Palette {
                foreground: "#67C23A",
                background: "rgb(225, 243, 216)",
                border: "#67C23A",
            },
            Tone::Bad => Palette {
                foreground: "#F56C6C",
                background: "rgb(253, 226, 226)",
                border: "#F56C6C",
            },
        }
    }
}

impl ResponseState {
    /// Result label text; `None` while nothing has been sent.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            ResponseState::Absent => None,
            ResponseState::InProgress => Some("Sending"),
            ResponseState::Succeeded => Some("File was sent!"),
            ResponseState::Failed => Some("File was not sent!"),
            ResponseState::Errored => Some("Request errored!"),
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            ResponseState::Absent | ResponseState::InProgress => Tone::Neutral,
            ResponseState::Succeeded => Tone::Good,
            ResponseState::Failed | ResponseState::Errored => Tone::Bad,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendButton {
    pub variant: UploadVariant,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLabel {
    pub text: &'static str,
    pub tone: Tone,
    pub console_hint: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenView<'a> {
    pub preview: Option<&'a ImageDescriptor>,
    /// Empty until an image is selected.
    pub send_buttons: Vec<SendButton>,
    pub result: Option<ResultLabel>,
}

impl Screen {
    pub fn view(&self) -> ScreenView<'_> {
        let preview = self.image();
        let send_buttons = if preview.is_some() {
            vec![
                SendButton {
                    variant: UploadVariant::Plain,
                    label: "Send via HTTP client",
                },
                SendButton {
                    variant: UploadVariant::Pinned,
                    label: "Send via pinned client",
                },
            ]
        } else {
            Vec::new()
        };

        let state = self.response();
        let result = state.label().map(|text| ResultLabel {
            text,
            tone: state.tone(),
            console_hint: (state != ResponseState::InProgress).then_some(CONSOLE_HINT),
        });

        ScreenView {
            preview,
            send_buttons,
            result,
        }
    }
}
