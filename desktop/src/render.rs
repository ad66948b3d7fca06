//! Plain-text rendering of the screen for the terminal.

use std::fmt::Write;

use upload_core::view::{
    PREVIEW_HEADING, RESPONSE_HEADING, SELECT_BUTTON, SELECT_PROMPT, SEND_PROMPT,
};
use upload_core::{ScreenView, Tone};

fn marker(tone: Tone) -> &'static str {
    match tone {
        Tone::Neutral => "[..]",
        Tone::Good => "[ok]",
        Tone::Bad => "[!!]",
    }
}

pub fn render(view: &ScreenView<'_>) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{SELECT_PROMPT}");
    let _ = writeln!(out, "  [{SELECT_BUTTON}]");

    if let Some(image) = view.preview {
        let _ = writeln!(out);
        let _ = writeln!(out, "{PREVIEW_HEADING}");
        let _ = writeln!(out, "  {} ({}) {}", image.name, image.mime_type, image.uri);
        let _ = writeln!(out);
        let _ = writeln!(out, "{SEND_PROMPT}");
        let buttons: Vec<String> = view
            .send_buttons
            .iter()
            .map(|button| format!("[{}]", button.label))
            .collect();
        let _ = writeln!(out, "  {}", buttons.join(" "));
    }

    if let Some(result) = &view.result {
        let _ = writeln!(out);
        let _ = writeln!(out, "{RESPONSE_HEADING}");
        let _ = writeln!(out, "  {} {}", marker(result.tone), result.text);
        if let Some(hint) = result.console_hint {
            let _ = writeln!(out, "  {hint}");
        }
    }
    out
}
