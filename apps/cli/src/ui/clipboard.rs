//! Copy-to-clipboard through the terminal (OSC 52). Works over SSH and in
//! most modern terminal emulators; terminals without support ignore it.

use std::io::Write;

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// The escape sequence that asks the terminal to set the system clipboard.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

pub fn copy_to_clipboard(text: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(osc52_sequence(text).as_bytes())?;
    stdout.flush()
}
