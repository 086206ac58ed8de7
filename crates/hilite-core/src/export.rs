//! Plain-text export, the fallback flavor written next to the HTML on copy.

use crate::source::SourceState;

/// Render the source as plain text.
///
/// Text mode returns the text unchanged. File mode lists every file in id
/// order as its name, a blank line, its content, and another blank line.
pub fn plain_render(state: &SourceState) -> String {
    if state.is_mode_text() {
        return state.text_content().to_owned();
    }
    let mut plain = String::new();
    for (_, file) in state.files() {
        plain.push_str(&file.name);
        plain.push_str("\n\n");
        plain.push_str(&file.content);
        plain.push_str("\n\n");
    }
    plain
}
