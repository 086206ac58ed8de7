//! Error types for hilite.
//!
//! The source model only ever stores the rendered message of these errors;
//! the types exist so hosts and the normalizer can match on what went wrong.

use miette::Diagnostic;
use thiserror::Error;

/// Failure reported by an environment capability (clipboard, file, directory).
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HostError {
    /// Clipboard could not be read or written.
    #[error("clipboard access failed: {0}")]
    ClipboardAccess(String),

    /// A file's contents could not be read.
    #[error("could not read file '{name}': {reason}")]
    FileRead { name: String, reason: String },

    /// A directory listing failed part way.
    #[error("could not read directory '{path}': {reason}")]
    DirectoryRead { path: String, reason: String },

    /// The host does not provide the capability at all.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Uncategorized JS exception.
    #[error("{0}")]
    Js(String),
}

/// Recoverable error in an input-handling flow.
///
/// `Display` output is exactly what ends up in the source's error slot.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputError {
    /// Decoded content looked like binary data.
    #[error("file '{name}' is not a text file")]
    #[diagnostic(code(hilite::input::not_text))]
    NotText { name: String },

    /// Reading the system clipboard was refused.
    #[error("no clipboard access - try Ctrl+V")]
    #[diagnostic(
        code(hilite::input::clipboard_denied),
        help("paste with the keyboard shortcut instead; it does not need a permission")
    )]
    ClipboardDenied,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Host(#[from] HostError),
}

/// Errors from building or running the syntax highlighter.
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum HighlightError {
    #[error("unknown highlight theme '{0}'")]
    #[diagnostic(
        code(hilite::highlight::theme),
        help("use one of syntect's bundled theme names, e.g. InspiredGitHub")
    )]
    UnknownTheme(String),

    #[error("syntax highlighting failed: {0}")]
    Syntect(#[from] syntect::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_messages() {
        let err = InputError::NotText {
            name: "img.png".into(),
        };
        assert_eq!(err.to_string(), "file 'img.png' is not a text file");
        assert_eq!(
            InputError::ClipboardDenied.to_string(),
            "no clipboard access - try Ctrl+V"
        );
    }

    #[test]
    fn test_host_error_is_transparent() {
        let err: InputError = HostError::FileRead {
            name: "a.rs".into(),
            reason: "NotReadableError".into(),
        }
        .into();
        assert_eq!(err.to_string(), "could not read file 'a.rs': NotReadableError");
    }
}
