//! Configuration for rendering and for binding to a page.
//!
//! Every field has a default, so hosts only pass what they want to change.
//! From JS this arrives as a plain object (camelCase keys).

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HiliteConfig {
    /// Name of a bundled syntect theme.
    pub theme: SmolStr,
    /// Inlined into copied HTML so pastes keep the monospace look.
    pub font_family: SmolStr,
    pub font_size: SmolStr,
    /// Width of the line-number column per digit, in pixels.
    pub line_number_column_width: u32,
    pub elements: ElementIds,
}

impl Default for HiliteConfig {
    fn default() -> Self {
        Self {
            theme: SmolStr::new_static("InspiredGitHub"),
            font_family: SmolStr::new_static(
                "'JetBrains Mono', 'Cascadia Code', 'Roboto Mono', Consolas, monospace",
            ),
            font_size: SmolStr::new_static("14px"),
            line_number_column_width: 16,
            elements: ElementIds::default(),
        }
    }
}

/// DOM ids of the page elements the browser layer binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    pub code: SmolStr,
    pub files: SmolStr,
    pub files_outer: SmolStr,
    pub clear_files: SmolStr,
    pub paste: SmolStr,
    pub upload: SmolStr,
    pub upload_label: SmolStr,
    pub folder: SmolStr,
    pub copy: SmolStr,
    pub output: SmolStr,
    pub placeholder: SmolStr,
    pub line_numbers: SmolStr,
    pub first_line_number: SmolStr,
    pub first_line_number_label: SmolStr,
    pub error: SmolStr,
    pub about: SmolStr,
    pub modal_close: SmolStr,
    pub header_help: SmolStr,
    pub footer_help: SmolStr,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            code: SmolStr::new_static("code"),
            files: SmolStr::new_static("files"),
            files_outer: SmolStr::new_static("files_outer"),
            clear_files: SmolStr::new_static("clear_files"),
            paste: SmolStr::new_static("paste"),
            upload: SmolStr::new_static("upload"),
            upload_label: SmolStr::new_static("upload_label"),
            folder: SmolStr::new_static("folder"),
            copy: SmolStr::new_static("copy"),
            output: SmolStr::new_static("output"),
            placeholder: SmolStr::new_static("placeholder"),
            line_numbers: SmolStr::new_static("line_numbers"),
            first_line_number: SmolStr::new_static("first_line_number"),
            first_line_number_label: SmolStr::new_static("first_line_number_label"),
            error: SmolStr::new_static("error"),
            about: SmolStr::new_static("about"),
            modal_close: SmolStr::new_static("modal_close"),
            header_help: SmolStr::new_static("header_help"),
            footer_help: SmolStr::new_static("footer_help"),
        }
    }
}
