//! hilite-core: the source model and input handling behind hilite, with no
//! browser dependencies.
//!
//! This crate provides:
//! - [`SourceData`]: the text-or-files state plus a synchronous [`EventBus`]
//! - input normalization for paste, drop, directory and upload flows, generic
//!   over the host traits in [`platform`]
//! - syntax highlighting and rendering to self-styled HTML
//! - plain-text export for the clipboard fallback flavor

pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod highlight;
pub mod line_numbers;
pub mod normalize;
pub mod platform;
pub mod policy;
pub mod render;
pub mod source;

pub use config::{ElementIds, HiliteConfig};
pub use error::{HighlightError, HostError, InputError};
pub use events::{EventBus, Handler, SourceEvent, SourceEventKind, SubscriptionId};
pub use export::plain_render;
pub use highlight::Highlighter;
pub use line_numbers::number_lines;
pub use normalize::{
    NormalizeReport, handle_data_transfer, handle_entry, handle_file, handle_files,
    read_clipboard,
};
pub use platform::{
    ClipboardSink, ClipboardSource, DataTransferSource, DirectoryReader, EntryHandle, FileHandle,
};
pub use render::{
    ClipboardPayload, copy_payload, render_code_block, render_document, render_file,
    render_output,
};
pub use smol_str::SmolStr;
pub use source::{FileId, FileRecord, SourceData, SourceMode, SourceState};
