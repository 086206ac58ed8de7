//! The source model: what the user supplied and how it should be displayed.
//!
//! [`SourceData`] is the single source of truth. It owns a [`SourceState`]
//! that can only be changed through its operations, and an [`EventBus`]
//! that every operation publishes to, synchronously and in a fixed order.

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;

use crate::events::{EventBus, SourceEvent, SourceEventKind, SubscriptionId};

/// Which kind of input is active. Switching clears the other mode's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    #[default]
    Text,
    File,
}

/// Identifier of a file in FILE mode. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u32);

impl FileId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A file supplied in FILE mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub content: String,
}

/// Current source state. Read-only outside this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceState {
    mode: SourceMode,
    text: String,
    files: BTreeMap<FileId, FileRecord>,
    next_file_id: u32,
    line_numbers: bool,
    first_line_number: NonZeroU32,
    error: Option<String>,
    about_visible: bool,
}

impl Default for SourceState {
    fn default() -> Self {
        Self {
            mode: SourceMode::Text,
            text: String::new(),
            files: BTreeMap::new(),
            next_file_id: 0,
            line_numbers: true,
            first_line_number: NonZeroU32::MIN,
            error: None,
            about_visible: false,
        }
    }
}

impl SourceState {
    pub fn mode(&self) -> SourceMode {
        self.mode
    }

    pub fn is_mode_text(&self) -> bool {
        self.mode == SourceMode::Text
    }

    pub fn is_mode_file(&self) -> bool {
        self.mode == SourceMode::File
    }

    pub fn text_content(&self) -> &str {
        &self.text
    }

    /// File ids in ascending (insertion) order.
    pub fn file_ids(&self) -> Vec<FileId> {
        self.files.keys().copied().collect()
    }

    /// Files in ascending id order.
    pub fn files(&self) -> impl Iterator<Item = (FileId, &FileRecord)> {
        self.files.iter().map(|(id, file)| (*id, file))
    }

    pub fn file(&self, id: FileId) -> Option<&FileRecord> {
        self.files.get(&id)
    }

    pub fn file_name(&self, id: FileId) -> Option<&str> {
        self.file(id).map(|f| f.name.as_str())
    }

    pub fn file_content(&self, id: FileId) -> Option<&str> {
        self.file(id).map(|f| f.content.as_str())
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn line_numbers_enabled(&self) -> bool {
        self.line_numbers
    }

    pub fn first_line_number(&self) -> NonZeroU32 {
        self.first_line_number
    }

    /// Number the first rendered line gets. Always 1 in FILE mode.
    pub fn first_line_for_display(&self) -> u32 {
        match self.mode {
            SourceMode::Text => self.first_line_number.get(),
            SourceMode::File => 1,
        }
    }

    /// Whether an error is present. An empty message still counts.
    pub fn error_is_shown(&self) -> bool {
        self.error.is_some()
    }

    /// Display text for the error box, `None` when no error is present.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|msg| format!("Error: {msg}"))
    }

    /// The stored message without the display prefix.
    pub fn raw_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn about_is_shown(&self) -> bool {
        self.about_visible
    }

    pub fn is_empty(&self) -> bool {
        match self.mode {
            SourceMode::Text => self.text.is_empty(),
            SourceMode::File => self.files.is_empty(),
        }
    }
}

/// Source state plus the bus that reports its transitions.
#[derive(Debug, Default)]
pub struct SourceData {
    state: SourceState,
    bus: EventBus,
}

impl SourceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SourceState {
        &self.state
    }

    /// Register a handler for one kind of event.
    pub fn subscribe<F>(&mut self, kind: SourceEventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&SourceEvent, &SourceState) + 'static,
    {
        self.bus.subscribe(kind, handler)
    }

    /// Register a handler for every event.
    pub fn subscribe_all<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&SourceEvent, &SourceState) + 'static,
    {
        self.bus.subscribe_all(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    fn emit(&mut self, event: SourceEvent) {
        self.bus.publish(&event, &self.state);
    }

    // === Mode ===

    pub fn set_mode_text(&mut self) {
        if self.state.is_mode_text() {
            return;
        }
        tracing::debug!("switching to text mode");
        self.state.mode = SourceMode::Text;
        self.emit(SourceEvent::ModeSetText);
        self.set_text_content("");
    }

    pub fn set_mode_file(&mut self) {
        if self.state.is_mode_file() {
            return;
        }
        tracing::debug!("switching to file mode");
        self.state.mode = SourceMode::File;
        self.emit(SourceEvent::ModeSetFile);
        self.clear_files();
    }

    // === Text ===

    pub fn set_text_content(&mut self, text: impl Into<String>) {
        self.state.text = text.into();
        self.emit(SourceEvent::TextContentSet);
        if self.state.text.is_empty() {
            self.emit(SourceEvent::SourceEmpty);
        }
    }

    // === Files ===

    /// Store a file and return its freshly allocated id.
    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<String>) -> FileId {
        let id = FileId(self.state.next_file_id);
        self.state.next_file_id += 1;
        let record = FileRecord {
            name: name.into(),
            content: content.into(),
        };
        tracing::debug!(%id, name = %record.name, bytes = record.content.len(), "file added");
        self.state.files.insert(id, record);
        self.emit(SourceEvent::FileAdded(id));
        id
    }

    /// Remove a file. Publishes even if the id was unknown.
    pub fn remove_file(&mut self, id: FileId) {
        self.state.files.remove(&id);
        self.emit(SourceEvent::FileRemoved(id));
        if self.state.files.is_empty() {
            self.emit(SourceEvent::SourceEmpty);
        }
    }

    /// Remove every file. Always reports the source as empty afterwards.
    pub fn clear_files(&mut self) {
        self.state.files.clear();
        self.emit(SourceEvent::FilesCleared);
        self.emit(SourceEvent::SourceEmpty);
    }

    // === Line numbers ===

    pub fn enable_line_numbers(&mut self) {
        self.state.line_numbers = true;
        self.emit(SourceEvent::LineNumbersEnabled);
    }

    pub fn disable_line_numbers(&mut self) {
        self.state.line_numbers = false;
        self.emit(SourceEvent::LineNumbersDisabled);
    }

    pub fn set_line_numbers_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enable_line_numbers();
        } else {
            self.disable_line_numbers();
        }
    }

    /// Always stores the value; only announces it while numbering is on.
    pub fn set_first_line_number(&mut self, number: NonZeroU32) {
        self.state.first_line_number = number;
        if self.state.line_numbers {
            self.emit(SourceEvent::FirstLineNumberSet);
        }
    }

    // === Error and about ===

    /// Show an error. Last write wins.
    pub fn report_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "reporting error");
        self.state.error = Some(message);
        self.emit(SourceEvent::ErrorShown);
        self.emit(SourceEvent::ErrorMessageSet);
    }

    pub fn clear_error(&mut self) {
        self.state.error = None;
        self.emit(SourceEvent::ErrorHidden);
    }

    pub fn show_about(&mut self) {
        self.state.about_visible = true;
        self.emit(SourceEvent::AboutShown);
    }

    pub fn hide_about(&mut self) {
        self.state.about_visible = false;
        self.emit(SourceEvent::AboutHidden);
    }
}
