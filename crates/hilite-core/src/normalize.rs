//! Input normalization: turns clipboard payloads, dropped directory trees and
//! uploaded file lists into `set_text_content` / `add_file` calls.
//!
//! Every operation takes the source behind a `RefCell` because the browser
//! shares it between callbacks. Borrows are never held across an await, so
//! listeners triggered from other callbacks can still reach the source while
//! a flow is suspended on the host.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::InputError;
use crate::platform::{ClipboardSource, DataTransferSource, DirectoryReader, EntryHandle, FileHandle};
use crate::policy::{accepts_media_type, replacement_ratio_exceeded, resolve_file_name};
use crate::source::{FileId, SourceData};

/// Data flavor for plain text.
pub const TEXT_PLAIN: &str = "text/plain";

/// Data flavor browsers use for a file collection.
pub const FILES: &str = "Files";

/// What a normalizer flow did. Errors in here were already reported to the source.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Whether the flow ended by setting text content.
    pub text_set: bool,
    pub added: Vec<FileId>,
    /// Names of files skipped for their media type.
    pub skipped: Vec<String>,
    pub errors: Vec<InputError>,
}

impl NormalizeReport {
    pub fn merge(&mut self, other: NormalizeReport) {
        self.text_set |= other.text_set;
        self.added.extend(other.added);
        self.skipped.extend(other.skipped);
        self.errors.extend(other.errors);
    }

    fn fail(&mut self, source: &RefCell<SourceData>, err: InputError) {
        source.borrow_mut().report_error(err.to_string());
        self.errors.push(err);
    }
}

/// Handle a paste or drop payload.
///
/// Plain text wins over files. A file payload is walked as entries when the
/// host offers them; if no item could be handled that way it is read as a
/// flat file list instead.
#[tracing::instrument(skip_all)]
pub async fn handle_data_transfer<D: DataTransferSource>(
    source: &RefCell<SourceData>,
    data: &D,
) -> NormalizeReport {
    let mut report = NormalizeReport::default();

    if data.has_type(TEXT_PLAIN) {
        source.borrow_mut().set_mode_text();
        let text = match data.text().await {
            Ok(text) => text,
            Err(err) => {
                report.fail(source, err.into());
                String::new()
            }
        };
        source.borrow_mut().set_text_content(text);
        report.text_set = true;
    } else if data.has_type(FILES) {
        source.borrow_mut().set_mode_file();
        let mut any_worked = false;
        for item in data.item_entries() {
            let Some(entry) = item else { break };
            report.merge(handle_entry(source, entry).await);
            any_worked = true;
        }
        if !any_worked {
            tracing::debug!("no entry API, reading flat file list");
            report.merge(handle_files(source, data.files()).await);
        }
    } else {
        tracing::debug!(types = ?data.types(), "transfer has no usable flavor");
    }

    tracing::debug!(
        added = report.added.len(),
        skipped = report.skipped.len(),
        errors = report.errors.len(),
        "transfer handled"
    );
    report
}

/// Directory being walked: its reader and the batch not yet visited.
struct Frame<E: EntryHandle> {
    path: String,
    reader: E::Reader,
    pending: VecDeque<E>,
}

/// Walk an entry tree depth-first, adding every text file found.
///
/// Uses an explicit stack so deep trees do not grow the call stack. Visiting
/// order is: entries in batch order, a directory's children before its later
/// siblings. A directory that fails to list is reported and abandoned; its
/// siblings are still visited.
pub async fn handle_entry<E: EntryHandle>(source: &RefCell<SourceData>, root: E) -> NormalizeReport {
    let mut report = NormalizeReport::default();
    let mut stack: Vec<Frame<E>> = Vec::new();
    let mut next = Some(root);

    loop {
        if let Some(entry) = next.take() {
            if entry.is_directory() {
                match entry.create_reader() {
                    Ok(reader) => stack.push(Frame {
                        path: entry.full_path(),
                        reader,
                        pending: VecDeque::new(),
                    }),
                    Err(err) => report.fail(source, err.into()),
                }
            } else {
                report.merge(handle_file_entry(source, &entry).await);
            }
            continue;
        }

        let Some(frame) = stack.last_mut() else {
            break;
        };
        if let Some(entry) = frame.pending.pop_front() {
            next = Some(entry);
            continue;
        }

        let batch = frame.reader.read_entries().await;
        match batch {
            Ok(batch) if batch.is_empty() => {
                stack.pop();
            }
            Ok(batch) => {
                tracing::trace!(path = %frame.path, count = batch.len(), "directory batch");
                frame.pending.extend(batch);
            }
            Err(err) => {
                tracing::warn!(path = %frame.path, %err, "directory read failed");
                stack.pop();
                report.fail(source, err.into());
            }
        }
    }

    report
}

async fn handle_file_entry<E: EntryHandle>(source: &RefCell<SourceData>, entry: &E) -> NormalizeReport {
    let path = entry.full_path();
    match entry.file().await {
        Ok(file) => {
            let name = path.strip_prefix('/').unwrap_or(&path);
            handle_file(source, &file, Some(name)).await
        }
        Err(err) => {
            let mut report = NormalizeReport::default();
            report.fail(source, err.into());
            report
        }
    }
}

/// Handle an uploaded, dropped or pasted file list.
pub async fn handle_files<F, I>(source: &RefCell<SourceData>, files: I) -> NormalizeReport
where
    F: FileHandle,
    I: IntoIterator<Item = F>,
{
    let mut report = NormalizeReport::default();
    for file in files {
        report.merge(handle_file(source, &file, None).await);
    }
    report
}

/// Add one file if it is text.
///
/// Non-text media types are skipped silently. Content with more than 1%
/// replacement characters is rejected with an error naming the file.
pub async fn handle_file<F: FileHandle>(
    source: &RefCell<SourceData>,
    file: &F,
    name_override: Option<&str>,
) -> NormalizeReport {
    let mut report = NormalizeReport::default();
    let name = resolve_file_name(
        name_override,
        file.relative_path().as_deref(),
        file.webkit_relative_path().as_deref(),
        &file.name(),
    );

    let media_type = file.media_type();
    if !accepts_media_type(&media_type) {
        tracing::debug!(%name, %media_type, "skipping non-text media type");
        report.skipped.push(name);
        return report;
    }

    let text = match file.text().await {
        Ok(text) => text,
        Err(err) => {
            report.fail(source, err.into());
            return report;
        }
    };

    if replacement_ratio_exceeded(&text) {
        report.fail(source, InputError::NotText { name });
        return report;
    }

    report.added.push(source.borrow_mut().add_file(name, text));
    report
}

/// Replace the text with the system clipboard's contents.
///
/// Access failures are reported, and the text is set to empty. The mode
/// switch is not rolled back.
pub async fn read_clipboard<C: ClipboardSource>(
    source: &RefCell<SourceData>,
    clipboard: &C,
) -> NormalizeReport {
    let mut report = NormalizeReport::default();
    {
        let mut source = source.borrow_mut();
        source.clear_error();
        source.set_mode_text();
    }

    let text = match clipboard.read_text().await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(%err, "clipboard read failed");
            report.fail(source, InputError::ClipboardDenied);
            String::new()
        }
    };
    source.borrow_mut().set_text_content(text);
    report.text_set = true;
    report
}
