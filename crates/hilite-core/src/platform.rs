//! Platform abstraction traits for input and clipboard capabilities.
//!
//! These traits define the interface between the input normalizer and the
//! environment that actually holds clipboard data, dropped entries and file
//! contents. The browser implementation lives in `hilite-browser`; tests use
//! in-memory implementations.
//!
//! The runtime is single-threaded, so none of the returned futures are
//! required to be `Send`.

use std::future::Future;

use crate::error::HostError;

/// A file whose contents can be read as text.
pub trait FileHandle {
    /// Plain file name, without directories.
    fn name(&self) -> String;

    /// Path relative to a picked or dropped root, when the host records one.
    fn relative_path(&self) -> Option<String> {
        None
    }

    /// Path relative to a picked directory (`webkitRelativePath`).
    fn webkit_relative_path(&self) -> Option<String> {
        None
    }

    /// Declared media type. Empty when unknown.
    fn media_type(&self) -> String;

    /// Read and decode the whole file.
    fn text(&self) -> impl Future<Output = Result<String, HostError>>;
}

/// Reads the children of a directory in batches.
///
/// A directory is exhausted only once a call returns an empty batch.
pub trait DirectoryReader {
    type Entry;

    fn read_entries(&mut self) -> impl Future<Output = Result<Vec<Self::Entry>, HostError>>;
}

/// A dropped file-system entry: either a file or a directory.
pub trait EntryHandle: Sized {
    type File: FileHandle;
    type Reader: DirectoryReader<Entry = Self>;

    fn is_directory(&self) -> bool;

    /// Full path within the drop, starting with `/`.
    fn full_path(&self) -> String;

    /// Open a reader over a directory's children.
    fn create_reader(&self) -> Result<Self::Reader, HostError>;

    /// Resolve a file entry to its file.
    fn file(&self) -> impl Future<Output = Result<Self::File, HostError>>;
}

/// Paste or drop payload.
pub trait DataTransferSource {
    type Entry: EntryHandle;
    type File: FileHandle;

    /// Available data flavors, e.g. `text/plain` or `Files`.
    fn types(&self) -> Vec<String>;

    fn has_type(&self, flavor: &str) -> bool {
        self.types().iter().any(|t| t == flavor)
    }

    /// The `text/plain` flavor.
    fn text(&self) -> impl Future<Output = Result<String, HostError>>;

    /// One slot per transfer item. `None` marks an item that has no
    /// directory-capable entry API.
    fn item_entries(&self) -> Vec<Option<Self::Entry>>;

    /// The payload as a flat file list.
    fn files(&self) -> Vec<Self::File>;
}

/// Read access to the system clipboard.
pub trait ClipboardSource {
    fn read_text(&self) -> impl Future<Output = Result<String, HostError>>;
}

/// Write access to the system clipboard.
pub trait ClipboardSink {
    /// Write HTML together with a plain-text fallback.
    fn write_rich(&self, html: &str, plain: &str) -> impl Future<Output = Result<(), HostError>>;
}
