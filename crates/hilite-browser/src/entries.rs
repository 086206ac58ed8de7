//! web-sys hosts for the input normalizer: transfer payloads, dropped
//! file-system entries and files.
//!
//! The entry API is callback based; each call is bridged into a
//! `js_sys::Promise` and awaited through `JsFuture`.

use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    DataTransfer, File, FileList, FileSystemDirectoryEntry, FileSystemDirectoryReader,
    FileSystemEntry, FileSystemFileEntry,
};

use hilite_core::normalize::TEXT_PLAIN;
use hilite_core::{DataTransferSource, DirectoryReader, EntryHandle, FileHandle, HostError};

/// Best-effort readable text for a thrown JS value.
pub fn js_error_text(err: &JsValue) -> String {
    if let Some(err) = err.dyn_ref::<js_sys::Error>() {
        return format!("{}: {}", String::from(err.name()), String::from(err.message()));
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn string_prop(target: &JsValue, name: &str) -> Option<String> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.as_string())
}

/// A browser `File`.
#[derive(Debug, Clone)]
pub struct BrowserFile {
    file: File,
}

impl BrowserFile {
    pub fn new(file: File) -> Self {
        Self { file }
    }

    /// Every file of a `FileList`, in list order.
    pub fn from_list(list: &FileList) -> Vec<Self> {
        (0..list.length())
            .filter_map(|i| list.get(i))
            .map(Self::new)
            .collect()
    }
}

impl FileHandle for BrowserFile {
    fn name(&self) -> String {
        self.file.name()
    }

    fn relative_path(&self) -> Option<String> {
        string_prop(&self.file, "relativePath")
    }

    fn webkit_relative_path(&self) -> Option<String> {
        string_prop(&self.file, "webkitRelativePath")
    }

    fn media_type(&self) -> String {
        self.file.type_()
    }

    async fn text(&self) -> Result<String, HostError> {
        let read_error = |reason: String| HostError::FileRead {
            name: self.file.name(),
            reason,
        };
        let value = JsFuture::from(self.file.text())
            .await
            .map_err(|err| read_error(js_error_text(&err)))?;
        value
            .as_string()
            .ok_or_else(|| read_error("text() did not resolve to a string".into()))
    }
}

/// A dropped `FileSystemEntry`.
#[derive(Debug, Clone)]
pub struct BrowserEntry {
    entry: FileSystemEntry,
}

impl BrowserEntry {
    pub fn new(entry: FileSystemEntry) -> Self {
        Self { entry }
    }
}

impl EntryHandle for BrowserEntry {
    type File = BrowserFile;
    type Reader = BrowserDirectoryReader;

    fn is_directory(&self) -> bool {
        self.entry.is_directory()
    }

    fn full_path(&self) -> String {
        self.entry.full_path()
    }

    fn create_reader(&self) -> Result<BrowserDirectoryReader, HostError> {
        let dir = self
            .entry
            .dyn_ref::<FileSystemDirectoryEntry>()
            .ok_or_else(|| HostError::Unsupported(format!("{} is not a directory", self.full_path())))?;
        Ok(BrowserDirectoryReader {
            path: self.full_path(),
            reader: dir.create_reader(),
        })
    }

    async fn file(&self) -> Result<BrowserFile, HostError> {
        let read_error = |reason: String| HostError::FileRead {
            name: self.full_path(),
            reason,
        };
        let entry = self
            .entry
            .dyn_ref::<FileSystemFileEntry>()
            .ok_or_else(|| read_error("not a file entry".into()))?;
        let promise = Promise::new(&mut |resolve, reject| {
            entry.file_with_callback_and_callback(&resolve, &reject);
        });
        let value = JsFuture::from(promise)
            .await
            .map_err(|err| read_error(js_error_text(&err)))?;
        let file = value
            .dyn_into::<File>()
            .map_err(|_| read_error("entry did not resolve to a File".into()))?;
        Ok(BrowserFile::new(file))
    }
}

/// Reader over a dropped directory's children.
#[derive(Debug)]
pub struct BrowserDirectoryReader {
    path: String,
    reader: FileSystemDirectoryReader,
}

impl DirectoryReader for BrowserDirectoryReader {
    type Entry = BrowserEntry;

    async fn read_entries(&mut self) -> Result<Vec<BrowserEntry>, HostError> {
        let reader = &self.reader;
        let promise = Promise::new(&mut |resolve, reject| {
            if let Err(err) = reader.read_entries_with_callback_and_callback(&resolve, &reject) {
                let _ = reject.call1(&JsValue::NULL, &err);
            }
        });
        let batch = JsFuture::from(promise)
            .await
            .map_err(|err| HostError::DirectoryRead {
                path: self.path.clone(),
                reason: js_error_text(&err),
            })?;
        Ok(Array::from(&batch)
            .iter()
            .filter_map(|value| value.dyn_into::<FileSystemEntry>().ok())
            .map(BrowserEntry::new)
            .collect())
    }
}

/// Snapshot of a paste or drop `DataTransfer`.
///
/// Browsers empty the transfer once the event handler returns, so everything
/// is captured up front while the event is still being dispatched.
#[derive(Debug, Clone)]
pub struct BrowserDataTransfer {
    types: Vec<String>,
    text: Result<String, HostError>,
    entries: Vec<Option<BrowserEntry>>,
    files: Vec<BrowserFile>,
}

impl BrowserDataTransfer {
    pub fn capture(data: &DataTransfer) -> Self {
        let types: Vec<String> = data.types().iter().filter_map(|t| t.as_string()).collect();
        let text = if types.iter().any(|t| t == TEXT_PLAIN) {
            data.get_data(TEXT_PLAIN)
                .map_err(|err| HostError::Js(js_error_text(&err)))
        } else {
            Ok(String::new())
        };
        Self {
            entries: capture_entries(data),
            files: data.files().map(|list| BrowserFile::from_list(&list)).unwrap_or_default(),
            types,
            text,
        }
    }
}

fn entry_getter(item: &JsValue) -> Option<Function> {
    ["getAsEntry", "webkitGetAsEntry"].iter().find_map(|name| {
        Reflect::get(item, &JsValue::from_str(name))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
    })
}

fn capture_entries(data: &DataTransfer) -> Vec<Option<BrowserEntry>> {
    let items = data.items();
    let mut entries = Vec::new();
    for i in 0..items.length() {
        let Some(item) = items.get(i) else { continue };
        let Some(getter) = entry_getter(&item) else {
            entries.push(None);
            continue;
        };
        match getter.call0(&item).map(|v| v.dyn_into::<FileSystemEntry>()) {
            Ok(Ok(entry)) => entries.push(Some(BrowserEntry::new(entry))),
            Ok(Err(_)) => tracing::debug!(index = i, "transfer item has no entry"),
            Err(err) => tracing::debug!(index = i, err = %js_error_text(&err), "entry lookup threw"),
        }
    }
    entries
}

impl DataTransferSource for BrowserDataTransfer {
    type Entry = BrowserEntry;
    type File = BrowserFile;

    fn types(&self) -> Vec<String> {
        self.types.clone()
    }

    async fn text(&self) -> Result<String, HostError> {
        self.text.clone()
    }

    fn item_entries(&self) -> Vec<Option<BrowserEntry>> {
        self.entries.clone()
    }

    fn files(&self) -> Vec<BrowserFile> {
        self.files.clone()
    }
}
