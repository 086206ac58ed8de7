//! Browser clipboard implementation.
//!
//! Reads go through the async Clipboard API. Rich writes use `ClipboardItem`
//! where the browser has it and otherwise fall back to a one-shot `copy`
//! listener driven by `document.execCommand("copy")`.

use gloo_events::{EventListener, EventListenerOptions};
use js_sys::{Array, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, Clipboard, ClipboardEvent, ClipboardItem, HtmlDocument};

use hilite_core::{ClipboardSink, ClipboardSource, HostError};

use crate::entries::js_error_text;

/// The system clipboard as seen from the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClipboard;

/// `navigator.clipboard`, which is absent outside secure contexts.
pub fn navigator_clipboard(navigator: &JsValue) -> Result<Clipboard, HostError> {
    let clipboard = Reflect::get(navigator, &JsValue::from_str("clipboard"))
        .map_err(|err| HostError::ClipboardAccess(js_error_text(&err)))?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return Err(HostError::Unsupported("navigator.clipboard".into()));
    }
    Ok(clipboard.unchecked_into())
}

impl ClipboardSource for BrowserClipboard {
    async fn read_text(&self) -> Result<String, HostError> {
        let window = web_sys::window().ok_or_else(|| HostError::Unsupported("no window".into()))?;
        let clipboard = navigator_clipboard(&window.navigator())?;
        let result = JsFuture::from(clipboard.read_text())
            .await
            .map_err(|err| HostError::ClipboardAccess(js_error_text(&err)))?;
        Ok(result.as_string().unwrap_or_default())
    }
}

impl ClipboardSink for BrowserClipboard {
    async fn write_rich(&self, html: &str, plain: &str) -> Result<(), HostError> {
        let has_item = Reflect::has(&js_sys::global(), &JsValue::from_str("ClipboardItem"))
            .unwrap_or(false)
            && web_sys::window().is_some_and(|w| navigator_clipboard(&w.navigator()).is_ok());
        if has_item {
            write_html_to_clipboard(html, plain)
                .await
                .map_err(|err| HostError::ClipboardAccess(js_error_text(&err)))
        } else {
            tracing::debug!("no ClipboardItem, copying through execCommand");
            write_with_exec_command(html, plain)
        }
    }
}

/// Write HTML and plain text to clipboard using the async Clipboard API.
pub async fn write_html_to_clipboard(html: &str, plain_text: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let clipboard = navigator_clipboard(&window.navigator())
        .map_err(|err| JsValue::from_str(&err.to_string()))?;

    let item_data = Object::new();
    for (mime, content) in [("text/html", html), ("text/plain", plain_text)] {
        let parts = Array::new();
        parts.push(&JsValue::from_str(content));
        let opts = BlobPropertyBag::new();
        opts.set_type(mime);
        let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)?;
        Reflect::set(&item_data, &JsValue::from_str(mime), &blob)?;
    }

    let clipboard_item = ClipboardItem::new_with_record_from_str_to_blob_promise(&item_data)?;
    let items = Array::new();
    items.push(&clipboard_item);

    JsFuture::from(clipboard.write(&items)).await?;
    tracing::debug!("Wrote {} bytes of HTML to clipboard", html.len());
    Ok(())
}

/// Fill the clipboard from inside a synthetic `copy` event.
fn write_with_exec_command(html: &str, plain: &str) -> Result<(), HostError> {
    let document = gloo_utils::document();
    let html = html.to_owned();
    let plain = plain.to_owned();
    let listener = EventListener::new_with_options(
        &document,
        "copy",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(data) = event
                .dyn_ref::<ClipboardEvent>()
                .and_then(|e| e.clipboard_data())
            else {
                return;
            };
            if let Err(err) = data.set_data("text/html", &html) {
                tracing::warn!("Clipboard sync write (html) failed: {:?}", err);
            }
            if let Err(err) = data.set_data("text/plain", &plain) {
                tracing::warn!("Clipboard sync write (plain) failed: {:?}", err);
            }
            event.prevent_default();
        },
    );

    let copied = document
        .dyn_into::<HtmlDocument>()
        .map_err(|_| HostError::Unsupported("document is not an HTML document".into()))?
        .exec_command("copy")
        .map_err(|err| HostError::ClipboardAccess(js_error_text(&err)));
    drop(listener);

    if copied? {
        Ok(())
    } else {
        Err(HostError::ClipboardAccess("copy command was refused".into()))
    }
}
