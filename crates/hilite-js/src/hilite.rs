//! JsHilite - the mounted page wrapper for JavaScript.

use wasm_bindgen::prelude::*;

use hilite_browser::{Mounted, SourceEvent, SourceEventKind, SourceState, mount};

use crate::types::parse_config;

/// A hilite instance bound to the page.
///
/// Dropping it (`free()`) detaches every page listener.
#[wasm_bindgen]
pub struct JsHilite {
    mounted: Mounted,
}

#[wasm_bindgen]
impl JsHilite {
    /// Bind to the page elements named in `config`.
    ///
    /// Every config key is optional; element ids default to `code`,
    /// `output`, `copy` and so on.
    pub fn mount(config: Option<JsValue>) -> Result<JsHilite, JsValue> {
        let config = parse_config(config).map_err(JsValue::from)?;
        Ok(Self {
            mounted: mount(config)?,
        })
    }

    /// Whether there is nothing to copy.
    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }

    /// The plain-text clipboard flavor for the current source.
    #[wasm_bindgen(js_name = plainText)]
    pub fn plain_text(&self) -> String {
        self.mounted.plain_text()
    }

    /// The HTML clipboard flavor for the current source.
    #[wasm_bindgen(js_name = renderDocument)]
    pub fn render_document(&self) -> Result<String, JsError> {
        self.mounted
            .render_document()
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Switch to text mode and replace the text.
    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&self, text: &str) {
        let mut source = self.mounted.source().borrow_mut();
        source.clear_error();
        source.set_mode_text();
        source.set_text_content(text);
    }

    /// Call `callback(eventName, fileId)` for source events.
    ///
    /// With `eventName` set, only that event is delivered; otherwise every
    /// event is. `fileId` is undefined for events without one. The callback
    /// runs while the source is being updated and must not call back into
    /// this object. An exception thrown by the callback is logged and does
    /// not stop delivery to later subscribers.
    pub fn subscribe(
        &self,
        callback: js_sys::Function,
        event_name: Option<String>,
    ) -> Result<(), JsError> {
        let deliver = move |event: &SourceEvent, _: &SourceState| {
            let name = JsValue::from_str(event.kind().as_str());
            let file_id = event
                .file_id()
                .map(|id| JsValue::from(id.get()))
                .unwrap_or(JsValue::UNDEFINED);
            if let Err(e) = callback.call2(&JsValue::NULL, &name, &file_id) {
                tracing::warn!(event = %event.kind(), "subscriber threw: {:?}", e);
            }
        };

        let mut source = self.mounted.source().borrow_mut();
        match event_name {
            Some(name) => {
                let kind = SourceEventKind::from_name(&name)
                    .ok_or_else(|| JsError::new(&format!("unknown event '{name}'")))?;
                source.subscribe(kind, deliver);
            }
            None => {
                source.subscribe_all(deliver);
            }
        }
        Ok(())
    }

    /// Names of every source event, in declaration order.
    #[wasm_bindgen(js_name = eventNames)]
    pub fn event_names() -> Vec<String> {
        SourceEventKind::ALL
            .iter()
            .map(|kind| kind.as_str().to_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const PAGE: &str = r#"
<button id="paste"></button>
<label id="upload_label"><input id="upload" type="file"></label>
<input id="folder" type="file">
<textarea id="code"></textarea>
<div id="files_outer"><div id="files"></div><button id="clear_files"></button></div>
<input id="line_numbers" type="checkbox" checked>
<label id="first_line_number_label"><input id="first_line_number" type="number" min="1" value="1"></label>
<button id="copy"></button>
<div id="placeholder"></div>
<div id="output"></div>
<div id="error"></div>
<div id="about"><button id="modal_close"></button></div>
<button id="header_help"></button>
<button id="footer_help"></button>
"#;

    fn mounted() -> JsHilite {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
            .unwrap()
            .set_inner_html(PAGE);
        JsHilite::mount(None).unwrap()
    }

    fn recorder() -> (js_sys::Function, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let callback = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |name: JsValue, _: JsValue| {
            sink.borrow_mut().push(name.as_string().unwrap_or_default());
        });
        (callback.into_js_value().unchecked_into(), seen)
    }

    #[wasm_bindgen_test]
    fn test_throwing_callback_does_not_block_later_ones() {
        let hilite = mounted();
        let thrower = js_sys::Function::new_with_args("name", "throw new Error(name)");
        assert!(hilite.subscribe(thrower, None).is_ok());
        let (callback, seen) = recorder();
        assert!(hilite.subscribe(callback, None).is_ok());

        hilite.set_text("let x = 1;");

        assert!(seen.borrow().iter().any(|name| name == "set_text_content"));
        assert_eq!(hilite.plain_text(), "let x = 1;");
    }

    #[wasm_bindgen_test]
    fn test_subscribe_to_one_event() {
        let hilite = mounted();
        let (callback, seen) = recorder();
        assert!(hilite.subscribe(callback, Some("show_error".into())).is_ok());

        hilite.set_text("a");
        assert!(seen.borrow().is_empty());

        hilite.mounted.source().borrow_mut().report_error("boom");
        assert_eq!(*seen.borrow(), vec!["show_error".to_string()]);
    }

    #[wasm_bindgen_test]
    fn test_subscribe_rejects_unknown_event() {
        let hilite = mounted();
        let (callback, _) = recorder();
        assert!(hilite.subscribe(callback, Some("showError".into())).is_err());
    }
}
