//! DOM reflection of the source state.
//!
//! [`View`] holds the page elements resolved once from [`ElementIds`];
//! [`bind_view`] subscribes it to every source event so the page follows the
//! state without any handler touching the DOM directly.

use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
};

use hilite_core::render::{render_file, render_output};
use hilite_core::{
    ElementIds, FileId, HighlightError, Highlighter, HiliteConfig, SourceData, SourceEvent,
    SourceState, SubscriptionId,
};

const HIDDEN: &str = "hidden";
const TAB: &str = "action--tab";
const OPTION_DISABLED: &str = "options__option--disabled";

/// Highlighter and configuration shared by the view and the copy flow.
#[derive(Debug)]
pub struct RenderContext {
    pub highlighter: Highlighter,
    pub config: HiliteConfig,
}

impl RenderContext {
    pub fn new(config: HiliteConfig) -> Result<Self, HighlightError> {
        Ok(Self {
            highlighter: Highlighter::from_config(&config)?,
            config,
        })
    }
}

/// Page elements the view and the event wiring bind to.
#[derive(Debug, Clone)]
pub struct View {
    pub code: HtmlTextAreaElement,
    pub files: HtmlElement,
    pub files_outer: HtmlElement,
    pub clear_files: HtmlElement,
    pub paste: HtmlElement,
    pub upload: HtmlInputElement,
    pub upload_label: HtmlElement,
    pub folder: HtmlInputElement,
    pub copy: HtmlButtonElement,
    pub output: HtmlElement,
    pub placeholder: HtmlElement,
    pub line_numbers: HtmlInputElement,
    pub first_line_number: HtmlInputElement,
    pub first_line_number_label: HtmlElement,
    pub error: HtmlElement,
    pub about: HtmlElement,
    pub modal_close: HtmlElement,
    pub header_help: HtmlElement,
    pub footer_help: HtmlElement,
}

fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element #{id} has an unexpected type")))
}

fn set_class(el: &Element, class: &str, on: bool) {
    if let Err(err) = el.class_list().toggle_with_force(class, on) {
        tracing::warn!(class, "class toggle failed: {:?}", err);
    }
}

fn set_hidden(el: &Element, hidden: bool) {
    set_class(el, HIDDEN, hidden);
}

fn file_selector(id: FileId) -> String {
    format!(r#"[data-file-id="{id}"]"#)
}

impl View {
    /// Look up every configured element.
    pub fn resolve(document: &Document, ids: &ElementIds) -> Result<Self, JsValue> {
        Ok(Self {
            code: element(document, &ids.code)?,
            files: element(document, &ids.files)?,
            files_outer: element(document, &ids.files_outer)?,
            clear_files: element(document, &ids.clear_files)?,
            paste: element(document, &ids.paste)?,
            upload: element(document, &ids.upload)?,
            upload_label: element(document, &ids.upload_label)?,
            folder: element(document, &ids.folder)?,
            copy: element(document, &ids.copy)?,
            output: element(document, &ids.output)?,
            placeholder: element(document, &ids.placeholder)?,
            line_numbers: element(document, &ids.line_numbers)?,
            first_line_number: element(document, &ids.first_line_number)?,
            first_line_number_label: element(document, &ids.first_line_number_label)?,
            error: element(document, &ids.error)?,
            about: element(document, &ids.about)?,
            modal_close: element(document, &ids.modal_close)?,
            header_help: element(document, &ids.header_help)?,
            footer_help: element(document, &ids.footer_help)?,
        })
    }

    /// Reflect one event.
    pub fn apply(&self, event: &SourceEvent, state: &SourceState, ctx: &RenderContext) {
        match *event {
            SourceEvent::ModeSetText => {
                self.show_tabs(true);
                if state.line_numbers_enabled() {
                    self.set_first_line_enabled(true);
                }
            }
            SourceEvent::ModeSetFile => {
                self.show_tabs(false);
                self.set_first_line_enabled(false);
            }
            SourceEvent::TextContentSet => {
                let text = state.text_content();
                if self.code.value() != text {
                    self.code.set_value(text);
                }
                if !text.is_empty() {
                    self.replace_output(state, ctx);
                }
            }
            SourceEvent::FileAdded(id) => self.add_file(id, state, ctx),
            SourceEvent::FileRemoved(id) => self.remove_file(id),
            SourceEvent::FilesCleared => {
                self.files.set_inner_html("");
                self.output.set_inner_html("");
            }
            SourceEvent::SourceEmpty => self.show_output(false),
            SourceEvent::LineNumbersEnabled => {
                self.line_numbers.set_checked(true);
                self.rerender(state, ctx);
                if state.is_mode_text() {
                    self.set_first_line_enabled(true);
                }
            }
            SourceEvent::LineNumbersDisabled => {
                self.line_numbers.set_checked(false);
                self.rerender(state, ctx);
                self.set_first_line_enabled(false);
            }
            SourceEvent::FirstLineNumberSet => self.rerender(state, ctx),
            SourceEvent::ErrorShown => set_hidden(&self.error, false),
            SourceEvent::ErrorHidden => set_hidden(&self.error, true),
            SourceEvent::ErrorMessageSet => {
                self.error.set_text_content(state.error_message().as_deref());
            }
            SourceEvent::AboutShown => set_hidden(&self.about, false),
            SourceEvent::AboutHidden => set_hidden(&self.about, true),
        }
    }

    /// Bring the whole page in line with `state`.
    pub fn refresh(&self, state: &SourceState, ctx: &RenderContext) {
        self.show_tabs(state.is_mode_text());
        self.line_numbers.set_checked(state.line_numbers_enabled());
        self.first_line_number
            .set_value(&state.first_line_number().to_string());
        self.set_first_line_enabled(state.is_mode_text() && state.line_numbers_enabled());

        self.files.set_inner_html("");
        if state.is_mode_text() {
            self.code.set_value(state.text_content());
        } else {
            for id in state.file_ids() {
                self.add_chip(id, state);
            }
        }
        self.rerender(state, ctx);
        self.show_output(!state.is_empty());

        set_hidden(&self.error, !state.error_is_shown());
        self.error.set_text_content(state.error_message().as_deref());
        set_hidden(&self.about, !state.about_is_shown());
    }

    fn show_tabs(&self, text_mode: bool) {
        set_class(&self.paste, TAB, text_mode);
        set_class(&self.upload_label, TAB, !text_mode);
        set_hidden(&self.files_outer, text_mode);
        set_hidden(&self.code, !text_mode);
    }

    fn set_first_line_enabled(&self, enabled: bool) {
        set_class(&self.first_line_number_label, OPTION_DISABLED, !enabled);
        self.first_line_number.set_disabled(!enabled);
    }

    fn show_output(&self, visible: bool) {
        set_hidden(&self.placeholder, visible);
        set_hidden(&self.output, !visible);
        self.copy.set_disabled(!visible);
    }

    fn replace_output(&self, state: &SourceState, ctx: &RenderContext) {
        self.rerender(state, ctx);
        self.show_output(true);
    }

    /// Re-render whatever is currently shown, e.g. after a numbering change.
    fn rerender(&self, state: &SourceState, ctx: &RenderContext) {
        if state.is_empty() {
            return;
        }
        match render_output(state, &ctx.highlighter, &ctx.config) {
            Ok(html) => self.output.set_inner_html(&html),
            Err(err) => tracing::error!(%err, "render failed"),
        }
    }

    fn add_file(&self, id: FileId, state: &SourceState, ctx: &RenderContext) {
        self.add_chip(id, state);
        match render_file(id, state, &ctx.highlighter, &ctx.config) {
            Ok(Some(html)) => {
                if let Err(err) = self.output.insert_adjacent_html("beforeend", &html) {
                    tracing::warn!("output append failed: {:?}", err);
                }
            }
            Ok(None) => {}
            Err(err) => tracing::error!(%id, %err, "render failed"),
        }
        self.show_output(true);
    }

    /// File chip; clicks on it are handled by the delegated listener on the
    /// files container.
    fn add_chip(&self, id: FileId, state: &SourceState) {
        let Some(name) = state.file_name(id) else {
            return;
        };
        let Some(document) = self.files.owner_document() else {
            return;
        };
        let chip = match document.create_element("div") {
            Ok(chip) => chip,
            Err(err) => {
                tracing::warn!("chip creation failed: {:?}", err);
                return;
            }
        };
        set_class(&chip, "files__file", true);
        chip.set_text_content(Some(&format!("\u{274C} {name}")));
        let _ = chip.set_attribute("data-file-id", &id.to_string());
        if let Err(err) = self.files.append_child(&chip) {
            tracing::warn!("chip append failed: {:?}", err);
        }
    }

    fn remove_file(&self, id: FileId) {
        let selector = file_selector(id);
        for container in [&self.files, &self.output] {
            let Ok(nodes) = container.query_selector_all(&selector) else {
                continue;
            };
            for i in 0..nodes.length() {
                if let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    el.remove();
                }
            }
        }
    }
}

/// Keep `view` in step with `source`. Returns the bus subscription.
pub fn bind_view(
    source: &mut SourceData,
    view: Rc<View>,
    ctx: Rc<RenderContext>,
) -> SubscriptionId {
    source.subscribe_all(move |event, state| view.apply(event, state, &ctx))
}
