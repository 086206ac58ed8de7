//! DOM event wiring: page events in, source operations out.
//!
//! Every handler clears the error first. Flows that wait on the browser run
//! through `spawn_local`; the source is only borrowed between awaits.

use std::cell::{Cell, RefCell};
use std::num::NonZeroU32;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    ClipboardEvent, Document, DragEvent, Element, Event, EventTarget, HtmlElement, Node,
};

use hilite_core::normalize::TEXT_PLAIN;
use hilite_core::render::copy_payload;
use hilite_core::{
    ClipboardSink, DataTransferSource, FileId, SourceData, handle_data_transfer, handle_files,
    read_clipboard,
};

use crate::clipboard::BrowserClipboard;
use crate::entries::{BrowserDataTransfer, BrowserFile};
use crate::view::{RenderContext, View};

const ACTIVE: &str = "action--active";
const FEEDBACK_MS: u32 = 1_000;

type Source = Rc<RefCell<SourceData>>;

/// Briefly marks an element active. Re-triggering restarts the timer.
#[derive(Debug)]
pub struct ActionFeedback {
    el: HtmlElement,
    pending: RefCell<Option<Timeout>>,
}

impl ActionFeedback {
    pub fn new(el: HtmlElement) -> Self {
        Self {
            el,
            pending: RefCell::new(None),
        }
    }

    pub fn trigger(&self) {
        // Dropping the previous timeout cancels it.
        self.pending.borrow_mut().take();
        let classes = self.el.class_list();
        let _ = classes.remove_1(ACTIVE);
        // Force a reflow so a running animation starts over.
        let _ = self.el.offset_width();
        let _ = classes.add_1(ACTIVE);
        let el = self.el.clone();
        *self.pending.borrow_mut() = Some(Timeout::new(FEEDBACK_MS, move || {
            let _ = el.class_list().remove_1(ACTIVE);
        }));
    }
}

fn target_is(event: &Event, el: &JsValue) -> bool {
    event
        .target()
        .is_some_and(|target| AsRef::<JsValue>::as_ref(&target) == el)
}

fn clear_error(source: &Source) {
    source.borrow_mut().clear_error();
}

/// Everything needed by the copy flow.
struct CopyFlow {
    source: Source,
    ctx: Rc<RenderContext>,
    feedback: ActionFeedback,
    /// Set while a rich write runs; its own synthetic `copy` event is ignored.
    in_flight: Cell<bool>,
}

impl CopyFlow {
    async fn run(&self) {
        let payload = {
            let source = self.source.borrow();
            copy_payload(source.state(), &self.ctx.highlighter, &self.ctx.config)
        };
        let payload = match payload {
            Ok(Some(payload)) => payload,
            Ok(None) => return,
            Err(err) => {
                tracing::error!(%err, "copy render failed");
                self.source.borrow_mut().report_error(err.to_string());
                return;
            }
        };

        self.in_flight.set(true);
        let written = BrowserClipboard
            .write_rich(&payload.html, &payload.plain)
            .await;
        self.in_flight.set(false);

        match written {
            Ok(()) => {
                tracing::debug!(html = payload.html.len(), "copied");
                self.feedback.trigger();
            }
            Err(err) => tracing::error!(%err, "copy failed"),
        }
    }
}

fn on_copy(event: &Event, flow: &Rc<CopyFlow>, view: &View) {
    if flow.in_flight.get() {
        return;
    }
    clear_error(&flow.source);

    // Leave copies of a user's own selection alone.
    let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
    if !view.copy.contains(target.as_ref()) {
        let selection = web_sys::window().and_then(|w| w.get_selection().ok().flatten());
        if selection.is_some_and(|s| s.type_() == "Range") {
            return;
        }
    }

    event.prevent_default();
    let flow = flow.clone();
    wasm_bindgen_futures::spawn_local(async move { flow.run().await });
}

fn on_transfer(event: &Event, source: &Source, view: &View) {
    clear_error(source);
    let data = event
        .dyn_ref::<ClipboardEvent>()
        .and_then(|e| e.clipboard_data())
        .or_else(|| event.dyn_ref::<DragEvent>().and_then(|e| e.data_transfer()));
    let Some(data) = data else {
        return;
    };
    let data = BrowserDataTransfer::capture(&data);

    // Text pasted into the text area is handled by its own input event.
    if data.has_type(TEXT_PLAIN) && target_is(event, view.code.as_ref()) {
        return;
    }

    event.stop_propagation();
    event.prevent_default();
    let source = source.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let report = handle_data_transfer(&source, &data).await;
        tracing::debug!(?report, "transfer done");
    });
}

fn on_file_input(input: &web_sys::HtmlInputElement, source: &Source) {
    {
        let mut source = source.borrow_mut();
        source.clear_error();
        source.set_mode_file();
    }
    let files = input
        .files()
        .map(|list| BrowserFile::from_list(&list))
        .unwrap_or_default();
    let source = source.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let report = handle_files(&source, files).await;
        tracing::debug!(added = report.added.len(), "upload done");
    });
}

fn on_first_line_input(input: &web_sys::HtmlInputElement, source: &Source) {
    clear_error(source);
    input.report_validity();
    if !input.check_validity() {
        return;
    }
    match first_line_number(input.value_as_number()) {
        Some(first) => source.borrow_mut().set_first_line_number(first),
        None => tracing::debug!(value = %input.value(), "ignoring first line number"),
    }
}

/// Number inputs accept exponent forms like `1e3`, so go through the
/// parsed value rather than the raw string.
fn first_line_number(value: f64) -> Option<NonZeroU32> {
    if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > f64::from(u32::MAX) {
        return None;
    }
    NonZeroU32::new(value as u32)
}

fn on_chip_click(event: &Event, source: &Source) {
    let chip = event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest("[data-file-id]").ok().flatten());
    let id = chip
        .and_then(|chip| chip.get_attribute("data-file-id"))
        .and_then(|id| id.parse::<u32>().ok());
    if let Some(id) = id {
        source.borrow_mut().remove_file(FileId::new(id));
    }
}

/// Install every page listener. Dropping the returned listeners detaches them.
pub fn wire_events(
    document: &Document,
    source: &Source,
    view: &Rc<View>,
    ctx: &Rc<RenderContext>,
) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    let active = EventListenerOptions::enable_prevent_default();

    listeners.push({
        let (source, view) = (source.clone(), view.clone());
        EventListener::new(&view.code.clone(), "input", move |_| {
            let mut source = source.borrow_mut();
            source.clear_error();
            source.set_text_content(view.code.value());
        })
    });

    listeners.push({
        let source = source.clone();
        EventListener::new(&view.paste, "click", move |_| {
            let source = source.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let report = read_clipboard(&source, &BrowserClipboard).await;
                tracing::debug!(errors = report.errors.len(), "paste button done");
            });
        })
    });

    for input in [&view.upload, &view.folder] {
        let (source, target) = (source.clone(), input.clone());
        listeners.push(EventListener::new(input, "input", move |_| {
            on_file_input(&target, &source)
        }));
    }

    listeners.push({
        let source = source.clone();
        EventListener::new(&view.clear_files, "click", move |_| {
            let mut source = source.borrow_mut();
            source.clear_error();
            source.clear_files();
        })
    });

    listeners.push({
        let source = source.clone();
        EventListener::new(&view.files, "click", move |event| on_chip_click(event, &source))
    });

    listeners.push({
        let (source, input) = (source.clone(), view.line_numbers.clone());
        EventListener::new(&view.line_numbers, "click", move |_| {
            let mut source = source.borrow_mut();
            source.clear_error();
            source.set_line_numbers_enabled(input.checked());
        })
    });

    listeners.push({
        let (source, input) = (source.clone(), view.first_line_number.clone());
        EventListener::new(&view.first_line_number, "input", move |_| {
            on_first_line_input(&input, &source)
        })
    });

    let flow = Rc::new(CopyFlow {
        source: source.clone(),
        ctx: ctx.clone(),
        feedback: ActionFeedback::new(view.copy.clone().into()),
        in_flight: Cell::new(false),
    });
    let copy_listener = |target: &EventTarget, name: &'static str| {
        let (flow, view) = (flow.clone(), view.clone());
        EventListener::new_with_options(target, name, active, move |event| {
            on_copy(event, &flow, &view)
        })
    };
    listeners.push(copy_listener(&view.copy, "click"));
    listeners.push(copy_listener(document, "copy"));

    for name in ["dragenter", "dragover"] {
        listeners.push(EventListener::new_with_options(
            document,
            name,
            active,
            |event| {
                event.stop_propagation();
                event.prevent_default();
            },
        ));
    }

    for name in ["paste", "drop"] {
        let (source, view) = (source.clone(), view.clone());
        listeners.push(EventListener::new_with_options(
            document,
            name,
            active,
            move |event| on_transfer(event, &source, &view),
        ));
    }

    for help in [&view.header_help, &view.footer_help] {
        let source = source.clone();
        listeners.push(EventListener::new(help, "click", move |_| {
            source.borrow_mut().show_about();
        }));
    }

    listeners.push({
        let (source, about) = (source.clone(), view.about.clone());
        EventListener::new(&view.about, "click", move |event| {
            // Only clicks on the backdrop, not inside the modal.
            if target_is(event, about.as_ref()) {
                source.borrow_mut().hide_about();
            }
        })
    });

    listeners.push({
        let source = source.clone();
        EventListener::new(&view.modal_close, "click", move |_| {
            source.borrow_mut().hide_about();
        })
    });

    tracing::debug!(count = listeners.len(), "listeners installed");
    listeners
}
