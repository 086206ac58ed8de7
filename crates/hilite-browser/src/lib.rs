//! Browser DOM layer for hilite.
//!
//! This crate binds a [`SourceData`] to a page: web-sys implementations of
//! the input and clipboard host traits, a view that reflects source events
//! into the DOM, and the listeners that turn page events into source
//! operations. It assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `entries`: DataTransfer, FileSystem entry and File hosts
//! - `clipboard`: async Clipboard API with an `execCommand` fallback
//! - `view`: element lookup and event-to-DOM reflection
//! - `events`: page listeners, copy feedback
//!
//! # Re-exports
//!
//! This crate re-exports `hilite-core` for convenience, so consumers
//! only need to depend on `hilite-browser`.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use wasm_bindgen::JsValue;

// Re-export core crate
pub use hilite_core;
pub use hilite_core::*;

pub mod clipboard;
pub mod entries;
pub mod events;
pub mod view;

pub use clipboard::{BrowserClipboard, navigator_clipboard};
pub use entries::{BrowserDataTransfer, BrowserDirectoryReader, BrowserEntry, BrowserFile};
pub use events::{ActionFeedback, wire_events};
pub use view::{RenderContext, View, bind_view};

/// A source bound to the page. Dropping it detaches every listener.
pub struct Mounted {
    source: Rc<RefCell<SourceData>>,
    ctx: Rc<RenderContext>,
    subscription: SubscriptionId,
    listeners: Vec<EventListener>,
}

impl std::fmt::Debug for Mounted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mounted")
            .field("state", self.source.borrow().state())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl Mounted {
    /// The shared source, for callers that drive it directly.
    pub fn source(&self) -> &Rc<RefCell<SourceData>> {
        &self.source
    }

    pub fn render_context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn is_empty(&self) -> bool {
        self.source.borrow().state().is_empty()
    }

    pub fn plain_text(&self) -> String {
        plain_render(self.source.borrow().state())
    }

    pub fn render_document(&self) -> Result<String, HighlightError> {
        render_document(
            self.source.borrow().state(),
            &self.ctx.highlighter,
            &self.ctx.config,
        )
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        if let Ok(mut source) = self.source.try_borrow_mut() {
            source.unsubscribe(self.subscription);
        }
    }
}

/// Resolve the configured elements, bind the view and install listeners.
pub fn mount(config: HiliteConfig) -> Result<Mounted, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let ctx = Rc::new(RenderContext::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?);
    let view = Rc::new(View::resolve(&document, &ctx.config.elements)?);

    let source = Rc::new(RefCell::new(SourceData::new()));
    let subscription = bind_view(&mut source.borrow_mut(), view.clone(), ctx.clone());
    view.refresh(source.borrow().state(), &ctx);
    let listeners = wire_events(&document, &source, &view, &ctx);

    tracing::info!(theme = %ctx.config.theme, "mounted");
    Ok(Mounted {
        source,
        ctx,
        subscription,
        listeners,
    })
}
