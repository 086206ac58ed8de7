//! WASM bindings for hilite.
//!
//! `JsHilite.mount()` binds the page; `highlight` and `plainRender` are
//! stateless helpers for callers that manage their own DOM.

mod hilite;
mod types;

pub use hilite::*;
pub use types::*;

use wasm_bindgen::prelude::*;

use hilite_core::{SourceData, render_code_block};

use crate::types::parse_config;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    init_tracing();
}

fn init_tracing() {
    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let _ = set_global_default(Registry::default().with(wasm_layer));
}

/// Highlight `text` into a self-styled `<pre>` block, without line numbers.
///
/// # Arguments
/// * `text` - The source text
/// * `name_hint` - Optional file name used to pick the syntax
/// * `config` - Optional config object (theme, font)
#[wasm_bindgen]
pub fn highlight(
    text: &str,
    name_hint: Option<String>,
    config: Option<JsValue>,
) -> Result<String, JsError> {
    let config = parse_config(config)?;
    let highlighter =
        hilite_core::Highlighter::from_config(&config).map_err(|e| JsError::new(&e.to_string()))?;
    let mut source = SourceData::new();
    source.disable_line_numbers();
    render_code_block(
        text,
        name_hint.as_deref(),
        source.state(),
        &highlighter,
        &config,
    )
    .map_err(|e| JsError::new(&e.to_string()))
}

/// Plain-text rendering of a list of `{ name, content }` files.
#[wasm_bindgen(js_name = plainRender)]
pub fn plain_render(files: JsValue) -> Result<String, JsError> {
    let files: Vec<JsFile> = serde_wasm_bindgen::from_value(files)
        .map_err(|e| JsError::new(&format!("Invalid files: {}", e)))?;
    let mut source = SourceData::new();
    source.set_mode_file();
    for JsFile { name, content } in files {
        source.add_file(name, content);
    }
    Ok(hilite_core::plain_render(source.state()))
}

/// Names of the bundled themes accepted as `config.theme`.
#[wasm_bindgen(js_name = themeNames)]
pub fn theme_names() -> Vec<String> {
    hilite_core::Highlighter::theme_names()
}
