//! Types exposed to JavaScript via wasm-bindgen.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

use hilite_core::HiliteConfig;

/// A named file, as passed to `plainRender`.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct JsFile {
    pub name: String,
    pub content: String,
}

/// Read an optional JS config object. Missing keys take their defaults.
pub(crate) fn parse_config(config: Option<JsValue>) -> Result<HiliteConfig, JsError> {
    match config {
        Some(value) if !value.is_undefined() && !value.is_null() => {
            serde_wasm_bindgen::from_value(value)
                .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))
        }
        _ => Ok(HiliteConfig::default()),
    }
}
