//! WASM browser tests for hilite-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use std::cell::RefCell;

use js_sys::Array;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{
    DataTransfer, Event, File, FilePropertyBag, HtmlButtonElement, HtmlElement, HtmlInputElement,
};

wasm_bindgen_test_configure!(run_in_browser);

use hilite_browser::{
    ActionFeedback, BrowserDataTransfer, BrowserFile, FileHandle, HiliteConfig, HostError,
    SourceData, handle_data_transfer, handle_file, mount, navigator_clipboard,
};

const FIXTURE: &str = r#"
<button id="paste">Paste</button>
<label id="upload_label">Upload <input id="upload" type="file" multiple></label>
<input id="folder" type="file">
<textarea id="code"></textarea>
<div id="files_outer"><div id="files"></div><button id="clear_files">Clear</button></div>
<input id="line_numbers" type="checkbox" checked>
<label id="first_line_number_label">From <input id="first_line_number" type="number" min="1" value="1"></label>
<button id="copy">Copy</button>
<div id="placeholder">Nothing yet</div>
<div id="output"></div>
<div id="error" class="hidden"></div>
<div id="about" class="hidden"><div><button id="modal_close">Close</button></div></div>
<button id="header_help">?</button>
<button id="footer_help">Help</button>
"#;

fn fixture() {
    gloo_utils::body().set_inner_html(FIXTURE);
}

fn by_id<T: JsCast>(id: &str) -> T {
    gloo_utils::document()
        .get_element_by_id(id)
        .unwrap_or_else(|| panic!("missing #{id}"))
        .dyn_into::<T>()
        .unwrap()
}

fn hidden(id: &str) -> bool {
    by_id::<HtmlElement>(id).class_list().contains("hidden")
}

fn text_file(name: &str, content: &str, media_type: Option<&str>) -> File {
    let parts = Array::of1(&JsValue::from_str(content));
    match media_type {
        Some(media_type) => {
            let opts = FilePropertyBag::new();
            opts.set_type(media_type);
            File::new_with_str_sequence_and_options(&parts, name, &opts).unwrap()
        }
        None => File::new_with_str_sequence(&parts, name).unwrap(),
    }
}

// === Hosts ===

#[wasm_bindgen_test]
async fn test_browser_file_reads_text() {
    let file = BrowserFile::new(text_file("main.rs", "fn main() {}", Some("text/x-rust")));
    assert_eq!(file.name(), "main.rs");
    assert_eq!(file.media_type(), "text/x-rust");
    assert_eq!(file.text().await.unwrap(), "fn main() {}");
}

#[wasm_bindgen_test]
async fn test_handle_file_skips_images() {
    let source = RefCell::new(SourceData::new());
    source.borrow_mut().set_mode_file();

    let image = BrowserFile::new(text_file("cat.png", "not really", Some("image/png")));
    let report = handle_file(&source, &image, None).await;
    assert_eq!(report.skipped, vec!["cat.png".to_string()]);

    let notes = BrowserFile::new(text_file("notes.txt", "hello", None));
    let report = handle_file(&source, &notes, None).await;
    assert_eq!(report.added.len(), 1);
    assert_eq!(source.borrow().state().file_count(), 1);
}

#[wasm_bindgen_test]
async fn test_captured_text_transfer() {
    let data = DataTransfer::new().unwrap();
    data.set_data("text/plain", "let x = 1;").unwrap();
    let captured = BrowserDataTransfer::capture(&data);

    let source = RefCell::new(SourceData::new());
    source.borrow_mut().set_mode_file();
    let report = handle_data_transfer(&source, &captured).await;

    assert!(report.text_set);
    let source = source.borrow();
    assert!(source.state().is_mode_text());
    assert_eq!(source.state().text_content(), "let x = 1;");
}

#[wasm_bindgen_test]
fn test_missing_clipboard_is_unsupported() {
    let insecure_navigator = js_sys::Object::new();
    assert!(matches!(
        navigator_clipboard(&insecure_navigator),
        Err(HostError::Unsupported(_))
    ));
}

// === Mounted page ===

#[wasm_bindgen_test]
fn test_mount_starts_empty() {
    fixture();
    let mounted = mount(HiliteConfig::default()).unwrap();
    assert!(mounted.is_empty());
    assert!(hidden("output"));
    assert!(!hidden("placeholder"));
    assert!(hidden("files_outer"));
    assert!(by_id::<HtmlButtonElement>("copy").disabled());
}

#[wasm_bindgen_test]
fn test_mount_fails_without_elements() {
    gloo_utils::body().set_inner_html("");
    assert!(mount(HiliteConfig::default()).is_err());
}

#[wasm_bindgen_test]
fn test_text_renders_output() {
    fixture();
    let mounted = mount(HiliteConfig::default()).unwrap();
    mounted.source().borrow_mut().set_text_content("fn main() {}");

    let output = by_id::<HtmlElement>("output");
    assert!(!hidden("output"));
    assert!(hidden("placeholder"));
    assert!(output.inner_html().contains("output__code"));
    assert!(output.inner_html().contains("<table>"));
    assert!(!by_id::<HtmlButtonElement>("copy").disabled());
    assert_eq!(mounted.plain_text(), "fn main() {}");
}

#[wasm_bindgen_test]
fn test_line_number_checkbox() {
    fixture();
    let mounted = mount(HiliteConfig::default()).unwrap();
    mounted.source().borrow_mut().set_text_content("a\nb");

    by_id::<HtmlElement>("line_numbers").click();

    assert!(!mounted.source().borrow().state().line_numbers_enabled());
    assert!(by_id::<HtmlInputElement>("first_line_number").disabled());
    assert!(!by_id::<HtmlElement>("output").inner_html().contains("<table>"));
}

#[wasm_bindgen_test]
fn test_first_line_number_accepts_exponent_form() {
    fixture();
    let mounted = mount(HiliteConfig::default()).unwrap();
    mounted.source().borrow_mut().set_text_content("a\nb");

    let input = by_id::<HtmlInputElement>("first_line_number");
    input.set_value("1e3");
    input.dispatch_event(&Event::new("input").unwrap()).unwrap();

    assert_eq!(mounted.source().borrow().state().first_line_number().get(), 1000);
    assert!(by_id::<HtmlElement>("output").inner_html().contains("1001"));
}

#[wasm_bindgen_test]
fn test_file_chip_click_removes_file() {
    fixture();
    let mounted = mount(HiliteConfig::default()).unwrap();
    let id = {
        let mut source = mounted.source().borrow_mut();
        source.set_mode_file();
        source.add_file("lib.rs", "pub fn f() {}")
    };
    assert!(hidden("code"));
    assert!(!hidden("files_outer"));

    let selector = format!(r#"[data-file-id="{id}"]"#);
    let output = by_id::<HtmlElement>("output");
    assert_eq!(output.query_selector_all(&selector).unwrap().length(), 2);

    by_id::<HtmlElement>("files")
        .query_selector(".files__file")
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap()
        .click();

    assert!(mounted.is_empty());
    assert_eq!(output.query_selector_all(&selector).unwrap().length(), 0);
    assert!(hidden("output"));
}

#[wasm_bindgen_test]
fn test_error_box() {
    fixture();
    let mounted = mount(HiliteConfig::default()).unwrap();
    mounted.source().borrow_mut().report_error("boom");
    assert!(!hidden("error"));
    assert_eq!(by_id::<HtmlElement>("error").text_content().as_deref(), Some("Error: boom"));

    mounted.source().borrow_mut().clear_error();
    assert!(hidden("error"));
}

#[wasm_bindgen_test]
fn test_about_modal() {
    fixture();
    let _mounted = mount(HiliteConfig::default()).unwrap();

    by_id::<HtmlElement>("header_help").click();
    assert!(!hidden("about"));

    by_id::<HtmlElement>("modal_close").click();
    assert!(hidden("about"));
}

#[wasm_bindgen_test]
fn test_action_feedback_marks_element() {
    fixture();
    let copy = by_id::<HtmlElement>("copy");
    let feedback = ActionFeedback::new(copy.clone());
    feedback.trigger();
    feedback.trigger();
    assert!(copy.class_list().contains("action--active"));
}
