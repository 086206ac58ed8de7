//! HTML rendering of the whole source: code blocks, file headings, and the
//! payload written to the clipboard on copy.
//!
//! All styling that matters after a paste (font, color) is written inline.

use crate::config::HiliteConfig;
use crate::error::HighlightError;
use crate::export::plain_render;
use crate::highlight::Highlighter;
use crate::line_numbers::number_lines;
use crate::source::{FileId, SourceState};

/// Both flavors written to the clipboard on copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub html: String,
    pub plain: String,
}

/// Escape text for use in HTML content or a quoted attribute.
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn inline_style(config: &HiliteConfig, color: Option<String>) -> String {
    let mut style = format!(
        "font-family:{};font-size:{}",
        config.font_family, config.font_size
    );
    if let Some(color) = color {
        style.push_str(";color:");
        style.push_str(&color);
    }
    html_escape(&style)
}

fn file_attr(id: Option<FileId>) -> String {
    id.map(|id| format!(r#" data-file-id="{id}""#))
        .unwrap_or_default()
}

fn code_block(
    text: &str,
    name_hint: Option<&str>,
    state: &SourceState,
    highlighter: &Highlighter,
    config: &HiliteConfig,
    id: Option<FileId>,
) -> Result<String, HighlightError> {
    let lines = highlighter.highlight_lines(text, name_hint)?;
    let body = if state.line_numbers_enabled() {
        number_lines(
            &lines,
            state.first_line_for_display(),
            config.line_number_column_width,
        )
    } else {
        lines.join("\n")
    };
    Ok(format!(
        r#"<pre class="output__code"{} style="{}"><code>{body}</code></pre>"#,
        file_attr(id),
        inline_style(config, highlighter.foreground()),
    ))
}

fn file_heading(name: &str, config: &HiliteConfig, id: Option<FileId>) -> String {
    format!(
        r#"<h3 class="output__filename"{} style="{}">{}</h3>"#,
        file_attr(id),
        inline_style(config, None),
        html_escape(name)
    )
}

/// Render one highlighted code block, numbered if the state says so.
pub fn render_code_block(
    text: &str,
    name_hint: Option<&str>,
    state: &SourceState,
    highlighter: &Highlighter,
    config: &HiliteConfig,
) -> Result<String, HighlightError> {
    code_block(text, name_hint, state, highlighter, config, None)
}

/// Render a file's heading and code block, both tagged with its id so the
/// pair can be removed from a page together.
///
/// Returns `Ok(None)` for an unknown id.
pub fn render_file(
    id: FileId,
    state: &SourceState,
    highlighter: &Highlighter,
    config: &HiliteConfig,
) -> Result<Option<String>, HighlightError> {
    let Some(file) = state.file(id) else {
        return Ok(None);
    };
    let mut html = file_heading(&file.name, config, Some(id));
    html.push_str(&code_block(
        &file.content,
        Some(&file.name),
        state,
        highlighter,
        config,
        Some(id),
    )?);
    Ok(Some(html))
}

/// Render the inner markup of the output area for the current mode.
pub fn render_output(
    state: &SourceState,
    highlighter: &Highlighter,
    config: &HiliteConfig,
) -> Result<String, HighlightError> {
    if state.is_empty() {
        return Ok(String::new());
    }
    if state.is_mode_text() {
        return render_code_block(state.text_content(), None, state, highlighter, config);
    }
    let mut html = String::new();
    for id in state.file_ids() {
        if let Some(file) = render_file(id, state, highlighter, config)? {
            html.push_str(&file);
        }
    }
    Ok(html)
}

/// Render the full output document. An empty source renders nothing.
pub fn render_document(
    state: &SourceState,
    highlighter: &Highlighter,
    config: &HiliteConfig,
) -> Result<String, HighlightError> {
    if state.is_empty() {
        return Ok(String::new());
    }
    let inner = render_output(state, highlighter, config)?;
    Ok(format!(r#"<div id="output" class="output">{inner}</div>"#))
}

/// Build the rich and plain clipboard flavors, or `None` for an empty source.
pub fn copy_payload(
    state: &SourceState,
    highlighter: &Highlighter,
    config: &HiliteConfig,
) -> Result<Option<ClipboardPayload>, HighlightError> {
    if state.is_empty() {
        return Ok(None);
    }
    Ok(Some(ClipboardPayload {
        html: render_document(state, highlighter, config)?,
        plain: plain_render(state),
    }))
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use crate::SourceData;

    fn setup() -> (Highlighter, HiliteConfig) {
        let config = HiliteConfig::default();
        let highlighter = Highlighter::from_config(&config).unwrap();
        (highlighter, config)
    }

    #[test]
    fn test_escape() {
        insta::assert_snapshot!(
            html_escape(r#"<a href="x">'&'</a>"#),
            @"&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_empty_source_renders_nothing() {
        let (h, config) = setup();
        let mut source = SourceData::new();
        assert_eq!(render_document(source.state(), &h, &config).unwrap(), "");
        assert_eq!(copy_payload(source.state(), &h, &config).unwrap(), None);

        source.set_mode_file();
        assert_eq!(render_document(source.state(), &h, &config).unwrap(), "");
        assert_eq!(copy_payload(source.state(), &h, &config).unwrap(), None);
    }

    #[test]
    fn test_text_block_with_line_numbers() {
        let (h, config) = setup();
        let mut source = SourceData::new();
        source.set_text_content("a\nb");
        source.set_first_line_number(NonZeroU32::new(41).unwrap());

        let html = render_document(source.state(), &h, &config).unwrap();
        assert!(html.starts_with(r#"<div id="output" class="output"><pre class="output__code" style="font-family:"#));
        assert!(html.ends_with("</code></pre></div>"));
        assert!(html.contains(">41</td>"));
        assert!(html.contains(">42</td>"));
        assert!(html.contains(r#"<col width="32" />"#));
        assert!(!html.contains("data-file-id"));
    }

    #[test]
    fn test_text_block_without_line_numbers() {
        let (h, config) = setup();
        let mut source = SourceData::new();
        source.set_text_content("a\nb");
        source.disable_line_numbers();

        let html = render_document(source.state(), &h, &config).unwrap();
        assert!(!html.contains("<table>"));
        assert_eq!(html.matches('\n').count(), 1);
    }

    #[test]
    fn test_file_mode_numbers_from_one() {
        let (h, config) = setup();
        let mut source = SourceData::new();
        source.set_first_line_number(NonZeroU32::new(7).unwrap());
        source.set_mode_file();
        source.add_file("main.rs", "fn main() {}");

        let html = render_document(source.state(), &h, &config).unwrap();
        assert!(html.contains(">1</td>"));
        assert!(!html.contains(">7</td>"));
    }

    #[test]
    fn test_files_in_id_order_with_escaped_headings() {
        let (h, config) = setup();
        let mut source = SourceData::new();
        source.set_mode_file();
        let a = source.add_file("a<1>.txt", "alpha");
        let b = source.add_file("b.txt", "beta");

        let html = render_document(source.state(), &h, &config).unwrap();
        let first = html.find("a&lt;1&gt;.txt").unwrap();
        let second = html.find("b.txt").unwrap();
        assert!(first < second);
        assert_eq!(html.matches(&format!(r#"data-file-id="{a}""#)).count(), 2);
        assert_eq!(html.matches(&format!(r#"data-file-id="{b}""#)).count(), 2);
    }

    #[test]
    fn test_heading_markup() {
        let config = HiliteConfig {
            font_family: "mono".into(),
            font_size: "12px".into(),
            ..HiliteConfig::default()
        };
        insta::assert_snapshot!(
            file_heading("x & y", &config, None),
            @r#"<h3 class="output__filename" style="font-family:mono;font-size:12px">x &amp; y</h3>"#
        );
    }

    #[test]
    fn test_unknown_file_renders_none() {
        let (h, config) = setup();
        let mut source = SourceData::new();
        source.set_mode_file();
        let id = source.add_file("a", "b");
        source.remove_file(id);
        assert_eq!(render_file(id, source.state(), &h, &config).unwrap(), None);
    }

    #[test]
    fn test_copy_payload_carries_both_flavors() {
        let (h, config) = setup();
        let mut source = SourceData::new();
        source.set_text_content("let x = 1;");

        let payload = copy_payload(source.state(), &h, &config).unwrap().unwrap();
        assert_eq!(payload.plain, "let x = 1;");
        assert!(payload.html.contains(r#"class="output__code""#));
    }
}
