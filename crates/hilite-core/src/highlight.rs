//! Syntax highlighting: source text in, inline-styled HTML lines out.
//!
//! Output uses inline `style` attributes rather than classes, so markup that
//! is copied out of the page renders the same wherever it is pasted.

use std::path::Path;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use web_time::Instant;

use crate::config::HiliteConfig;
use crate::error::HighlightError;

pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("theme", &self.theme.name)
            .finish_non_exhaustive()
    }
}

impl Highlighter {
    /// Load the bundled syntaxes and the named bundled theme.
    pub fn new(theme_name: &str) -> Result<Self, HighlightError> {
        let mut themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .remove(theme_name)
            .ok_or_else(|| HighlightError::UnknownTheme(theme_name.to_owned()))?;
        Ok(Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        })
    }

    pub fn from_config(config: &HiliteConfig) -> Result<Self, HighlightError> {
        Self::new(&config.theme)
    }

    /// Names accepted by [`Highlighter::new`].
    pub fn theme_names() -> Vec<String> {
        let mut names: Vec<String> = ThemeSet::load_defaults().themes.into_keys().collect();
        names.sort();
        names
    }

    /// Theme text color as a CSS color.
    pub fn foreground(&self) -> Option<String> {
        self.theme.settings.foreground.map(css_color)
    }

    /// Pick a syntax from a file name, then the first line, then plain text.
    pub fn syntax_for(&self, text: &str, name_hint: Option<&str>) -> &SyntaxReference {
        name_hint
            .and_then(|name| {
                let path = Path::new(name);
                let by_ext = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(|ext| self.syntaxes.find_syntax_by_extension(ext));
                // Extension-less names like `Makefile` are listed as extensions.
                by_ext.or_else(|| {
                    path.file_name()
                        .and_then(|file| file.to_str())
                        .and_then(|file| self.syntaxes.find_syntax_by_extension(file))
                })
            })
            .or_else(|| {
                text.lines()
                    .next()
                    .and_then(|first| self.syntaxes.find_syntax_by_first_line(first))
            })
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }

    /// Highlight `text` into one HTML fragment per `\n`-separated line.
    ///
    /// Each fragment closes its own spans. A trailing newline yields a final
    /// empty fragment, matching how the text splits.
    pub fn highlight_lines(
        &self,
        text: &str,
        name_hint: Option<&str>,
    ) -> Result<Vec<String>, HighlightError> {
        let start = Instant::now();
        let syntax = self.syntax_for(text, name_hint);
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut out = Vec::new();
        let mut line = String::new();

        for piece in text.split('\n') {
            line.clear();
            line.push_str(piece);
            line.push('\n');
            let regions = highlighter.highlight_line(&line, &self.syntaxes)?;
            let trimmed: Vec<_> = regions
                .into_iter()
                .map(|(style, s)| (style, s.trim_end_matches(['\n', '\r'])))
                .filter(|(_, s)| !s.is_empty())
                .collect();
            out.push(styled_line_to_highlighted_html(&trimmed, IncludeBackground::No)?);
        }

        tracing::debug!(
            syntax = %syntax.name,
            lines = out.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "highlighted"
        );
        Ok(out)
    }
}

fn css_color(c: Color) -> String {
    if c.a == 0xff {
        format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
    } else {
        format!("rgba({},{},{},{:.3})", c.r, c.g, c.b, f32::from(c.a) / 255.0)
    }
}
