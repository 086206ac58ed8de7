//! Which files count as text, and what they are called.

/// Maximum share of U+FFFD in decoded content, in percent.
pub const MAX_REPLACEMENT_PERCENT: usize = 1;

/// Whether a declared media type may hold text worth decoding.
///
/// Browsers leave the type empty for unknown extensions (most source files),
/// and report many text formats (json, javascript, xml) under `application/`.
pub fn accepts_media_type(media_type: &str) -> bool {
    media_type.is_empty() || media_type.starts_with("text/") || media_type.starts_with("application/")
}

/// Whether decoded content has too many replacement characters to be text.
///
/// Lengths are counted in UTF-16 code units, the unit browsers decode into.
/// Rejects iff `invalid * 100 > total * MAX_REPLACEMENT_PERCENT`.
pub fn replacement_ratio_exceeded(text: &str) -> bool {
    let (invalid, total) = text
        .chars()
        .fold((0usize, 0usize), |(invalid, total), c| {
            (
                invalid + usize::from(c == char::REPLACEMENT_CHARACTER),
                total + c.len_utf16(),
            )
        });
    invalid * 100 > total * MAX_REPLACEMENT_PERCENT
}

/// Pick the display name for a file.
///
/// Precedence: explicit override, relative path, webkit relative path, name.
/// Empty strings fall through to the next candidate.
pub fn resolve_file_name(
    name_override: Option<&str>,
    relative_path: Option<&str>,
    webkit_relative_path: Option<&str>,
    name: &str,
) -> String {
    [name_override, relative_path, webkit_relative_path]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or(name)
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_replacements(invalid: usize, total: usize) -> String {
        let mut text = "\u{FFFD}".repeat(invalid);
        text.push_str(&"a".repeat(total - invalid));
        text
    }

    #[test]
    fn test_media_types() {
        assert!(accepts_media_type(""));
        assert!(accepts_media_type("text/plain"));
        assert!(accepts_media_type("text/x-rust"));
        assert!(accepts_media_type("application/json"));
        assert!(!accepts_media_type("image/png"));
        assert!(!accepts_media_type("video/mp4"));
        assert!(!accepts_media_type("font/woff2"));
    }

    #[test]
    fn test_replacement_threshold() {
        // 2 of 150 is above 1%, 1 of 150 is below.
        assert!(replacement_ratio_exceeded(&with_replacements(2, 150)));
        assert!(!replacement_ratio_exceeded(&with_replacements(1, 150)));
        // Exactly 1% is still accepted.
        assert!(!replacement_ratio_exceeded(&with_replacements(1, 100)));
        assert!(!replacement_ratio_exceeded(""));
    }

    #[test]
    fn test_astral_chars_count_as_two_units() {
        // 1 replacement + 50 emoji (100 units) = 101 units, under 1%.
        let mut text = String::from("\u{FFFD}");
        text.push_str(&"\u{1F980}".repeat(50));
        assert!(!replacement_ratio_exceeded(&text));
    }

    #[test]
    fn test_name_precedence() {
        assert_eq!(
            resolve_file_name(Some("dir/a.rs"), Some("r/a.rs"), Some("w/a.rs"), "a.rs"),
            "dir/a.rs"
        );
        assert_eq!(
            resolve_file_name(None, Some("r/a.rs"), Some("w/a.rs"), "a.rs"),
            "r/a.rs"
        );
        assert_eq!(
            resolve_file_name(None, Some(""), Some("w/a.rs"), "a.rs"),
            "w/a.rs"
        );
        assert_eq!(resolve_file_name(None, None, Some(""), "a.rs"), "a.rs");
    }
}
