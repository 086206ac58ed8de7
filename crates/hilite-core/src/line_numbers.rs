//! Line-numbered table layout for highlighted code.
//!
//! Numbers live in their own table column so that selecting or pasting the
//! code keeps them out of the code cells.

use std::fmt::Write as _;

/// Lay out highlighted lines as a two-column table, numbering from `first`.
///
/// The number column is `column_width_per_digit` pixels per digit of the
/// number after the last line.
pub fn number_lines<S: AsRef<str>>(lines: &[S], first: u32, column_width_per_digit: u32) -> String {
    let mut next = u64::from(first);
    let mut rows = String::new();
    for line in lines {
        let _ = write!(
            rows,
            r#"<tr style="height:0"><td style="padding:0 0.5em 0 0;text-align:right">{next}</td><td style="padding:0">{}</td></tr>"#,
            line.as_ref()
        );
        next += 1;
    }
    let width = u64::from(column_width_per_digit) * digits(next);
    format!(
        r#"<table><colgroup><col width="{width}" /><col /></colgroup><tbody>{rows}</tbody></table>"#
    )
}

fn digits(n: u64) -> u64 {
    u64::from(n.checked_ilog10().unwrap_or(0)) + 1
}
