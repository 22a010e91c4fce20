//! Terminal output helpers

use similar::{ChangeTag, TextDiff};

/// Print a line-based diff between the original and rewritten text
pub fn print_diff(old: &str, new: &str) {
    let diff = TextDiff::from_lines(old, new);
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => ' ',
        };
        print!("{sign}{change}");
    }
}
