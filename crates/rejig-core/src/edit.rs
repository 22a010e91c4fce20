//! Edit ledger: ordered text edits against one source buffer
//!
//! Refactors never mutate the syntax tree; they record (range, replacement)
//! pairs here and the ledger renders the new text in one pass. Callers must
//! produce pairwise disjoint ranges — the ledger checks this as a
//! defense-in-depth assertion and fails loudly on violation rather than
//! silently picking a winner.

use std::path::PathBuf;

use rowan::{TextRange, TextSize};

use crate::syntax::ScriptSyntaxNode;
use crate::{RejigError, Result};

/// One recorded edit: the target range is replaced by the text
///
/// Insertions are empty ranges; deletions carry empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: TextRange,
    pub text: String,
}

impl Edit {
    pub fn is_insert(&self) -> bool {
        self.range.is_empty()
    }

    pub fn is_delete(&self) -> bool {
        self.text.is_empty() && !self.range.is_empty()
    }
}

/// A set of edits against one source buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSet {
    edits: Vec<Edit>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Record an insertion at a position
    pub fn insert_before(&mut self, position: TextSize, text: impl Into<String>) {
        self.edits.push(Edit {
            range: TextRange::empty(position),
            text: text.into(),
        });
    }

    /// Record a replacement of a range
    pub fn replace(&mut self, range: TextRange, text: impl Into<String>) {
        self.edits.push(Edit {
            range,
            text: text.into(),
        });
    }

    /// Record a replacement of a node's range
    pub fn replace_node(&mut self, node: &ScriptSyntaxNode, text: impl Into<String>) {
        self.replace(node.text_range(), text);
    }

    /// Record a deletion of a range
    pub fn delete(&mut self, range: TextRange) {
        self.replace(range, "");
    }

    /// Render the edited text
    ///
    /// Pure: the ledger is not consumed and rendering twice yields the same
    /// output. Edits are applied in ascending range order; insertions at the
    /// same position keep their recording order.
    pub fn render(&self, source: &str) -> Result<String> {
        let mut ordered: Vec<&Edit> = self.edits.iter().collect();
        ordered.sort_by_key(|e| (e.range.start(), e.range.end()));

        for pair in ordered.windows(2) {
            if pair[0].range.end() > pair[1].range.start() {
                return Err(RejigError::overlap(pair[0].range, pair[1].range));
            }
        }

        let len = TextSize::of(source);
        let mut out = String::with_capacity(source.len());
        let mut cursor = TextSize::from(0);
        for edit in ordered {
            if edit.range.end() > len {
                return Err(RejigError::EditOutOfBounds {
                    range: edit.range,
                    len: source.len(),
                });
            }
            out.push_str(&source[usize::from(cursor)..usize::from(edit.range.start())]);
            out.push_str(&edit.text);
            cursor = edit.range.end();
        }
        out.push_str(&source[usize::from(cursor)..]);
        Ok(out)
    }
}

/// Edits scoped to a single file
#[derive(Debug, Clone, Default)]
pub struct FileEdits {
    pub file: Option<PathBuf>,
    pub edits: EditSet,
}

impl FileEdits {
    pub fn new(edits: EditSet) -> Self {
        Self { file: None, edits }
    }

    pub fn for_file(file: impl Into<PathBuf>, edits: EditSet) -> Self {
        Self {
            file: Some(file.into()),
            edits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(TextSize::from(start), TextSize::from(end))
    }

    #[test]
    fn replace_and_insert() {
        let mut edits = EditSet::new();
        edits.replace(range(0, 5), "howdy");
        edits.insert_before(TextSize::from(11), "!");
        assert_eq!(edits.render("hello world").unwrap(), "howdy world!");
    }

    #[test]
    fn delete_range() {
        let mut edits = EditSet::new();
        edits.delete(range(5, 11));
        assert_eq!(edits.render("hello world").unwrap(), "hello");
    }

    #[test]
    fn edits_recorded_out_of_order_apply_in_range_order() {
        let mut edits = EditSet::new();
        edits.replace(range(6, 11), "there");
        edits.replace(range(0, 5), "hi");
        assert_eq!(edits.render("hello world").unwrap(), "hi there");
    }

    #[test]
    fn insertions_at_same_position_keep_recording_order() {
        let mut edits = EditSet::new();
        edits.insert_before(TextSize::from(0), "a");
        edits.insert_before(TextSize::from(0), "b");
        assert_eq!(edits.render("c").unwrap(), "abc");
    }

    #[test]
    fn insertion_at_start_of_deleted_range_is_not_an_overlap() {
        let mut edits = EditSet::new();
        edits.insert_before(TextSize::from(0), "x;\n");
        edits.delete(range(0, 4));
        assert_eq!(edits.render("y();z").unwrap(), "x;\nz");
    }

    #[test]
    fn overlap_is_an_error_naming_both_ranges() {
        let mut edits = EditSet::new();
        edits.replace(range(0, 5), "a");
        edits.replace(range(3, 8), "b");
        match edits.render("hello world") {
            Err(RejigError::Overlap { first, second }) => {
                assert_eq!(first, range(0, 5));
                assert_eq!(second, range(3, 8));
            }
            other => panic!("expected overlap error, got {other:?}"),
        }
    }

    #[test]
    fn touching_ranges_are_not_an_overlap() {
        let mut edits = EditSet::new();
        edits.replace(range(0, 3), "a");
        edits.replace(range(3, 5), "b");
        assert_eq!(edits.render("xxxyy").unwrap(), "ab");
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut edits = EditSet::new();
        edits.replace(range(0, 99), "a");
        assert!(matches!(
            edits.render("short"),
            Err(RejigError::EditOutOfBounds { .. })
        ));
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut edits = EditSet::new();
        edits.replace(range(0, 1), "H");
        let first = edits.render("hello").unwrap();
        let second = edits.render("hello").unwrap();
        assert_eq!(first, second);
    }
}
