//! Content-level comparison of two blobs
//!
//! The line diff itself comes from the `similar` crate; this module only turns
//! its operations into edit spans and counts changed lines.

use similar::{Algorithm, DiffTag};
use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    Insert,
    Delete,
    Replace,
    Equal,
}

/// A contiguous region of change, measured in lines on each side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditSpan {
    pub kind: EditKind,
    pub old_len: usize,
    pub new_len: usize,
}

impl EditSpan {
    /// Lines this span counts as changed
    ///
    /// Deletions count their old side, insertions and replacements their new
    /// side, equal regions nothing.
    pub fn changed_lines(&self) -> usize {
        match self.kind {
            EditKind::Delete => self.old_len,
            EditKind::Insert | EditKind::Replace => self.new_len,
            EditKind::Equal => 0,
        }
    }
}

/// Service comparing the content of two blobs
///
/// An absent blob is passed as empty content.
pub trait BlobDiff: Debug {
    fn diff(&self, old: &[u8], new: &[u8]) -> Vec<EditSpan>;
}

/// Line-granular diff backed by `similar`
#[derive(Debug, Clone, Copy)]
pub struct LineDiff {
    algorithm: Algorithm,
}

impl LineDiff {
    pub fn new(algorithm: Algorithm) -> Self {
        LineDiff { algorithm }
    }
}

impl Default for LineDiff {
    fn default() -> Self {
        LineDiff::new(Algorithm::Myers)
    }
}

impl BlobDiff for LineDiff {
    fn diff(&self, old: &[u8], new: &[u8]) -> Vec<EditSpan> {
        let old_lines = split_lines(old);
        let new_lines = split_lines(new);

        similar::capture_diff_slices(self.algorithm, &old_lines, &new_lines)
            .iter()
            .map(|op| {
                let (tag, old_range, new_range) = op.as_tag_tuple();
                let kind = match tag {
                    DiffTag::Insert => EditKind::Insert,
                    DiffTag::Delete => EditKind::Delete,
                    DiffTag::Replace => EditKind::Replace,
                    DiffTag::Equal => EditKind::Equal,
                };

                EditSpan {
                    kind,
                    old_len: old_range.len(),
                    new_len: new_range.len(),
                }
            })
            .collect()
    }
}

/// Lines including their terminator, so a missing final newline is a change
fn split_lines(content: &[u8]) -> Vec<&[u8]> {
    content.split_inclusive(|byte| *byte == b'\n').collect()
}

/// Total changed lines between two contents
pub fn count_changed_lines(blob_diff: &dyn BlobDiff, old: &[u8], new: &[u8]) -> usize {
    blob_diff
        .diff(old, new)
        .iter()
        .map(EditSpan::changed_lines)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn inserted_line_counts_once() {
        let diff = LineDiff::default();

        assert_eq!(count_changed_lines(&diff, b"a\nb\n", b"a\nc\nb\n"), 1);
    }

    #[rstest]
    #[case::from_nothing(b"".as_slice(), b"x\ny\nz\n".as_slice(), 3)]
    #[case::to_nothing(b"x\ny\n".as_slice(), b"".as_slice(), 2)]
    #[case::identical(b"same\n".as_slice(), b"same\n".as_slice(), 0)]
    #[case::replaced_line(b"a\nb\nc\n".as_slice(), b"a\nB\nc\n".as_slice(), 1)]
    #[case::missing_final_newline(b"a\nb".as_slice(), b"a\nb\n".as_slice(), 1)]
    fn counts_changed_lines(#[case] old: &[u8], #[case] new: &[u8], #[case] expected: usize) {
        assert_eq!(count_changed_lines(&LineDiff::default(), old, new), expected);
    }

    #[test]
    fn spans_cover_both_sides() {
        let spans = LineDiff::default().diff(b"a\nb\nc\n", b"a\nc\nd\ne\n");
        let old_total: usize = spans.iter().map(|span| span.old_len).sum();
        let new_total: usize = spans.iter().map(|span| span.new_len).sum();

        assert_eq!((old_total, new_total), (3, 4));
    }

    #[rstest]
    #[case(EditKind::Delete, 4)]
    #[case(EditKind::Insert, 2)]
    #[case(EditKind::Replace, 2)]
    #[case(EditKind::Equal, 0)]
    fn span_counts_the_relevant_side(#[case] kind: EditKind, #[case] expected: usize) {
        let span = EditSpan {
            kind,
            old_len: 4,
            new_len: 2,
        };

        assert_eq!(span.changed_lines(), expected);
    }
}
