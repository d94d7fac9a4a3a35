//! Turning cursor selections into the hunks they touch.

use crate::diff::{HunkIndex, HunkSpan};
use crate::text::Span;
use std::collections::BTreeMap;

/// Selected hunks grouped by the file header they belong to.
///
/// Groups are keyed by the header's offsets, not its text: two sections
/// can carry identical header text. Iteration follows buffer order and
/// hunks within a group are sorted and unique, so the groups serialize
/// straight into a valid patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HunkSelection<'a> {
    groups: BTreeMap<Span, Vec<&'a HunkSpan>>,
}

impl<'a> HunkSelection<'a> {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of file headers in the selection.
    pub fn file_count(&self) -> usize {
        self.groups.len()
    }

    pub fn hunk_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// `(header, hunks)` pairs in buffer order.
    pub fn groups(&self) -> impl Iterator<Item = (Span, &[&'a HunkSpan])> {
        self.groups
            .iter()
            .map(|(header, hunks)| (*header, hunks.as_slice()))
    }

    fn insert(&mut self, header: Span, hunk: &'a HunkSpan) {
        self.groups.entry(header).or_default().push(hunk);
    }

    fn normalize(&mut self) {
        for hunks in self.groups.values_mut() {
            hunks.sort_by_key(|hunk| hunk.span);
            hunks.dedup_by_key(|hunk| hunk.span);
        }
    }
}

/// Whether `selection` picks `hunk` in a buffer of `buffer_len` bytes.
///
/// A selection picks a hunk when it overlaps it or lies inside it. A
/// cursor at the very end of the buffer (after the final newline) picks
/// the hunk holding the last character.
fn touches(selection: Span, hunk: Span, buffer_len: usize) -> bool {
    selection.intersects(hunk)
        || hunk.contains(selection)
        || (buffer_len > 0
            && selection.start == buffer_len
            && hunk.contains_point(buffer_len - 1))
}

/// Collect every hunk touched by any span of `selection`.
///
/// An empty selection, or one that misses every hunk, yields an empty
/// result: there is nothing to do, which is not an error.
pub fn resolve_selection<'a>(
    lookup: &HunkIndex<'a>,
    selection: &[Span],
    buffer_len: usize,
) -> HunkSelection<'a> {
    let mut picked = HunkSelection::default();

    for &span in selection {
        for entry in lookup {
            if touches(span, entry.hunk.span, buffer_len) {
                picked.insert(entry.file.header, entry.hunk);
            }
        }
    }

    picked.normalize();
    picked
}
