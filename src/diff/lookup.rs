use super::document::{DiffDocument, FileSection, HunkSpan};

/// A hunk paired with the file section it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkEntry<'a> {
    pub hunk: &'a HunkSpan,
    pub file: &'a FileSection,
}

/// Every hunk of a document, flattened in buffer order.
///
/// Sections without hunks contribute nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HunkIndex<'a> {
    entries: Vec<HunkEntry<'a>>,
}

impl<'a> HunkIndex<'a> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&HunkEntry<'a>> {
        self.entries.get(idx)
    }

    pub fn first(&self) -> Option<&HunkEntry<'a>> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&HunkEntry<'a>> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HunkEntry<'a>> {
        self.entries.iter()
    }
}

impl<'i, 'a> IntoIterator for &'i HunkIndex<'a> {
    type Item = &'i HunkEntry<'a>;
    type IntoIter = std::slice::Iter<'i, HunkEntry<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Pair every hunk with its owning file, file order then hunk order.
pub fn build_lookup(doc: &DiffDocument) -> HunkIndex<'_> {
    HunkIndex {
        entries: doc
            .files
            .iter()
            .flat_map(|file| file.hunks.iter().map(move |hunk| HunkEntry { hunk, file }))
            .collect(),
    }
}

impl DiffDocument {
    /// See [`build_lookup`].
    pub fn lookup(&self) -> HunkIndex<'_> {
        build_lookup(self)
    }
}
