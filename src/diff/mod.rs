//! Structure of a rendered `git diff`: file sections, hunks, and the flat
//! hunk index used for selection and navigation.

pub mod document;
pub mod header;
pub mod lookup;

pub use document::{DiffDocument, FileSection, HunkSpan, parse_diff};
pub use header::{HunkHeader, LineRange};
pub use lookup::{HunkEntry, HunkIndex, build_lookup};
