//! Cursor movement between hunks and files.

use crate::diff::{DiffDocument, HunkIndex};
use crate::text::Span;
use std::fmt;

/// What a movement steps over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Granularity {
    #[default]
    Hunk,
    File,
}

/// Where a movement goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    First,
    Last,
    /// First target starting after the cursor; stays on the last one at
    /// the end instead of wrapping.
    Next,
    /// Last target ending before the cursor; stays on the first one at
    /// the start instead of wrapping.
    Prev,
    /// Target by ordinal, clamped into range.
    Nth(i64),
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Nth(0)
    }
}

/// A parsed movement request such as `hunk:next` or `file:3`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Goto {
    pub granularity: Granularity,
    pub direction: Direction,
}

impl Goto {
    pub fn new(granularity: Granularity, direction: Direction) -> Self {
        Self {
            granularity,
            direction,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Hunk => f.write_str("hunk"),
            Granularity::File => f.write_str("file"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::First => f.write_str("first"),
            Direction::Last => f.write_str("last"),
            Direction::Next => f.write_str("next"),
            Direction::Prev => f.write_str("prev"),
            Direction::Nth(n) => write!(f, "{n}"),
        }
    }
}

impl fmt::Display for Goto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.granularity, self.direction)
    }
}

/// Offset the cursor should move to, or `None` when there is nothing to
/// move between.
///
/// Hunk targets come from `lookup`. File targets come from the document
/// itself, so sections without hunks are still reachable; a file's end
/// for [`Direction::Prev`] is the end of its last hunk.
pub fn move_cursor(
    doc: &DiffDocument,
    lookup: &HunkIndex<'_>,
    current: usize,
    goto: Goto,
) -> Option<usize> {
    let targets: Vec<Span> = match goto.granularity {
        Granularity::Hunk => lookup.iter().map(|entry| entry.hunk.span).collect(),
        Granularity::File => doc.files.iter().map(|file| file.span()).collect(),
    };

    pick(&targets, current, goto.direction).map(|span| span.start)
}

fn pick(targets: &[Span], current: usize, direction: Direction) -> Option<Span> {
    let first = targets.first().copied()?;
    let last = targets.last().copied()?;

    let target = match direction {
        Direction::First => first,
        Direction::Last => last,
        Direction::Next => targets
            .iter()
            .find(|span| span.start > current)
            .copied()
            .unwrap_or(last),
        Direction::Prev => targets
            .iter()
            .rev()
            .find(|span| span.end < current)
            .copied()
            .unwrap_or(first),
        Direction::Nth(n) => {
            let idx = usize::try_from(n.max(0)).unwrap_or(usize::MAX);
            targets.get(idx).copied().unwrap_or(last)
        }
    };

    Some(target)
}
