//! Offsets, spans and lines over a rendered diff buffer.
//!
//! Every structure the engine builds refers back into one [`DiffText`] by
//! byte offset. Nothing holds a reference to another structure: a span is
//! just two numbers, and a line is a span plus the offset after its newline.

/// A contiguous region of the buffer, `start <= end`.
///
/// A zero-width span is a cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Build a span from two offsets in either order.
    ///
    /// Selections arrive as (anchor, head) pairs, so a backwards selection
    /// is normal input.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A zero-width span at `offset`.
    pub fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// `other` lies entirely within `self` (edges inclusive).
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// `offset` lies within `self` (edges inclusive).
    pub fn contains_point(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// The spans are identical, or one has an endpoint strictly inside the other.
    ///
    /// Touching edges do not count: `[0, 5]` and `[5, 9]` do not intersect.
    pub fn intersects(&self, other: Span) -> bool {
        (self.start == other.start && self.end == other.end)
            || (other.start > self.start && other.start < self.end)
            || (other.end > self.start && other.end < self.end)
            || (self.start > other.start && self.start < other.end)
            || (self.end > other.start && self.end < other.end)
    }
}

/// One line of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// Line content, newline excluded.
    pub span: Span,
    /// Offset just past the line terminator (equal to `span.end` on an
    /// unterminated final line).
    pub full_end: usize,
}

/// An owned diff buffer split into lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffText {
    text: String,
    lines: Vec<Line>,
}

impl DiffText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = split_lines(&text);
        Self { text, lines }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Buffer length in bytes. A cursor may sit at this offset.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Content of `line` without its terminator.
    pub fn line_text(&self, line: &Line) -> &str {
        &self.text[line.span.start..line.span.end]
    }

    /// Text covered by `span`.
    ///
    /// Returns an empty string when the span falls outside the buffer.
    pub fn slice(&self, span: Span) -> &str {
        self.text.get(span.start..span.end).unwrap_or_default()
    }

    /// Every line touched by `span`, from the line holding `span.start`
    /// through the line holding `span.end`.
    pub fn lines_in(&self, span: Span) -> &[Line] {
        let first = self.lines.partition_point(|l| l.span.end < span.start);
        let last = self.lines.partition_point(|l| l.span.start <= span.end);
        &self.lines[first..last.max(first)]
    }

    /// Zero-based (row, column) of `offset`, column in bytes.
    ///
    /// Offsets past the last line land on a virtual empty row after it.
    pub fn row_col(&self, offset: usize) -> (usize, usize) {
        let row = self.lines.partition_point(|l| l.full_end <= offset);
        match self.lines.get(row) {
            Some(line) => (row, offset.saturating_sub(line.span.start)),
            None => (self.lines.len(), 0),
        }
    }

    /// Offset of (`row`, `col`), clamping `col` to the row's length and
    /// `row` to the buffer.
    pub fn offset_at(&self, row: usize, col: usize) -> usize {
        match self.lines.get(row) {
            Some(line) => {
                let mut offset = line.span.start + col.min(line.span.len());
                while !self.text.is_char_boundary(offset) {
                    offset -= 1;
                }
                offset
            }
            None => self.text.len(),
        }
    }
}

impl From<String> for DiffText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for DiffText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

fn split_lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut start = 0;

    for (idx, _) in text.match_indices('\n') {
        lines.push(Line {
            span: Span::new(start, idx),
            full_end: idx + 1,
        });
        start = idx + 1;
    }

    if start < text.len() {
        lines.push(Line {
            span: Span::new(start, text.len()),
            full_end: text.len(),
        });
    }

    lines
}
