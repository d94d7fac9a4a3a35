use super::header::{HunkHeader, git_line_path, header_line_path};
use crate::text::{DiffText, Line, Span};

/// One `@@` hunk: the marker line through its last body line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HunkSpan {
    pub span: Span,
    /// Parsed marker; `None` when the `@@` line is not a well-formed
    /// unified marker. The span is tracked either way.
    pub header: Option<HunkHeader>,
}

impl HunkSpan {
    fn open(line: &Line, text: &str) -> Self {
        Self {
            span: line.span,
            header: HunkHeader::parse(text),
        }
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }
}

/// One `diff --git` block: its header lines and the hunks that follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSection {
    /// From the `diff --git` line through the last metadata line.
    pub header: Span,
    pub hunks: Vec<HunkSpan>,
}

impl FileSection {
    pub fn start(&self) -> usize {
        self.header.start
    }

    /// End of the section's content: the last hunk's end, or the header's
    /// end when the section has no hunks.
    pub fn end(&self) -> usize {
        self.hunks
            .last()
            .map_or(self.header.end, |hunk| hunk.span.end)
    }

    /// Header and hunks together.
    pub fn span(&self) -> Span {
        Span::new(self.start(), self.end())
    }

    /// Path of the file this section changes.
    ///
    /// Taken from `+++ b/`, then `--- a/` (deletions), then `rename to`,
    /// then the `diff --git` line itself.
    pub fn path<'t>(&self, text: &'t DiffText) -> Option<&'t str> {
        let lines = text.lines_in(self.header);
        let from_paths = |prefix: &str| {
            lines
                .iter()
                .map(|line| text.line_text(line))
                .filter(|line| line.starts_with(prefix))
                .find_map(header_line_path)
        };

        from_paths("+++ ")
            .or_else(|| from_paths("--- "))
            .or_else(|| from_paths("rename to "))
            .or_else(|| {
                lines
                    .first()
                    .and_then(|line| git_line_path(text.line_text(line)))
            })
    }
}

/// Every file section of one diff, in buffer order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffDocument {
    pub files: Vec<FileSection>,
}

impl DiffDocument {
    /// No file sections: nothing to stage or unstage.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn hunk_count(&self) -> usize {
        self.files.iter().map(|file| file.hunks.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    None,
    Header,
    Hunk,
    /// Header of a `diff --cc` / `diff --combined` section. Its `@@@`
    /// hunks are skipped: `git apply` cannot take them.
    Combined,
    CombinedHunks,
}

/// Split git's unified diff output into file sections and hunk spans.
///
/// Lenient by construction: the input is tool output, so unknown lines
/// are skipped and a stray `@@` before any `diff --git` is dropped. Empty
/// or whitespace-only input yields an empty document.
///
/// Every `diff ` line starts a new section. Combined-diff sections from a
/// merge are kept for navigation but carry no hunks.
pub fn parse_diff(text: &DiffText) -> DiffDocument {
    let mut files = Vec::new();
    let mut file: Option<FileSection> = None;
    let mut hunk: Option<HunkSpan> = None;
    let mut state = State::None;

    for line in text.lines() {
        let content = text.line_text(line);

        if content.starts_with("diff ") {
            if let Some(mut done) = file.take() {
                done.hunks.extend(hunk.take());
                files.push(done);
            }
            hunk = None;
            file = Some(FileSection {
                header: line.span,
                hunks: Vec::new(),
            });
            state = if is_combined(content) {
                State::Combined
            } else {
                State::Header
            };
        } else if matches!(state, State::Combined | State::CombinedHunks) {
            if content.starts_with("@@") {
                state = State::CombinedHunks;
            } else if let (State::Combined, Some(open)) = (state, file.as_mut()) {
                open.header = open.header.cover(line.span);
            }
        } else if content.starts_with("@@") {
            if let (Some(open), Some(done)) = (file.as_mut(), hunk.take()) {
                open.hunks.push(done);
            }
            hunk = Some(HunkSpan::open(line, content));
            state = State::Hunk;
        } else {
            match state {
                State::Header => {
                    if let Some(open) = file.as_mut() {
                        open.header = open.header.cover(line.span);
                    }
                }
                State::Hunk if is_hunk_body(content) => {
                    if let Some(open) = hunk.as_mut() {
                        open.span = open.span.cover(line.span);
                    }
                }
                State::Hunk | State::None | State::Combined | State::CombinedHunks => {}
            }
        }
    }

    if let Some(mut done) = file.take() {
        done.hunks.extend(hunk.take());
        files.push(done);
    }

    DiffDocument { files }
}

fn is_combined(line: &str) -> bool {
    line.starts_with("diff --cc ") || line.starts_with("diff --combined ")
}

/// Context, removal, addition, or a `\ No newline at end of file` marker.
fn is_hunk_body(line: &str) -> bool {
    matches!(line.as_bytes().first(), Some(b' ' | b'-' | b'+' | b'\\'))
}
