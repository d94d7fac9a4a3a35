//! A rendered diff session: one diff, its mode, and the actions on it.
//!
//! [`DiffView`] is the explicit per-session state around the engine. It
//! fetches diff text through a [`DiffSource`], re-parses it from scratch on
//! every refresh, and hands built patches to a [`PatchSink`]. The engine
//! itself never sees where the text came from or where the patch goes.

use crate::diff::{DiffDocument, HunkIndex, parse_diff};
use crate::navigate::{Goto, move_cursor};
use crate::patch::build_patch;
use crate::select::{HunkSelection, resolve_selection};
use crate::text::{DiffText, Span};
use crate::{GitCommandError, ViewError};
use tracing::{debug, info, warn};

/// Shown in place of an empty worktree diff.
pub const CLEAN_WORKTREE: &str = "Nothing to stage (no difference between working tree and index)";
/// Shown in place of an empty cached diff.
pub const CLEAN_CACHED: &str = "Nothing to unstage (no changes in index)";

/// Which pair of trees the diff compares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiffMode {
    /// Working tree against the index: hunks can be staged.
    #[default]
    Worktree,
    /// Index against `HEAD`: hunks can be unstaged.
    Cached,
}

impl DiffMode {
    pub fn is_cached(self) -> bool {
        self == DiffMode::Cached
    }

    pub fn clean_message(self) -> &'static str {
        match self {
            DiffMode::Worktree => CLEAN_WORKTREE,
            DiffMode::Cached => CLEAN_CACHED,
        }
    }
}

/// Number of context lines requested from `git diff --unified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ContextSize(u32);

impl ContextSize {
    pub const DEFAULT: ContextSize = ContextSize(3);

    /// Context sizes below one are raised to one.
    pub fn new(lines: u32) -> Self {
        Self(lines.max(1))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn increase(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    #[must_use]
    pub fn decrease(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }
}

impl Default for ContextSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What to diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffRequest {
    pub mode: DiffMode,
    pub unified: ContextSize,
    /// Restrict the diff to one path.
    pub path: Option<String>,
    /// Compare against this object instead of the index or `HEAD`.
    pub object: Option<String>,
}

/// Where diff text comes from.
pub trait DiffSource {
    fn diff(&self, request: &DiffRequest) -> Result<String, GitCommandError>;
}

/// Where built patches go.
pub trait PatchSink {
    /// Apply `patch` to the index, in reverse when `reverse` is set.
    fn apply(&self, patch: &str, reverse: bool) -> Result<(), GitCommandError>;
}

/// Result of a stage or unstage request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The diff was clean or the selection touched no hunk.
    NothingToDo,
    /// A patch with this many hunks was applied; `cursor` is the restored
    /// cursor position in the refreshed diff.
    Applied { hunks: usize, cursor: usize },
}

/// One rendered diff and the actions that operate on it.
#[derive(Debug, Clone)]
pub struct DiffView {
    request: DiffRequest,
    text: DiffText,
    document: DiffDocument,
}

impl DiffView {
    /// Fetch and parse the diff described by `request`.
    pub fn open<S: DiffSource>(source: &S, request: DiffRequest) -> Result<Self, ViewError> {
        let raw = source.diff(&request)?;
        Ok(Self::from_text(request, raw))
    }

    /// Build a view over diff text obtained elsewhere.
    pub fn from_text(request: DiffRequest, raw: impl Into<String>) -> Self {
        let text = DiffText::new(raw);
        let document = parse_diff(&text);
        debug!(
            mode = ?request.mode,
            files = document.files.len(),
            hunks = document.hunk_count(),
            "parsed diff"
        );
        Self {
            request,
            text,
            document,
        }
    }

    pub fn mode(&self) -> DiffMode {
        self.request.mode
    }

    pub fn unified(&self) -> ContextSize {
        self.request.unified
    }

    pub fn text(&self) -> &DiffText {
        &self.text
    }

    pub fn document(&self) -> &DiffDocument {
        &self.document
    }

    pub fn lookup(&self) -> HunkIndex<'_> {
        self.document.lookup()
    }

    /// Nothing to stage or unstage.
    pub fn is_clean(&self) -> bool {
        self.document.is_empty()
    }

    /// What to display: the diff, or the clean-state message.
    pub fn contents(&self) -> &str {
        if self.is_clean() {
            self.request.mode.clean_message()
        } else {
            self.text.as_str()
        }
    }

    /// Re-fetch and re-parse, keeping the cursor on the same row and
    /// column (clamped to the new text). Returns the new cursor offset.
    pub fn refresh<S: DiffSource>(&mut self, source: &S, cursor: usize) -> Result<usize, ViewError> {
        let (row, col) = self.text.row_col(cursor);
        let raw = source.diff(&self.request)?;
        *self = Self::from_text(self.request.clone(), raw);
        Ok(self.text.offset_at(row, col))
    }

    /// Change the context size and refresh.
    pub fn set_unified<S: DiffSource>(
        &mut self,
        source: &S,
        unified: ContextSize,
        cursor: usize,
    ) -> Result<usize, ViewError> {
        debug!(from = self.request.unified.get(), to = unified.get(), "changing context size");
        self.request.unified = unified;
        self.refresh(source, cursor)
    }

    /// Where `goto` moves a cursor at `cursor`; `None` on a clean view.
    pub fn goto(&self, cursor: usize, goto: Goto) -> Option<usize> {
        if self.is_clean() {
            return None;
        }
        move_cursor(&self.document, &self.lookup(), cursor, goto)
    }

    /// Hunks touched by `selection`.
    pub fn selected_hunks(&self, selection: &[Span]) -> HunkSelection<'_> {
        resolve_selection(&self.lookup(), selection, self.text.len())
    }

    /// Patch for the hunks touched by `selection`, if any.
    pub fn patch_for(&self, selection: &[Span]) -> Option<String> {
        let hunks = self.selected_hunks(selection);
        if hunks.is_empty() {
            return None;
        }
        Some(build_patch(&hunks, &self.text))
    }

    /// Stage the hunks under `selection`. Only valid on a worktree view.
    pub fn stage<S, P>(
        &mut self,
        source: &S,
        sink: &P,
        selection: &[Span],
    ) -> Result<StageOutcome, ViewError>
    where
        S: DiffSource,
        P: PatchSink,
    {
        self.apply_selection(source, sink, selection, false)
    }

    /// Unstage the hunks under `selection`. Only valid on a cached view.
    pub fn unstage<S, P>(
        &mut self,
        source: &S,
        sink: &P,
        selection: &[Span],
    ) -> Result<StageOutcome, ViewError>
    where
        S: DiffSource,
        P: PatchSink,
    {
        self.apply_selection(source, sink, selection, true)
    }

    fn apply_selection<S, P>(
        &mut self,
        source: &S,
        sink: &P,
        selection: &[Span],
        reverse: bool,
    ) -> Result<StageOutcome, ViewError>
    where
        S: DiffSource,
        P: PatchSink,
    {
        if self.request.mode.is_cached() != reverse {
            return Err(if reverse {
                ViewError::UnstageNotStaged
            } else {
                ViewError::StageAlreadyStaged
            });
        }

        if self.is_clean() {
            return Ok(StageOutcome::NothingToDo);
        }

        let hunks = self.selected_hunks(selection);
        if hunks.is_empty() {
            debug!("selection touched no hunk");
            return Ok(StageOutcome::NothingToDo);
        }
        let count = hunks.hunk_count();
        let patch = build_patch(&hunks, &self.text);

        let applied = sink.apply(&patch, reverse);
        match &applied {
            Ok(()) => info!(hunks = count, reverse, "applied patch"),
            Err(err) => warn!(%err, "patch did not apply; refreshing diff"),
        }

        let cursor = selection.first().map_or(0, |span| span.start);
        let cursor = self.refresh(source, cursor)?;
        applied?;

        Ok(StageOutcome::Applied {
            hunks: count,
            cursor,
        })
    }
}
