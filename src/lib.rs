//! Hunk-granular staging on top of `git diff` output.
//!
//! Raw diff text becomes a [`DiffText`], [`parse_diff`] splits it into file
//! sections and hunks with exact byte offsets, and cursor selections are
//! resolved into hunks that [`build_patch`] turns into a patch `git apply`
//! accepts. [`DiffView`] ties this to a [`view::DiffSource`] and a
//! [`view::PatchSink`]; [`Git`] is the process-backed implementation of
//! both.
//!
//! # Examples
//! ```no_run
//! # use git_hunks::{DiffView, Git, text::Span, view::DiffRequest};
//! let git = Git::new(".");
//! let mut view = DiffView::open(&git, DiffRequest::default()).unwrap();
//! view.stage(&git, &git, &[Span::point(120)]).unwrap();
//! ```

use error_set::error_set;

pub mod diff;
pub mod git;
pub mod log;
pub mod navigate;
pub mod parse;
pub mod patch;
pub mod select;
pub mod text;
pub mod view;

pub use diff::{DiffDocument, FileSection, HunkSpan, build_lookup, parse_diff};
pub use git::Git;
pub use navigate::{Direction, Goto, Granularity, move_cursor};
pub use parse::{ParseError, parse_goto, parse_selection};
pub use patch::build_patch;
pub use select::{HunkSelection, resolve_selection};
pub use text::{DiffText, Span};
pub use view::{DiffView, StageOutcome};

error_set! {
    /// Top-level error for git-hunks operations
    GitHunksError := {
        ParseError(ParseError),
        #[display("No hunk {index} (the diff has {count})")]
        NoSuchHunk { index: usize, count: usize },
    } || ViewError

    /// Errors from staging actions on a rendered diff
    ViewError := {
        #[display("Cannot stage hunks which are already staged.")]
        StageAlreadyStaged,
        #[display("Cannot unstage hunks which have not been staged.")]
        UnstageNotStaged,
    } || GitCommandError

    /// Errors from git command execution
    GitCommandError := {
        #[display("Failed to run git diff: {message}")]
        DiffFailed { message: String },
        #[display("git diff failed: {stderr}")]
        DiffExitError { stderr: String },
        #[display("Invalid UTF-8 in git diff output: {message}")]
        InvalidUtf8 { message: String },
        #[display("Failed to spawn git apply: {message}")]
        ApplySpawnFailed { message: String },
        #[display("Failed to get stdin handle for git apply")]
        ApplyStdinFailed,
        #[display("Failed to write patch to git apply: {message}")]
        ApplyWriteFailed { message: String },
        #[display("Failed to wait for git apply: {message}")]
        ApplyWaitFailed { message: String },
        #[display("git apply failed: {stderr}")]
        ApplyExitError { stderr: String },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn misuse_messages() {
        assert_eq!(
            ViewError::StageAlreadyStaged.to_string(),
            "Cannot stage hunks which are already staged."
        );
        assert_eq!(
            ViewError::UnstageNotStaged.to_string(),
            "Cannot unstage hunks which have not been staged."
        );
    }

    #[test]
    fn git_errors_lift_into_top_level() {
        let err: GitHunksError = ViewError::from(GitCommandError::ApplyExitError {
            stderr: "error: corrupt patch".to_string(),
        })
        .into();
        assert_eq!(err.to_string(), "git apply failed: error: corrupt patch");
    }
}
