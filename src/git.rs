//! The `git` executable as a [`DiffSource`] and [`PatchSink`].

use crate::GitCommandError;
use crate::view::{DiffRequest, DiffSource, PatchSink};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// Runs `git` against one repository.
#[derive(Debug, Clone)]
pub struct Git {
    repo: PathBuf,
}

impl Git {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    fn command(&self) -> Command {
        let mut command = Command::new("git");
        command.arg("-C").arg(&self.repo);
        command
    }

    /// Arguments for `git diff`, after `-C <repo>`.
    pub fn diff_args(request: &DiffRequest) -> Vec<String> {
        let mut args = vec![
            "diff".to_string(),
            "--no-ext-diff".to_string(),
            "--no-color".to_string(),
            format!("--unified={}", request.unified.get()),
        ];

        if request.mode.is_cached() {
            args.push("--cached".to_string());
        }
        args.extend(request.object.iter().cloned());
        if let Some(path) = &request.path {
            args.push("--".to_string());
            args.push(path.clone());
        }

        args
    }

    /// Arguments for `git apply`, after `-C <repo>`.
    pub fn apply_args(reverse: bool) -> Vec<&'static str> {
        let mut args = vec!["apply", "--ignore-whitespace", "--cached"];
        if reverse {
            args.push("--reverse");
        }
        args.push("-");
        args
    }
}

impl DiffSource for Git {
    fn diff(&self, request: &DiffRequest) -> Result<String, GitCommandError> {
        let args = Self::diff_args(request);
        debug!(repo = %self.repo.display(), ?args, "running git diff");

        let output = self
            .command()
            .args(&args)
            .output()
            .map_err(|e| GitCommandError::DiffFailed {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::DiffExitError {
                stderr: stderr.into_owned(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| GitCommandError::InvalidUtf8 {
            message: e.to_string(),
        })
    }
}

impl PatchSink for Git {
    fn apply(&self, patch: &str, reverse: bool) -> Result<(), GitCommandError> {
        let args = Self::apply_args(reverse);
        debug!(repo = %self.repo.display(), ?args, bytes = patch.len(), "running git apply");

        let mut child = self
            .command()
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| GitCommandError::ApplySpawnFailed {
                message: e.to_string(),
            })?;

        child
            .stdin
            .take()
            .ok_or(GitCommandError::ApplyStdinFailed)?
            .write_all(patch.as_bytes())
            .map_err(|e| GitCommandError::ApplyWriteFailed {
                message: e.to_string(),
            })?;

        let output = child
            .wait_with_output()
            .map_err(|e| GitCommandError::ApplyWaitFailed {
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitCommandError::ApplyExitError {
                stderr: stderr.into_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ContextSize, DiffMode};
    use similar_asserts::assert_eq;

    #[test]
    fn worktree_diff_args() {
        let args = Git::diff_args(&DiffRequest::default());
        assert_eq!(args, vec!["diff", "--no-ext-diff", "--no-color", "--unified=3"]);
    }

    #[test]
    fn cached_diff_args_with_path_and_object() {
        let request = DiffRequest {
            mode: DiffMode::Cached,
            unified: ContextSize::new(1),
            path: Some("src/lib.rs".to_string()),
            object: Some("HEAD~1".to_string()),
        };
        assert_eq!(
            Git::diff_args(&request),
            vec![
                "diff",
                "--no-ext-diff",
                "--no-color",
                "--unified=1",
                "--cached",
                "HEAD~1",
                "--",
                "src/lib.rs",
            ]
        );
    }

    #[test]
    fn apply_args() {
        assert_eq!(
            Git::apply_args(false),
            vec!["apply", "--ignore-whitespace", "--cached", "-"]
        );
        assert_eq!(
            Git::apply_args(true),
            vec!["apply", "--ignore-whitespace", "--cached", "--reverse", "-"]
        );
    }
}
