use crate::error::{OfcourseError, Result};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Branch the platform builds from.
pub const DEPLOY_BRANCH: &str = "master";

pub trait VersionControl {
    /// True when the working copy has uncommitted or untracked changes.
    fn is_dirty(&self) -> Result<bool>;

    /// Force-push the current `HEAD` to `branch` on `remote_url`.
    fn push(&self, remote_url: &str, branch: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Git
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let git = which::which("git").map_err(|_| OfcourseError::GitNotInstalled)?;
        debug!(?args, root = %self.root.display(), "running git");
        let output = Command::new(git)
            .args(args)
            .current_dir(&self.root)
            .output()?;
        if !output.status.success() {
            return Err(OfcourseError::GitFailed {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionControl for Git {
    fn is_dirty(&self) -> Result<bool> {
        let status = self.run(&["status", "--porcelain"])?;
        Ok(!status.trim().is_empty())
    }

    fn push(&self, remote_url: &str, branch: &str) -> Result<()> {
        let refspec = format!("HEAD:{branch}");
        self.run(&["push", "--force", remote_url, &refspec])?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git_available() -> bool {
        which::which("git").is_ok()
    }

    #[test]
    fn fresh_repo_is_clean_until_a_file_appears() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let git = Git::new(dir.path());
        git.run(&["init", "--quiet"]).unwrap();
        assert!(!git.is_dirty().unwrap());

        std::fs::write(dir.path().join("site.yaml"), "course: {}\n").unwrap();
        assert!(git.is_dirty().unwrap());
    }

    #[test]
    fn outside_a_repository_is_an_error() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let git = Git::new(dir.path());
        let err = git.is_dirty().unwrap_err();
        assert!(matches!(err, OfcourseError::GitFailed { .. }));
    }
}
