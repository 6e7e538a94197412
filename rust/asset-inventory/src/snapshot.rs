/*
 * Copyright 2025 Carver Automation Corporation.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Git snapshot of the exported document.
//!
//! Stages the output file, commits it and optionally pushes, using the `git`
//! binary found on `PATH`.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// Repository and file to snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotTarget {
    /// Working tree of the repository.
    pub repo_dir: PathBuf,

    /// Document path, absolute or relative to `repo_dir`.
    pub file: PathBuf,

    /// Commit message.
    pub message: String,

    /// Push after committing.
    pub push: bool,

    /// Remote to push to; the upstream of the current branch when unset.
    pub remote: Option<String>,

    /// Branch to push; requires `remote`.
    pub branch: Option<String>,
}

/// What a snapshot did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// The document was identical to the committed one.
    Unchanged,
    Committed { pushed: bool },
}

/// Stage, commit and (optionally) push the document.
pub fn commit_snapshot(target: &SnapshotTarget) -> Result<SnapshotOutcome> {
    let file = target.file.to_string_lossy().to_string();

    run_git(&target.repo_dir, "add", &["add", "--", &file])?;

    // `diff --cached --quiet` exits 0 when nothing is staged for the file.
    if git_succeeds(&target.repo_dir, &["diff", "--cached", "--quiet", "--", &file])? {
        tracing::info!(file = %file, "Document unchanged; skipping snapshot commit");
        return Ok(SnapshotOutcome::Unchanged);
    }

    run_git(
        &target.repo_dir,
        "commit",
        &["commit", "-m", &target.message, "--", &file],
    )?;
    tracing::info!(file = %file, message = %target.message, "Committed document snapshot");

    if !target.push {
        return Ok(SnapshotOutcome::Committed { pushed: false });
    }

    let mut args = vec!["push"];
    if let Some(remote) = target.remote.as_deref() {
        args.push(remote);
        if let Some(branch) = target.branch.as_deref() {
            args.push(branch);
        }
    }
    run_git(&target.repo_dir, "push", &args)?;
    tracing::info!(remote = ?target.remote, "Pushed document snapshot");

    Ok(SnapshotOutcome::Committed { pushed: true })
}

fn run_git(repo_dir: &Path, step: &str, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()
        .map_err(|e| Error::Git {
            step: step.to_string(),
            detail: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::Git {
            step: step.to_string(),
            detail: format!("exited with {}: {}", output.status, stderr),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

fn git_succeeds(repo_dir: &Path, args: &[&str]) -> Result<bool> {
    let status = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .status()
        .map_err(|e| Error::Git {
            step: args.first().copied().unwrap_or("git").to_string(),
            detail: e.to_string(),
        })?;
    Ok(status.success())
}
