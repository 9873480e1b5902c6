use crate::calculations::ReconcileSummary;
use crate::config::GitSettings;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("`git {command}` exited with {status}: {stderr}")]
    Git {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Commit message describing what an update run changed.
pub fn commit_message(summary: &ReconcileSummary) -> String {
    let mut changes = Vec::new();
    if summary.weekend.added > 0 {
        changes.push(format!("{} weekend(s) added", summary.weekend.added));
    }
    if summary.weekend.corrected > 0 {
        changes.push(format!("{} weekend(s) corrected", summary.weekend.corrected));
    }
    if summary.holidays.merged > 0 {
        changes.push(format!("{} public holiday(s) added", summary.holidays.merged));
    }

    if changes.is_empty() {
        "Holiday calendar checked - no changes needed".to_string()
    } else {
        format!("Updated holiday calendar: {}", changes.join(", "))
    }
}

/// Commit message for a regenerated derived view file.
pub fn view_commit_message(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    format!("Updated {name}")
}

/// Stages, commits and optionally pushes files with the system `git`.
#[derive(Debug, Clone)]
pub struct GitPublisher {
    workdir: PathBuf,
    push: bool,
    remote: String,
    branch: String,
}

impl GitPublisher {
    pub fn from_settings(settings: &GitSettings) -> Self {
        Self {
            workdir: settings
                .workdir
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
            push: settings.push,
            remote: settings.remote.clone(),
            branch: settings.branch.clone(),
        }
    }

    /// The git invocations `publish` would run, in order.
    pub fn plan(&self, paths: &[PathBuf], message: &str) -> Vec<Vec<String>> {
        let mut add = vec!["add".to_string()];
        add.extend(paths.iter().map(|p| p.display().to_string()));

        let mut plan = vec![
            add,
            // A run that changed nothing still records that it checked.
            vec![
                "commit".to_string(),
                "--allow-empty".to_string(),
                "-m".to_string(),
                message.to_string(),
            ],
        ];
        if self.push {
            plan.push(vec![
                "push".to_string(),
                self.remote.clone(),
                self.branch.clone(),
            ]);
        }
        plan
    }

    pub fn publish(&self, paths: &[PathBuf], message: &str) -> Result<(), PublishError> {
        for args in self.plan(paths, message) {
            let output = Command::new("git")
                .args(&args)
                .current_dir(&self.workdir)
                .output()?;
            if !output.status.success() {
                return Err(PublishError::Git {
                    command: args.join(" "),
                    status: output.status.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
            info!(command = %args.join(" "), "git command succeeded");
        }
        Ok(())
    }
}
