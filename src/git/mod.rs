use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub command_preview: String,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

#[async_trait]
pub trait GitClient: Send + Sync {
    async fn has_staged_changes(&self) -> Result<bool>;
    async fn commit(&self, message: &str) -> Result<CommandResult>;
}

#[derive(Debug, Clone)]
pub struct CliGitClient {
    cwd: PathBuf,
}

impl CliGitClient {
    pub fn new(cwd: PathBuf) -> Self {
        Self { cwd }
    }

    async fn run_git<S: AsRef<str>>(&self, args: &[S], preview: String) -> Result<CommandResult> {
        let mut command = Command::new("git");
        command
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for arg in args {
            command.arg(arg.as_ref());
        }

        let output = command
            .output()
            .await
            .with_context(|| format!("failed to spawn git command: {preview}"))?;
        Ok(CommandResult {
            command_preview: preview,
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[async_trait]
impl GitClient for CliGitClient {
    async fn has_staged_changes(&self) -> Result<bool> {
        let out = self
            .run_git(&["diff", "--cached"], "git diff --cached".to_string())
            .await?;
        if !out.success {
            return Err(anyhow!(
                "{}",
                if out.stderr.trim().is_empty() {
                    out.stdout.trim()
                } else {
                    out.stderr.trim()
                }
            ));
        }
        Ok(!out.stdout.trim().is_empty())
    }

    async fn commit(&self, message: &str) -> Result<CommandResult> {
        // Preview masks the message so it never lands in status text raw.
        self.run_git(
            &["commit", "-m", message],
            "git commit -m <message>".to_string(),
        )
        .await
    }
}
