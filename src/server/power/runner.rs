use super::{Error, Result};
use async_trait::async_trait;
use std::{fmt::Debug, process::Stdio};
use tokio::process::Command;
use tracing::{debug, instrument};

/// What an external command reported once it exited
#[derive(Clone, Debug, Default)]
pub struct CommandOutput {
    /// The exit code, missing if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Output of a command that exited with `code` after writing `stderr`
    pub fn exited(code: i32, stderr: impl Into<String>) -> Self {
        CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the command exited with code zero
    pub fn succeeded(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands to completion
#[async_trait]
pub trait CommandRunner: Debug + Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Runs commands on the host
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    #[instrument(name = "command", skip(self))]
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| Error::Spawn {
                program: program.to_string(),
                source,
            })?;

        let output = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(code = ?output.code, stderr = %output.stderr, "command exited");

        Ok(output)
    }
}
