use super::{CommandRunner, Outcome, PowerControl, Result};
use crate::models::Platform;
use async_trait::async_trait;
use tracing::instrument;

/// Power controls using the posix `shutdown` command
#[derive(Debug)]
pub struct Posix<R> {
    runner: R,
    sudo: bool,
}

impl<R: CommandRunner> Posix<R> {
    pub fn new(runner: R, sudo: bool) -> Self {
        Posix { runner, sudo }
    }

    async fn shutdown(&self, args: &[&str]) -> Result<Outcome> {
        let mut args = args.iter().map(|a| a.to_string()).collect::<Vec<_>>();

        let program = if self.sudo {
            args.insert(0, String::from("shutdown"));
            "sudo"
        } else {
            "shutdown"
        };

        Ok(self.runner.run(program, &args).await?.into())
    }
}

/// `shutdown` only accepts whole minutes, anything shorter truncates towards now
fn minutes(delay: u64) -> String {
    format!("+{}", delay / 60)
}

#[async_trait]
impl<R: CommandRunner> PowerControl for Posix<R> {
    fn platform(&self) -> Platform {
        Platform::Posix
    }

    #[instrument(skip(self))]
    async fn schedule_shutdown(&self, delay: u64, _force: bool) -> Result<Outcome> {
        self.shutdown(&["-h", minutes(delay).as_str()]).await
    }

    #[instrument(skip(self))]
    async fn schedule_reboot(&self, delay: u64) -> Result<Outcome> {
        self.shutdown(&["-r", minutes(delay).as_str()]).await
    }

    #[instrument(skip(self))]
    async fn cancel(&self) -> Result<Outcome> {
        self.shutdown(&["-c"]).await
    }

    // TODO: read the pending shutdown from systemd-logind over D-Bus
    async fn query_scheduled(&self) -> Result<bool> {
        Ok(false)
    }
}
