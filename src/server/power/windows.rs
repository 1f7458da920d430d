use super::{CommandOutput, CommandRunner, Outcome, PowerControl, Result};
use crate::models::Platform;
use async_trait::async_trait;
use tracing::{debug, instrument};

const SHUTDOWN: &str = "shutdown";
const SCHTASKS: &str = "schtasks";

/// Reported by `shutdown /a` on French hosts when nothing was scheduled, still counts as cancelled
const NOTHING_TO_ABORT: &str = "La commande d'arrêt";

/// Power controls using the windows `shutdown` and `schtasks` commands
#[derive(Debug)]
pub struct Windows<R> {
    runner: R,
    scheduled_task: String,
}

impl<R: CommandRunner> Windows<R> {
    pub fn new(runner: R, scheduled_task: impl Into<String>) -> Self {
        Windows {
            runner,
            scheduled_task: scheduled_task.into(),
        }
    }

    async fn shutdown(&self, args: &[&str]) -> Result<CommandOutput> {
        let args = args.iter().map(|a| a.to_string()).collect::<Vec<_>>();
        self.runner.run(SHUTDOWN, &args).await
    }

    /// Abort whatever is pending so a new schedule replaces it
    async fn reset(&self) -> Result<()> {
        let output = self.shutdown(&["/a"]).await?;
        debug!(code = ?output.code, "reset pending shutdown");
        Ok(())
    }
}

#[async_trait]
impl<R: CommandRunner> PowerControl for Windows<R> {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    #[instrument(skip(self))]
    async fn schedule_shutdown(&self, delay: u64, force: bool) -> Result<Outcome> {
        self.reset().await?;

        let delay = delay.to_string();
        let mut args = vec!["/s", "/t", delay.as_str()];
        if force {
            args.push("/f");
        }

        Ok(self.shutdown(&args).await?.into())
    }

    #[instrument(skip(self))]
    async fn schedule_reboot(&self, delay: u64) -> Result<Outcome> {
        self.reset().await?;
        Ok(self.shutdown(&["/r", "/t", delay.to_string().as_str()]).await?.into())
    }

    #[instrument(skip(self))]
    async fn cancel(&self) -> Result<Outcome> {
        let output = self.shutdown(&["/a"]).await?;
        let success = output.succeeded() || output.stderr.contains(NOTHING_TO_ABORT);

        Ok(Outcome {
            success,
            stderr: output.stderr,
        })
    }

    #[instrument(skip(self))]
    async fn query_scheduled(&self) -> Result<bool> {
        let args = ["/query", "/tn", self.scheduled_task.as_str()]
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>();
        let output = self.runner.run(SCHTASKS, &args).await?;

        Ok(output.succeeded())
    }
}
