use crate::models::Platform;
use async_trait::async_trait;
use clap::Args;
use std::{fmt::Debug, ops::Deref, sync::Arc};
use tracing::info;

pub mod mock;
mod posix;
mod runner;
mod windows;

pub use posix::Posix;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use windows::Windows;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A power management command could not be run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Args)]
pub struct Options {
    /// The power management commands to use, detected from the host by default
    #[arg(long, value_enum, env = "PLATFORM")]
    pub platform: Option<Platform>,

    /// Run the posix power management commands without sudo
    #[arg(long, env = "NO_SUDO")]
    pub no_sudo: bool,

    /// The scheduled task checked for a pending shutdown on windows
    #[arg(long, default_value = "ComfyUI_Shutdown", env = "SCHEDULED_TASK")]
    pub scheduled_task: String,
}

/// The result of a power management command that ran to completion
#[derive(Debug, Default)]
pub struct Outcome {
    pub success: bool,
    pub stderr: String,
}

impl From<CommandOutput> for Outcome {
    fn from(output: CommandOutput) -> Self {
        Outcome {
            success: output.succeeded(),
            stderr: output.stderr,
        }
    }
}

/// Platform specific scheduling of shutdowns and reboots
#[async_trait]
pub trait PowerControl: Debug + Send + Sync {
    /// The platform whose commands are issued
    fn platform(&self) -> Platform;

    /// Schedule a shutdown in `delay` seconds, optionally forcing applications to close
    async fn schedule_shutdown(&self, delay: u64, force: bool) -> Result<Outcome>;

    /// Schedule a reboot in `delay` seconds
    async fn schedule_reboot(&self, delay: u64) -> Result<Outcome>;

    /// Abort any scheduled shutdown or reboot
    async fn cancel(&self) -> Result<Outcome>;

    /// Check whether a shutdown is currently scheduled
    async fn query_scheduled(&self) -> Result<bool>;
}

/// A shareable handle to the host's power controls
#[derive(Clone, Debug)]
pub struct Power(Arc<dyn PowerControl>);

impl Power {
    pub fn new<P>(control: P) -> Self
    where
        P: PowerControl + 'static,
    {
        Power(Arc::new(control))
    }

    /// Select the power controls for the configured platform
    pub fn select(options: &Options) -> Self {
        let platform = options.platform.unwrap_or_else(Platform::current);
        info!(%platform, "using power management commands");

        match platform {
            Platform::Windows => Power::new(Windows::new(
                SystemRunner,
                options.scheduled_task.clone(),
            )),
            Platform::Posix => Power::new(Posix::new(SystemRunner, !options.no_sudo)),
        }
    }
}

impl Deref for Power {
    type Target = dyn PowerControl;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
