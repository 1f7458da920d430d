//! A [`CommandRunner`] that records invocations instead of touching the host

use super::{CommandOutput, CommandRunner, Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::{collections::HashMap, io, sync::Arc};

#[derive(Debug)]
enum Reply {
    Exit(CommandOutput),
    Fail,
}

/// Records every command line it is asked to run
///
/// Commands exit successfully with no output unless told otherwise. Clones share the same
/// recording, so a clone can be handed to the power controls while the original is inspected.
#[derive(Clone, Debug, Default)]
pub struct RecordingRunner {
    invocations: Arc<Mutex<Vec<String>>>,
    replies: Arc<Mutex<HashMap<String, Reply>>>,
}

impl RecordingRunner {
    /// Reply to `command_line` with `output`
    pub fn respond(&self, command_line: &str, output: CommandOutput) {
        self.replies
            .lock()
            .insert(command_line.to_string(), Reply::Exit(output));
    }

    /// Fail to start `command_line` as if the program did not exist
    pub fn fail(&self, command_line: &str) {
        self.replies
            .lock()
            .insert(command_line.to_string(), Reply::Fail);
    }

    /// The command lines run so far, in order
    pub fn invocations(&self) -> Vec<String> {
        self.invocations.lock().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let command_line = std::iter::once(program)
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        self.invocations.lock().push(command_line.clone());

        match self.replies.lock().get(&command_line) {
            Some(Reply::Exit(output)) => Ok(output.clone()),
            Some(Reply::Fail) => Err(Error::Spawn {
                program: program.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "program not found"),
            }),
            None => Ok(CommandOutput {
                code: Some(0),
                ..CommandOutput::default()
            }),
        }
    }
}
