use crate::{client::ClientArgs, server::ServerArgs};
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// The minimum level to log at, one of: trace|debug|info|warn|error
    #[arg(short, long, default_value_t = Level::INFO, env = "LOG_LEVEL")]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab-case")]
pub enum Command {
    /// Launch the server
    Run(ServerArgs),
    /// Control a remote server
    Client(ClientArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Command as ClientCommand, RemoteCommand};
    use clap::CommandFactory;

    fn client(args: &[&str]) -> ClientCommand {
        let args = ["remote-power", "client"].into_iter().chain(args.iter().copied());
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Client(args) => args.command,
            Command::Run(_) => panic!("expected client"),
        }
    }

    #[test]
    fn verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn server_defaults() {
        let cli = Cli::try_parse_from(["remote-power", "run"]).unwrap();
        match cli.command {
            Command::Run(args) => assert_eq!(args.address.port(), 8081),
            Command::Client(_) => panic!("expected run"),
        }
    }

    #[test]
    fn server_commands_parse_as_remote() {
        assert!(matches!(
            client(&["status"]),
            ClientCommand::Remote(RemoteCommand::Status)
        ));
        assert!(matches!(
            client(&["shutdown", "--force"]),
            ClientCommand::Remote(RemoteCommand::Shutdown {
                delay: None,
                force: true
            })
        ));
        assert!(matches!(
            client(&["reboot", "-d", "90"]),
            ClientCommand::Remote(RemoteCommand::Reboot { delay: Some(90) })
        ));
    }

    #[test]
    fn wake_falls_back_to_remembered_machine() {
        assert!(matches!(
            client(&["wake"]),
            ClientCommand::Wake {
                mac: None,
                broadcast: None,
                port: None
            }
        ));
        assert!(matches!(
            client(&["wake", "aa-bb-cc-dd-ee-ff", "--port", "7"]),
            ClientCommand::Wake {
                mac: Some(_),
                broadcast: None,
                port: Some(7)
            }
        ));
    }

    #[test]
    fn configure_takes_only_what_is_given() {
        assert!(matches!(
            client(&["configure", "--default-delay", "120"]),
            ClientCommand::Configure {
                mac: None,
                broadcast: None,
                port: None,
                default_delay: Some(120)
            }
        ));
    }
}
