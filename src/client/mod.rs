use crate::{
    constants::APPLICATION_NAME,
    models::{ActionResponse, ErrorResponse, PowerRequest, StatusResponse},
};
use clap::{Args, Subcommand};
use eyre::{eyre, WrapErr};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::{
    net::{Ipv4Addr, SocketAddrV4},
    path::PathBuf,
};
use tracing::{info, warn};
use url::Url;

pub mod settings;
pub mod wake;

use settings::Settings;
use wake::MacAddress;

#[derive(Debug, Args)]
pub struct ClientArgs {
    /// The URL of the server, defaults to the last one used
    #[arg(short, long, env = "SERVER_URL")]
    pub server: Option<Url>,

    /// Where to remember the last server and machine used
    #[arg(long, env = "SETTINGS_PATH")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab-case")]
pub enum Command {
    #[command(flatten)]
    Remote(RemoteCommand),
    /// Wake a machine with a Wake-on-LAN magic packet
    Wake {
        /// The machine's MAC address, defaults to the last one woken
        mac: Option<MacAddress>,
        /// The address to broadcast the packet to, defaults to the last one used
        #[arg(long)]
        broadcast: Option<Ipv4Addr>,
        /// The port to send the packet to, defaults to the last one used
        #[arg(long)]
        port: Option<u16>,
    },
    /// Change the remembered defaults without contacting anything
    Configure {
        /// The machine to wake
        #[arg(long)]
        mac: Option<MacAddress>,
        /// The address to broadcast wake packets to
        #[arg(long)]
        broadcast: Option<Ipv4Addr>,
        /// The port to send wake packets to
        #[arg(long)]
        port: Option<u16>,
        /// Seconds to wait before a shutdown or reboot
        #[arg(long)]
        default_delay: Option<u64>,
    },
}

/// Commands sent to the power control server
#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab-case")]
pub enum RemoteCommand {
    /// Check whether the server is online
    Status,
    /// Schedule a shutdown
    Shutdown {
        /// Seconds to wait before shutting down, defaults to the remembered delay
        #[arg(short, long)]
        delay: Option<u64>,
        /// Close applications without waiting for them
        #[arg(short, long)]
        force: bool,
    },
    /// Schedule a reboot
    Reboot {
        /// Seconds to wait before rebooting, defaults to the remembered delay
        #[arg(short, long)]
        delay: Option<u64>,
    },
    /// Cancel a scheduled shutdown or reboot
    Cancel,
}

pub async fn client(args: ClientArgs) -> eyre::Result<()> {
    let path = settings::path(args.settings)?;
    let mut settings = Settings::load(&path).unwrap_or_else(|error| {
        warn!(%error, path = %path.display(), "failed to load settings");
        Settings::default()
    });

    match args.command {
        Command::Remote(command) => {
            let address = match args.server {
                Some(address) => address,
                None => settings
                    .server_url
                    .clone()
                    .ok_or_else(|| eyre!("no server known yet, pass --server"))?,
            };

            remote(&address, command, settings.default_delay).await?;
            settings.server_url = Some(address);
        }
        Command::Wake {
            mac,
            broadcast,
            port,
        } => {
            let mac = mac
                .or(settings.mac_address)
                .ok_or_else(|| eyre!("no machine known yet, pass its MAC address"))?;
            let broadcast = broadcast.unwrap_or(settings.broadcast);
            let port = port.unwrap_or(settings.wol_port);

            wake::send(mac, SocketAddrV4::new(broadcast, port))
                .await
                .wrap_err("failed to send wake-on-lan packet")?;

            settings.mac_address = Some(mac);
            settings.broadcast = broadcast;
            settings.wol_port = port;
        }
        Command::Configure {
            mac,
            broadcast,
            port,
            default_delay,
        } => {
            settings.server_url = args.server.or(settings.server_url);
            settings.mac_address = mac.or(settings.mac_address);
            settings.broadcast = broadcast.unwrap_or(settings.broadcast);
            settings.wol_port = port.unwrap_or(settings.wol_port);
            settings.default_delay = default_delay.unwrap_or(settings.default_delay);
            info!(?settings, "updated settings");
        }
    }

    if let Err(error) = settings.save(&path) {
        warn!(%error, path = %path.display(), "failed to save settings");
    }

    Ok(())
}

async fn remote(address: &Url, command: RemoteCommand, default_delay: u64) -> eyre::Result<()> {
    let client = Client::builder().user_agent(APPLICATION_NAME).build()?;

    match command {
        RemoteCommand::Status => status(client.get(address.join("/status")?)).await,
        RemoteCommand::Shutdown { delay, force } => {
            let request = client.post(address.join("/shutdown")?).json(&PowerRequest {
                delay: Some(delay.unwrap_or(default_delay)),
                force: Some(force),
            });
            action(request).await
        }
        RemoteCommand::Reboot { delay } => {
            let request = client.post(address.join("/reboot")?).json(&PowerRequest {
                delay: Some(delay.unwrap_or(default_delay)),
                force: None,
            });
            action(request).await
        }
        RemoteCommand::Cancel => action(client.post(address.join("/cancel")?)).await,
    }
}

async fn status(request: RequestBuilder) -> eyre::Result<()> {
    let response = request.send().await.wrap_err("failed to send request")?;
    let status = decode::<StatusResponse>(response).await?;

    info!(
        hostname = %status.hostname,
        local_ip = %status.local_ip,
        platform = %status.platform,
        shutdown_scheduled = status.shutdown_scheduled,
        version = %status.version,
        "server is {}",
        status.status,
    );

    Ok(())
}

async fn action(request: RequestBuilder) -> eyre::Result<()> {
    let response = request.send().await.wrap_err("failed to send request")?;
    let response = decode::<ActionResponse>(response).await?;

    match response.success {
        true => info!(timestamp = %response.timestamp, "{}", response.message),
        false => warn!(error = ?response.error, "{}", response.message),
    }

    Ok(())
}

/// Read a successful response, or report the server's error
async fn decode<T: DeserializeOwned>(response: Response) -> eyre::Result<T> {
    let code = response.status();
    if code.is_success() {
        return response.json::<T>().await.wrap_err("invalid response");
    }

    match response.json::<ErrorResponse>().await {
        Ok(error) => Err(eyre!("server responded with {}: {}", error.code, error.message)),
        Err(_) => Err(eyre!("server responded with {code}")),
    }
}
