use axum::Server;
use clap::Args;
use eyre::WrapErr;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

pub mod host;
pub mod http;
pub mod power;

use host::Host;
use power::Power;

/// Launch the server
pub async fn launch(args: ServerArgs) -> eyre::Result<()> {
    let power = Power::select(&args.power);
    let host = Host::default();
    announce(&power, &host, &args.address).await;

    let server = Server::try_bind(&args.address)
        .wrap_err_with(|| format!("failed to bind to {}", args.address))?;

    info!(address = %args.address, "listening and ready to handle requests");
    server
        .serve(http::router(power, host).into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown())
        .await
        .wrap_err("failed to start server")?;

    Ok(())
}

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[command(flatten)]
    power: power::Options,

    /// The address for the server to listen on
    #[arg(short, long, default_value = "0.0.0.0:8081", env = "ADDRESS")]
    pub address: SocketAddr,
}

/// The current local time as an ISO-8601 timestamp
pub(crate) fn now() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Describe the host and the available endpoints
async fn announce(power: &Power, host: &Host, address: &SocketAddr) {
    match host.hostname() {
        Ok(hostname) => {
            let local_ip = host.local_ip_or_unavailable(&hostname).await;
            info!(platform = %power.platform(), %hostname, %local_ip);
        }
        Err(error) => warn!(%error, "hostname unavailable"),
    }

    let port = address.port();
    for endpoint in [
        "GET  /status",
        "GET  /shutdown?delay=30&force=false",
        "GET  /reboot?delay=30",
        "GET  /cancel",
        "POST /shutdown",
        "POST /reboot",
        "POST /cancel",
    ] {
        info!("available: {endpoint} on port {port}");
    }

    warn!("anyone who can reach this server can shut down or reboot the host");
}

/// Wait for signals for terminating
async fn shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install ctrl+c handler")
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::SignalKind;

        signal::unix::signal(SignalKind::terminate())
            .expect("failed to install sigterm handler")
            .recv()
            .await
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("server successfully shutdown");
    info!("goodbye! :)");
}
