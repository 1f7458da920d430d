use super::{Error, Reply, Result};
use crate::{
    constants::API_VERSION,
    models::StatusResponse,
    server::{host::Host, now, power::Power},
};
use axum::extract::State;
use tracing::{instrument, warn};

#[instrument(name = "status", skip_all)]
pub async fn status(
    State(power): State<Power>,
    State(host): State<Host>,
) -> Result<Reply<StatusResponse>> {
    let hostname = host.hostname().map_err(Error::Status)?;
    let local_ip = host.local_ip_or_unavailable(&hostname).await;

    let shutdown_scheduled = power.query_scheduled().await.unwrap_or_else(|error| {
        warn!(%error, "failed to check for a scheduled shutdown");
        false
    });

    Ok(Reply::new(StatusResponse {
        status: String::from("online"),
        hostname,
        local_ip,
        platform: power.platform(),
        timestamp: now(),
        shutdown_scheduled,
        version: String::from(API_VERSION),
    }))
}
