use async_trait::async_trait;
use std::{fmt::Debug, io, net::IpAddr, ops::Deref, sync::Arc};
use tokio::net::lookup_host;
use tracing::{instrument, warn};

/// Reported in place of the local address when it cannot be resolved
pub const UNAVAILABLE: &str = "unavailable";

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read hostname: {0}")]
    Hostname(#[source] io::Error),
    #[error("hostname is not valid unicode")]
    InvalidHostname,
    #[error("failed to resolve {hostname}: {source}")]
    Resolve {
        hostname: String,
        #[source]
        source: io::Error,
    },
    #[error("{0} did not resolve to any address")]
    NoAddress(String),
}

/// Identifies the host the server runs on
#[async_trait]
pub trait HostLookup: Debug + Send + Sync {
    /// The name of the host
    fn hostname(&self) -> Result<String>;

    /// The address the host is reachable at
    async fn local_ip(&self, hostname: &str) -> Result<IpAddr>;
}

/// Looks up the identity of the machine itself
#[derive(Clone, Copy, Debug, Default)]
pub struct System;

#[async_trait]
impl HostLookup for System {
    fn hostname(&self) -> Result<String> {
        hostname()
    }

    async fn local_ip(&self, hostname: &str) -> Result<IpAddr> {
        local_ip(hostname).await
    }
}

/// A shareable handle to the host lookup
#[derive(Clone, Debug)]
pub struct Host(Arc<dyn HostLookup>);

impl Host {
    pub fn new<L>(lookup: L) -> Self
    where
        L: HostLookup + 'static,
    {
        Host(Arc::new(lookup))
    }

    /// The local address, or [`UNAVAILABLE`] when it cannot be resolved
    pub async fn local_ip_or_unavailable(&self, hostname: &str) -> String {
        match self.local_ip(hostname).await {
            Ok(address) => address.to_string(),
            Err(error) => {
                warn!(%error, "local address unavailable");
                String::from(UNAVAILABLE)
            }
        }
    }
}

impl Default for Host {
    fn default() -> Self {
        Host::new(System)
    }
}

impl Deref for Host {
    type Target = dyn HostLookup;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// The name of the host
pub fn hostname() -> Result<String> {
    hostname::get()
        .map_err(Error::Hostname)?
        .into_string()
        .map_err(|_| Error::InvalidHostname)
}

/// Resolve the address the host is reachable at, preferring IPv4
#[instrument]
pub async fn local_ip(hostname: &str) -> Result<IpAddr> {
    let addresses = lookup_host((hostname, 0))
        .await
        .map_err(|source| Error::Resolve {
            hostname: hostname.to_string(),
            source,
        })?
        .map(|address| address.ip())
        .collect::<Vec<_>>();

    addresses
        .iter()
        .find(|address| address.is_ipv4())
        .or_else(|| addresses.first())
        .copied()
        .ok_or_else(|| Error::NoAddress(hostname.to_string()))
}
