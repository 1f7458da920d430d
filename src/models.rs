use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The family of power management commands available on the host
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, ValueEnum)]
pub enum Platform {
    #[serde(rename = "nt")]
    #[value(alias = "nt")]
    Windows,
    #[serde(rename = "posix")]
    Posix,
}

impl Platform {
    /// Detect the platform the binary was built for
    pub const fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }

    /// Whether a shutdown can be told to close applications without waiting
    pub fn supports_force(&self) -> bool {
        matches!(self, Platform::Windows)
    }

    /// The identifier reported to clients
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "nt",
            Platform::Posix => "posix",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub hostname: String,
    pub local_ip: String,
    pub platform: Platform,
    pub timestamp: String,
    pub shutdown_scheduled: bool,
    pub version: String,
}

/// The outcome of a shutdown, reboot or cancel request
#[derive(Debug, Deserialize, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: String,
}

/// The body of a shutdown or reboot request
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PowerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}
