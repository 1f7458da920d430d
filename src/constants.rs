pub const APPLICATION_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// The API version reported by the status endpoint
pub const API_VERSION: &str = "1.0";

/// The delay applied when a request doesn't specify one, in seconds
pub const DEFAULT_DELAY: u64 = 30;
