mod cli;
mod constants;

pub mod client;
pub mod logging;
pub mod models;
pub mod server;

pub use cli::{Cli, Command};
