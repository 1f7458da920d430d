use super::wake::MacAddress;
use crate::constants::DEFAULT_DELAY;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    net::Ipv4Addr,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};
use url::Url;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not determine the configuration directory")]
    NoConfigDirectory,
    #[error("failed to access settings: {0}")]
    Io(#[from] io::Error),
    #[error("invalid settings: {0}")]
    Format(#[from] serde_json::Error),
}

/// Remembers the last server contacted and machine woken
#[derive(Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: Option<Url>,
    pub mac_address: Option<MacAddress>,
    pub broadcast: Ipv4Addr,
    pub wol_port: u16,
    /// Seconds to wait before a shutdown or reboot when none is given
    pub default_delay: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            server_url: None,
            mac_address: None,
            broadcast: Ipv4Addr::BROADCAST,
            wol_port: 9,
            default_delay: DEFAULT_DELAY,
        }
    }
}

impl Settings {
    /// Read the settings, a missing file gives the defaults
    #[instrument]
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!("no saved settings");
                return Ok(Settings::default());
            }
            Err(error) => return Err(error.into()),
        };

        Ok(serde_json::from_slice(&contents)?)
    }

    /// Write the settings, creating the parent directory as needed
    #[instrument(skip(self))]
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        debug!("saved settings");

        Ok(())
    }
}

/// Where the settings are stored, either as given or in the user's configuration directory
pub fn path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(shellexpand::tilde(&path.as_os_str().to_string_lossy())
            .to_string()
            .into()),
        None => dirs::config_dir()
            .map(|dir| dir.join(env!("CARGO_PKG_NAME")).join("settings.json"))
            .ok_or(Error::NoConfigDirectory),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let settings = Settings::load(&dir.path().join("settings.json")).unwrap();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn saved_settings_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            server_url: Some(Url::parse("http://192.168.1.100:8081").unwrap()),
            mac_address: Some("AA:BB:CC:DD:EE:FF".parse().unwrap()),
            broadcast: Ipv4Addr::new(192, 168, 1, 255),
            wol_port: 7,
            default_delay: 120,
        };

        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"server_url": "http://192.168.1.100:8081/"}"#).unwrap();

        let settings = Settings::load(&path).unwrap();

        assert_eq!(
            settings.server_url,
            Some(Url::parse("http://192.168.1.100:8081").unwrap())
        );
        assert_eq!(settings.mac_address, None);
        assert_eq!(settings.broadcast, Ipv4Addr::BROADCAST);
        assert_eq!(settings.wol_port, 9);
        assert_eq!(settings.default_delay, 30);
    }

    #[test]
    fn mac_address_is_stored_as_text() {
        let settings = Settings {
            mac_address: Some("aa-bb-cc-dd-ee-ff".parse().unwrap()),
            ..Settings::default()
        };

        let value = serde_json::to_value(&settings).unwrap();

        assert_eq!(value["mac_address"], "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(Settings::load(&path), Err(Error::Format(_))));
    }

    #[test]
    fn explicit_path_is_kept() {
        let path = path(Some(PathBuf::from("/etc/remote-power/settings.json"))).unwrap();
        assert_eq!(path, PathBuf::from("/etc/remote-power/settings.json"));
    }
}
