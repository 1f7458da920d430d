use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{
    fmt::{Display, Formatter},
    net::SocketAddrV4,
    str::FromStr,
};
use tokio::net::UdpSocket;
use tracing::{info, instrument};

const PACKET_LENGTH: usize = 6 + 16 * 6;

#[derive(Debug, PartialEq, thiserror::Error)]
#[error("invalid MAC address, expected AA:BB:CC:DD:EE:FF")]
pub struct InvalidMacAddress;

/// A hardware address, written as six hex pairs separated by `:` or `-`
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Six `0xFF` bytes followed by the address repeated sixteen times
    pub fn magic_packet(&self) -> [u8; PACKET_LENGTH] {
        let mut packet = [0xFF; PACKET_LENGTH];
        for chunk in packet[6..].chunks_exact_mut(6) {
            chunk.copy_from_slice(&self.0);
        }

        packet
    }
}

impl FromStr for MacAddress {
    type Err = InvalidMacAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let separator = match s.as_bytes().get(2) {
            Some(b':') => ':',
            Some(b'-') => '-',
            _ => return Err(InvalidMacAddress),
        };

        let mut address = [0; 6];
        let mut parts = s.split(separator);
        for byte in address.iter_mut() {
            let part = parts.next().ok_or(InvalidMacAddress)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(InvalidMacAddress);
            }
            *byte = u8::from_str_radix(part, 16).map_err(|_| InvalidMacAddress)?;
        }

        match parts.next() {
            Some(_) => Err(InvalidMacAddress),
            None => Ok(MacAddress(address)),
        }
    }
}

impl Display for MacAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

/// Broadcast a Wake-on-LAN magic packet for `mac`
#[instrument]
pub async fn send(mac: MacAddress, target: SocketAddrV4) -> std::io::Result<()> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.set_broadcast(true)?;
    socket.send_to(&mac.magic_packet(), target).await?;

    info!("sent wake-on-lan packet");
    Ok(())
}
