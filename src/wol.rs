pub mod noop;
#[cfg(test)]
pub(crate) mod testing;
pub mod udp;

use crate::mac::ParseMacError;
use crate::magic::{build_magic_packet, MagicPacket};
use std::fmt;
use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, ToSocketAddrs};

pub const DEFAULT_PORT: u16 = 9;
pub const ECHO_PORT: u16 = 7;
pub const DEFAULT_TARGET: &str = "255.255.255.255";

// Alternate spelling of the limited broadcast address.
const BROADCAST_ALIAS: &str = "<broadcast>";

#[derive(thiserror::Error, Debug)]
pub enum WakeError {
    #[error("Invalid MAC address format: {0}")]
    InvalidMacFormat(#[from] ParseMacError),
    #[error("Could not transmit magic packet: {0}")]
    Transmission(#[from] io::Error),
}

/// The socket operations needed to emit one magic packet.
pub trait DatagramSocket {
    fn set_broadcast(&self, broadcast: bool) -> io::Result<()>;
    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize>;
}

/// Opens a fresh socket per packet. Sockets are closed when dropped.
pub trait Transport: Sync + Send {
    fn open(&self) -> io::Result<Box<dyn DatagramSocket>>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Destination {
    addr: SocketAddrV4,
}

impl Destination {
    pub fn new(ip: Ipv4Addr, port: u16) -> Self {
        Self {
            addr: SocketAddrV4::new(ip, port),
        }
    }

    pub fn broadcast(port: u16) -> Self {
        Self::new(Ipv4Addr::BROADCAST, port)
    }

    /// Resolves `target` to an IPv4 destination.
    ///
    /// `target` may be an IPv4 literal, `<broadcast>`, or a host name that
    /// resolves to at least one IPv4 address.
    pub fn resolve(target: &str, port: u16) -> io::Result<Self> {
        let target = target.trim();
        if target.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "empty destination address",
            ));
        }
        if target == BROADCAST_ALIAS {
            return Ok(Self::broadcast(port));
        }
        if let Ok(ip) = target.parse::<Ipv4Addr>() {
            return Ok(Self::new(ip, port));
        }
        (target, port)
            .to_socket_addrs()?
            .find_map(|addr| match addr {
                SocketAddr::V4(addr) => Some(Self { addr }),
                SocketAddr::V6(_) => None,
            })
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    format!("no IPv4 address for {target}"),
                )
            })
    }

    pub fn ip(&self) -> Ipv4Addr {
        *self.addr.ip()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(self.addr)
    }
}

impl Default for Destination {
    fn default() -> Self {
        Self::broadcast(DEFAULT_PORT)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.addr)
    }
}

/// Sends one magic packet for `mac_text` to `target:port` over UDP.
///
/// The MAC address is validated before any socket is opened.
pub fn send_magic_packet(mac_text: &str, port: u16, target: &str) -> Result<(), WakeError> {
    send_magic_packet_with(&udp::UdpTransport, mac_text, port, target)
}

pub fn send_magic_packet_with(
    transport: &dyn Transport,
    mac_text: &str,
    port: u16,
    target: &str,
) -> Result<(), WakeError> {
    let packet = build_magic_packet(mac_text)?;
    let destination = Destination::resolve(target, port)?;
    transmit(transport, &packet, destination)
}

pub fn transmit(
    transport: &dyn Transport,
    packet: &MagicPacket,
    destination: Destination,
) -> Result<(), WakeError> {
    let socket = transport.open()?;
    socket.set_broadcast(true)?;
    let data = packet.as_bytes();
    let sent = socket.send_to(data, destination.socket_addr())?;
    if sent != data.len() {
        return Err(WakeError::Transmission(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("sent {} of {} bytes to {}", sent, data.len(), destination),
        )));
    }
    Ok(())
}
