use crate::wol::{DatagramSocket, Transport};
use log::info;
use std::io;
use std::net::SocketAddr;

/// Logs magic packets instead of sending them.
pub struct LogOnlyTransport;

struct LogOnlySocket;

impl Transport for LogOnlyTransport {
    fn open(&self) -> io::Result<Box<dyn DatagramSocket>> {
        info!("faking socket creation");
        Ok(Box::new(LogOnlySocket))
    }
}

impl DatagramSocket for LogOnlySocket {
    fn set_broadcast(&self, broadcast: bool) -> io::Result<()> {
        info!("faking broadcast option {}", broadcast);
        Ok(())
    }

    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize> {
        info!("faking {} byte datagram to {}: {:02x?}", buf.len(), addr, buf);
        Ok(buf.len())
    }
}
