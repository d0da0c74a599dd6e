use crate::wol::{DatagramSocket, Transport};
use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

/// Sends magic packets from an ephemeral IPv4 UDP socket.
pub struct UdpTransport;

impl Transport for UdpTransport {
    fn open(&self) -> io::Result<Box<dyn DatagramSocket>> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        Ok(Box::new(socket))
    }
}

impl DatagramSocket for UdpSocket {
    fn set_broadcast(&self, broadcast: bool) -> io::Result<()> {
        UdpSocket::set_broadcast(self, broadcast)
    }

    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize> {
        UdpSocket::send_to(self, buf, addr)
    }
}

#[cfg(test)]
mod tests {
    use crate::wol::udp::*;
    use crate::wol::{send_magic_packet, WakeError, ECHO_PORT};
    use std::time::Duration;

    fn listener() -> UdpSocket {
        let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        socket
    }

    #[test]
    fn opened_socket_allows_broadcast() {
        let socket = UdpTransport.open().unwrap();
        socket.set_broadcast(true).unwrap();
    }

    #[test]
    fn loopback_delivery() {
        let listener = listener();
        let port = listener.local_addr().unwrap().port();

        send_magic_packet("24-4B-FE-55-78-94", port, "127.0.0.1").unwrap();

        let mut buf = [0u8; 512];
        let (len, _) = listener.recv_from(&mut buf).unwrap();
        assert_eq!(len, 102);
        assert_eq!(&buf[..6], &[0xff; 6]);
        for repetition in buf[6..len].chunks(6) {
            assert_eq!(repetition, &[0x24, 0x4b, 0xfe, 0x55, 0x78, 0x94]);
        }
    }

    #[test]
    fn invalid_mac_sends_nothing() {
        let listener = listener();
        listener.set_nonblocking(true).unwrap();
        let port = listener.local_addr().unwrap().port();

        let err = send_magic_packet("AA:BB:CC", port, "127.0.0.1").unwrap_err();
        assert!(matches!(err, WakeError::InvalidMacFormat(_)));

        let mut buf = [0u8; 512];
        let err = listener.recv_from(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
    }

    #[test]
    fn echo_port_is_accepted() {
        // Nothing listens on 127.0.0.1:7 in a test sandbox, but UDP send
        // still succeeds since delivery is not confirmed.
        send_magic_packet("aa:bb:cc:dd:ee:ff", ECHO_PORT, "127.0.0.1").unwrap();
    }
}
