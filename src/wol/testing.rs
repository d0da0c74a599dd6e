use crate::wol::{DatagramSocket, Transport};
use std::cell::Cell;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug)]
pub struct SentDatagram {
    pub addr: SocketAddr,
    pub payload: Vec<u8>,
    // Whether SO_BROADCAST was set when the datagram went out.
    pub broadcast: bool,
}

#[derive(Copy, Clone, Debug, Default)]
enum Mode {
    #[default]
    Normal,
    FailOpen,
    FailSend,
    ShortSend(usize),
}

/// Records datagrams instead of putting them on the wire.
#[derive(Default)]
pub struct RecordingTransport {
    mode: Mode,
    opened: AtomicUsize,
    sent: Arc<Mutex<Vec<SentDatagram>>>,
}

impl RecordingTransport {
    pub fn failing_open() -> Self {
        Self {
            mode: Mode::FailOpen,
            ..Default::default()
        }
    }

    pub fn failing_send() -> Self {
        Self {
            mode: Mode::FailSend,
            ..Default::default()
        }
    }

    pub fn short_send(len: usize) -> Self {
        Self {
            mode: Mode::ShortSend(len),
            ..Default::default()
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<SentDatagram> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn open(&self) -> io::Result<Box<dyn DatagramSocket>> {
        if let Mode::FailOpen = self.mode {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "socket creation refused",
            ));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordingSocket {
            mode: self.mode,
            broadcast: Cell::new(false),
            sent: self.sent.clone(),
        }))
    }
}

struct RecordingSocket {
    mode: Mode,
    broadcast: Cell<bool>,
    sent: Arc<Mutex<Vec<SentDatagram>>>,
}

impl DatagramSocket for RecordingSocket {
    fn set_broadcast(&self, broadcast: bool) -> io::Result<()> {
        self.broadcast.set(broadcast);
        Ok(())
    }

    fn send_to(&self, buf: &[u8], addr: SocketAddr) -> io::Result<usize> {
        if let Mode::FailSend = self.mode {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "network unreachable",
            ));
        }
        if addr.ip() == IpAddr::V4(Ipv4Addr::BROADCAST) && !self.broadcast.get() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "broadcast not permitted",
            ));
        }
        self.sent.lock().unwrap().push(SentDatagram {
            addr,
            payload: buf.to_vec(),
            broadcast: self.broadcast.get(),
        });
        match self.mode {
            Mode::ShortSend(len) => Ok(len.min(buf.len())),
            _ => Ok(buf.len()),
        }
    }
}
