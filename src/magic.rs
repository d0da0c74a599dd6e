use crate::mac::{MacAddress, MAC_ADDRESS_LEN};
use crate::wol::WakeError;

const SYNCHRONIZATION_STREAM: [u8; 6] = [0xff; 6];
const TARGET_REPETITIONS: usize = 16;

pub const MAGIC_PACKET_LEN: usize =
    SYNCHRONIZATION_STREAM.len() + TARGET_REPETITIONS * MAC_ADDRESS_LEN;

/// Wake-on-LAN payload: six 0xff bytes followed by the target address
/// sixteen times.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MagicPacket([u8; MAGIC_PACKET_LEN]);

impl MagicPacket {
    pub fn new(target: MacAddress) -> Self {
        let mut data = [0u8; MAGIC_PACKET_LEN];
        let (sync, body) = data.split_at_mut(SYNCHRONIZATION_STREAM.len());
        sync.copy_from_slice(&SYNCHRONIZATION_STREAM);
        for chunk in body.chunks_exact_mut(MAC_ADDRESS_LEN) {
            chunk.copy_from_slice(target.as_bytes());
        }
        Self(data)
    }

    pub fn target(&self) -> MacAddress {
        let start = SYNCHRONIZATION_STREAM.len();
        let mut octets = [0u8; MAC_ADDRESS_LEN];
        octets.copy_from_slice(&self.0[start..start + MAC_ADDRESS_LEN]);
        MacAddress::new(octets)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for MagicPacket {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Parses `mac_text` and builds the magic packet for it.
pub fn build_magic_packet(mac_text: &str) -> Result<MagicPacket, WakeError> {
    let target: MacAddress = mac_text.parse()?;
    Ok(MagicPacket::new(target))
}
