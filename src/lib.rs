pub mod mac;
pub mod magic;
pub mod server;
pub mod wol;

pub use mac::{MacAddress, ParseMacError};
pub use magic::{build_magic_packet, MagicPacket};
pub use wol::{send_magic_packet, Destination, WakeError};
