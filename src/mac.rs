use std::fmt;
use std::str::FromStr;

pub const MAC_ADDRESS_LEN: usize = 6;

const HEX_DIGITS: usize = MAC_ADDRESS_LEN * 2;

/// A 6 octet hardware address.
///
/// Parses from 12 hex digits, optionally grouped into pairs by `:` or `-`
/// (`AA:BB:CC:DD:EE:FF`, `aa-bb-cc-dd-ee-ff`, `aabbccddeeff`). Leading and
/// trailing whitespace is ignored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; MAC_ADDRESS_LEN]);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseMacError {
    #[error("MAC address is empty")]
    Empty,
    #[error("MAC address has {0} hex digits, expected 12")]
    Length(usize),
    #[error("MAC address has invalid character {0:?}")]
    InvalidDigit(char),
    #[error("MAC address separators must split it into six pairs")]
    Grouping,
}

fn is_separator(c: char) -> bool {
    c == ':' || c == '-'
}

impl MacAddress {
    pub const fn new(octets: [u8; MAC_ADDRESS_LEN]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; MAC_ADDRESS_LEN] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; MAC_ADDRESS_LEN]> for MacAddress {
    fn from(octets: [u8; MAC_ADDRESS_LEN]) -> Self {
        Self(octets)
    }
}

impl FromStr for MacAddress {
    type Err = ParseMacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseMacError::Empty);
        }

        let mut nibbles = Vec::with_capacity(HEX_DIGITS);
        for c in s.chars().filter(|&c| !is_separator(c)) {
            let nibble = c.to_digit(16).ok_or(ParseMacError::InvalidDigit(c))?;
            nibbles.push(nibble as u8);
        }
        if nibbles.len() != HEX_DIGITS {
            return Err(ParseMacError::Length(nibbles.len()));
        }
        if s.contains(is_separator) && !s.split(is_separator).all(|group| group.len() == 2) {
            return Err(ParseMacError::Grouping);
        }

        let mut octets = [0u8; MAC_ADDRESS_LEN];
        for (octet, pair) in octets.iter_mut().zip(nibbles.chunks_exact(2)) {
            *octet = pair[0] << 4 | pair[1];
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}
