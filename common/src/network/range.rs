//! # IPv4 Network Range
//!
//! Parses the `--network` CIDR block and maps random offsets onto addresses
//! inside it. Only IPv4 is supported; anything else is a configuration error.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::ConfigError;

const IPV4_BITS: u8 = 32;

/// A CIDR block with its host bits cleared, e.g. `10.0.0.0/8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkRange {
    network: Ipv4Network,
}

impl NetworkRange {
    /// Builds the range covering `ip/prefix`, masking away any host bits in `ip`.
    pub fn new(ip: Ipv4Addr, prefix: u8) -> Result<Self, ConfigError> {
        if prefix > IPV4_BITS {
            return Err(ConfigError::InvalidPrefix(prefix.to_string()));
        }
        let masked = Ipv4Network::new(ip, prefix)
            .and_then(|net| Ipv4Network::new(net.network(), prefix))
            .map_err(|e| ConfigError::InvalidCidr(e.to_string()))?;

        Ok(Self { network: masked })
    }

    /// The network address (all host bits zero).
    pub fn base(&self) -> Ipv4Addr {
        self.network.network()
    }

    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    pub fn mask(&self) -> Ipv4Addr {
        self.network.mask()
    }

    /// Number of host bits, i.e. `32 - prefix`.
    pub fn host_bits(&self) -> u8 {
        IPV4_BITS - self.prefix()
    }

    /// `2^(32 - prefix)`. Held as `u64` so a `/0` block fits.
    pub fn address_space_size(&self) -> u64 {
        1u64 << self.host_bits()
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.network.contains(addr)
    }

    /// ORs the low `host_bits` bits of `offset` into the base address,
    /// most significant byte first.
    pub fn candidate(&self, offset: u64) -> Ipv4Addr {
        let host_mask: u32 = !u32::from(self.mask());
        let lower: [u8; 4] = ((offset as u32) & host_mask).to_be_bytes();

        let mut octets: [u8; 4] = self.base().octets();
        for (octet, bits) in octets.iter_mut().zip(lower) {
            *octet |= bits;
        }
        Ipv4Addr::from(octets)
    }
}

impl FromStr for NetworkRange {
    type Err = ConfigError;

    /// Parses strict `a.b.c.d/prefix` notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| ConfigError::InvalidCidr(s.to_string()))?;

        let ip: Ipv4Addr = match addr.parse::<Ipv4Addr>() {
            Ok(ip) => ip,
            Err(_) if addr.parse::<Ipv6Addr>().is_ok() => {
                return Err(ConfigError::NotIpv4(s.to_string()));
            }
            Err(_) => return Err(ConfigError::InvalidCidr(s.to_string())),
        };

        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::InvalidPrefix(prefix.to_string()));
        }
        let prefix: u8 = prefix
            .parse()
            .map_err(|_| ConfigError::InvalidPrefix(prefix.to_string()))?;

        Self::new(ip, prefix)
    }
}

impl fmt::Display for NetworkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base(), self.prefix())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
