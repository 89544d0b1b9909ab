use core::fmt;
use core::net::Ipv4Addr;

use crate::config::StaticAddress;

/// Netmask forced when a static address is applied
pub const DEFAULT_NETMASK: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);

/// IPv4 address tuple of the station interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressInfo {
    pub ip: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub dns: Ipv4Addr,
}

impl AddressInfo {
    /// Tuple reported by an interface without any address
    pub const UNSPECIFIED: Self = Self {
        ip: Ipv4Addr::UNSPECIFIED,
        netmask: Ipv4Addr::UNSPECIFIED,
        gateway: Ipv4Addr::UNSPECIFIED,
        dns: Ipv4Addr::UNSPECIFIED,
    };

    /// Build a tuple from a CIDR prefix length instead of a netmask
    pub fn from_prefix(ip: Ipv4Addr, prefix_len: u8, gateway: Ipv4Addr, dns: Ipv4Addr) -> Self {
        Self {
            ip,
            netmask: netmask_from_prefix(prefix_len),
            gateway,
            dns,
        }
    }

    /// Overwrite the address and DNS server with the static ones.
    ///
    /// The netmask becomes `/24`; the gateway is kept.
    #[must_use]
    pub fn with_static(self, address: &StaticAddress) -> Self {
        Self {
            ip: address.ip,
            netmask: DEFAULT_NETMASK,
            gateway: self.gateway,
            dns: address.dns,
        }
    }

    /// Number of leading one bits of the netmask
    #[allow(clippy::cast_possible_truncation)]
    pub fn prefix_len(&self) -> u8 {
        u32::from(self.netmask).leading_ones() as u8
    }
}

impl fmt::Display for AddressInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ip={} mask={} gw={} dns={}",
            self.ip, self.netmask, self.gateway, self.dns
        )
    }
}

/// Netmask with `prefix_len` leading one bits (clamped to 32)
pub fn netmask_from_prefix(prefix_len: u8) -> Ipv4Addr {
    let bits = match prefix_len {
        0 => 0,
        len if len >= 32 => u32::MAX,
        len => u32::MAX << (32 - u32::from(len)),
    };
    Ipv4Addr::from(bits)
}
