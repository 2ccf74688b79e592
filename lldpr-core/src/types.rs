//! Common types used throughout lldpr

use std::fmt;
use std::str::FromStr;

/// LLDP multicast MAC address (nearest bridge)
pub const LLDP_MULTICAST_MAC: [u8; 6] = [0x01, 0x80, 0xC2, 0x00, 0x00, 0x0E];

/// LLDP Ethertype
pub const LLDP_ETHERTYPE: u16 = 0x88CC;

/// MAC Address (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// Create a new MAC address
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Zero MAC address (00:00:00:00:00:00)
    pub const fn zero() -> Self {
        Self([0x00, 0x00, 0x00, 0x00, 0x00, 0x00])
    }

    /// LLDP nearest-bridge multicast address (01:80:c2:00:00:0e)
    pub const fn lldp_multicast() -> Self {
        Self(LLDP_MULTICAST_MAC)
    }

    /// Get bytes as slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Convert to array
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Check if this is a multicast address (bit 0 of first octet is 1)
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 == 0x01
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddr {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 6 {
            return Err(crate::Error::protocol("Invalid MAC address format"));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            bytes[i] = u8::from_str_radix(part, 16)
                .map_err(|_| crate::Error::protocol("Invalid MAC address hex"))?;
        }

        Ok(MacAddr(bytes))
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(bytes: [u8; 6]) -> Self {
        MacAddr(bytes)
    }
}

/// Administrative status of a port (IEEE 802.1AB adminStatus)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminStatus {
    /// Neither transmit nor receive
    Disabled,
    /// Transmit only
    TxOnly,
    /// Receive only
    RxOnly,
    /// Transmit and receive
    #[default]
    RxTx,
}

impl AdminStatus {
    /// True when the RX state machine may leave its initialize state
    pub fn can_rx(&self) -> bool {
        matches!(self, AdminStatus::RxTx | AdminStatus::RxOnly)
    }

    /// True when the TX state machine may leave its initialize state
    pub fn can_tx(&self) -> bool {
        matches!(self, AdminStatus::RxTx | AdminStatus::TxOnly)
    }
}

impl fmt::Display for AdminStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminStatus::Disabled => write!(f, "disabled"),
            AdminStatus::TxOnly => write!(f, "tx-only"),
            AdminStatus::RxOnly => write!(f, "rx-only"),
            AdminStatus::RxTx => write!(f, "rx-tx"),
        }
    }
}

/// System capability bits (System Capabilities TLV bitmap)
pub mod capabilities {
    pub const OTHER: u16 = 0x0001;
    pub const REPEATER: u16 = 0x0002;
    pub const BRIDGE: u16 = 0x0004;
    pub const WLAN_ACCESS_POINT: u16 = 0x0008;
    pub const ROUTER: u16 = 0x0010;
    pub const TELEPHONE: u16 = 0x0020;
    pub const DOCSIS: u16 = 0x0040;
    pub const STATION_ONLY: u16 = 0x0080;
}
