//! Engine and port configuration
//!
//! The engine never reads configuration files; the caller (CLI or embedding
//! application) fills these structs in and hands them over at startup.

use crate::types::{capabilities, AdminStatus, MacAddr};
use std::net::Ipv4Addr;

/// IEEE 802.1AB recommended minimum timer values (seconds)
pub const MSG_TX_INTERVAL_DEFAULT: u16 = 30;
pub const MSG_TX_HOLD_DEFAULT: u16 = 4;
pub const TX_DELAY_DEFAULT: u16 = 2;
pub const REINIT_DELAY_DEFAULT: u16 = 2;

/// One civic-address element (CAtype + value) for LLDP-MED
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CivicEntry {
    /// CAtype code from ANSI/TIA-1057 (e.g. 1 = state, 3 = city)
    pub ca_type: u8,
    /// Element text
    pub value: String,
}

/// LLDP-MED Location Identification payload variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MedLocation {
    /// Coordinate-based LCI, opaque 16-byte geo blob
    Coordinate([u8; 16]),
    /// Civic address: "what" selector, ISO 3166 country code, CA elements
    CivicAddress {
        what: u8,
        country_code: [u8; 2],
        entries: Vec<CivicEntry>,
    },
    /// Emergency Location Identification Number, ASCII digits
    Elin(String),
}

/// Process-wide engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// System Name TLV contents
    pub system_name: String,
    /// System Description TLV contents
    pub system_description: String,
    /// Advertised capability bitmap
    pub capabilities: u16,
    /// Enabled subset of the capability bitmap
    pub enabled_capabilities: u16,
    /// Seconds between periodic transmissions (msgTxInterval)
    pub msg_tx_interval: u16,
    /// TTL multiplier (msgTxHold)
    pub msg_tx_hold: u16,
    /// Minimum delay between successive transmissions (txDelay)
    pub tx_delay: u16,
    /// Delay before re-initializing a disabled port (reinitDelay)
    pub reinit_delay: u16,
    /// Optional LLDP-MED location advertised on every port
    pub med_location: Option<MedLocation>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            system_name: String::new(),
            system_description: String::new(),
            capabilities: capabilities::STATION_ONLY,
            enabled_capabilities: capabilities::STATION_ONLY,
            msg_tx_interval: MSG_TX_INTERVAL_DEFAULT,
            msg_tx_hold: MSG_TX_HOLD_DEFAULT,
            tx_delay: TX_DELAY_DEFAULT,
            reinit_delay: REINIT_DELAY_DEFAULT,
            med_location: None,
        }
    }
}

/// Per-port configuration captured at interface initialization
#[derive(Debug, Clone)]
pub struct PortConfig {
    /// Interface name (e.g. "eth0")
    pub name: String,
    /// Interface MAC address, used as chassis and source address
    pub mac: MacAddr,
    /// First IPv4 address, advertised as management address when present
    pub ipv4: Option<Ipv4Addr>,
    /// Interface index, advertised in the Management Address TLV
    pub ifindex: u32,
    /// Port Description TLV contents
    pub description: String,
    /// Administrative status
    pub admin_status: AdminStatus,
}

impl PortConfig {
    /// Create a port configuration with defaults for the optional fields
    pub fn new<S: Into<String>>(name: S, mac: MacAddr) -> Self {
        let name = name.into();
        Self {
            description: name.clone(),
            name,
            mac,
            ipv4: None,
            ifindex: 0,
            admin_status: AdminStatus::RxTx,
        }
    }
}
