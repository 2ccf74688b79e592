//! Chassis-ID / Port-ID subtypes and Management Address decoding
//!
//! The first info-string byte of the Chassis ID and Port ID TLVs selects a
//! subtype; the neighbor formatter uses these decoders to render the raw
//! identifiers as text.

use crate::tlv::{TlvError, TlvKind};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// IANA address family numbers used inside network-address identifiers
pub mod addr_family {
    pub const IPV4: u8 = 1;
    pub const IPV6: u8 = 2;
}

/// Chassis ID Subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChassisIdSubtype {
    Reserved = 0,
    ChassisComponent = 1,
    InterfaceAlias = 2,
    PortComponent = 3,
    MacAddress = 4,
    NetworkAddress = 5,
    InterfaceName = 6,
    LocallyAssigned = 7,
}

impl From<u8> for ChassisIdSubtype {
    fn from(value: u8) -> Self {
        match value {
            1 => ChassisIdSubtype::ChassisComponent,
            2 => ChassisIdSubtype::InterfaceAlias,
            3 => ChassisIdSubtype::PortComponent,
            4 => ChassisIdSubtype::MacAddress,
            5 => ChassisIdSubtype::NetworkAddress,
            6 => ChassisIdSubtype::InterfaceName,
            7 => ChassisIdSubtype::LocallyAssigned,
            _ => ChassisIdSubtype::Reserved,
        }
    }
}

/// Port ID Subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PortIdSubtype {
    Reserved = 0,
    InterfaceAlias = 1,
    PortComponent = 2,
    MacAddress = 3,
    NetworkAddress = 4,
    InterfaceName = 5,
    AgentCircuitId = 6,
    LocallyAssigned = 7,
}

impl From<u8> for PortIdSubtype {
    fn from(value: u8) -> Self {
        match value {
            1 => PortIdSubtype::InterfaceAlias,
            2 => PortIdSubtype::PortComponent,
            3 => PortIdSubtype::MacAddress,
            4 => PortIdSubtype::NetworkAddress,
            5 => PortIdSubtype::InterfaceName,
            6 => PortIdSubtype::AgentCircuitId,
            7 => PortIdSubtype::LocallyAssigned,
            _ => PortIdSubtype::Reserved,
        }
    }
}

/// Render a Chassis ID info string (subtype byte + identifier)
pub fn decode_chassis_id(value: &[u8]) -> String {
    let Some((&subtype, id)) = value.split_first() else {
        return String::from("(empty)");
    };

    match ChassisIdSubtype::from(subtype) {
        ChassisIdSubtype::MacAddress => format_mac(id),
        ChassisIdSubtype::NetworkAddress => format_network_address(id),
        _ => String::from_utf8_lossy(id).into_owned(),
    }
}

/// Render a Port ID info string (subtype byte + identifier)
pub fn decode_port_id(value: &[u8]) -> String {
    let Some((&subtype, id)) = value.split_first() else {
        return String::from("(empty)");
    };

    match PortIdSubtype::from(subtype) {
        PortIdSubtype::MacAddress => format_mac(id),
        PortIdSubtype::NetworkAddress => format_network_address(id),
        _ => String::from_utf8_lossy(id).into_owned(),
    }
}

fn format_mac(id: &[u8]) -> String {
    if id.len() == 6 {
        id.iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":")
    } else {
        hex::encode(id)
    }
}

/// IANA address-family byte followed by the address bytes
fn format_network_address(id: &[u8]) -> String {
    match id.split_first() {
        Some((&addr_family::IPV4, addr)) if addr.len() == 4 => {
            Ipv4Addr::new(addr[0], addr[1], addr[2], addr[3]).to_string()
        }
        Some((&addr_family::IPV6, addr)) if addr.len() == 16 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(addr);
            Ipv6Addr::from(octets).to_string()
        }
        _ => hex::encode(id),
    }
}

/// Structured Management Address TLV contents
///
/// Wire layout: addr-len(1) addr-subtype(1) address(N) iface-subtype(1)
/// iface-number(4, big-endian) oid-len(1) oid(0..=128).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementAddress {
    pub addr_subtype: u8,
    pub address: Vec<u8>,
    pub iface_subtype: u8,
    pub iface_number: u32,
    pub oid: Vec<u8>,
}

impl ManagementAddress {
    /// Interface numbering subtype: ifIndex
    pub const IFACE_SUBTYPE_IFINDEX: u8 = 2;

    /// Maximum OID length in octets
    pub const MAX_OID_LEN: usize = 128;

    /// Management address for an IPv4 interface address
    pub fn ipv4(addr: Ipv4Addr, ifindex: u32) -> Self {
        Self {
            addr_subtype: addr_family::IPV4,
            address: addr.octets().to_vec(),
            iface_subtype: Self::IFACE_SUBTYPE_IFINDEX,
            iface_number: ifindex,
            oid: Vec::new(),
        }
    }

    /// Serialize into a Management Address info string
    pub fn encode(&self) -> Vec<u8> {
        let mut value = Vec::with_capacity(8 + self.address.len() + self.oid.len());
        value.push(self.address.len() as u8 + 1); // subtype + address
        value.push(self.addr_subtype);
        value.extend_from_slice(&self.address);
        value.push(self.iface_subtype);
        value.extend_from_slice(&self.iface_number.to_be_bytes());
        value.push(self.oid.len() as u8);
        value.extend_from_slice(&self.oid);
        value
    }

    /// Parse a Management Address info string
    pub fn decode(value: &[u8]) -> Result<Self, TlvError> {
        let invalid = |len| TlvError::LengthInvalid {
            kind: TlvKind::ManagementAddress,
            len,
        };

        if value.len() < 9 {
            return Err(invalid(value.len()));
        }

        let addr_len = value[0] as usize;
        // addr_len counts the subtype byte plus the address bytes
        if addr_len < 2 || 1 + addr_len + 6 > value.len() {
            return Err(TlvError::Truncated);
        }

        let addr_subtype = value[1];
        let address = value[2..1 + addr_len].to_vec();
        let rest = &value[1 + addr_len..];

        let iface_subtype = rest[0];
        let iface_number = u32::from_be_bytes([rest[1], rest[2], rest[3], rest[4]]);
        let oid_len = rest[5] as usize;
        if oid_len > Self::MAX_OID_LEN || 6 + oid_len > rest.len() {
            return Err(TlvError::Truncated);
        }
        let oid = rest[6..6 + oid_len].to_vec();

        Ok(Self {
            addr_subtype,
            address,
            iface_subtype,
            iface_number,
            oid,
        })
    }

    /// Render the address itself as text
    pub fn address_string(&self) -> String {
        match (self.addr_subtype, self.address.len()) {
            (addr_family::IPV4, 4) => {
                Ipv4Addr::new(self.address[0], self.address[1], self.address[2], self.address[3])
                    .to_string()
            }
            (addr_family::IPV6, 16) => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(&self.address);
                Ipv6Addr::from(octets).to_string()
            }
            _ => hex::encode(&self.address),
        }
    }
}

impl fmt::Display for ManagementAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ifindex {})", self.address_string(), self.iface_number)
    }
}
