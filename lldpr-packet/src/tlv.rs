//! LLDP TLV codec - IEEE 802.1AB clause 9
//!
//! A TLV is a 2-byte header (7-bit type, 9-bit length) followed by up to
//! 511 bytes of info string. This module owns header packing, the checked
//! constructors, wire encode/decode and the per-type length validators.

use crate::subtypes::{ChassisIdSubtype, ManagementAddress, PortIdSubtype};
use lldpr_core::MacAddr;
use thiserror::Error;

/// TLV codec errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TlvError {
    /// Declared length reads past the end of the buffer
    #[error("TLV extends past end of buffer")]
    Truncated,

    /// Payload does not fit the 9-bit length field
    #[error("TLV payload of {0} bytes exceeds 511-byte maximum")]
    PayloadTooLong(usize),

    /// Raw type does not fit the 7-bit type field
    #[error("TLV type {0} exceeds 7-bit maximum")]
    TypeOutOfRange(u8),

    /// Length outside the per-type bounds
    #[error("{kind:?} TLV has invalid length {len}")]
    LengthInvalid { kind: TlvKind, len: usize },
}

/// LLDP TLV types
///
/// Closed enum over the standard types; everything in the reserved range
/// 9..=126 is carried as `Reserved` and only gets the generic length check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlvKind {
    EndOfLldpdu,
    ChassisId,
    PortId,
    Ttl,
    PortDescription,
    SystemName,
    SystemDescription,
    SystemCapabilities,
    ManagementAddress,
    OrganizationallySpecific,
    Reserved(u8),
}

impl TlvKind {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => TlvKind::EndOfLldpdu,
            1 => TlvKind::ChassisId,
            2 => TlvKind::PortId,
            3 => TlvKind::Ttl,
            4 => TlvKind::PortDescription,
            5 => TlvKind::SystemName,
            6 => TlvKind::SystemDescription,
            7 => TlvKind::SystemCapabilities,
            8 => TlvKind::ManagementAddress,
            127 => TlvKind::OrganizationallySpecific,
            other => TlvKind::Reserved(other),
        }
    }

    pub fn as_u8(&self) -> u8 {
        match self {
            TlvKind::EndOfLldpdu => 0,
            TlvKind::ChassisId => 1,
            TlvKind::PortId => 2,
            TlvKind::Ttl => 3,
            TlvKind::PortDescription => 4,
            TlvKind::SystemName => 5,
            TlvKind::SystemDescription => 6,
            TlvKind::SystemCapabilities => 7,
            TlvKind::ManagementAddress => 8,
            TlvKind::OrganizationallySpecific => 127,
            TlvKind::Reserved(v) => *v,
        }
    }
}

/// Pack a TLV header.
///
/// Bit layout, big-endian over two bytes:
///
/// ```text
///  15        9 8          0
/// +-----------+------------+
/// | type (7b) | length (9b)|
/// +-----------+------------+
/// ```
pub fn pack_header(tlv_type: u8, len: u16) -> [u8; 2] {
    (((tlv_type as u16) << 9) | (len & 0x1FF)).to_be_bytes()
}

/// Unpack a TLV header into (type, length)
pub fn unpack_header(bytes: [u8; 2]) -> (u8, u16) {
    let raw = u16::from_be_bytes(bytes);
    ((raw >> 9) as u8, raw & 0x1FF)
}

/// LLDP TLV (Type-Length-Value)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    kind: TlvKind,
    value: Vec<u8>,
}

impl Tlv {
    /// Maximum info string length (9-bit length field)
    pub const MAX_VALUE_LEN: usize = 511;

    /// Create a TLV, rejecting payloads and types the header cannot carry
    pub fn new(kind: TlvKind, value: Vec<u8>) -> Result<Self, TlvError> {
        if value.len() > Self::MAX_VALUE_LEN {
            return Err(TlvError::PayloadTooLong(value.len()));
        }
        if kind.as_u8() > 127 {
            return Err(TlvError::TypeOutOfRange(kind.as_u8()));
        }
        Ok(Self { kind, value })
    }

    /// Create a TLV from already length-checked wire data
    pub(crate) fn from_wire(kind: TlvKind, value: Vec<u8>) -> Self {
        debug_assert!(value.len() <= Self::MAX_VALUE_LEN);
        Self { kind, value }
    }

    pub fn kind(&self) -> TlvKind {
        self.kind
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn chassis_id(subtype: ChassisIdSubtype, id: &[u8]) -> Self {
        let mut value = Vec::with_capacity(id.len() + 1);
        value.push(subtype as u8);
        value.extend_from_slice(&id[..id.len().min(255)]);
        Self::from_wire(TlvKind::ChassisId, value)
    }

    pub fn chassis_id_mac(mac: MacAddr) -> Self {
        Self::chassis_id(ChassisIdSubtype::MacAddress, mac.as_bytes())
    }

    pub fn port_id(subtype: PortIdSubtype, id: &[u8]) -> Self {
        let mut value = Vec::with_capacity(id.len() + 1);
        value.push(subtype as u8);
        value.extend_from_slice(&id[..id.len().min(255)]);
        Self::from_wire(TlvKind::PortId, value)
    }

    pub fn port_id_interface(name: &str) -> Self {
        Self::port_id(PortIdSubtype::InterfaceName, name.as_bytes())
    }

    pub fn ttl(seconds: u16) -> Self {
        Self::from_wire(TlvKind::Ttl, seconds.to_be_bytes().to_vec())
    }

    pub fn port_description(desc: &str) -> Self {
        Self::from_wire(TlvKind::PortDescription, bounded(desc, 255))
    }

    pub fn system_name(name: &str) -> Self {
        Self::from_wire(TlvKind::SystemName, bounded(name, 255))
    }

    pub fn system_description(desc: &str) -> Self {
        Self::from_wire(TlvKind::SystemDescription, bounded(desc, 255))
    }

    pub fn system_capabilities(capabilities: u16, enabled: u16) -> Self {
        let mut value = Vec::with_capacity(4);
        value.extend_from_slice(&capabilities.to_be_bytes());
        value.extend_from_slice(&enabled.to_be_bytes());
        Self::from_wire(TlvKind::SystemCapabilities, value)
    }

    pub fn management_address(addr: &ManagementAddress) -> Self {
        Self::from_wire(TlvKind::ManagementAddress, addr.encode())
    }

    pub fn organizationally_specific(oui: [u8; 3], subtype: u8, data: &[u8]) -> Result<Self, TlvError> {
        let mut value = Vec::with_capacity(4 + data.len());
        value.extend_from_slice(&oui);
        value.push(subtype);
        value.extend_from_slice(data);
        Self::new(TlvKind::OrganizationallySpecific, value)
    }

    pub fn end_of_lldpdu() -> Self {
        Self::from_wire(TlvKind::EndOfLldpdu, Vec::new())
    }

    /// Serialize: 2-byte header followed by the info string
    pub fn flatten(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(2 + self.value.len());
        bytes.extend_from_slice(&pack_header(self.kind.as_u8(), self.value.len() as u16));
        bytes.extend_from_slice(&self.value);
        bytes
    }

    /// Inverse of [`flatten`](Self::flatten): parse exactly one TLV
    /// occupying the whole buffer
    pub fn explode(data: &[u8]) -> Result<Self, TlvError> {
        let (tlv, consumed) = Self::decode(data, 0)?;
        if consumed != data.len() {
            return Err(TlvError::Truncated);
        }
        Ok(tlv)
    }

    /// Parse one TLV at `offset`, returning it and the bytes consumed
    pub fn decode(data: &[u8], offset: usize) -> Result<(Self, usize), TlvError> {
        if offset + 2 > data.len() {
            return Err(TlvError::Truncated);
        }

        let (tlv_type, length) = unpack_header([data[offset], data[offset + 1]]);
        let end = offset + 2 + length as usize;
        if end > data.len() {
            return Err(TlvError::Truncated);
        }

        let value = data[offset + 2..end].to_vec();
        Ok((Self::from_wire(TlvKind::from_u8(tlv_type), value), 2 + length as usize))
    }

    /// Check the info string length against the per-type bound table
    pub fn validate(&self) -> Result<(), TlvError> {
        let len = self.value.len();
        let ok = match self.kind {
            TlvKind::EndOfLldpdu => len == 0,
            TlvKind::ChassisId | TlvKind::PortId => (2..=256).contains(&len),
            TlvKind::Ttl => len == 2,
            TlvKind::PortDescription | TlvKind::SystemName | TlvKind::SystemDescription => {
                len <= 255
            }
            TlvKind::SystemCapabilities => len == 4,
            TlvKind::ManagementAddress => (9..=167).contains(&len),
            TlvKind::OrganizationallySpecific => (4..=511).contains(&len),
            TlvKind::Reserved(_) => len <= Self::MAX_VALUE_LEN,
        };

        if ok {
            Ok(())
        } else {
            Err(TlvError::LengthInvalid {
                kind: self.kind,
                len,
            })
        }
    }
}

fn bounded(s: &str, max: usize) -> Vec<u8> {
    let bytes = s.as_bytes();
    bytes[..bytes.len().min(max)].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtypes::ManagementAddress;
    use std::net::Ipv4Addr;

    #[test]
    fn test_header_bit_layout() {
        // type in the high 7 bits, length in the low 9
        assert_eq!(pack_header(5, 10), [0x0A, 0x0A]);
        assert_eq!(pack_header(127, 511), [0xFF, 0xFF]);
        assert_eq!(pack_header(0, 0), [0x00, 0x00]);
        assert_eq!(pack_header(1, 256), [0x03, 0x00]);
    }

    #[test]
    fn test_header_roundtrip() {
        for tlv_type in [0u8, 1, 3, 8, 64, 127] {
            for len in [0u16, 1, 255, 256, 511] {
                assert_eq!(unpack_header(pack_header(tlv_type, len)), (tlv_type, len));
            }
        }
    }

    #[test]
    fn test_kind_roundtrip() {
        for raw in 0..=127u8 {
            assert_eq!(TlvKind::from_u8(raw).as_u8(), raw);
        }
        assert_eq!(TlvKind::from_u8(9), TlvKind::Reserved(9));
        assert_eq!(TlvKind::from_u8(127), TlvKind::OrganizationallySpecific);
    }

    #[test]
    fn test_new_rejects_oversized_payload() {
        assert_eq!(
            Tlv::new(TlvKind::SystemName, vec![0; 512]),
            Err(TlvError::PayloadTooLong(512))
        );
        assert!(Tlv::new(TlvKind::Reserved(9), vec![0; 511]).is_ok());
    }

    #[test]
    fn test_new_rejects_type_out_of_range() {
        assert_eq!(
            Tlv::new(TlvKind::Reserved(128), vec![]),
            Err(TlvError::TypeOutOfRange(128))
        );
    }

    #[test]
    fn test_flatten_explode_roundtrip() {
        let mac = MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        let cases = vec![
            Tlv::end_of_lldpdu(),
            Tlv::chassis_id_mac(mac),
            Tlv::port_id_interface("eth0"),
            Tlv::ttl(120),
            Tlv::port_description("uplink"),
            Tlv::system_name("switch-a"),
            Tlv::system_description("lldpr test device"),
            Tlv::system_capabilities(0x0014, 0x0014),
            Tlv::management_address(&ManagementAddress::ipv4(Ipv4Addr::new(10, 0, 0, 1), 7)),
            Tlv::organizationally_specific([0x00, 0x12, 0xBB], 3, &[1, 2, 3]).unwrap(),
            Tlv::new(TlvKind::Reserved(42), vec![0xDE, 0xAD]).unwrap(),
        ];

        for tlv in cases {
            let wire = tlv.flatten();
            let back = Tlv::explode(&wire).unwrap();
            assert_eq!(back, tlv);
            assert_eq!(back.flatten(), wire);
        }
    }

    #[test]
    fn test_explode_rejects_trailing_bytes() {
        let mut wire = Tlv::ttl(120).flatten();
        wire.push(0x00);
        assert_eq!(Tlv::explode(&wire), Err(TlvError::Truncated));
    }

    #[test]
    fn test_decode_truncated() {
        let wire = Tlv::system_name("abcdef").flatten();
        assert_eq!(Tlv::decode(&wire[..4], 0), Err(TlvError::Truncated));
        assert_eq!(Tlv::decode(&wire, wire.len() - 1), Err(TlvError::Truncated));
    }

    #[test]
    fn test_decode_at_offset() {
        let mut buf = Tlv::ttl(60).flatten();
        let second = Tlv::system_name("x");
        buf.extend_from_slice(&second.flatten());

        let (tlv, consumed) = Tlv::decode(&buf, 4).unwrap();
        assert_eq!(tlv, second);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn test_ttl_encoding() {
        let tlv = Tlv::ttl(120);
        assert_eq!(tlv.value(), &[0x00, 0x78]);
        // type 3, length 2
        assert_eq!(tlv.flatten()[..2], [0x06, 0x02]);
    }

    #[test]
    fn test_validate_table() {
        assert!(Tlv::end_of_lldpdu().validate().is_ok());
        assert!(Tlv::from_wire(TlvKind::EndOfLldpdu, vec![0]).validate().is_err());

        // chassis/port need subtype + at least one value byte
        assert!(Tlv::from_wire(TlvKind::ChassisId, vec![4]).validate().is_err());
        assert!(Tlv::from_wire(TlvKind::ChassisId, vec![4, 1]).validate().is_ok());
        assert!(Tlv::from_wire(TlvKind::PortId, vec![5; 256]).validate().is_ok());
        assert!(Tlv::from_wire(TlvKind::PortId, vec![5; 257]).validate().is_err());

        assert!(Tlv::from_wire(TlvKind::Ttl, vec![0]).validate().is_err());
        assert!(Tlv::ttl(0).validate().is_ok());

        assert!(Tlv::from_wire(TlvKind::SystemName, vec![b'a'; 255]).validate().is_ok());
        assert!(Tlv::from_wire(TlvKind::SystemName, vec![b'a'; 256]).validate().is_err());

        assert!(Tlv::from_wire(TlvKind::SystemCapabilities, vec![0; 4]).validate().is_ok());
        assert!(Tlv::from_wire(TlvKind::SystemCapabilities, vec![0; 3]).validate().is_err());

        assert!(Tlv::from_wire(TlvKind::ManagementAddress, vec![0; 9]).validate().is_ok());
        assert!(Tlv::from_wire(TlvKind::ManagementAddress, vec![0; 8]).validate().is_err());
        assert!(Tlv::from_wire(TlvKind::ManagementAddress, vec![0; 167]).validate().is_ok());
        assert!(Tlv::from_wire(TlvKind::ManagementAddress, vec![0; 168]).validate().is_err());

        assert!(Tlv::from_wire(TlvKind::OrganizationallySpecific, vec![0; 4]).validate().is_ok());
        assert!(Tlv::from_wire(TlvKind::OrganizationallySpecific, vec![0; 3]).validate().is_err());

        // reserved types only get the generic check
        assert!(Tlv::from_wire(TlvKind::Reserved(66), vec![0; 511]).validate().is_ok());
    }

    #[test]
    fn test_string_constructors_truncate() {
        let long = "a".repeat(300);
        assert_eq!(Tlv::system_name(&long).value().len(), 255);
        assert!(Tlv::system_name(&long).validate().is_ok());
    }
}
