//! Ethernet II framing for LLDPDUs
//!
//! LLDP frames are always Ethernet II: destination 01:80:c2:00:00:0e,
//! EtherType 0x88CC, payload = the flattened TLV list.

use bytes::{BufMut, BytesMut};
use lldpr_core::{MacAddr, LLDP_ETHERTYPE};

/// Ethernet II frame
#[derive(Debug, Clone)]
pub struct EthernetFrame {
    /// Destination MAC address
    pub destination: MacAddr,
    /// Source MAC address
    pub source: MacAddr,
    /// EtherType field
    pub ethertype: u16,
    /// Payload data
    pub payload: Vec<u8>,
}

impl EthernetFrame {
    /// Minimum on-wire frame size the daemon emits
    pub const MIN_FRAME_SIZE: usize = 64;

    /// Ethernet header size (dst + src + type)
    pub const HEADER_SIZE: usize = 14;

    /// Create a new Ethernet frame
    pub fn new(destination: MacAddr, source: MacAddr, ethertype: u16, payload: Vec<u8>) -> Self {
        EthernetFrame {
            destination,
            source,
            ethertype,
            payload,
        }
    }

    /// Create an LLDP frame to the nearest-bridge multicast address
    pub fn lldp(source: MacAddr, payload: Vec<u8>) -> Self {
        Self::new(MacAddr::lldp_multicast(), source, LLDP_ETHERTYPE, payload)
    }

    /// Convert the frame to bytes, padding to the minimum frame size
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(Self::HEADER_SIZE + self.payload.len());

        buffer.put_slice(self.destination.as_bytes());
        buffer.put_slice(self.source.as_bytes());
        buffer.put_u16(self.ethertype);
        buffer.put_slice(&self.payload);

        let mut result = buffer.to_vec();
        if result.len() < Self::MIN_FRAME_SIZE {
            result.resize(Self::MIN_FRAME_SIZE, 0);
        }

        result
    }

    /// Parse an Ethernet frame from bytes
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < Self::HEADER_SIZE {
            return None;
        }

        let mut dst = [0u8; 6];
        dst.copy_from_slice(&data[0..6]);
        let mut src = [0u8; 6];
        src.copy_from_slice(&data[6..12]);
        let ethertype = u16::from_be_bytes([data[12], data[13]]);

        Some(EthernetFrame {
            destination: MacAddr(dst),
            source: MacAddr(src),
            ethertype,
            payload: data[Self::HEADER_SIZE..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lldp_frame_header() {
        let src = MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        let frame = EthernetFrame::lldp(src, vec![0x01, 0x02]);
        let bytes = frame.to_bytes();

        assert_eq!(&bytes[0..6], &[0x01, 0x80, 0xC2, 0x00, 0x00, 0x0E]);
        assert_eq!(&bytes[6..12], src.as_bytes());
        assert_eq!(u16::from_be_bytes([bytes[12], bytes[13]]), 0x88CC);
    }

    #[test]
    fn test_minimum_size_padding() {
        let frame = EthernetFrame::lldp(MacAddr::zero(), vec![0xAA; 3]);
        let bytes = frame.to_bytes();
        assert_eq!(bytes.len(), EthernetFrame::MIN_FRAME_SIZE);
        // padding beyond the payload is zeroed
        assert!(bytes[17..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_no_padding_above_minimum() {
        let frame = EthernetFrame::lldp(MacAddr::zero(), vec![0xAA; 100]);
        assert_eq!(frame.to_bytes().len(), 114);
    }

    #[test]
    fn test_roundtrip() {
        let src = MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        let frame = EthernetFrame::lldp(src, vec![1, 2, 3, 4]);
        let parsed = EthernetFrame::from_bytes(&frame.to_bytes()).unwrap();

        assert_eq!(parsed.destination, MacAddr::lldp_multicast());
        assert_eq!(parsed.source, src);
        assert_eq!(parsed.ethertype, LLDP_ETHERTYPE);
        assert_eq!(&parsed.payload[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_from_bytes_too_short() {
        assert!(EthernetFrame::from_bytes(&[0u8; 13]).is_none());
    }
}
