//! LLDP wire format for lldpr - IEEE 802.1AB
//!
//! This crate owns everything that touches bytes on the wire:
//! - Ethernet II framing with LLDP multicast destination and minimum-size
//!   padding ([`ethernet`])
//! - The TLV codec: header packing, encode/decode, per-type validation
//!   ([`tlv`])
//! - Chassis/Port ID subtype and Management Address decoding ([`subtypes`])
//! - LLDP-MED Location Identification construction ([`med`])
//!
//! No state lives here; the RX/TX state machines in `lldpr-engine` drive
//! these pure functions.

pub mod ethernet;
pub mod med;
pub mod subtypes;
pub mod tlv;

pub use ethernet::EthernetFrame;
pub use subtypes::{ChassisIdSubtype, ManagementAddress, PortIdSubtype};
pub use tlv::{pack_header, unpack_header, Tlv, TlvError, TlvKind};
