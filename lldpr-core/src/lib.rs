//! lldpr Core Library
//!
//! This crate provides the fundamental types, error handling, configuration
//! and raw link I/O for the lldpr IEEE 802.1AB neighbor-discovery engine.

pub mod config;
pub mod error;
pub mod interface;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use config::{CivicEntry, EngineConfig, MedLocation, PortConfig};
pub use error::{Error, Result};
pub use interface::{FrameIo, Interface, LinkIo};
pub use stats::PortStats;
pub use types::{capabilities, AdminStatus, MacAddr, LLDP_ETHERTYPE, LLDP_MULTICAST_MAC};
