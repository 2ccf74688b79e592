//! Network interface discovery and raw link I/O
//!
//! The protocol engine never opens sockets itself; it talks to a
//! [`FrameIo`] collaborator. [`LinkIo`] is the production implementation
//! over pre-opened `pnet_datalink` channels with a bounded read timeout so
//! the once-per-second tick loop can poll without blocking.

use crate::{Error, MacAddr, Result, LLDP_ETHERTYPE};
use pnet_datalink::{self, Channel, Config, DataLinkReceiver, DataLinkSender};
use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::{debug, warn};

/// Frame I/O collaborator used by the engine
///
/// `read_frame` must be non-blocking: return `None` when nothing is
/// pending. `write_frame` returns the number of bytes handed to the link.
pub trait FrameIo {
    fn read_frame(&mut self, port: &str) -> Option<Vec<u8>>;
    fn write_frame(&mut self, port: &str, frame: &[u8]) -> usize;
}

/// Network interface
#[derive(Debug, Clone)]
pub struct Interface {
    /// Interface name (e.g., "eth0", "en0")
    pub name: String,
    /// Interface index
    pub index: u32,
    /// MAC address
    pub mac_address: MacAddr,
    /// First IPv4 address, if any
    pub ipv4: Option<Ipv4Addr>,
    /// Is interface up?
    pub is_up: bool,
}

impl Interface {
    /// Get interface by name
    pub fn by_name(name: &str) -> Result<Self> {
        let iface = pnet_datalink::interfaces()
            .into_iter()
            .find(|i| i.name == name)
            .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))?;

        Ok(Self::from_pnet(&iface))
    }

    /// List all available interfaces
    pub fn list_all() -> Vec<Self> {
        pnet_datalink::interfaces()
            .iter()
            .map(Self::from_pnet)
            .collect()
    }

    fn from_pnet(iface: &pnet_datalink::NetworkInterface) -> Self {
        let mac_bytes = iface
            .mac
            .map(|mac| [mac.0, mac.1, mac.2, mac.3, mac.4, mac.5])
            .unwrap_or([0; 6]);

        let ipv4 = iface.ips.iter().find_map(|net| match net {
            ipnetwork::IpNetwork::V4(v4) => Some(v4.ip()),
            ipnetwork::IpNetwork::V6(_) => None,
        });

        Self {
            name: iface.name.clone(),
            index: iface.index,
            mac_address: MacAddr(mac_bytes),
            ipv4,
            is_up: iface.is_up(),
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.mac_address)?;
        if let Some(ip) = self.ipv4 {
            write!(f, " {}", ip)?;
        }
        if !self.is_up {
            write!(f, " [down]")?;
        }
        Ok(())
    }
}

type LinkChannel = (Box<dyn DataLinkSender>, Box<dyn DataLinkReceiver>);

/// `FrameIo` over raw `pnet_datalink` channels, one per port
pub struct LinkIo {
    channels: HashMap<String, LinkChannel>,
    /// Frames examined per `read_frame` call before giving up
    read_budget: usize,
}

impl LinkIo {
    /// Default bound on the poll timeout of each channel
    pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
            read_budget: 64,
        }
    }

    /// Open a raw channel on `iface` and register it under the port name
    pub fn open(&mut self, iface: &Interface) -> Result<()> {
        let pnet_iface = pnet_datalink::interfaces()
            .into_iter()
            .find(|i| i.name == iface.name)
            .ok_or_else(|| Error::InterfaceNotFound(iface.name.clone()))?;

        let config = Config {
            read_timeout: Some(Self::READ_TIMEOUT),
            ..Default::default()
        };

        let (tx, rx) = match pnet_datalink::channel(&pnet_iface, config) {
            Ok(Channel::Ethernet(tx, rx)) => (tx, rx),
            Ok(_) => return Err(Error::interface("Unsupported channel type")),
            Err(e) => return Err(Error::interface(format!("Failed to open channel: {}", e))),
        };

        debug!(interface = %iface.name, "opened link channel");
        self.channels.insert(iface.name.clone(), (tx, rx));
        Ok(())
    }
}

impl Default for LinkIo {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameIo for LinkIo {
    /// Return the next pending LLDP frame on `port`, or `None`
    ///
    /// Stands in for the BPF filter of a pcap-based capture path: frames
    /// with a different EtherType never reach the protocol engine.
    fn read_frame(&mut self, port: &str) -> Option<Vec<u8>> {
        let (_, rx) = self.channels.get_mut(port)?;

        for _ in 0..self.read_budget {
            match rx.next() {
                Ok(frame) => {
                    if frame.len() >= 14
                        && u16::from_be_bytes([frame[12], frame[13]]) == LLDP_ETHERTYPE
                    {
                        return Some(frame.to_vec());
                    }
                    // not LLDP, keep draining within the budget
                }
                Err(e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::WouldBlock => {
                    return None;
                }
                Err(e) => {
                    warn!(port, error = %e, "link read failed");
                    return None;
                }
            }
        }
        None
    }

    fn write_frame(&mut self, port: &str, frame: &[u8]) -> usize {
        let Some((tx, _)) = self.channels.get_mut(port) else {
            warn!(port, "write on unknown port");
            return 0;
        };

        match tx.send_to(frame, None) {
            Some(Ok(())) => frame.len(),
            Some(Err(e)) => {
                warn!(port, error = %e, "link write failed");
                0
            }
            None => {
                warn!(port, "link write not attempted");
                0
            }
        }
    }
}
