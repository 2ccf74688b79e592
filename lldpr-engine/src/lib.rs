//! LLDP protocol engine
//!
//! Single-threaded, tick-driven implementation of the IEEE 802.1AB
//! receive and transmit state machines:
//!
//! - [`cache`] — per-port MSAP neighbor store with TTL aging
//! - [`port`] — per-interface context owning timers, flags and statistics
//! - [`rx`] / [`tx`] — the two state machines
//! - [`engine`] — the once-per-second tick driver over all ports
//! - [`show`] — read-only neighbor table rendering
//!
//! All I/O goes through the [`FrameIo`](lldpr_core::FrameIo) trait, so the
//! whole engine runs against an in-memory double in tests.

pub mod cache;
pub mod engine;
pub mod port;
pub mod rx;
pub mod show;
pub mod tx;

pub use cache::{MsapCache, MsapEntry};
pub use engine::Engine;
pub use port::PortContext;
pub use rx::RxState;
pub use tx::TxState;
