//! Per-port protocol context
//!
//! Everything one interface needs: identity, admin state, both state
//! machines with their timers and flags, the in-flight frame buffer, the
//! MSAP cache and the statistics block. Each context is exclusively owned
//! by the engine; state-machine runs for one port never touch another.

use crate::cache::MsapCache;
use crate::rx::RxState;
use crate::tx::TxState;
use lldpr_core::{AdminStatus, EngineConfig, MacAddr, PortConfig, PortStats};
use std::net::Ipv4Addr;

/// Per-interface state for both LLDP state machines
#[derive(Debug)]
pub struct PortContext {
    // identity
    pub name: String,
    pub mac: MacAddr,
    pub ipv4: Option<Ipv4Addr>,
    pub ifindex: u32,
    pub description: String,

    // administrative state
    pub admin_status: AdminStatus,
    pub port_enabled: bool,
    pub(crate) was_enabled: bool,

    // state machines
    pub rx_state: RxState,
    pub tx_state: TxState,

    // timer parameters (seconds), copied from the engine configuration
    pub msg_tx_interval: u16,
    pub msg_tx_hold: u16,
    pub tx_delay: u16,
    pub reinit_delay: u16,

    // running timers, decremented once per tick, never below zero
    pub tx_ttl: u16,
    pub tx_ttr: u16,
    pub tx_delay_while: u16,
    pub tx_shutdown_while: u16,

    // RX variables and flags
    pub rcv_frame: bool,
    pub rx_info_age: bool,
    pub rx_changes: bool,
    pub rx_ttl: u16,
    pub bad_frame: u32,
    pub too_many_neighbors: bool,

    // dirty flags
    pub something_changed_local: bool,
    pub something_changed_remote: bool,

    /// Frame handed over by the I/O collaborator, consumed by one RX run
    pub frame_buf: Option<Vec<u8>>,

    pub cache: MsapCache,
    pub stats: PortStats,
}

impl PortContext {
    pub fn new(cfg: PortConfig, engine_cfg: &EngineConfig) -> Self {
        Self {
            name: cfg.name,
            mac: cfg.mac,
            ipv4: cfg.ipv4,
            ifindex: cfg.ifindex,
            description: cfg.description,
            admin_status: cfg.admin_status,
            port_enabled: true,
            was_enabled: true,
            rx_state: RxState::WaitPortOperational,
            tx_state: TxState::Initialize,
            msg_tx_interval: engine_cfg.msg_tx_interval,
            msg_tx_hold: engine_cfg.msg_tx_hold,
            tx_delay: engine_cfg.tx_delay,
            reinit_delay: engine_cfg.reinit_delay,
            tx_ttl: 0,
            tx_ttr: 0,
            tx_delay_while: 0,
            tx_shutdown_while: 0,
            rcv_frame: false,
            rx_info_age: false,
            rx_changes: false,
            rx_ttl: 0,
            bad_frame: 0,
            too_many_neighbors: false,
            something_changed_local: false,
            something_changed_remote: false,
            frame_buf: None,
            cache: MsapCache::new(),
            stats: PortStats::default(),
        }
    }

    /// One-second timer step for the TX machine timers
    pub fn tick_timers(&mut self) {
        self.tx_shutdown_while = self.tx_shutdown_while.saturating_sub(1);
        self.tx_delay_while = self.tx_delay_while.saturating_sub(1);
        self.tx_ttr = self.tx_ttr.saturating_sub(1);
    }
}
