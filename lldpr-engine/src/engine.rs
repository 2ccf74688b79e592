//! Engine tick driver
//!
//! Owns every port context and the process-wide identity. A single `tick`
//! call advances all ports by one second: timers, cache aging, frame intake
//! and both state machines, strictly in that order, one port at a time.

use crate::port::PortContext;
use crate::rx;
use crate::tx::{self, TxState};
use lldpr_core::{AdminStatus, EngineConfig, FrameIo, PortConfig};
use tracing::{debug, info};

/// Upper bound on shutdown drain ticks
const SHUTDOWN_TICK_BUDGET: usize = 8;

pub struct Engine {
    config: EngineConfig,
    ports: Vec<PortContext>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ports: Vec::new(),
        }
    }

    pub fn add_port(&mut self, cfg: PortConfig) {
        info!(port = %cfg.name, status = %cfg.admin_status, "port added");
        self.ports.push(PortContext::new(cfg, &self.config));
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ports(&self) -> &[PortContext] {
        &self.ports
    }

    pub fn port_mut(&mut self, name: &str) -> Option<&mut PortContext> {
        self.ports.iter_mut().find(|p| p.name == name)
    }

    /// Advance every port by one second
    pub fn tick(&mut self, io: &mut dyn FrameIo) {
        for port in &mut self.ports {
            port.tick_timers();

            let aged_out = port.cache.age();
            if aged_out > 0 {
                port.stats.ageouts_total += aged_out as u64;
                port.rx_info_age = true;
                debug!(port = %port.name, aged_out, "neighbors aged out");
            }

            // bring a fresh machine to WaitForFrame before intake, otherwise
            // the Initialize entry action would discard the first frame
            rx::run(port);

            // one frame at a time: each RX run finishes before the next read
            while let Some(frame) = io.read_frame(&port.name) {
                port.frame_buf = Some(frame);
                port.rcv_frame = true;
                rx::run(port);
            }

            rx::run(port);
            tx::run(port, &self.config, io);
        }
    }

    /// Disable every port and drain the shutdown frames.
    ///
    /// Each enabled transmitter emits exactly one End-only LLDPDU and sits
    /// out its reinit delay before the engine returns.
    pub fn shutdown(&mut self, io: &mut dyn FrameIo) {
        info!(ports = self.ports.len(), "engine shutdown");
        for port in &mut self.ports {
            port.admin_status = AdminStatus::Disabled;
        }
        for _ in 0..SHUTDOWN_TICK_BUDGET {
            if self
                .ports
                .iter()
                .all(|p| p.tx_state == TxState::Initialize)
            {
                break;
            }
            self.tick(io);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lldpr_core::MacAddr;

    #[test]
    fn test_add_and_find_port() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.add_port(PortConfig::new("eth0", MacAddr::zero()));
        engine.add_port(PortConfig::new("eth1", MacAddr::zero()));

        assert_eq!(engine.ports().len(), 2);
        assert!(engine.port_mut("eth1").is_some());
        assert!(engine.port_mut("eth9").is_none());
    }
}
