//! LLDP transmit state machine - IEEE 802.1AB 10.5.4.3
//!
//! Driven once per engine tick after the timers have been decremented. The
//! machine is run to quiescence each time; `InfoFrame` and `ShutdownFrame`
//! are transient states that fall back to `Idle` / `Initialize`.

use crate::port::PortContext;
use lldpr_core::{EngineConfig, FrameIo};
use lldpr_packet::{med, EthernetFrame, ManagementAddress, Tlv};
use tracing::{debug, trace, warn};

/// Bound on state transitions per machine run
const MAX_TRANSITIONS: usize = 8;

/// Transmit machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxState {
    Initialize,
    Idle,
    ShutdownFrame,
    InfoFrame,
}

/// Run the transmit machine for one port until it is quiescent
pub fn run(port: &mut PortContext, cfg: &EngineConfig, io: &mut dyn FrameIo) {
    // link down forces a reinitialize without a shutdown frame
    if !port.port_enabled {
        if port.tx_state != TxState::Initialize {
            trace!(port = %port.name, "link down, tx -> Initialize");
            port.tx_state = TxState::Initialize;
            enter(port, cfg, io);
        }
        port.was_enabled = false;
        return;
    }
    if !port.was_enabled {
        // link came back, start over
        port.tx_state = TxState::Initialize;
        enter(port, cfg, io);
    }
    port.was_enabled = true;

    for _ in 0..MAX_TRANSITIONS {
        let next = match port.tx_state {
            TxState::Initialize => {
                if port.admin_status.can_tx() {
                    Some(TxState::Idle)
                } else {
                    None
                }
            }
            TxState::Idle => {
                if !port.admin_status.can_tx() {
                    Some(TxState::ShutdownFrame)
                } else if port.tx_delay_while == 0
                    && (port.tx_ttr == 0 || port.something_changed_local)
                {
                    Some(TxState::InfoFrame)
                } else {
                    None
                }
            }
            TxState::ShutdownFrame => {
                if port.tx_shutdown_while == 0 {
                    Some(TxState::Initialize)
                } else {
                    None
                }
            }
            TxState::InfoFrame => Some(TxState::Idle),
        };

        match next {
            Some(state) => {
                trace!(port = %port.name, ?state, "tx transition");
                port.tx_state = state;
                enter(port, cfg, io);
            }
            None => break,
        }
    }
}

/// State entry actions
fn enter(port: &mut PortContext, cfg: &EngineConfig, io: &mut dyn FrameIo) {
    match port.tx_state {
        TxState::Initialize => {
            port.something_changed_local = false;
            port.tx_ttr = 0;
            port.tx_delay_while = 0;
            port.stats.frames_out_total = 0;
        }
        TxState::Idle => {
            // advertised lifetime, capped at the u16 ceiling
            port.tx_ttl =
                (u32::from(port.msg_tx_interval) * u32::from(port.msg_tx_hold)).min(65_535) as u16;
        }
        TxState::InfoFrame => {
            let tlvs = build_info_lldpdu(port, cfg);
            send(port, io, &tlvs);
            port.something_changed_local = false;
            port.tx_ttr = port.msg_tx_interval;
            port.tx_delay_while = port.tx_delay;
        }
        TxState::ShutdownFrame => {
            // TTL is irrelevant here: an LLDPDU of just End-of-LLDPDU tells
            // the peer to drop us
            send(port, io, &[Tlv::end_of_lldpdu()]);
            port.tx_shutdown_while = port.reinit_delay;
            debug!(port = %port.name, reinit = port.reinit_delay, "shutdown frame sent");
        }
    }
}

/// Assemble the advertisement TLV set for one port
fn build_info_lldpdu(port: &PortContext, cfg: &EngineConfig) -> Vec<Tlv> {
    let mut tlvs = vec![
        Tlv::chassis_id_mac(port.mac),
        Tlv::port_id_interface(&port.name),
        Tlv::ttl(port.tx_ttl),
    ];

    if !port.description.is_empty() {
        tlvs.push(Tlv::port_description(&port.description));
    }
    if !cfg.system_name.is_empty() {
        tlvs.push(Tlv::system_name(&cfg.system_name));
    }
    if !cfg.system_description.is_empty() {
        tlvs.push(Tlv::system_description(&cfg.system_description));
    }
    tlvs.push(Tlv::system_capabilities(
        cfg.capabilities,
        cfg.enabled_capabilities,
    ));
    if let Some(ipv4) = port.ipv4 {
        tlvs.push(Tlv::management_address(&ManagementAddress::ipv4(
            ipv4,
            port.ifindex,
        )));
    }
    if let Some(location) = &cfg.med_location {
        match med::location_tlv(location) {
            Ok(tlv) => tlvs.push(tlv),
            Err(e) => warn!(port = %port.name, error = %e, "MED location skipped"),
        }
    }
    tlvs.push(Tlv::end_of_lldpdu());
    tlvs
}

fn send(port: &mut PortContext, io: &mut dyn FrameIo, tlvs: &[Tlv]) {
    let payload: Vec<u8> = tlvs.iter().flat_map(Tlv::flatten).collect();
    let frame = EthernetFrame::lldp(port.mac, payload).to_bytes();
    let written = io.write_frame(&port.name, &frame);
    if written == 0 {
        warn!(port = %port.name, "frame not written");
        return;
    }
    port.stats.frames_out_total += 1;
    trace!(port = %port.name, bytes = written, tlvs = tlvs.len(), "frame sent");
}

#[cfg(test)]
mod tests {
    use super::*;
    use lldpr_core::{AdminStatus, MacAddr, PortConfig};
    use lldpr_packet::TlvKind;
    use std::net::Ipv4Addr;

    struct SinkIo {
        sent: Vec<Vec<u8>>,
    }

    impl SinkIo {
        fn new() -> Self {
            Self { sent: Vec::new() }
        }
    }

    impl FrameIo for SinkIo {
        fn read_frame(&mut self, _port: &str) -> Option<Vec<u8>> {
            None
        }

        fn write_frame(&mut self, _port: &str, frame: &[u8]) -> usize {
            self.sent.push(frame.to_vec());
            frame.len()
        }
    }

    fn port() -> PortContext {
        let mut cfg = PortConfig::new("eth0", MacAddr([0x02, 0, 0, 0, 0, 1]));
        cfg.ipv4 = Some(Ipv4Addr::new(192, 0, 2, 1));
        cfg.ifindex = 3;
        cfg.description = "uplink".into();
        PortContext::new(cfg, &EngineConfig::default())
    }

    fn decode_payload(frame: &[u8]) -> Vec<Tlv> {
        let mut tlvs = Vec::new();
        let mut offset = 14;
        loop {
            let (tlv, consumed) = Tlv::decode(frame, offset).unwrap();
            offset += consumed;
            let end = tlv.kind() == TlvKind::EndOfLldpdu;
            tlvs.push(tlv);
            if end {
                break;
            }
        }
        tlvs
    }

    #[test]
    fn test_first_frame_on_first_run() {
        let mut p = port();
        let cfg = EngineConfig::default();
        let mut io = SinkIo::new();

        run(&mut p, &cfg, &mut io);
        assert_eq!(p.tx_state, TxState::Idle);
        assert_eq!(io.sent.len(), 1);
        assert_eq!(p.stats.frames_out_total, 1);
        assert_eq!(p.tx_ttr, cfg.msg_tx_interval);
    }

    #[test]
    fn test_info_frame_contents_and_order() {
        let mut p = port();
        let mut cfg = EngineConfig::default();
        cfg.system_name = "host".into();
        cfg.system_description = "lldpr".into();
        let mut io = SinkIo::new();

        run(&mut p, &cfg, &mut io);
        let tlvs = decode_payload(&io.sent[0]);
        let kinds: Vec<TlvKind> = tlvs.iter().map(Tlv::kind).collect();
        assert_eq!(
            kinds,
            vec![
                TlvKind::ChassisId,
                TlvKind::PortId,
                TlvKind::Ttl,
                TlvKind::PortDescription,
                TlvKind::SystemName,
                TlvKind::SystemDescription,
                TlvKind::SystemCapabilities,
                TlvKind::ManagementAddress,
                TlvKind::EndOfLldpdu,
            ]
        );

        // ttl = interval * hold = 120
        assert_eq!(tlvs[2].value(), &[0x00, 0x78]);
        assert!(tlvs.iter().all(|t| t.validate().is_ok()));
    }

    #[test]
    fn test_ttl_caps_at_u16_max() {
        let mut p = port();
        p.msg_tx_interval = 65_535;
        p.msg_tx_hold = 4;
        let cfg = EngineConfig::default();
        let mut io = SinkIo::new();

        run(&mut p, &cfg, &mut io);
        assert_eq!(p.tx_ttl, 65_535);
    }

    #[test]
    fn test_no_frame_until_ttr_expires() {
        let mut p = port();
        let cfg = EngineConfig::default();
        let mut io = SinkIo::new();

        run(&mut p, &cfg, &mut io);
        assert_eq!(io.sent.len(), 1);

        // interval=30: ticks 2..=30 stay quiet, tick 31 transmits again
        for _ in 0..29 {
            p.tick_timers();
            run(&mut p, &cfg, &mut io);
        }
        assert_eq!(io.sent.len(), 1);

        p.tick_timers();
        run(&mut p, &cfg, &mut io);
        assert_eq!(io.sent.len(), 2);
    }

    #[test]
    fn test_local_change_sends_early_after_tx_delay() {
        let mut p = port();
        let cfg = EngineConfig::default();
        let mut io = SinkIo::new();

        run(&mut p, &cfg, &mut io);
        p.something_changed_local = true;

        // tx_delay = 2 holds the early frame back for two ticks
        p.tick_timers();
        run(&mut p, &cfg, &mut io);
        assert_eq!(io.sent.len(), 1);
        p.tick_timers();
        run(&mut p, &cfg, &mut io);
        assert_eq!(io.sent.len(), 2);
        assert!(!p.something_changed_local);
    }

    #[test]
    fn test_disable_sends_one_shutdown_then_reinitializes() {
        let mut p = port();
        let cfg = EngineConfig::default();
        let mut io = SinkIo::new();

        run(&mut p, &cfg, &mut io);
        assert_eq!(p.tx_state, TxState::Idle);

        p.admin_status = AdminStatus::Disabled;
        p.tick_timers();
        run(&mut p, &cfg, &mut io);
        assert_eq!(p.tx_state, TxState::ShutdownFrame);
        assert_eq!(io.sent.len(), 2);

        // shutdown frame is End-only, padded to the Ethernet minimum
        let shutdown = io.sent.last().unwrap();
        assert_eq!(shutdown.len(), 64);
        let tlvs = decode_payload(shutdown);
        assert_eq!(tlvs.len(), 1);
        assert_eq!(tlvs[0].kind(), TlvKind::EndOfLldpdu);

        // reinit_delay = 2 ticks back to Initialize, no further frames
        p.tick_timers();
        run(&mut p, &cfg, &mut io);
        assert_eq!(p.tx_state, TxState::ShutdownFrame);
        p.tick_timers();
        run(&mut p, &cfg, &mut io);
        assert_eq!(p.tx_state, TxState::Initialize);
        assert_eq!(io.sent.len(), 2);
        // reinitializing zeroes the transmit counter
        assert_eq!(p.stats.frames_out_total, 0);
    }

    #[test]
    fn test_link_down_reinitializes_without_shutdown_frame() {
        let mut p = port();
        let cfg = EngineConfig::default();
        let mut io = SinkIo::new();

        run(&mut p, &cfg, &mut io);
        assert_eq!(io.sent.len(), 1);

        p.port_enabled = false;
        run(&mut p, &cfg, &mut io);
        assert_eq!(p.tx_state, TxState::Initialize);
        assert_eq!(io.sent.len(), 1);

        // link back up: full restart, fresh advertisement
        p.port_enabled = true;
        run(&mut p, &cfg, &mut io);
        assert_eq!(p.tx_state, TxState::Idle);
        assert_eq!(io.sent.len(), 2);
    }

    #[test]
    fn test_rx_only_port_never_transmits() {
        let mut p = port();
        p.admin_status = AdminStatus::RxOnly;
        let cfg = EngineConfig::default();
        let mut io = SinkIo::new();

        for _ in 0..40 {
            p.tick_timers();
            run(&mut p, &cfg, &mut io);
        }
        assert_eq!(p.tx_state, TxState::Initialize);
        assert!(io.sent.is_empty());
    }

    #[test]
    fn test_med_location_appended_when_configured() {
        use lldpr_core::MedLocation;
        let mut p = port();
        let mut cfg = EngineConfig::default();
        cfg.med_location = Some(MedLocation::Elin("5551234".into()));
        let mut io = SinkIo::new();

        run(&mut p, &cfg, &mut io);
        let tlvs = decode_payload(&io.sent[0]);
        assert!(tlvs.iter().any(med::is_med_location));
    }
}
