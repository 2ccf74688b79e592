//! LLDP receive state machine - IEEE 802.1AB 10.5.5.3
//!
//! Frame and TLV errors on this path are deliberately non-fatal: they bump
//! counters and the `bad_frame` tally but parsing runs to completion, so a
//! neighbor with one malformed optional TLV is still learned.

use crate::port::PortContext;
use lldpr_packet::{med, unpack_header, Tlv, TlvKind};
use lldpr_core::{LLDP_ETHERTYPE, LLDP_MULTICAST_MAC};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Bound on state transitions per machine run
const MAX_TRANSITIONS: usize = 8;

/// Receive machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxState {
    WaitPortOperational,
    DeleteAgedInfo,
    Initialize,
    WaitForFrame,
    Frame,
    DeleteInfo,
    UpdateInfo,
}

/// Frame-level receive errors. Logged and counted, never propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("destination is not the LLDP multicast address")]
    WrongDestination,

    #[error("EtherType is not 0x88CC")]
    WrongEtherType,

    #[error("frame truncated inside a TLV")]
    Truncated,

    #[error("TLV at position {position} has type {found}, expected {position}")]
    TlvOrderViolation { position: usize, found: u8 },

    #[error("TLV type {0} has an invalid length")]
    TlvLengthInvalid(u8),

    #[error("frame carries no usable Chassis ID + Port ID pair")]
    MissingMsapTlvs,
}

/// Run the receive machine for one port until it is quiescent
pub fn run(port: &mut PortContext) {
    for _ in 0..MAX_TRANSITIONS {
        // global override, checked before the per-state switch
        if port.rx_info_age && !port.port_enabled && port.rx_state != RxState::WaitPortOperational
        {
            trace!(port = %port.name, "rx override -> WaitPortOperational");
            port.rx_state = RxState::WaitPortOperational;
            continue;
        }

        let next = match port.rx_state {
            RxState::WaitPortOperational => {
                if port.rx_info_age {
                    Some(RxState::DeleteAgedInfo)
                } else if port.port_enabled {
                    Some(RxState::Initialize)
                } else {
                    None
                }
            }
            RxState::DeleteAgedInfo => Some(RxState::WaitPortOperational),
            RxState::Initialize => {
                if port.admin_status.can_rx() {
                    Some(RxState::WaitForFrame)
                } else {
                    None
                }
            }
            RxState::WaitForFrame => {
                if port.rx_info_age {
                    Some(RxState::DeleteInfo)
                } else if port.rcv_frame {
                    Some(RxState::Frame)
                } else {
                    None
                }
            }
            RxState::DeleteInfo => Some(RxState::WaitForFrame),
            RxState::Frame => {
                if port.rx_ttl == 0 {
                    Some(RxState::DeleteInfo)
                } else if port.rx_changes {
                    Some(RxState::UpdateInfo)
                } else {
                    Some(RxState::WaitForFrame)
                }
            }
            RxState::UpdateInfo => Some(RxState::WaitForFrame),
        };

        match next {
            Some(state) => {
                trace!(port = %port.name, ?state, "rx transition");
                port.rx_state = state;
                enter(port);
            }
            None => break,
        }
    }
}

/// State entry actions
fn enter(port: &mut PortContext) {
    match port.rx_state {
        RxState::WaitPortOperational => {}
        RxState::Initialize => {
            port.rcv_frame = false;
            port.too_many_neighbors = false;
            port.rx_info_age = false;
            port.cache.purge_expired();
        }
        RxState::WaitForFrame => {
            port.bad_frame = 0;
            port.rx_info_age = false;
            port.something_changed_remote = false;
        }
        RxState::Frame => {
            port.rx_changes = false;
            port.rcv_frame = false;
            if let Some(frame) = port.frame_buf.take() {
                let bad = process_frame(port, &frame);
                port.bad_frame += bad;
                if bad > 0 {
                    debug!(port = %port.name, bad, "frame processed with errors");
                }
            }
        }
        RxState::DeleteInfo | RxState::DeleteAgedInfo => {
            port.cache.purge_expired();
            port.something_changed_remote = true;
            // cleared here as well as on WaitForFrame entry so the
            // unconditional return arc cannot spin
            port.rx_info_age = false;
        }
        RxState::UpdateInfo => {
            port.something_changed_remote = true;
        }
    }
}

/// Parse one raw frame and update the port's MSAP cache.
///
/// Returns the number of `bad_frame` increments. The count is
/// statistics-only; nothing on this path aborts the port.
pub fn process_frame(port: &mut PortContext, frame: &[u8]) -> u32 {
    let mut bad = 0u32;

    if frame.len() < 14 {
        warn!(port = %port.name, len = frame.len(), "runt frame");
        port.stats.frames_in_errors_total += 1;
        return 1;
    }

    // header checks are lenient: count, log, keep parsing
    if frame[0..6] != LLDP_MULTICAST_MAC {
        debug!(port = %port.name, error = %FrameError::WrongDestination, "header check");
        bad += 1;
    }
    if u16::from_be_bytes([frame[12], frame[13]]) != LLDP_ETHERTYPE {
        debug!(port = %port.name, error = %FrameError::WrongEtherType, "header check");
        bad += 1;
    }
    if bad == 0 {
        port.stats.frames_in_total += 1;
    }

    let mut offset = 14usize;
    let mut position = 0usize;
    let mut order_violated = false;
    let mut tlvs: Vec<Tlv> = Vec::new();
    let mut chassis: Option<Tlv> = None;
    let mut msap_key: Option<Vec<u8>> = None;

    loop {
        if offset + 2 > frame.len() {
            debug!(port = %port.name, error = %FrameError::Truncated, offset, "tlv walk aborted");
            bad += 1;
            break;
        }
        position += 1;

        let (raw_type, length) = unpack_header([frame[offset], frame[offset + 1]]);

        // the first three TLVs must be Chassis ID, Port ID, TTL in order
        if position <= 3 && raw_type as usize != position && !order_violated {
            debug!(
                port = %port.name,
                error = %FrameError::TlvOrderViolation { position, found: raw_type },
                "mandatory TLV order"
            );
            port.stats.frames_discarded_total += 1;
            port.stats.frames_in_errors_total += 1;
            order_violated = true;
            bad += 1;
        }

        let end = offset + 2 + length as usize;
        if end > frame.len() {
            debug!(port = %port.name, error = %FrameError::Truncated, offset, "tlv walk aborted");
            bad += 1;
            break;
        }

        let kind = TlvKind::from_u8(raw_type);
        let value = frame[offset + 2..end].to_vec();

        if kind == TlvKind::Ttl && length == 2 {
            port.rx_ttl = u16::from_be_bytes([value[0], value[1]]);
        }

        let tlv = match Tlv::new(kind, value) {
            Ok(tlv) => tlv,
            // unreachable with a 9-bit length, kept for completeness
            Err(e) => {
                debug!(port = %port.name, error = %e, "tlv rejected");
                bad += 1;
                offset = end;
                continue;
            }
        };

        if let Err(e) = tlv.validate() {
            debug!(
                port = %port.name,
                error = %FrameError::TlvLengthInvalid(raw_type),
                detail = %e,
                "tlv validation"
            );
            port.stats.tlvs_discarded_total += 1;
            bad += 1;
        }

        match kind {
            TlvKind::ChassisId => {
                chassis = Some(tlv.clone());
            }
            TlvKind::PortId => {
                if let Some(chassis) = &chassis {
                    // MSAP key strips the subtype byte from both halves
                    if chassis.value().len() > 1 && tlv.value().len() > 1 {
                        let mut key = chassis.value()[1..].to_vec();
                        key.extend_from_slice(&tlv.value()[1..]);
                        msap_key = Some(key);
                    }
                }
            }
            TlvKind::OrganizationallySpecific if med::is_med_location(&tlv) => {
                match med::decode_location(&tlv.value()[4..]) {
                    Ok(location) => {
                        debug!(port = %port.name, ?location, "neighbor advertises MED location")
                    }
                    Err(e) => debug!(port = %port.name, error = %e, "bad MED location payload"),
                }
            }
            _ => {}
        }

        let is_end = kind == TlvKind::EndOfLldpdu;
        tlvs.push(tlv);
        offset = end;
        if is_end {
            break;
        }
    }

    match msap_key {
        Some(key) => {
            let inserted = port
                .cache
                .lookup_or_replace(key, tlvs, port.rx_ttl as i32);
            port.rx_changes = true;
            debug!(
                port = %port.name,
                inserted,
                neighbors = port.cache.len(),
                ttl = port.rx_ttl,
                "neighbor cache updated"
            );
        }
        None => {
            debug!(port = %port.name, error = %FrameError::MissingMsapTlvs, "cache not updated");
        }
    }

    bad
}
