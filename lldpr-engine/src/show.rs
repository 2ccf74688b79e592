//! Read-only neighbor rendering
//!
//! Walks ports -> MSAP entries -> decoded TLVs and produces the text shown
//! by the CLI. Nothing here mutates engine state.

use crate::engine::Engine;
use crate::port::PortContext;
use lldpr_core::capabilities;
use lldpr_packet::subtypes::{decode_chassis_id, decode_port_id};
use lldpr_packet::{med, ManagementAddress, Tlv, TlvKind};
use std::fmt::Write;

/// Render every port's neighbor table
pub fn format_neighbors(engine: &Engine) -> String {
    let mut out = String::new();
    for port in engine.ports() {
        format_port(&mut out, port);
    }
    if out.is_empty() {
        out.push_str("no neighbors\n");
    }
    out
}

fn format_port(out: &mut String, port: &PortContext) {
    for entry in port.cache.snapshot() {
        let _ = writeln!(out, "interface: {}", port.name);
        for tlv in entry.tlvs() {
            format_tlv(out, tlv);
        }
        let _ = writeln!(out, "  ttl remaining: {}s", entry.ttl().max(0));
        out.push('\n');
    }
}

fn format_tlv(out: &mut String, tlv: &Tlv) {
    match tlv.kind() {
        TlvKind::ChassisId => {
            let _ = writeln!(out, "  chassis id: {}", decode_chassis_id(tlv.value()));
        }
        TlvKind::PortId => {
            let _ = writeln!(out, "  port id: {}", decode_port_id(tlv.value()));
        }
        TlvKind::PortDescription => {
            let _ = writeln!(out, "  port descr: {}", String::from_utf8_lossy(tlv.value()));
        }
        TlvKind::SystemName => {
            let _ = writeln!(out, "  system name: {}", String::from_utf8_lossy(tlv.value()));
        }
        TlvKind::SystemDescription => {
            let _ = writeln!(out, "  system descr: {}", String::from_utf8_lossy(tlv.value()));
        }
        TlvKind::SystemCapabilities => {
            if let [c0, c1, e0, e1] = tlv.value() {
                let _ = writeln!(
                    out,
                    "  capabilities: {} (enabled: {})",
                    capability_names(u16::from_be_bytes([*c0, *c1])),
                    capability_names(u16::from_be_bytes([*e0, *e1])),
                );
            }
        }
        TlvKind::ManagementAddress => {
            if let Ok(addr) = ManagementAddress::decode(tlv.value()) {
                let _ = writeln!(out, "  mgmt address: {}", addr);
            }
        }
        TlvKind::OrganizationallySpecific if med::is_med_location(tlv) => {
            if let Ok(location) = med::decode_location(&tlv.value()[4..]) {
                let _ = writeln!(out, "  med location: {:?}", location);
            }
        }
        TlvKind::OrganizationallySpecific => {
            let _ = writeln!(
                out,
                "  org tlv: oui {} subtype {} ({} bytes)",
                hex::encode(&tlv.value()[..3.min(tlv.value().len())]),
                tlv.value().get(3).copied().unwrap_or(0),
                tlv.value().len().saturating_sub(4),
            );
        }
        TlvKind::EndOfLldpdu | TlvKind::Ttl | TlvKind::Reserved(_) => {}
    }
}

/// Render a capability bitmap as comma-separated names
pub fn capability_names(bits: u16) -> String {
    const NAMES: [(u16, &str); 8] = [
        (capabilities::OTHER, "other"),
        (capabilities::REPEATER, "repeater"),
        (capabilities::BRIDGE, "bridge"),
        (capabilities::WLAN_ACCESS_POINT, "wlan-ap"),
        (capabilities::ROUTER, "router"),
        (capabilities::TELEPHONE, "telephone"),
        (capabilities::DOCSIS, "docsis"),
        (capabilities::STATION_ONLY, "station"),
    ];

    let names: Vec<&str> = NAMES
        .iter()
        .filter(|(bit, _)| bits & bit != 0)
        .map(|(_, name)| *name)
        .collect();
    if names.is_empty() {
        String::from("none")
    } else {
        names.join(", ")
    }
}
