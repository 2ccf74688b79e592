//! LLDP-MED Location Identification TLV (ANSI/TIA-1057)
//!
//! Organizationally-specific TLV with OUI 00-12-BB, subtype 3. Three
//! location formats are supported: coordinate-based (an opaque 16-byte geo
//! blob), civic address, and ELIN. Construction is pure over a
//! [`MedLocation`]; the decoder is used read-only on the RX path.

use crate::tlv::{Tlv, TlvError, TlvKind};
use lldpr_core::{CivicEntry, MedLocation};

/// TIA OUI used by all LLDP-MED TLVs
pub const MED_OUI: [u8; 3] = [0x00, 0x12, 0xBB];

/// LLDP-MED subtype for Location Identification
pub const LOCATION_SUBTYPE: u8 = 3;

/// Location data format selectors
pub mod location_format {
    pub const COORDINATE: u8 = 1;
    pub const CIVIC_ADDRESS: u8 = 2;
    pub const ELIN: u8 = 3;
}

/// Length of the coordinate-based LCI blob
pub const COORDINATE_LEN: usize = 16;

/// Build the full organizationally-specific Location TLV
pub fn location_tlv(location: &MedLocation) -> Result<Tlv, TlvError> {
    Tlv::organizationally_specific(MED_OUI, LOCATION_SUBTYPE, &encode_location(location))
}

/// True when `tlv` is an LLDP-MED Location Identification TLV
pub fn is_med_location(tlv: &Tlv) -> bool {
    tlv.kind() == TlvKind::OrganizationallySpecific
        && tlv.value().len() >= 4
        && tlv.value()[0..3] == MED_OUI
        && tlv.value()[3] == LOCATION_SUBTYPE
}

/// Serialize the location payload (format byte + location id data)
pub fn encode_location(location: &MedLocation) -> Vec<u8> {
    match location {
        MedLocation::Coordinate(blob) => {
            let mut data = Vec::with_capacity(1 + COORDINATE_LEN);
            data.push(location_format::COORDINATE);
            data.extend_from_slice(blob);
            data
        }
        MedLocation::CivicAddress {
            what,
            country_code,
            entries,
        } => {
            let mut data = vec![location_format::CIVIC_ADDRESS, *what];
            data.extend_from_slice(country_code);
            for entry in entries {
                let value = entry.value.as_bytes();
                let len = value.len().min(255);
                data.push(entry.ca_type);
                data.push(len as u8);
                data.extend_from_slice(&value[..len]);
            }
            data
        }
        MedLocation::Elin(number) => {
            let mut data = Vec::with_capacity(1 + number.len());
            data.push(location_format::ELIN);
            data.extend_from_slice(number.as_bytes());
            data
        }
    }
}

/// Parse a location payload (the bytes after OUI and subtype)
pub fn decode_location(data: &[u8]) -> Result<MedLocation, TlvError> {
    let Some((&format, body)) = data.split_first() else {
        return Err(TlvError::Truncated);
    };

    match format {
        location_format::COORDINATE => {
            if body.len() != COORDINATE_LEN {
                return Err(TlvError::LengthInvalid {
                    kind: TlvKind::OrganizationallySpecific,
                    len: body.len(),
                });
            }
            let mut blob = [0u8; COORDINATE_LEN];
            blob.copy_from_slice(body);
            Ok(MedLocation::Coordinate(blob))
        }
        location_format::CIVIC_ADDRESS => {
            if body.len() < 3 {
                return Err(TlvError::Truncated);
            }
            let what = body[0];
            let country_code = [body[1], body[2]];

            let mut entries = Vec::new();
            let mut rest = &body[3..];
            while !rest.is_empty() {
                if rest.len() < 2 {
                    return Err(TlvError::Truncated);
                }
                let ca_type = rest[0];
                let ca_len = rest[1] as usize;
                if 2 + ca_len > rest.len() {
                    return Err(TlvError::Truncated);
                }
                entries.push(CivicEntry {
                    ca_type,
                    value: String::from_utf8_lossy(&rest[2..2 + ca_len]).into_owned(),
                });
                rest = &rest[2 + ca_len..];
            }

            Ok(MedLocation::CivicAddress {
                what,
                country_code,
                entries,
            })
        }
        location_format::ELIN => Ok(MedLocation::Elin(
            String::from_utf8_lossy(body).into_owned(),
        )),
        _ => Err(TlvError::LengthInvalid {
            kind: TlvKind::OrganizationallySpecific,
            len: data.len(),
        }),
    }
}
