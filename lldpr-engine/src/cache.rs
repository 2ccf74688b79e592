//! MSAP neighbor cache
//!
//! One cache per port, keyed by the MSAP identifier: the Chassis ID value
//! with its subtype byte stripped, concatenated with the Port ID value with
//! its subtype byte stripped. The remaining lifetime is a plain integer on
//! the entry, never a reference into the stored TLV list.

use lldpr_packet::Tlv;
use std::collections::HashMap;

/// One cached neighbor
#[derive(Debug, Clone)]
pub struct MsapEntry {
    key: Vec<u8>,
    tlvs: Vec<Tlv>,
    rx_info_ttl: i32,
}

impl MsapEntry {
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// TLV set from the most recent frame for this neighbor
    pub fn tlvs(&self) -> &[Tlv] {
        &self.tlvs
    }

    /// Seconds of validity left
    pub fn ttl(&self) -> i32 {
        self.rx_info_ttl
    }
}

/// Per-port neighbor store with TTL aging
#[derive(Debug, Default)]
pub struct MsapCache {
    entries: HashMap<Vec<u8>, MsapEntry>,
}

impl MsapCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or wholesale-replace the entry for `key`.
    ///
    /// On a hit the previous TLV list is discarded. Returns true when a new
    /// entry was created.
    pub fn lookup_or_replace(&mut self, key: Vec<u8>, tlvs: Vec<Tlv>, ttl: i32) -> bool {
        match self.entries.get_mut(&key) {
            Some(entry) => {
                entry.tlvs = tlvs;
                entry.rx_info_ttl = ttl;
                false
            }
            None => {
                self.entries.insert(
                    key.clone(),
                    MsapEntry {
                        key,
                        tlvs,
                        rx_info_ttl: ttl,
                    },
                );
                true
            }
        }
    }

    /// Fetch an entry by exact key
    pub fn get(&self, key: &[u8]) -> Option<&MsapEntry> {
        self.entries.get(key)
    }

    /// One aging step: decrement every TTL, drop entries that fall below
    /// zero. An entry inserted with TTL n survives n+1 calls. Returns the
    /// number of entries removed.
    pub fn age(&mut self) -> usize {
        let before = self.entries.len();
        for entry in self.entries.values_mut() {
            entry.rx_info_ttl -= 1;
        }
        self.entries.retain(|_, entry| entry.rx_info_ttl >= 0);
        before - self.entries.len()
    }

    /// Remove already-expired entries without decrementing. Used by the RX
    /// machine's delete states.
    pub fn purge_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.rx_info_ttl >= 0);
        before - self.entries.len()
    }

    /// Read-only enumeration for the neighbor formatter
    pub fn snapshot(&self) -> impl Iterator<Item = &MsapEntry> {
        self.entries.values()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
