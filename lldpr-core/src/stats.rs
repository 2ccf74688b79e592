//! Per-port statistics counters
//!
//! Counter names follow the IEEE 802.1AB statistics group. All frame and
//! TLV level errors are non-fatal: they land here and in the log, never in
//! a `Result`.

/// Statistics for one port
#[derive(Debug, Clone, Default)]
pub struct PortStats {
    /// Well-formed LLDPDUs received
    pub frames_in_total: u64,
    /// LLDPDUs transmitted
    pub frames_out_total: u64,
    /// Received frames discarded for ordering or header problems
    pub frames_discarded_total: u64,
    /// Received frames carrying at least one detectable error
    pub frames_in_errors_total: u64,
    /// TLVs dropped by the per-type validators
    pub tlvs_discarded_total: u64,
    /// Neighbor entries removed by TTL aging
    pub ageouts_total: u64,
}

impl PortStats {
    /// Reset all counters to zero
    pub fn reset(&mut self) {
        *self = PortStats::default();
    }
}
