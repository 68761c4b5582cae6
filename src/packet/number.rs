//! QUIC packet number encoding and decoding (RFC 9000 section 17.1, A.2, A.3).

use crate::error::Error;

/// Largest valid QUIC packet number (2^62 - 1).
pub const MAX_PACKET_NUMBER: u64 = (1u64 << 62) - 1;

/// A full (un-truncated) packet number, or the "not yet decoded"
/// sentinel.
///
/// [`PacketNumber::INFINITY`] marks a packet whose header has not been
/// unprotected yet. It compares greater than every real packet number
/// and is never produced by decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PacketNumber(u64);

impl PacketNumber {
    /// Sentinel: no packet number decoded yet.
    pub const INFINITY: PacketNumber = PacketNumber(u64::MAX);

    pub(crate) const fn new(value: u64) -> PacketNumber {
        PacketNumber(value)
    }

    /// Whether this holds a real decoded packet number.
    pub fn is_decoded(&self) -> bool {
        self.0 != u64::MAX
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Determine how many bytes are needed to encode `full_pn` given the
/// largest packet number the peer has acknowledged.
///
/// Chooses the smallest encoding whose window covers at least twice
/// the unacknowledged range, per RFC 9000 section A.2.
pub fn pn_length(full_pn: u64, largest_acked: u64) -> usize {
    let num_unacked = if full_pn > largest_acked {
        full_pn - largest_acked
    } else {
        1
    };
    if num_unacked < (1 << 7) {
        1
    } else if num_unacked < (1 << 15) {
        2
    } else if num_unacked < (1 << 23) {
        3
    } else {
        4
    }
}

/// Encode a packet number using minimal bytes.
///
/// Writes the truncated packet number to `buf` in big-endian order and
/// returns the number of bytes written (1-4).
pub fn encode_pn(full_pn: u64, largest_acked: u64, buf: &mut [u8]) -> Result<usize, Error> {
    let len = pn_length(full_pn, largest_acked);
    if buf.len() < len {
        return Err(Error::BufferTooSmall { needed: len });
    }
    let pn_bytes = full_pn.to_be_bytes();
    buf[..len].copy_from_slice(&pn_bytes[8 - len..]);
    Ok(len)
}

/// Decode a truncated packet number against the largest packet number
/// successfully processed in the same space (RFC 9000 section A.3).
///
/// The result is the candidate closest to `largest_pn + 1`, corrected
/// by one window in either direction when the candidate falls outside
/// the expected half-window, with the upward correction capped so it
/// never leaves the valid `0..2^62` range. Anchors past the range are
/// clamped. Total: never fails.
pub fn decode_pn(truncated_pn: u32, pn_len: usize, largest_pn: u64) -> u64 {
    let pn_nbits = (pn_len as u64) * 8;
    let pn_win = 1u64 << pn_nbits;
    let pn_hwin = pn_win / 2;
    let pn_mask = pn_win - 1;

    // Anchors past the valid range (such as the INFINITY sentinel)
    // would overflow the expected-value arithmetic; clamp them.
    let expected_pn = largest_pn.min(MAX_PACKET_NUMBER) + 1;

    // Replace the lower bits of the expected value with the wire bits.
    let candidate_pn = (expected_pn & !pn_mask) | (truncated_pn as u64);

    if candidate_pn + pn_hwin <= expected_pn && candidate_pn + pn_win < (1u64 << 62) {
        candidate_pn + pn_win
    } else if candidate_pn > expected_pn + pn_hwin && candidate_pn >= pn_win {
        candidate_pn - pn_win
    } else {
        candidate_pn
    }
}

/// QUIC packet number spaces (RFC 9000 section 12.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketNumberSpace {
    Initial,
    Handshake,
    ApplicationData,
}

impl PacketNumberSpace {
    const fn index(self) -> usize {
        match self {
            PacketNumberSpace::Initial => 0,
            PacketNumberSpace::Handshake => 1,
            PacketNumberSpace::ApplicationData => 2,
        }
    }
}

/// Per-space largest-received tracker: the anchor store for packet
/// number decoding. Decoding itself still takes a plain `largest_pn`,
/// so callers with their own loss-recovery state can bypass this.
#[derive(Debug, Default, Clone)]
pub struct PacketNumberSpaces {
    largest: [Option<u64>; 3],
}

impl PacketNumberSpaces {
    pub const fn new() -> PacketNumberSpaces {
        PacketNumberSpaces {
            largest: [None; 3],
        }
    }

    /// Largest packet number recorded in a space, if any.
    pub fn largest(&self, space: PacketNumberSpace) -> Option<u64> {
        self.largest[space.index()]
    }

    /// The `largest_pn` input for [`decode_pn`] in a space. Before any
    /// packet has been recorded the expected packet number is 0.
    pub fn decode_anchor(&self, space: PacketNumberSpace) -> u64 {
        self.largest[space.index()].unwrap_or(0)
    }

    /// Record a successfully processed packet number.
    pub fn record(&mut self, space: PacketNumberSpace, pn: u64) {
        let slot = &mut self.largest[space.index()];
        match slot {
            Some(largest) if *largest >= pn => {}
            _ => *slot = Some(pn),
        }
    }
}
