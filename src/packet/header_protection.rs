//! Header protection mask application (RFC 9001 section 5.4.1).
//!
//! Mask generation lives in [`crate::crypto`]; this module only knows
//! which header bits the 5-byte mask may touch. Long headers expose
//! the low 4 bits of the first byte, short headers the low 5 (the
//! key-phase bit is protected, the spin bit is not); the form and
//! fixed bits are never masked.

/// First-byte mask bits for long-header packets.
pub const LONG_FIRST_BYTE_MASK: u8 = 0x0f;

/// First-byte mask bits for short-header packets.
pub const SHORT_FIRST_BYTE_MASK: u8 = 0x1f;

/// The form bit (always unprotected) selects which first-byte bits
/// the mask applies to.
pub fn first_byte_mask_bits(first_byte: u8) -> u8 {
    if first_byte & 0x80 != 0 {
        LONG_FIRST_BYTE_MASK
    } else {
        SHORT_FIRST_BYTE_MASK
    }
}

/// XOR the permitted bits of `mask[0]` into the first byte.
/// Symmetric: applying twice restores the original.
pub fn apply_first_byte_mask(first_byte: &mut u8, mask: &[u8; 5]) {
    *first_byte ^= mask[0] & first_byte_mask_bits(*first_byte);
}

/// XOR `mask[1..]` over the packet number field (1-4 bytes).
pub fn apply_pn_mask(pn_bytes: &mut [u8], mask: &[u8; 5]) {
    debug_assert!(pn_bytes.len() <= 4);
    for (byte, m) in pn_bytes.iter_mut().zip(&mask[1..]) {
        *byte ^= m;
    }
}
