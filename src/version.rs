//! QUIC version constants: salts, HKDF labels, and Retry integrity keys.
//!
//! Only the two versions with distinct wire identifiers are modeled:
//! v1 (RFC 9001) and v2 (RFC 9369). The version selects the fixed
//! constants used by the key schedule and Retry integrity; the packet
//! protection algorithms themselves are identical.

/// QUIC v1 version number (RFC 9000).
pub const QUIC_VERSION_1: u32 = 0x0000_0001;

/// QUIC v2 version number (RFC 9369).
pub const QUIC_VERSION_2: u32 = 0x6b33_43cf;

/// QUIC v1 Initial salt (RFC 9001 section 5.2).
const INITIAL_SALT_V1: [u8; 20] = [
    0x38, 0x76, 0x2c, 0xf7, 0xf5, 0x59, 0x34, 0xb3, 0x4d, 0x17, 0x9a, 0xe6, 0xa4, 0xc8, 0x0c,
    0xad, 0xcc, 0xbb, 0x7f, 0x0a,
];

/// QUIC v2 Initial salt (RFC 9369 section 3.3.1).
const INITIAL_SALT_V2: [u8; 20] = [
    0x0d, 0xed, 0xe3, 0xde, 0xf7, 0x00, 0xa6, 0xdb, 0x81, 0x93, 0x81, 0xbe, 0x6e, 0x26, 0x9d,
    0xcb, 0xf9, 0xbd, 0x2e, 0xd9,
];

/// Retry integrity key, v1 (RFC 9001 section 5.8).
const RETRY_KEY_V1: [u8; 16] = [
    0xbe, 0x0c, 0x69, 0x0b, 0x9f, 0x66, 0x57, 0x5a, 0x1d, 0x76, 0x6b, 0x54, 0xe3, 0x68, 0xc8,
    0x4e,
];

/// Retry integrity nonce, v1 (RFC 9001 section 5.8).
const RETRY_NONCE_V1: [u8; 12] = [
    0x46, 0x15, 0x99, 0xd3, 0x5d, 0x63, 0x2b, 0xf2, 0x23, 0x98, 0x25, 0xbb,
];

/// Retry integrity key, v2 (RFC 9369 section 3.3.3).
const RETRY_KEY_V2: [u8; 16] = [
    0x8f, 0xb4, 0xb0, 0x1b, 0x56, 0xac, 0x48, 0xe2, 0x60, 0xfb, 0xcb, 0xce, 0xad, 0x7c, 0xcc,
    0x92,
];

/// Retry integrity nonce, v2 (RFC 9369 section 3.3.3).
const RETRY_NONCE_V2: [u8; 12] = [
    0xd8, 0x69, 0x69, 0xbc, 0x2d, 0x7c, 0x6d, 0x99, 0x90, 0xef, 0xb0, 0x4a,
];

/// A QUIC version with wire compatibility constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    V1,
    V2,
}

impl Version {
    /// Map a wire version field to a supported version.
    pub fn from_wire(version: u32) -> Option<Version> {
        match version {
            QUIC_VERSION_1 => Some(Version::V1),
            QUIC_VERSION_2 => Some(Version::V2),
            _ => None,
        }
    }

    /// The 4-byte wire identifier.
    pub const fn wire(self) -> u32 {
        match self {
            Version::V1 => QUIC_VERSION_1,
            Version::V2 => QUIC_VERSION_2,
        }
    }

    pub(crate) const fn initial_salt(self) -> &'static [u8; 20] {
        match self {
            Version::V1 => &INITIAL_SALT_V1,
            Version::V2 => &INITIAL_SALT_V2,
        }
    }

    pub(crate) const fn key_label(self) -> &'static [u8] {
        match self {
            Version::V1 => b"quic key",
            Version::V2 => b"quicv2 key",
        }
    }

    pub(crate) const fn iv_label(self) -> &'static [u8] {
        match self {
            Version::V1 => b"quic iv",
            Version::V2 => b"quicv2 iv",
        }
    }

    pub(crate) const fn hp_label(self) -> &'static [u8] {
        match self {
            Version::V1 => b"quic hp",
            Version::V2 => b"quicv2 hp",
        }
    }

    pub(crate) const fn ku_label(self) -> &'static [u8] {
        match self {
            Version::V1 => b"quic ku",
            Version::V2 => b"quicv2 ku",
        }
    }

    pub(crate) const fn retry_key(self) -> &'static [u8; 16] {
        match self {
            Version::V1 => &RETRY_KEY_V1,
            Version::V2 => &RETRY_KEY_V2,
        }
    }

    pub(crate) const fn retry_nonce(self) -> &'static [u8; 12] {
        match self {
            Version::V1 => &RETRY_NONCE_V1,
            Version::V2 => &RETRY_NONCE_V2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_roundtrip() {
        assert_eq!(Version::from_wire(0x0000_0001), Some(Version::V1));
        assert_eq!(Version::from_wire(0x6b33_43cf), Some(Version::V2));
        assert_eq!(Version::V1.wire(), QUIC_VERSION_1);
        assert_eq!(Version::V2.wire(), QUIC_VERSION_2);
    }

    #[test]
    fn unknown_versions_rejected() {
        // Version Negotiation and draft versions are not supported.
        assert_eq!(Version::from_wire(0), None);
        assert_eq!(Version::from_wire(0xff00_001d), None);
    }

    #[test]
    fn v2_labels_differ() {
        assert_eq!(Version::V1.key_label(), b"quic key");
        assert_eq!(Version::V2.key_label(), b"quicv2 key");
        assert_ne!(Version::V1.initial_salt(), Version::V2.initial_salt());
        assert_ne!(Version::V1.retry_key(), Version::V2.retry_key());
    }
}
