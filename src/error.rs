//! Error taxonomy for packet protection.
//!
//! Every error here is local to a single packet. The propagation policy
//! is: drop the packet, report upward for logging, and never tear down
//! the connection from this layer. Whether repeated failures amount to a
//! protocol violation is the connection state machine's call.

/// Maximum bytes of a cipher-suite name retained for diagnostics.
const SUITE_NAME_CAP: usize = 32;

/// Which header-protection mask path failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskPath {
    /// AES-ECB mask generation (AES-GCM suites).
    Aes,
    /// ChaCha20 mask generation (ChaCha20-Poly1305 suite).
    ChaCha,
}

/// Packet protection error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Buffer too short or regions do not line up — truncated datagram
    /// or caller bug.
    PacketFormat { need: usize, have: usize },
    /// Cipher suite name not recognized (or compiled out). Carries a
    /// bounded copy of the textual identifier.
    UnsupportedCipherSuite(heapless::String<SUITE_NAME_CAP>),
    /// Header-protection mask generation failed, tagged with the path.
    MaskGeneration(MaskPath),
    /// Packet number decoding produced an out-of-range value. The RFC
    /// 9000 A.3 algorithm always yields a value, so this is defensive.
    PacketNumberDecode,
    /// AEAD seal failed; the packet must not be transmitted.
    AeadSeal,
    /// AEAD open failed. Deliberately opaque: no distinction between a
    /// wrong key and tampered data, to avoid oracle leakage.
    AeadOpen,
    /// `decrypt_payload` was called before `decrypt_header` — an
    /// ordering bug in the caller, not a network condition.
    HeaderNotDecrypted,
    /// HKDF-Expand-Label input out of range (label > 249 bytes or
    /// output > 65535 bytes).
    HkdfLabel,
    /// Caller-provided buffer too small.
    BufferTooSmall { needed: usize },
    /// Key, IV, or secret length does not match the cipher suite.
    InvalidKeyLength { expected: usize, have: usize },
}

impl Error {
    /// Build an `UnsupportedCipherSuite` error, truncating the name to
    /// the diagnostic capacity.
    pub(crate) fn unsupported_suite(name: &str) -> Self {
        let mut copy = heapless::String::new();
        for c in name.chars() {
            if copy.push(c).is_err() {
                break;
            }
        }
        Error::UnsupportedCipherSuite(copy)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::PacketFormat { need, have } => {
                write!(f, "malformed packet: need {need} bytes, have {have}")
            }
            Error::UnsupportedCipherSuite(name) => {
                write!(f, "unknown cipher suite: {name}")
            }
            Error::MaskGeneration(MaskPath::Aes) => {
                write!(f, "header mask generation failed (AES path)")
            }
            Error::MaskGeneration(MaskPath::ChaCha) => {
                write!(f, "header mask generation failed (ChaCha path)")
            }
            Error::PacketNumberDecode => write!(f, "packet number decode failed"),
            Error::AeadSeal => write!(f, "AEAD seal failed"),
            Error::AeadOpen => write!(f, "AEAD open failed"),
            Error::HeaderNotDecrypted => {
                write!(f, "payload decryption attempted before header decryption")
            }
            Error::HkdfLabel => write!(f, "HKDF label or output length out of range"),
            Error::BufferTooSmall { needed } => {
                write!(f, "buffer too small, need {needed} bytes")
            }
            Error::InvalidKeyLength { expected, have } => {
                write!(f, "invalid key length: expected {expected} bytes, have {have}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
