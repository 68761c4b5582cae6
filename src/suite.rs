//! Negotiated AEAD cipher suite parameters.

use crate::error::Error;

/// TLS 1.3 cipher suites usable for QUIC packet protection.
///
/// The suite fixes every length the key schedule and packet ciphers
/// need; no other per-suite state exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherSuite {
    Aes128GcmSha256,
    Aes256GcmSha384,
    #[cfg(feature = "chacha")]
    ChaCha20Poly1305Sha256,
}

/// The suite fixed for the Initial encryption level (RFC 9001 section 5.2).
pub const INITIAL_SUITE: CipherSuite = CipherSuite::Aes128GcmSha256;

impl CipherSuite {
    /// AEAD key length in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            CipherSuite::Aes128GcmSha256 => 16,
            CipherSuite::Aes256GcmSha384 => 32,
            #[cfg(feature = "chacha")]
            CipherSuite::ChaCha20Poly1305Sha256 => 32,
        }
    }

    /// Header protection key length in bytes.
    pub const fn hp_key_len(self) -> usize {
        match self {
            CipherSuite::Aes128GcmSha256 => 16,
            CipherSuite::Aes256GcmSha384 => 32,
            #[cfg(feature = "chacha")]
            CipherSuite::ChaCha20Poly1305Sha256 => 32,
        }
    }

    /// Output length of the suite's hash, and so of its traffic secrets.
    pub const fn hash_len(self) -> usize {
        match self {
            CipherSuite::Aes128GcmSha256 => 32,
            CipherSuite::Aes256GcmSha384 => 48,
            #[cfg(feature = "chacha")]
            CipherSuite::ChaCha20Poly1305Sha256 => 32,
        }
    }

    /// AEAD nonce length in bytes. 12 for every supported suite.
    pub const fn iv_len(self) -> usize {
        12
    }

    /// AEAD authentication tag length in bytes. 16 for every supported suite.
    pub const fn tag_len(self) -> usize {
        16
    }

    /// The IANA TLS 1.3 suite name.
    pub const fn name(self) -> &'static str {
        match self {
            CipherSuite::Aes128GcmSha256 => "TLS_AES_128_GCM_SHA256",
            CipherSuite::Aes256GcmSha384 => "TLS_AES_256_GCM_SHA384",
            #[cfg(feature = "chacha")]
            CipherSuite::ChaCha20Poly1305Sha256 => "TLS_CHACHA20_POLY1305_SHA256",
        }
    }

    /// Map an IANA suite name to a supported suite.
    pub fn from_name(name: &str) -> Result<CipherSuite, Error> {
        match name {
            "TLS_AES_128_GCM_SHA256" => Ok(CipherSuite::Aes128GcmSha256),
            "TLS_AES_256_GCM_SHA384" => Ok(CipherSuite::Aes256GcmSha384),
            #[cfg(feature = "chacha")]
            "TLS_CHACHA20_POLY1305_SHA256" => Ok(CipherSuite::ChaCha20Poly1305Sha256),
            _ => Err(Error::unsupported_suite(name)),
        }
    }
}

/// Resolve the suite for an encryption level. `None` means the Initial
/// level, which is always AES-128-GCM regardless of negotiation.
pub fn resolve_suite(negotiated: Option<&str>) -> Result<CipherSuite, Error> {
    match negotiated {
        None => Ok(INITIAL_SUITE),
        Some(name) => CipherSuite::from_name(name),
    }
}
