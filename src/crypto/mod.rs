//! Cryptographic primitives for QUIC packet protection.
//!
//! QUIC needs three primitives per direction: an AEAD for payload
//! sealing, a mask cipher for header protection, and HKDF for the key
//! schedule. [`KeyMaterial`] bundles the first two (pre-constructed
//! from raw key bytes) together with the nonce base IV; the [`Hkdf`]
//! trait abstracts over the suite's hash for derivation.

mod hkdf;
pub mod rustcrypto;

pub use self::hkdf::Hkdf;

use crate::error::Error;
use crate::suite::CipherSuite;
use self::rustcrypto::{AeadCipher, MaskCipher};

/// A traffic secret: fixed-capacity owned bytes with an explicit length.
///
/// Secrets are immutable snapshots. A key update derives a fresh
/// `Secret` and replaces the old one wholesale; nothing mutates a
/// secret in place.
#[derive(Clone)]
pub struct Secret {
    bytes: [u8; 48],
    len: usize,
}

impl Secret {
    /// Copy `bytes` into a new secret. Lengths over 48 bytes (SHA-384
    /// output) are rejected.
    pub fn from_slice(bytes: &[u8]) -> Result<Secret, Error> {
        if bytes.len() > 48 {
            return Err(Error::InvalidKeyLength {
                expected: 48,
                have: bytes.len(),
            });
        }
        let mut secret = Secret {
            bytes: [0u8; 48],
            len: bytes.len(),
        };
        secret.bytes[..bytes.len()].copy_from_slice(bytes);
        Ok(secret)
    }

    pub(crate) fn zeroed(len: usize) -> Secret {
        debug_assert!(len <= 48);
        Secret {
            bytes: [0u8; 48],
            len,
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl core::fmt::Debug for Secret {
    // Never print secret bytes.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Secret({} bytes)", self.len)
    }
}

/// Packet protection keys for one direction at one encryption level.
///
/// Holds the constructed AEAD and header-protection ciphers plus the
/// nonce base IV. Immutable once built; a key update builds a new
/// `KeyMaterial` that supersedes this one.
#[derive(Clone)]
pub struct KeyMaterial {
    suite: CipherSuite,
    aead: AeadCipher,
    mask: MaskCipher,
    /// Nonce base — XORed with the packet number per packet.
    iv: [u8; 12],
}

impl core::fmt::Debug for KeyMaterial {
    // Never print key or IV bytes.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "KeyMaterial({})", self.suite.name())
    }
}

impl KeyMaterial {
    /// Build keys from raw derived bytes. Key lengths must match the
    /// suite exactly.
    pub fn new(suite: CipherSuite, key: &[u8], iv: &[u8], hp_key: &[u8]) -> Result<KeyMaterial, Error> {
        if iv.len() != suite.iv_len() {
            return Err(Error::InvalidKeyLength {
                expected: suite.iv_len(),
                have: iv.len(),
            });
        }
        let aead = AeadCipher::new(suite, key)?;
        let mask = MaskCipher::new(suite, hp_key)?;
        let mut iv_bytes = [0u8; 12];
        iv_bytes.copy_from_slice(iv);
        Ok(KeyMaterial {
            suite,
            aead,
            mask,
            iv: iv_bytes,
        })
    }

    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Compute the AEAD nonce for a packet number: the full packet
    /// number, big-endian, XORed into the last 8 bytes of the IV.
    pub fn nonce(&self, packet_number: u64) -> [u8; 12] {
        let mut nonce = self.iv;
        let pn_bytes = packet_number.to_be_bytes();
        for i in 0..8 {
            nonce[4 + i] ^= pn_bytes[i];
        }
        nonce
    }

    pub(crate) fn aead(&self) -> &AeadCipher {
        &self.aead
    }

    pub(crate) fn mask_cipher(&self) -> &MaskCipher {
        &self.mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn nonce_xors_packet_number() {
        // RFC 9001 A.2: client Initial IV with pn = 2.
        let km = KeyMaterial::new(
            CipherSuite::Aes128GcmSha256,
            &hex!("1f369613dd76d5467730efcbe3b1a22d"),
            &hex!("fa044b2f42a3fd3b46fb255c"),
            &hex!("9f50449e04a0e810283a1e9933adedd2"),
        )
        .unwrap();
        assert_eq!(km.nonce(0), hex!("fa044b2f42a3fd3b46fb255c"));
        assert_eq!(km.nonce(2), hex!("fa044b2f42a3fd3b46fb255e"));
        // High packet-number bits land in the leading XORed bytes.
        assert_eq!(km.nonce(1 << 56)[4], 0x42 ^ 0x01);
    }

    #[test]
    fn key_lengths_checked() {
        let err = KeyMaterial::new(CipherSuite::Aes256GcmSha384, &[0u8; 16], &[0u8; 12], &[0u8; 32])
            .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidKeyLength { expected: 32, have: 16 }));

        let err = KeyMaterial::new(CipherSuite::Aes128GcmSha256, &[0u8; 16], &[0u8; 8], &[0u8; 16])
            .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidKeyLength { expected: 12, have: 8 }));
    }

    #[test]
    fn debug_redacts_key_bytes() {
        use std::format;
        let km = KeyMaterial::new(
            CipherSuite::Aes128GcmSha256,
            &hex!("1f369613dd76d5467730efcbe3b1a22d"),
            &hex!("fa044b2f42a3fd3b46fb255c"),
            &hex!("9f50449e04a0e810283a1e9933adedd2"),
        )
        .unwrap();
        let out = format!("{km:?}");
        assert_eq!(out, "KeyMaterial(TLS_AES_128_GCM_SHA256)");

        let secret = Secret::from_slice(&hex!("1f369613dd76d5467730efcbe3b1a22d")).unwrap();
        assert_eq!(format!("{secret:?}"), "Secret(16 bytes)");
    }

    #[test]
    fn secret_bounds() {
        let s = Secret::from_slice(&[0xab; 48]).unwrap();
        assert_eq!(s.len(), 48);
        assert!(Secret::from_slice(&[0u8; 49]).is_err());
    }
}
