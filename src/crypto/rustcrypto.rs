//! RustCrypto-backed AEAD, header-protection, and HKDF primitives.

use crate::crypto::Hkdf as HkdfTrait;
use crate::error::{Error, MaskPath};
use crate::suite::CipherSuite;

/// AEAD authentication tag length. Identical for every supported suite.
pub const TAG_LEN: usize = 16;

// ---- HKDF ----

/// HKDF using SHA-256 (via the `hkdf` crate).
pub struct HkdfSha256;

impl HkdfTrait for HkdfSha256 {
    const HASH_LEN: usize = 32;

    fn extract(&self, salt: &[u8], ikm: &[u8], prk: &mut [u8]) {
        let (out, _) = hkdf::Hkdf::<sha2::Sha256>::extract(Some(salt), ikm);
        prk[..32].copy_from_slice(&out);
    }

    fn expand(&self, prk: &[u8], info: &[u8], okm: &mut [u8]) -> Result<(), Error> {
        let hk = hkdf::Hkdf::<sha2::Sha256>::from_prk(prk).map_err(|_| Error::HkdfLabel)?;
        hk.expand(info, okm).map_err(|_| Error::HkdfLabel)
    }
}

/// HKDF using SHA-384.
pub struct HkdfSha384;

impl HkdfTrait for HkdfSha384 {
    const HASH_LEN: usize = 48;

    fn extract(&self, salt: &[u8], ikm: &[u8], prk: &mut [u8]) {
        let (out, _) = hkdf::Hkdf::<sha2::Sha384>::extract(Some(salt), ikm);
        prk[..48].copy_from_slice(&out);
    }

    fn expand(&self, prk: &[u8], info: &[u8], okm: &mut [u8]) -> Result<(), Error> {
        let hk = hkdf::Hkdf::<sha2::Sha384>::from_prk(prk).map_err(|_| Error::HkdfLabel)?;
        hk.expand(info, okm).map_err(|_| Error::HkdfLabel)
    }
}

// ---- AEAD ----

/// Payload AEAD, one variant per supported suite.
///
/// Constructed once from raw key bytes and then only read; in-place
/// operation with a detached tag appended after the payload.
#[derive(Clone)]
pub enum AeadCipher {
    Aes128(aes_gcm::Aes128Gcm),
    Aes256(aes_gcm::Aes256Gcm),
    #[cfg(feature = "chacha")]
    ChaCha20Poly1305(chacha20poly1305::ChaCha20Poly1305),
}

impl AeadCipher {
    pub(crate) fn new(suite: CipherSuite, key: &[u8]) -> Result<AeadCipher, Error> {
        use aes_gcm::KeyInit;

        if key.len() != suite.key_len() {
            return Err(Error::InvalidKeyLength {
                expected: suite.key_len(),
                have: key.len(),
            });
        }
        match suite {
            CipherSuite::Aes128GcmSha256 => {
                let cipher =
                    aes_gcm::Aes128Gcm::new_from_slice(key).map_err(|_| Error::InvalidKeyLength {
                        expected: 16,
                        have: key.len(),
                    })?;
                Ok(AeadCipher::Aes128(cipher))
            }
            CipherSuite::Aes256GcmSha384 => {
                let cipher =
                    aes_gcm::Aes256Gcm::new_from_slice(key).map_err(|_| Error::InvalidKeyLength {
                        expected: 32,
                        have: key.len(),
                    })?;
                Ok(AeadCipher::Aes256(cipher))
            }
            #[cfg(feature = "chacha")]
            CipherSuite::ChaCha20Poly1305Sha256 => {
                let cipher = chacha20poly1305::ChaCha20Poly1305::new_from_slice(key).map_err(
                    |_| Error::InvalidKeyLength {
                        expected: 32,
                        have: key.len(),
                    },
                )?;
                Ok(AeadCipher::ChaCha20Poly1305(cipher))
            }
        }
    }

    /// Encrypt `buf[..payload_len]` in place and append the 16-byte tag.
    /// Returns the ciphertext length including the tag.
    pub(crate) fn seal_in_place(
        &self,
        nonce: &[u8; 12],
        aad: &[u8],
        buf: &mut [u8],
        payload_len: usize,
    ) -> Result<usize, Error> {
        use aes_gcm::aead::AeadInPlace;

        let total = payload_len + TAG_LEN;
        if buf.len() < total {
            return Err(Error::BufferTooSmall { needed: total });
        }

        let nonce = aes_gcm::Nonce::from_slice(nonce);
        let payload = &mut buf[..payload_len];
        let tag = match self {
            AeadCipher::Aes128(cipher) => cipher
                .encrypt_in_place_detached(nonce, aad, payload)
                .map_err(|_| Error::AeadSeal)?,
            AeadCipher::Aes256(cipher) => cipher
                .encrypt_in_place_detached(nonce, aad, payload)
                .map_err(|_| Error::AeadSeal)?,
            #[cfg(feature = "chacha")]
            AeadCipher::ChaCha20Poly1305(cipher) => cipher
                .encrypt_in_place_detached(nonce, aad, payload)
                .map_err(|_| Error::AeadSeal)?,
        };
        buf[payload_len..total].copy_from_slice(&tag);
        Ok(total)
    }

    /// Decrypt `buf[..ciphertext_len]` in place, verifying the trailing
    /// 16-byte tag. Returns the plaintext length. Authentication
    /// failure is reported as the opaque [`Error::AeadOpen`].
    pub(crate) fn open_in_place(
        &self,
        nonce: &[u8; 12],
        aad: &[u8],
        buf: &mut [u8],
        ciphertext_len: usize,
    ) -> Result<usize, Error> {
        use aes_gcm::aead::AeadInPlace;

        if ciphertext_len < TAG_LEN || buf.len() < ciphertext_len {
            return Err(Error::PacketFormat {
                need: TAG_LEN,
                have: ciphertext_len.min(buf.len()),
            });
        }
        let plaintext_len = ciphertext_len - TAG_LEN;
        let mut tag_bytes = [0u8; TAG_LEN];
        tag_bytes.copy_from_slice(&buf[plaintext_len..ciphertext_len]);
        let tag = aes_gcm::Tag::from(tag_bytes);

        let nonce = aes_gcm::Nonce::from_slice(nonce);
        let payload = &mut buf[..plaintext_len];
        match self {
            AeadCipher::Aes128(cipher) => cipher
                .decrypt_in_place_detached(nonce, aad, payload, &tag)
                .map_err(|_| Error::AeadOpen)?,
            AeadCipher::Aes256(cipher) => cipher
                .decrypt_in_place_detached(nonce, aad, payload, &tag)
                .map_err(|_| Error::AeadOpen)?,
            #[cfg(feature = "chacha")]
            AeadCipher::ChaCha20Poly1305(cipher) => cipher
                .decrypt_in_place_detached(nonce, aad, payload, &tag)
                .map_err(|_| Error::AeadOpen)?,
        }
        Ok(plaintext_len)
    }
}

// ---- Header protection ----

/// Header-protection mask cipher, one variant per supported suite.
///
/// AES suites run a single ECB block over the sample; ChaCha20 treats
/// the first 4 sample bytes as a little-endian block counter and the
/// remaining 12 as the nonce.
#[derive(Clone)]
pub enum MaskCipher {
    Aes128(aes::Aes128),
    Aes256(aes::Aes256),
    #[cfg(feature = "chacha")]
    ChaCha20 { key: [u8; 32] },
}

impl MaskCipher {
    pub(crate) fn new(suite: CipherSuite, hp_key: &[u8]) -> Result<MaskCipher, Error> {
        use aes::cipher::KeyInit;

        if hp_key.len() != suite.hp_key_len() {
            return Err(Error::InvalidKeyLength {
                expected: suite.hp_key_len(),
                have: hp_key.len(),
            });
        }
        match suite {
            CipherSuite::Aes128GcmSha256 => {
                let cipher = aes::Aes128::new_from_slice(hp_key)
                    .map_err(|_| Error::MaskGeneration(MaskPath::Aes))?;
                Ok(MaskCipher::Aes128(cipher))
            }
            CipherSuite::Aes256GcmSha384 => {
                let cipher = aes::Aes256::new_from_slice(hp_key)
                    .map_err(|_| Error::MaskGeneration(MaskPath::Aes))?;
                Ok(MaskCipher::Aes256(cipher))
            }
            #[cfg(feature = "chacha")]
            CipherSuite::ChaCha20Poly1305Sha256 => {
                let mut key = [0u8; 32];
                key.copy_from_slice(hp_key);
                Ok(MaskCipher::ChaCha20 { key })
            }
        }
    }

    /// Derive the 5-byte header-protection mask from a 16-byte sample
    /// of ciphertext.
    pub(crate) fn mask(&self, sample: &[u8; 16]) -> [u8; 5] {
        use aes::cipher::BlockEncrypt;

        match self {
            MaskCipher::Aes128(cipher) => {
                let mut block = aes::Block::clone_from_slice(sample);
                cipher.encrypt_block(&mut block);
                let mut mask = [0u8; 5];
                mask.copy_from_slice(&block[..5]);
                mask
            }
            MaskCipher::Aes256(cipher) => {
                let mut block = aes::Block::clone_from_slice(sample);
                cipher.encrypt_block(&mut block);
                let mut mask = [0u8; 5];
                mask.copy_from_slice(&block[..5]);
                mask
            }
            #[cfg(feature = "chacha")]
            MaskCipher::ChaCha20 { key } => chacha_mask(key, sample),
        }
    }
}

#[cfg(feature = "chacha")]
fn chacha_mask(key: &[u8; 32], sample: &[u8; 16]) -> [u8; 5] {
    use chacha20::cipher::{KeyIvInit, StreamCipher, StreamCipherSeek};

    let counter = u32::from_le_bytes([sample[0], sample[1], sample[2], sample[3]]);
    let mut nonce = [0u8; 12];
    nonce.copy_from_slice(&sample[4..16]);

    // The chacha20 crate starts at counter 0; seek to the sampled
    // counter position (64-byte blocks).
    let mut cipher = chacha20::ChaCha20::new(key.into(), (&nonce).into());
    cipher.seek(counter as u64 * 64);

    let mut mask = [0u8; 5];
    cipher.apply_keystream(&mut mask);
    mask
}
