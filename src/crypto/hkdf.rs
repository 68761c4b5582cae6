//! HKDF abstraction over the cipher suite's hash.

use crate::error::Error;

/// HKDF (RFC 5869) over a specific hash function.
///
/// Only the two operations the QUIC key schedule needs: Extract for
/// the initial secret and Expand for everything else. Output buffers
/// are caller-provided; `HASH_LEN` sizes the extract output.
pub trait Hkdf {
    /// Output length of the underlying hash, in bytes.
    const HASH_LEN: usize;

    /// HKDF-Extract: fill `prk[..HASH_LEN]` from salt and input keying
    /// material.
    fn extract(&self, salt: &[u8], ikm: &[u8], prk: &mut [u8]);

    /// HKDF-Expand: fill `okm` from the pseudorandom key and info.
    /// Fails only when `okm` exceeds the RFC 5869 length limit.
    fn expand(&self, prk: &[u8], info: &[u8], okm: &mut [u8]) -> Result<(), Error>;
}
