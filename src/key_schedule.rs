//! QUIC key derivation (RFC 9001 section 5, RFC 9369 section 3.3).
//!
//! HKDF-Expand-Label plus the derivation chain: Initial secret from
//! the version salt and client DCID, per-direction traffic secrets,
//! packet protection keys, and the key-update secret.

use crate::crypto::rustcrypto::{HkdfSha256, HkdfSha384};
use crate::crypto::{Hkdf, KeyMaterial, Secret};
use crate::error::Error;
use crate::suite::CipherSuite;
use crate::version::Version;

/// HKDF-Expand-Label as defined in RFC 8446 section 7.1 / RFC 9001
/// section 5.1, with an empty context (QUIC never uses one).
///
/// Builds the HkdfLabel info structure:
///   uint16 length = out.len()
///   opaque label<7..255> = "tls13 " + label
///   opaque context<0..255> = ""
///
/// then calls HKDF-Expand(secret, HkdfLabel, out.len()).
pub fn hkdf_expand_label<H: Hkdf>(
    hkdf: &H,
    secret: &[u8],
    label: &[u8],
    out: &mut [u8],
) -> Result<(), Error> {
    let tls13_prefix = b"tls13 ";
    let full_label_len = tls13_prefix.len() + label.len();
    if full_label_len > 255 || out.len() > 65535 {
        return Err(Error::HkdfLabel);
    }
    let info_len = 2 + 1 + full_label_len + 1;

    // Stack buffer; 80 bytes is ample for any QUIC label.
    if info_len > 80 {
        return Err(Error::HkdfLabel);
    }
    let mut info = [0u8; 80];
    let out_len = out.len() as u16;
    info[0] = (out_len >> 8) as u8;
    info[1] = out_len as u8;
    info[2] = full_label_len as u8;
    info[3..3 + tls13_prefix.len()].copy_from_slice(tls13_prefix);
    info[3 + tls13_prefix.len()..3 + full_label_len].copy_from_slice(label);
    info[3 + full_label_len] = 0; // empty context

    hkdf.expand(secret, &info[..info_len], out)
}

/// Derive the Initial secret for a version: HKDF-Extract with the
/// version's salt over the client's Destination Connection ID.
///
/// A zero-length DCID is accepted; connection ID policy belongs to the
/// caller. The Initial level always uses SHA-256.
pub fn derive_initial_secret(version: Version, client_dcid: &[u8]) -> Secret {
    let mut secret = Secret::zeroed(32);
    HkdfSha256.extract(version.initial_salt(), client_dcid, secret.as_mut_slice());
    secret
}

/// Expand the per-direction traffic secret from the Initial secret.
/// The `"client in"` / `"server in"` labels are version-independent.
pub fn derive_client_server_secret(initial: &Secret, is_client: bool) -> Result<Secret, Error> {
    let label: &[u8] = if is_client { b"client in" } else { b"server in" };
    let mut secret = Secret::zeroed(32);
    hkdf_expand_label(&HkdfSha256, initial.as_slice(), label, secret.as_mut_slice())?;
    Ok(secret)
}

// Expand with the hash the suite's secrets are sized for.
fn expand_for_suite(
    suite: CipherSuite,
    secret: &[u8],
    label: &[u8],
    out: &mut [u8],
) -> Result<(), Error> {
    match suite {
        CipherSuite::Aes256GcmSha384 => hkdf_expand_label(&HkdfSha384, secret, label, out),
        _ => hkdf_expand_label(&HkdfSha256, secret, label, out),
    }
}

/// Derive the packet protection key bundle from a traffic secret:
/// three expands with the version's key/iv/hp labels, sized by the
/// suite, returned as constructed ciphers.
pub fn derive_key_material(
    version: Version,
    secret: &Secret,
    suite: CipherSuite,
) -> Result<KeyMaterial, Error> {
    let mut key = [0u8; 32];
    let mut iv = [0u8; 12];
    let mut hp_key = [0u8; 32];
    let key = &mut key[..suite.key_len()];
    let hp_key = &mut hp_key[..suite.hp_key_len()];

    expand_for_suite(suite, secret.as_slice(), version.key_label(), key)?;
    expand_for_suite(suite, secret.as_slice(), version.iv_label(), &mut iv)?;
    expand_for_suite(suite, secret.as_slice(), version.hp_label(), hp_key)?;

    KeyMaterial::new(suite, key, &iv, hp_key)
}

/// Derive the next-generation traffic secret for a key update
/// (RFC 9001 section 6.1): expand the current secret with the
/// version's `ku` label, output length equal to the input length.
///
/// The secret must be sized for the suite's hash; a mismatch is a
/// caller bug, reported as `InvalidKeyLength`.
pub fn derive_updated_secret(
    version: Version,
    secret: &Secret,
    suite: CipherSuite,
) -> Result<Secret, Error> {
    if secret.len() != suite.hash_len() {
        return Err(Error::InvalidKeyLength {
            expected: suite.hash_len(),
            have: secret.len(),
        });
    }
    let mut next = Secret::zeroed(secret.len());
    expand_for_suite(suite, secret.as_slice(), version.ku_label(), next.as_mut_slice())?;
    Ok(next)
}
