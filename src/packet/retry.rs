//! Retry packet integrity (RFC 9001 section 5.8, RFC 9369 section 3.3.3).
//!
//! The Retry integrity tag is a zero-length-plaintext AES-128-GCM seal
//! under a fixed per-version key and nonce, with a pseudo-packet as
//! associated data: the original Destination Connection ID (length-
//! prefixed) followed by the Retry packet up to the tag.

use crate::crypto::rustcrypto::{AeadCipher, TAG_LEN};
use crate::error::Error;
use crate::packet::MAX_CID_LEN;
use crate::suite::CipherSuite;
use crate::version::Version;

/// Largest pseudo-packet accepted. Retry packets are small (header,
/// connection IDs, token); anything past this is not a plausible Retry.
const MAX_PSEUDO_PACKET: usize = 512;

fn build_pseudo_packet(
    odcid: &[u8],
    retry_packet: &[u8],
) -> Result<heapless::Vec<u8, MAX_PSEUDO_PACKET>, Error> {
    if odcid.len() > MAX_CID_LEN {
        return Err(Error::PacketFormat {
            need: MAX_CID_LEN,
            have: odcid.len(),
        });
    }
    let need = 1 + odcid.len() + retry_packet.len();
    if need > MAX_PSEUDO_PACKET {
        return Err(Error::PacketFormat {
            need,
            have: MAX_PSEUDO_PACKET,
        });
    }
    let mut pseudo = heapless::Vec::new();
    // Lengths checked above; these cannot overflow the capacity.
    let _ = pseudo.push(odcid.len() as u8);
    let _ = pseudo.extend_from_slice(odcid);
    let _ = pseudo.extend_from_slice(retry_packet);
    Ok(pseudo)
}

fn retry_cipher(version: Version) -> Result<AeadCipher, Error> {
    AeadCipher::new(CipherSuite::Aes128GcmSha256, version.retry_key())
}

/// Compute the 16-byte integrity tag for a Retry packet.
/// `retry_packet` is the packet as sent, without the trailing tag.
pub fn retry_integrity_tag(
    version: Version,
    odcid: &[u8],
    retry_packet: &[u8],
) -> Result<[u8; TAG_LEN], Error> {
    let pseudo = build_pseudo_packet(odcid, retry_packet)?;
    let cipher = retry_cipher(version)?;

    let mut tag = [0u8; TAG_LEN];
    cipher.seal_in_place(version.retry_nonce(), &pseudo, &mut tag, 0)?;
    Ok(tag)
}

/// Verify the trailing integrity tag of a received Retry packet.
///
/// Runs the AEAD open on the zero-length ciphertext, so a mismatch is
/// the same opaque [`Error::AeadOpen`] an ordinary packet would give.
pub fn verify_retry_integrity(
    version: Version,
    odcid: &[u8],
    retry_packet: &[u8],
) -> Result<(), Error> {
    if retry_packet.len() < TAG_LEN {
        return Err(Error::PacketFormat {
            need: TAG_LEN,
            have: retry_packet.len(),
        });
    }
    let (body, tag) = retry_packet.split_at(retry_packet.len() - TAG_LEN);
    let pseudo = build_pseudo_packet(odcid, body)?;
    let cipher = retry_cipher(version)?;

    let mut buf = [0u8; TAG_LEN];
    buf.copy_from_slice(tag);
    cipher.open_in_place(version.retry_nonce(), &pseudo, &mut buf, TAG_LEN)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // RFC 9001 A.4: the sample Retry for ODCID 8394c8f03e515708.
    const RETRY_V1: [u8; 36] = hex!(
        "ff000000010008f067a5502a4262b574 6f6b656e04a265ba2eff4d829058fb3f 0f2496ba"
    );
    const ODCID: [u8; 8] = hex!("8394c8f03e515708");

    #[test]
    fn tag_matches_rfc9001_a4() {
        let tag = retry_integrity_tag(Version::V1, &ODCID, &RETRY_V1[..20]).unwrap();
        assert_eq!(tag, hex!("04a265ba2eff4d829058fb3f0f2496ba"));
    }

    #[test]
    fn verify_accepts_rfc9001_a4() {
        verify_retry_integrity(Version::V1, &ODCID, &RETRY_V1).unwrap();
    }

    #[test]
    fn verify_rejects_tampered_tag() {
        let mut packet = RETRY_V1;
        packet[35] ^= 0x01;
        let err = verify_retry_integrity(Version::V1, &ODCID, &packet).unwrap_err();
        assert!(matches!(err, Error::AeadOpen));
    }

    #[test]
    fn verify_rejects_wrong_odcid() {
        let err = verify_retry_integrity(Version::V1, &hex!("0001020304050607"), &RETRY_V1)
            .unwrap_err();
        assert!(matches!(err, Error::AeadOpen));
    }

    #[test]
    fn v2_tag_roundtrips_and_differs_from_v1() {
        // v2 constants differ, so the tags must too.
        let mut packet = std::vec::Vec::new();
        packet.extend_from_slice(&hex!("cf6b3343cf0008f067a5502a4262b574"));
        packet.extend_from_slice(b"token");

        let tag = retry_integrity_tag(Version::V2, &ODCID, &packet).unwrap();
        let tag_v1 = retry_integrity_tag(Version::V1, &ODCID, &packet).unwrap();
        assert_ne!(tag, tag_v1);

        packet.extend_from_slice(&tag);
        verify_retry_integrity(Version::V2, &ODCID, &packet).unwrap();
        assert!(verify_retry_integrity(Version::V1, &ODCID, &packet).is_err());
    }

    #[test]
    fn oversized_inputs_rejected() {
        let err = retry_integrity_tag(Version::V1, &[0u8; 21], b"abc").unwrap_err();
        assert!(matches!(err, Error::PacketFormat { .. }));

        let big = [0u8; 600];
        let err = retry_integrity_tag(Version::V1, &ODCID, &big).unwrap_err();
        assert!(matches!(err, Error::PacketFormat { .. }));
    }

    #[test]
    fn short_retry_packet_rejected() {
        let err = verify_retry_integrity(Version::V1, &ODCID, &[0u8; 10]).unwrap_err();
        assert!(matches!(err, Error::PacketFormat { need: 16, have: 10 }));
    }
}
