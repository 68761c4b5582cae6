//! Packet protection orchestration (RFC 9001 section 5.3-5.4).
//!
//! Encrypt: AEAD-seal the payload with the cleartext header as
//! associated data, then header-protect using a sample of the fresh
//! ciphertext. Decrypt runs the reverse in two phases: unprotect the
//! header and decode the packet number, then open the payload. The
//! [`ProtectedPacket`] / [`UnprotectedPacket`] pair makes calling the
//! phases out of order unrepresentable; the free functions keep the
//! runtime ordering guard for callers that need to drive the phases
//! separately.

use crate::crypto::KeyMaterial;
use crate::error::Error;
use crate::packet::header_protection::{apply_first_byte_mask, apply_pn_mask};
use crate::packet::number::{decode_pn, PacketNumber, MAX_PACKET_NUMBER};
use crate::packet::view::{CryptoPacketView, TAG_LEN};

/// Protect a packet in place: seal the payload, then mask the header.
///
/// The view must have a known packet number length and already carry
/// the cleartext truncated packet number in its header. On any error
/// the buffer must not be transmitted.
pub fn encrypt_in_place(
    keys: &KeyMaterial,
    view: &mut CryptoPacketView<'_>,
    packet_number: u64,
) -> Result<(), Error> {
    if !view.pn_len_known() || packet_number > MAX_PACKET_NUMBER {
        return Err(Error::PacketFormat { need: 1, have: 0 });
    }

    let nonce = keys.nonce(packet_number);
    let payload_len = view.payload_len();
    let (header, body) = view.split_header_body();
    keys.aead().seal_in_place(&nonce, header, body, payload_len)?;

    let sample = view.sample();
    let mask = keys.mask_cipher().mask(&sample);
    apply_first_byte_mask(view.first_byte_mut(), &mask);
    apply_pn_mask(view.pn_bytes_mut(), &mask);

    view.packet_number = PacketNumber::new(packet_number);

    #[cfg(feature = "tracing")]
    tracing::trace!(
        packet_number,
        payload_len,
        suite = keys.suite().name(),
        "sealed packet"
    );
    Ok(())
}

/// Phase one of decryption: remove header protection and decode the
/// packet number against `largest_pn`.
///
/// On failure the view's packet number stays `INFINITY` and phase two
/// will refuse to run.
pub fn decrypt_header(
    keys: &KeyMaterial,
    view: &mut CryptoPacketView<'_>,
    largest_pn: u64,
) -> Result<PacketNumber, Error> {
    let sample = view.sample();
    let mask = keys.mask_cipher().mask(&sample);

    apply_first_byte_mask(view.first_byte_mut(), &mask);
    let pn_len = (view.first_byte() & 0x03) as usize + 1;
    view.set_pn_len(pn_len)?;
    apply_pn_mask(view.pn_bytes_mut(), &mask);

    let mut truncated = 0u32;
    for &byte in view.pn_bytes_mut().iter() {
        truncated = (truncated << 8) | byte as u32;
    }
    let pn = decode_pn(truncated, pn_len, largest_pn);
    if pn > MAX_PACKET_NUMBER {
        return Err(Error::PacketNumberDecode);
    }

    view.packet_number = PacketNumber::new(pn);

    #[cfg(feature = "tracing")]
    tracing::trace!(packet_number = pn, pn_len, "unprotected header");
    Ok(view.packet_number)
}

/// Phase two of decryption: open the payload with the unprotected
/// header as associated data. Returns the plaintext length.
///
/// Refuses to run before [`decrypt_header`] has decoded the packet
/// number. Authentication failure is the opaque [`Error::AeadOpen`].
pub fn decrypt_payload(keys: &KeyMaterial, view: &mut CryptoPacketView<'_>) -> Result<usize, Error> {
    if !view.packet_number.is_decoded() {
        return Err(Error::HeaderNotDecrypted);
    }

    let nonce = keys.nonce(view.packet_number.value());
    let (header, body) = view.split_header_body();
    let ciphertext_len = body.len();
    let plaintext_len = keys.aead().open_in_place(&nonce, header, body, ciphertext_len)?;

    #[cfg(feature = "tracing")]
    tracing::trace!(
        packet_number = view.packet_number.value(),
        plaintext_len,
        "opened packet"
    );
    Ok(plaintext_len)
}

/// Both decryption phases in order. Returns the plaintext length; the
/// decoded packet number is left on the view.
pub fn decrypt_in_place(
    keys: &KeyMaterial,
    view: &mut CryptoPacketView<'_>,
    largest_pn: u64,
) -> Result<usize, Error> {
    decrypt_header(keys, view, largest_pn)?;
    decrypt_payload(keys, view)
}

/// A received packet whose header is still protected. The only way
/// forward is [`unprotect_header`](Self::unprotect_header).
pub struct ProtectedPacket<'a> {
    view: CryptoPacketView<'a>,
}

impl<'a> ProtectedPacket<'a> {
    /// Parse a received packet. `pn_offset` is where the packet number
    /// field starts (the caller has parsed the cleartext header up to
    /// that point).
    pub fn parse(buf: &'a mut [u8], pn_offset: usize) -> Result<ProtectedPacket<'a>, Error> {
        let view = CryptoPacketView::parse_unknown_pn_len(buf, pn_offset, TAG_LEN)?;
        Ok(ProtectedPacket { view })
    }

    /// Remove header protection, consuming this state.
    pub fn unprotect_header(
        mut self,
        keys: &KeyMaterial,
        largest_pn: u64,
    ) -> Result<UnprotectedPacket<'a>, Error> {
        decrypt_header(keys, &mut self.view, largest_pn)?;
        Ok(UnprotectedPacket { view: self.view })
    }
}

/// A packet with an unprotected header and decoded packet number,
/// whose payload is still sealed.
pub struct UnprotectedPacket<'a> {
    view: CryptoPacketView<'a>,
}

impl<'a> UnprotectedPacket<'a> {
    pub fn packet_number(&self) -> u64 {
        self.view.packet_number.value()
    }

    /// The unprotected header bytes (the AEAD associated data).
    pub fn header(&self) -> &[u8] {
        self.view.header()
    }

    /// Key phase bit, for short-header packets only.
    pub fn key_phase(&self) -> Option<bool> {
        let first = self.view.first_byte();
        if first & 0x80 == 0 {
            Some(first & 0x04 != 0)
        } else {
            None
        }
    }

    /// Open the payload, consuming the packet and returning the
    /// plaintext slice.
    pub fn decrypt_payload(mut self, keys: &KeyMaterial) -> Result<&'a mut [u8], Error> {
        let plaintext_len = decrypt_payload(keys, &mut self.view)?;
        Ok(self.view.into_payload(plaintext_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyMaterial;
    use crate::packet::number::encode_pn;
    use crate::suite::CipherSuite;

    fn test_keys(suite: CipherSuite) -> KeyMaterial {
        let key_len = suite.key_len();
        let hp_len = suite.hp_key_len();
        KeyMaterial::new(suite, &[0x42u8; 32][..key_len], &[0x24u8; 12], &[0x66u8; 32][..hp_len])
            .unwrap()
    }

    // Build a minimal short-header packet: first byte, 8-byte DCID,
    // truncated pn, payload, tag space.
    fn build_short_packet(pn: u64, largest_acked: u64, payload: &[u8]) -> (std::vec::Vec<u8>, usize, usize) {
        let mut pn_buf = [0u8; 4];
        let pn_len = encode_pn(pn, largest_acked, &mut pn_buf).unwrap();
        let pn_offset = 1 + 8;

        let mut buf = std::vec::Vec::new();
        buf.push(0x40 | (pn_len as u8 - 1));
        buf.extend_from_slice(&[0xd0; 8]);
        buf.extend_from_slice(&pn_buf[..pn_len]);
        buf.extend_from_slice(payload);
        buf.extend_from_slice(&[0u8; TAG_LEN]);
        // Sample availability requires at least 4 pn+payload bytes
        // before the tag.
        assert!(buf.len() >= pn_offset + 4 + 16);
        (buf, pn_offset, pn_len)
    }

    fn roundtrip(suite: CipherSuite, pn: u64, largest: u64) {
        let keys = test_keys(suite);
        let payload = b"roundtrip payload bytes";
        let (mut buf, pn_offset, pn_len) = build_short_packet(pn, largest, payload);
        let original_header = buf[..pn_offset + pn_len].to_vec();

        let mut view =
            CryptoPacketView::parse_known_pn_len(&mut buf, pn_offset, pn_len, TAG_LEN).unwrap();
        encrypt_in_place(&keys, &mut view, pn).unwrap();
        assert_ne!(&buf[pn_offset + pn_len..pn_offset + pn_len + payload.len()], payload);

        let packet = ProtectedPacket::parse(&mut buf, pn_offset).unwrap();
        let packet = packet.unprotect_header(&keys, largest).unwrap();
        assert_eq!(packet.packet_number(), pn);
        assert_eq!(packet.header(), &original_header[..]);
        let plaintext = packet.decrypt_payload(&keys).unwrap();
        assert_eq!(plaintext, payload);
    }

    #[test]
    fn roundtrip_all_suites() {
        roundtrip(CipherSuite::Aes128GcmSha256, 7, 3);
        roundtrip(CipherSuite::Aes256GcmSha384, 7, 3);
        #[cfg(feature = "chacha")]
        roundtrip(CipherSuite::ChaCha20Poly1305Sha256, 7, 3);
    }

    #[test]
    fn roundtrip_all_pn_lengths() {
        // Distances chosen to force each truncated length (1-4 bytes).
        roundtrip(CipherSuite::Aes128GcmSha256, 1, 0);
        roundtrip(CipherSuite::Aes128GcmSha256, 0x100, 0);
        roundtrip(CipherSuite::Aes128GcmSha256, 0x8000, 0);
        roundtrip(CipherSuite::Aes128GcmSha256, 0x80_0000, 0);
    }

    #[test]
    fn payload_before_header_is_rejected() {
        let keys = test_keys(CipherSuite::Aes128GcmSha256);
        let (mut buf, pn_offset, pn_len) = build_short_packet(7, 3, b"some payload bytes");
        let mut view =
            CryptoPacketView::parse_known_pn_len(&mut buf, pn_offset, pn_len, TAG_LEN).unwrap();
        encrypt_in_place(&keys, &mut view, 7).unwrap();

        let mut view = CryptoPacketView::parse_unknown_pn_len(&mut buf, pn_offset, TAG_LEN).unwrap();
        let err = decrypt_payload(&keys, &mut view).unwrap_err();
        assert!(matches!(err, Error::HeaderNotDecrypted));
    }

    #[test]
    fn tampered_packet_fails_open() {
        let keys = test_keys(CipherSuite::Aes128GcmSha256);
        let (mut buf, pn_offset, pn_len) = build_short_packet(7, 3, b"some payload bytes");
        let mut view =
            CryptoPacketView::parse_known_pn_len(&mut buf, pn_offset, pn_len, TAG_LEN).unwrap();
        encrypt_in_place(&keys, &mut view, 7).unwrap();

        let last = buf.len() - 1;
        buf[last] ^= 0x01;

        let mut view = CryptoPacketView::parse_unknown_pn_len(&mut buf, pn_offset, TAG_LEN).unwrap();
        let err = decrypt_in_place(&keys, &mut view, 3).unwrap_err();
        assert!(matches!(err, Error::AeadOpen));
    }

    #[test]
    fn wrong_keys_fail_open_opaquely() {
        let keys = test_keys(CipherSuite::Aes128GcmSha256);
        let other = KeyMaterial::new(
            CipherSuite::Aes128GcmSha256,
            &[0x43u8; 16],
            &[0x24u8; 12],
            &[0x66u8; 16],
        )
        .unwrap();

        let (mut buf, pn_offset, pn_len) = build_short_packet(7, 3, b"some payload bytes");
        let mut view =
            CryptoPacketView::parse_known_pn_len(&mut buf, pn_offset, pn_len, TAG_LEN).unwrap();
        encrypt_in_place(&keys, &mut view, 7).unwrap();

        // Same hp key, so the header unprotects fine; only the AEAD
        // key differs. The failure is indistinguishable from tampering.
        let mut view = CryptoPacketView::parse_unknown_pn_len(&mut buf, pn_offset, TAG_LEN).unwrap();
        decrypt_header(&other, &mut view, 3).unwrap();
        let err = decrypt_payload(&other, &mut view).unwrap_err();
        assert!(matches!(err, Error::AeadOpen));
    }

    #[test]
    fn key_phase_bit_exposed_after_unprotect() {
        let keys = test_keys(CipherSuite::Aes128GcmSha256);
        let payload = b"key phase test payload";
        let (mut buf, pn_offset, pn_len) = build_short_packet(7, 3, payload);
        buf[0] |= 0x04;
        let mut view =
            CryptoPacketView::parse_known_pn_len(&mut buf, pn_offset, pn_len, TAG_LEN).unwrap();
        encrypt_in_place(&keys, &mut view, 7).unwrap();

        let packet = ProtectedPacket::parse(&mut buf, pn_offset).unwrap();
        let packet = packet.unprotect_header(&keys, 3).unwrap();
        assert_eq!(packet.key_phase(), Some(true));
    }
}
