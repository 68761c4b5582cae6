//! Zero-copy view of a protected packet's crypto-relevant regions.

use crate::error::Error;
use crate::packet::number::PacketNumber;

/// Header-protection sample length (RFC 9001 section 5.4.2).
pub const SAMPLE_LEN: usize = 16;

/// The sample starts this many bytes after the packet number field,
/// regardless of the actual packet number length.
pub const SAMPLE_OFFSET: usize = 4;

/// AEAD authentication tag length.
pub const TAG_LEN: usize = crate::crypto::rustcrypto::TAG_LEN;

/// The crypto-relevant regions of one packet, as offsets into a single
/// contiguous buffer: header (through the packet number), sample,
/// protected payload, and trailing auth tag. Contiguity and ordering
/// are checked at construction, not assumed.
///
/// On the receive path the packet number length is unknown until the
/// header has been unprotected; the view is built assuming the maximum
/// 4-byte number and narrowed with [`set_pn_len`](Self::set_pn_len).
pub struct CryptoPacketView<'a> {
    buf: &'a mut [u8],
    pn_offset: usize,
    pn_len: usize,
    pn_len_known: bool,
    tag_len: usize,
    /// `INFINITY` until the packet number is known (assigned on
    /// encrypt, decoded on decrypt).
    pub packet_number: PacketNumber,
}

impl core::fmt::Debug for CryptoPacketView<'_> {
    // Region geometry only; the buffer may hold plaintext.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CryptoPacketView")
            .field("len", &self.buf.len())
            .field("pn_offset", &self.pn_offset)
            .field("pn_len", &self.pn_len)
            .field("pn_len_known", &self.pn_len_known)
            .field("packet_number", &self.packet_number)
            .finish()
    }
}

impl<'a> CryptoPacketView<'a> {
    /// View a packet whose packet number length is not yet known
    /// (receive path, header still protected). Assumes the maximum
    /// 4-byte packet number; the sample and tag must fit.
    pub fn parse_unknown_pn_len(
        buf: &'a mut [u8],
        pn_offset: usize,
        tag_len: usize,
    ) -> Result<CryptoPacketView<'a>, Error> {
        Self::validate(buf.len(), pn_offset, 4, tag_len)?;
        Ok(CryptoPacketView {
            buf,
            pn_offset,
            pn_len: 4,
            pn_len_known: false,
            tag_len,
            packet_number: PacketNumber::INFINITY,
        })
    }

    /// View a packet whose packet number length is known (send path,
    /// or receive path after header unprotection).
    pub fn parse_known_pn_len(
        buf: &'a mut [u8],
        pn_offset: usize,
        pn_len: usize,
        tag_len: usize,
    ) -> Result<CryptoPacketView<'a>, Error> {
        Self::validate(buf.len(), pn_offset, pn_len, tag_len)?;
        Ok(CryptoPacketView {
            buf,
            pn_offset,
            pn_len,
            pn_len_known: true,
            tag_len,
            packet_number: PacketNumber::INFINITY,
        })
    }

    fn validate(
        buf_len: usize,
        pn_offset: usize,
        pn_len: usize,
        tag_len: usize,
    ) -> Result<(), Error> {
        if pn_offset == 0 || pn_offset > buf_len || !(1..=4).contains(&pn_len) {
            return Err(Error::PacketFormat {
                need: 1,
                have: 0,
            });
        }
        // Sample at the fixed offset, payload, and tag must all fit.
        // pn_offset is bounded by buf_len above; tag_len is still
        // caller-supplied, so saturate rather than wrap.
        let need = (pn_offset + SAMPLE_OFFSET + SAMPLE_LEN)
            .max(pn_offset.saturating_add(pn_len).saturating_add(tag_len));
        if buf_len < need {
            return Err(Error::PacketFormat {
                need,
                have: buf_len,
            });
        }
        Ok(())
    }

    /// Record the real packet number length learned from the
    /// unprotected first byte, narrowing the assumed 4-byte field.
    pub fn set_pn_len(&mut self, pn_len: usize) -> Result<(), Error> {
        Self::validate(self.buf.len(), self.pn_offset, pn_len, self.tag_len)?;
        self.pn_len = pn_len;
        self.pn_len_known = true;
        Ok(())
    }

    pub fn pn_offset(&self) -> usize {
        self.pn_offset
    }

    pub fn pn_len(&self) -> usize {
        self.pn_len
    }

    pub(crate) fn pn_len_known(&self) -> bool {
        self.pn_len_known
    }

    /// Protected payload length, excluding the auth tag. Only
    /// meaningful once the packet number length is known.
    pub fn payload_len(&self) -> usize {
        self.buf.len() - (self.pn_offset + self.pn_len) - self.tag_len
    }

    pub fn first_byte(&self) -> u8 {
        self.buf[0]
    }

    pub(crate) fn first_byte_mut(&mut self) -> &mut u8 {
        &mut self.buf[0]
    }

    /// The header: everything up to and including the packet number
    /// field. This is the AEAD associated data.
    pub fn header(&self) -> &[u8] {
        &self.buf[..self.pn_offset + self.pn_len]
    }

    pub(crate) fn pn_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.pn_offset..self.pn_offset + self.pn_len]
    }

    /// Copy of the 16-byte header-protection sample at the fixed
    /// offset past the packet number start.
    pub fn sample(&self) -> [u8; SAMPLE_LEN] {
        let start = self.pn_offset + SAMPLE_OFFSET;
        let mut sample = [0u8; SAMPLE_LEN];
        sample.copy_from_slice(&self.buf[start..start + SAMPLE_LEN]);
        sample
    }

    /// Split into (header, payload-and-tag) for in-place AEAD.
    pub(crate) fn split_header_body(&mut self) -> (&[u8], &mut [u8]) {
        let (head, body) = self.buf.split_at_mut(self.pn_offset + self.pn_len);
        (head, body)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.buf
    }

    /// Consume the view, returning the plaintext region after a
    /// successful payload decryption of `plaintext_len` bytes.
    pub(crate) fn into_payload(self, plaintext_len: usize) -> &'a mut [u8] {
        let start = self.pn_offset + self.pn_len;
        &mut self.buf[start..start + plaintext_len]
    }
}
