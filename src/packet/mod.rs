//! Packet-level protection: number codec, zero-copy packet view,
//! header protection, the orchestrating packet cipher, and Retry
//! integrity.

pub mod cipher;
pub mod header_protection;
pub mod number;
pub mod retry;
mod view;

pub use cipher::{ProtectedPacket, UnprotectedPacket};
pub use view::{CryptoPacketView, SAMPLE_LEN, SAMPLE_OFFSET, TAG_LEN};

/// Maximum connection ID length (RFC 9000 section 17.2).
pub const MAX_CID_LEN: usize = 20;
