//! QUIC packet protection: AEAD payload sealing, header protection,
//! the packet number codec, and Retry integrity, for QUIC v1
//! (RFC 9001) and v2 (RFC 9369).
//!
//! The crate covers the crypto layer between a TLS handshake (which
//! supplies traffic secrets) and a transport (which parses headers and
//! owns packet buffers). Everything works in place over caller-owned
//! buffers; there is no I/O, no allocation on the packet paths, and no
//! connection state.
//!
//! Typical receive path:
//!
//! ```ignore
//! let initial = key_schedule::derive_initial_secret(version, dcid);
//! let secret = key_schedule::derive_client_server_secret(&initial, true)?;
//! let keys = key_schedule::derive_key_material(version, &secret, suite::INITIAL_SUITE)?;
//!
//! let packet = ProtectedPacket::parse(&mut buf, pn_offset)?;
//! let packet = packet.unprotect_header(&keys, largest_pn)?;
//! let plaintext = packet.decrypt_payload(&keys)?;
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod error;
pub mod suite;
pub mod version;

pub mod crypto;
pub mod key_schedule;
pub mod packet;

pub use crypto::{KeyMaterial, Secret};
pub use error::Error;
pub use packet::number::{PacketNumber, PacketNumberSpace, PacketNumberSpaces};
pub use packet::{CryptoPacketView, ProtectedPacket, UnprotectedPacket};
pub use suite::{CipherSuite, INITIAL_SUITE};
pub use version::Version;
