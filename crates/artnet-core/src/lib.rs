//! Art-Net DMX packet encoding and decoding in pure Rust.
//!
//! `artnet-core` provides the 15-bit port address type, the Art-Net op-code
//! table, and a zero-copy, `no_std`-compatible codec for ArtDmx frames. It has
//! no I/O of its own; `artnet-transport` drives it over UDP.
//!
//! # Feature flags
//!
//! - **`std`** (default): enables `std::error::Error` implementations.
//! - **`alloc`** (default): enables the owned [`DmxUpdate`] type and
//!   [`packet::dmx::encode_dmx`].
//! - **`serde`**: derives `Serialize` on public value types.
//! - **`defmt`**: derives `defmt::Format` for embedded logging.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// Zero-copy reader and caller-owned buffer writer.
pub mod encoding;
/// Error types for validation, encoding, and decoding.
pub mod error;
/// Art-Net framing: protocol id, op-codes, and the ArtDmx packet.
pub mod packet;
/// Value types: port addresses and DMX updates.
pub mod types;

pub use error::{DecodeError, EncodeError, ValidationError};
pub use packet::dmx::{ArtDmx, DmxOptions};
pub use packet::op_code::OpCode;
pub use packet::ARTNET_PORT;
#[cfg(feature = "alloc")]
pub use types::DmxUpdate;
pub use types::PortAddress;
