//! ArtDmx, the DMX data packet (op-code `0x5000`).
//!
//! ```text
//! 0..8    "Art-Net\0"
//! 8..10   op-code            little-endian
//! 10..12  protocol version   big-endian
//! 12      sequence
//! 13      physical
//! 14..16  port address       little-endian (SubUni, then Net)
//! 16..18  data length        big-endian
//! 18..    channel data
//! ```
//!
//! The mixed byte order is part of the protocol and must be kept bit-for-bit.

use crate::encoding::{reader::Reader, writer::Writer};
use crate::packet::op_code::OpCode;
use crate::packet::{
    ARTNET_ID, DEFAULT_PROTOCOL_VERSION, DMX_HEADER_LEN, DMX_MAX_CHANNELS, DMX_MIN_CHANNELS,
};
use crate::types::PortAddress;
use crate::{DecodeError, EncodeError, ValidationError};

#[cfg(feature = "alloc")]
use crate::types::DmxUpdate;
#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Header fields the caller may choose when encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmxOptions {
    pub protocol_version: u16,
    /// 0 disables sequencing on the receiving node.
    pub sequence: u8,
    pub physical: u8,
}

impl Default for DmxOptions {
    fn default() -> Self {
        Self {
            protocol_version: DEFAULT_PROTOCOL_VERSION,
            sequence: 0,
            physical: 0,
        }
    }
}

/// A borrowed ArtDmx frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtDmx<'a> {
    pub op_code: OpCode,
    pub protocol_version: u16,
    pub sequence: u8,
    pub physical: u8,
    /// Raw port address as read from the wire. Bit 15 is reserved and may be
    /// set by a misbehaving sender; [`ArtDmx::port_address`] rejects it.
    pub port_address: u16,
    pub data: &'a [u8],
}

impl<'a> ArtDmx<'a> {
    pub const fn new(port_address: PortAddress, data: &'a [u8], options: DmxOptions) -> Self {
        Self {
            op_code: OpCode::OpDmx,
            protocol_version: options.protocol_version,
            sequence: options.sequence,
            physical: options.physical,
            port_address: port_address.to_universe(),
            data,
        }
    }

    pub const fn encoded_len(&self) -> usize {
        DMX_HEADER_LEN + self.data.len()
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        let len = self.data.len();
        if !(DMX_MIN_CHANNELS..=DMX_MAX_CHANNELS).contains(&len) {
            return Err(EncodeError::InvalidLength);
        }
        if w.remaining() < self.encoded_len() {
            return Err(EncodeError::BufferTooSmall);
        }
        w.write_all(&ARTNET_ID)?;
        w.write_le_u16(self.op_code.to_u16())?;
        w.write_be_u16(self.protocol_version)?;
        w.write_u8(self.sequence)?;
        w.write_u8(self.physical)?;
        w.write_le_u16(self.port_address)?;
        w.write_be_u16(len as u16)?;
        w.write_all(self.data)
    }

    /// Decodes the ArtDmx layout from a whole datagram.
    ///
    /// The protocol id is skipped, not checked. A declared length that runs
    /// past the end of `raw` is rejected; trailing bytes after the declared
    /// payload are ignored.
    pub fn decode(raw: &'a [u8]) -> Result<Self, DecodeError> {
        if raw.len() < DMX_HEADER_LEN {
            return Err(DecodeError::TooShort { actual: raw.len() });
        }
        let mut r = Reader::new(raw);
        r.read_exact(ARTNET_ID.len())?;
        let op_code = OpCode::from_u16(r.read_le_u16()?);
        let protocol_version = r.read_be_u16()?;
        let sequence = r.read_u8()?;
        let physical = r.read_u8()?;
        let port_address = r.read_le_u16()?;
        let length = r.read_be_u16()?;
        if !(DMX_MIN_CHANNELS..=DMX_MAX_CHANNELS).contains(&usize::from(length)) {
            return Err(DecodeError::InvalidLength(length));
        }
        let data = r
            .read_exact(usize::from(length))
            .map_err(|_| DecodeError::TruncatedPayload {
                declared: length,
                available: raw.len() - DMX_HEADER_LEN,
            })?;

        Ok(Self {
            op_code,
            protocol_version,
            sequence,
            physical,
            port_address,
            data,
        })
    }

    pub const fn options(&self) -> DmxOptions {
        DmxOptions {
            protocol_version: self.protocol_version,
            sequence: self.sequence,
            physical: self.physical,
        }
    }

    pub const fn port_address(&self) -> Result<PortAddress, ValidationError> {
        PortAddress::from_universe(self.port_address)
    }

    #[cfg(feature = "alloc")]
    pub fn to_update(&self) -> Result<DmxUpdate, ValidationError> {
        DmxUpdate::new(self.port_address()?, self.data)
    }
}

/// Encodes `update` into a freshly allocated ArtDmx frame.
#[cfg(feature = "alloc")]
pub fn encode_dmx(update: &DmxUpdate, options: DmxOptions) -> Result<Vec<u8>, EncodeError> {
    let packet = ArtDmx::new(update.port_address(), update.channel_data(), options);
    let mut buf = vec![0u8; packet.encoded_len()];
    let mut w = Writer::new(&mut buf);
    packet.encode(&mut w)?;
    Ok(buf)
}
