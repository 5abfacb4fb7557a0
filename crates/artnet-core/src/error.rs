use core::fmt;

/// A value rejected at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValidationError {
    /// Net is a 7-bit field.
    NetOutOfRange(u8),
    /// Sub-net is a 4-bit field.
    SubNetOutOfRange(u8),
    /// Universe is a 4-bit field.
    UniverseOutOfRange(u8),
    /// The flat port address is a 15-bit value.
    PortAddressOutOfRange(u16),
    /// DMX payloads carry between 1 and 512 channels.
    PayloadLength(usize),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetOutOfRange(v) => write!(f, "net {v} out of range 0..=127"),
            Self::SubNetOutOfRange(v) => write!(f, "sub-net {v} out of range 0..=15"),
            Self::UniverseOutOfRange(v) => write!(f, "universe {v} out of range 0..=15"),
            Self::PortAddressOutOfRange(v) => {
                write!(f, "port address {v} out of range 0..=32767")
            }
            Self::PayloadLength(len) => {
                write!(f, "dmx payload length {len} out of range 1..=512")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    BufferTooSmall,
    InvalidLength,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall => f.write_str("buffer too small"),
            Self::InvalidLength => f.write_str("invalid length"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    UnexpectedEof,
    /// Fewer bytes than a full ArtDmx header.
    TooShort { actual: usize },
    /// Declared data length outside 1..=512.
    InvalidLength(u16),
    /// Declared data length runs past the end of the datagram.
    TruncatedPayload { declared: u16, available: usize },
    InvalidValue,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof => f.write_str("unexpected end of input"),
            Self::TooShort { actual } => {
                write!(f, "frame too short: need 18 bytes, got {actual}")
            }
            Self::InvalidLength(len) => write!(f, "invalid ArtDmx length {len}"),
            Self::TruncatedPayload {
                declared,
                available,
            } => write!(
                f,
                "truncated payload: declared {declared} bytes, {available} available"
            ),
            Self::InvalidValue => f.write_str("invalid value"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}
