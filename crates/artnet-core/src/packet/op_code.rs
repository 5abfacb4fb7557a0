/// Art-Net packet type, carried little-endian at offset 8.
///
/// Only [`OpCode::OpDmx`] is decoded by this crate; the other named codes are
/// recognised so callers can tell "known but unhandled" from garbage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpCode {
    OpPoll,
    OpPollReply,
    OpDiagData,
    OpCommand,
    OpDmx,
    OpNzs,
    OpSync,
    OpAddress,
    OpInput,
    Unknown(u16),
}

impl OpCode {
    pub const fn from_u16(value: u16) -> Self {
        match value {
            0x2000 => Self::OpPoll,
            0x2100 => Self::OpPollReply,
            0x2300 => Self::OpDiagData,
            0x2400 => Self::OpCommand,
            0x5000 => Self::OpDmx,
            0x5100 => Self::OpNzs,
            0x5200 => Self::OpSync,
            0x6000 => Self::OpAddress,
            0x7000 => Self::OpInput,
            v => Self::Unknown(v),
        }
    }

    pub const fn to_u16(self) -> u16 {
        match self {
            Self::OpPoll => 0x2000,
            Self::OpPollReply => 0x2100,
            Self::OpDiagData => 0x2300,
            Self::OpCommand => 0x2400,
            Self::OpDmx => 0x5000,
            Self::OpNzs => 0x5100,
            Self::OpSync => 0x5200,
            Self::OpAddress => 0x6000,
            Self::OpInput => 0x7000,
            Self::Unknown(v) => v,
        }
    }
}
