use crate::ValidationError;
use core::fmt;

const NET_MAX: u8 = 0x7F;
const NIBBLE_MAX: u8 = 0x0F;

/// A packed Art-Net port address combining net, sub-net, and universe into a
/// single 15-bit value.
///
/// Bits 14..8 hold the net, bits 7..4 the sub-net, and bits 3..0 the
/// universe. The low byte is what Art-Net calls `SubUni`; the high byte is
/// `Net`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortAddress(u16);

impl PortAddress {
    /// Highest flat port address.
    pub const MAX: u16 = 0x7FFF;

    /// Builds a port address from its three fields.
    pub const fn from_parts(net: u8, sub_net: u8, universe: u8) -> Result<Self, ValidationError> {
        if net > NET_MAX {
            return Err(ValidationError::NetOutOfRange(net));
        }
        if sub_net > NIBBLE_MAX {
            return Err(ValidationError::SubNetOutOfRange(sub_net));
        }
        if universe > NIBBLE_MAX {
            return Err(ValidationError::UniverseOutOfRange(universe));
        }
        Ok(Self(
            ((net as u16) << 8) | ((sub_net as u16) << 4) | universe as u16,
        ))
    }

    /// Builds a port address from its flat 15-bit form.
    pub const fn from_universe(flat: u16) -> Result<Self, ValidationError> {
        if flat > Self::MAX {
            return Err(ValidationError::PortAddressOutOfRange(flat));
        }
        Ok(Self(flat))
    }

    /// Returns the flat 15-bit form.
    pub const fn to_universe(self) -> u16 {
        self.0
    }

    pub const fn net(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn sub_net(self) -> u8 {
        ((self.0 & 0xF0) >> 4) as u8
    }

    pub const fn universe(self) -> u8 {
        (self.0 & 0x0F) as u8
    }
}

impl TryFrom<u16> for PortAddress {
    type Error = ValidationError;

    fn try_from(flat: u16) -> Result<Self, Self::Error> {
        Self::from_universe(flat)
    }
}

impl From<PortAddress> for u16 {
    fn from(address: PortAddress) -> Self {
        address.to_universe()
    }
}

impl fmt::Display for PortAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.net(), self.sub_net(), self.universe())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PortAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("PortAddress", 3)?;
        s.serialize_field("net", &self.net())?;
        s.serialize_field("sub_net", &self.sub_net())?;
        s.serialize_field("universe", &self.universe())?;
        s.end()
    }
}
