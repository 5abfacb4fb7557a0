use crate::packet::{DMX_MAX_CHANNELS, DMX_MIN_CHANNELS};
use crate::types::PortAddress;
use crate::ValidationError;
use alloc::vec::Vec;
use core::fmt;

/// Channel data addressed to one universe.
///
/// The payload always holds between 1 and 512 bytes; every constructor checks
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DmxUpdate {
    port_address: PortAddress,
    channel_data: Vec<u8>,
}

impl DmxUpdate {
    pub fn new(
        port_address: PortAddress,
        channel_data: impl Into<Vec<u8>>,
    ) -> Result<Self, ValidationError> {
        let channel_data = channel_data.into();
        if !(DMX_MIN_CHANNELS..=DMX_MAX_CHANNELS).contains(&channel_data.len()) {
            return Err(ValidationError::PayloadLength(channel_data.len()));
        }
        Ok(Self {
            port_address,
            channel_data,
        })
    }

    pub fn from_parts(
        net: u8,
        sub_net: u8,
        universe: u8,
        channel_data: impl Into<Vec<u8>>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            PortAddress::from_parts(net, sub_net, universe)?,
            channel_data,
        )
    }

    pub fn from_universe(
        universe: u16,
        channel_data: impl Into<Vec<u8>>,
    ) -> Result<Self, ValidationError> {
        Self::new(PortAddress::from_universe(universe)?, channel_data)
    }

    pub const fn port_address(&self) -> PortAddress {
        self.port_address
    }

    /// Flat 15-bit universe this update is addressed to.
    pub const fn universe(&self) -> u16 {
        self.port_address.to_universe()
    }

    pub fn channel_data(&self) -> &[u8] {
        &self.channel_data
    }

    pub fn into_channel_data(self) -> Vec<u8> {
        self.channel_data
    }
}

impl fmt::Display for DmxUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "universe {} [", self.port_address)?;
        for (i, value) in self.channel_data.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}
