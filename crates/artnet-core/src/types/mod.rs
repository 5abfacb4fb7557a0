#[cfg(feature = "alloc")]
pub mod dmx_update;
pub mod port_address;

#[cfg(feature = "alloc")]
pub use dmx_update::DmxUpdate;
pub use port_address::PortAddress;
