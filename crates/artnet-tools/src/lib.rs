use artnet_core::{PortAddress, ValidationError};
use clap::Args;

/// Port address selection shared by the tools.
///
/// `--universe` takes the flat 15-bit form and cannot be combined with the
/// three-part form.
#[derive(Debug, Clone, Args)]
pub struct PortAddressArg {
    /// Flat port address (0-32767).
    #[arg(long, conflicts_with_all = ["net", "sub_net", "sub_uni"])]
    pub universe: Option<u16>,
    #[arg(long, default_value_t = 0)]
    pub net: u8,
    #[arg(long, default_value_t = 0)]
    pub sub_net: u8,
    /// Universe within the sub-net (0-15).
    #[arg(long, default_value_t = 0)]
    pub sub_uni: u8,
}

impl PortAddressArg {
    pub fn into_port_address(self) -> Result<PortAddress, ValidationError> {
        match self.universe {
            Some(flat) => PortAddress::from_universe(flat),
            None => PortAddress::from_parts(self.net, self.sub_net, self.sub_uni),
        }
    }
}

/// Parses channel values written as `255,0,128`.
///
/// Whitespace around values is ignored. Length limits are left to
/// [`DmxUpdate`](artnet_core::DmxUpdate).
pub fn parse_channel_data(raw: &str) -> Result<Vec<u8>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .map_err(|err| format!("invalid channel value {s:?}: {err}"))
        })
        .collect()
}
