//! Classification of raw datagrams arriving on an Art-Net port.

use artnet_core::packet::{classify_op_code, has_artnet_id};
use artnet_core::{ArtDmx, DecodeError, DmxUpdate, OpCode, ValidationError};

/// What one datagram turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A well-formed ArtDmx frame.
    Dmx(DmxUpdate),
    /// Missing or wrong protocol id.
    NotArtNet,
    /// An Art-Net frame with no handler. `None` when the frame is too short to
    /// carry an op-code.
    Unhandled(Option<OpCode>),
    /// An ArtDmx frame with a bad header or truncated payload.
    Malformed(DecodeError),
    /// An ArtDmx frame whose port address has the reserved top bit set.
    InvalidAddress(ValidationError),
}

/// Screens, classifies, and decodes a single datagram.
///
/// The protocol id is checked first so that foreign traffic sharing the port
/// costs a single comparison.
pub fn classify_datagram(frame: &[u8]) -> Inbound {
    if !has_artnet_id(frame) {
        return Inbound::NotArtNet;
    }
    match classify_op_code(frame) {
        Some(OpCode::OpDmx) => {}
        other => return Inbound::Unhandled(other),
    }
    let packet = match ArtDmx::decode(frame) {
        Ok(packet) => packet,
        Err(err) => return Inbound::Malformed(err),
    };
    match packet.to_update() {
        Ok(update) => Inbound::Dmx(update),
        Err(err) => Inbound::InvalidAddress(err),
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_datagram, Inbound};
    use artnet_core::packet::dmx::encode_dmx;
    use artnet_core::packet::ARTNET_ID;
    use artnet_core::{DecodeError, DmxOptions, DmxUpdate, OpCode, ValidationError};

    fn header(op_code: u16, port_address: u16, length: u16) -> Vec<u8> {
        let mut raw = ARTNET_ID.to_vec();
        raw.extend_from_slice(&op_code.to_le_bytes());
        raw.extend_from_slice(&14u16.to_be_bytes());
        raw.extend_from_slice(&[0, 0]);
        raw.extend_from_slice(&port_address.to_le_bytes());
        raw.extend_from_slice(&length.to_be_bytes());
        raw
    }

    #[test]
    fn decodes_dmx_frame() {
        let update = DmxUpdate::from_parts(2, 3, 4, vec![1, 2, 3]).unwrap();
        let frame = encode_dmx(&update, DmxOptions::default()).unwrap();
        assert_eq!(classify_datagram(&frame), Inbound::Dmx(update));
    }

    #[test]
    fn foreign_traffic_is_not_artnet() {
        assert_eq!(classify_datagram(b"hello world, not art-net"), Inbound::NotArtNet);
        assert_eq!(classify_datagram(&[]), Inbound::NotArtNet);
        assert_eq!(classify_datagram(&ARTNET_ID[..7]), Inbound::NotArtNet);
    }

    #[test]
    fn short_frames_publish_nothing() {
        let raw = header(0x5000, 0, 1);
        for len in 0..18 {
            assert!(!matches!(classify_datagram(&raw[..len]), Inbound::Dmx(_)));
        }
        assert_eq!(classify_datagram(&raw[..9]), Inbound::Unhandled(None));
        assert_eq!(
            classify_datagram(&raw[..17]),
            Inbound::Malformed(DecodeError::TooShort { actual: 17 })
        );
    }

    #[test]
    fn other_op_codes_are_unhandled() {
        let mut poll = header(0x2000, 0, 0);
        poll.truncate(14);
        assert_eq!(
            classify_datagram(&poll),
            Inbound::Unhandled(Some(OpCode::OpPoll))
        );

        let mut unknown = header(0x1234, 0, 1);
        unknown.push(0);
        assert_eq!(
            classify_datagram(&unknown),
            Inbound::Unhandled(Some(OpCode::Unknown(0x1234)))
        );
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let mut raw = header(0x5000, 0, 3);
        raw.extend_from_slice(&[9, 9]);
        assert_eq!(
            classify_datagram(&raw),
            Inbound::Malformed(DecodeError::TruncatedPayload {
                declared: 3,
                available: 2
            })
        );
    }

    #[test]
    fn reserved_address_bit_is_rejected() {
        let mut raw = header(0x5000, 0x8001, 1);
        raw.push(7);
        assert_eq!(
            classify_datagram(&raw),
            Inbound::InvalidAddress(ValidationError::PortAddressOutOfRange(0x8001))
        );
    }
}
