//! Art-Net framing shared by every packet type.
//!
//! Every frame starts with the 8-byte protocol id followed by a little-endian
//! op-code. [`has_artnet_id`] and [`classify_op_code`] are cheap enough to run
//! on every datagram before deciding whether to decode it.

pub mod dmx;
pub mod op_code;

use crate::encoding::reader::Reader;
use op_code::OpCode;

/// `"Art-Net\0"`, the first eight bytes of every frame.
pub const ARTNET_ID: [u8; 8] = *b"Art-Net\0";
/// Well-known Art-Net UDP port.
pub const ARTNET_PORT: u16 = 6454;
/// Protocol revision written by default.
pub const DEFAULT_PROTOCOL_VERSION: u16 = 14;
/// ArtDmx header length; channel data starts at this offset.
pub const DMX_HEADER_LEN: usize = 18;
pub const DMX_MIN_CHANNELS: usize = 1;
pub const DMX_MAX_CHANNELS: usize = 512;
/// Largest well-formed ArtDmx frame.
pub const DMX_MAX_FRAME_LEN: usize = DMX_HEADER_LEN + DMX_MAX_CHANNELS;

const OP_CODE_END: usize = 10;

/// Returns `true` if `raw` starts with the exact Art-Net protocol id.
pub fn has_artnet_id(raw: &[u8]) -> bool {
    raw.starts_with(&ARTNET_ID)
}

/// Reads the op-code at offset 8.
///
/// Returns `None` when `raw` is too short to carry one. The protocol id is not
/// checked here.
pub fn classify_op_code(raw: &[u8]) -> Option<OpCode> {
    let mut r = Reader::new(raw.get(ARTNET_ID.len()..OP_CODE_END)?);
    r.read_le_u16().ok().map(OpCode::from_u16)
}

#[cfg(test)]
mod tests {
    use super::{classify_op_code, has_artnet_id, ARTNET_ID};
    use crate::OpCode;

    #[test]
    fn id_check_is_exact() {
        assert!(has_artnet_id(b"Art-Net\0\x00\x50"));
        assert!(!has_artnet_id(b"Art-Net\x01\x00\x50"));
        assert!(!has_artnet_id(b"Art-Ne"));
        assert!(!has_artnet_id(b"ASC-E1.17\0\0\0"));
    }

    #[test]
    fn classifies_little_endian_op_code() {
        let mut raw = ARTNET_ID.to_vec();
        raw.extend_from_slice(&[0x00, 0x50]);
        assert_eq!(classify_op_code(&raw), Some(OpCode::OpDmx));

        raw[8..10].copy_from_slice(&[0x00, 0x20]);
        assert_eq!(classify_op_code(&raw), Some(OpCode::OpPoll));

        raw[8..10].copy_from_slice(&[0x34, 0x12]);
        assert_eq!(classify_op_code(&raw), Some(OpCode::Unknown(0x1234)));
    }

    #[test]
    fn short_buffer_has_no_op_code() {
        assert_eq!(classify_op_code(&ARTNET_ID), None);
        assert_eq!(classify_op_code(b"Art-Net\0\x00"), None);
        assert_eq!(classify_op_code(&[]), None);
    }
}
