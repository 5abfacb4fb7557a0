#![no_main]

use artnet_core::packet::dmx::encode_dmx;
use artnet_core::packet::DMX_MAX_FRAME_LEN;
use artnet_core::ArtDmx;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(packet) = ArtDmx::decode(data) else {
        return;
    };
    assert!(packet.encoded_len() <= data.len());
    if let Ok(update) = packet.to_update() {
        let frame = encode_dmx(&update, packet.options()).unwrap();
        assert!(frame.len() <= DMX_MAX_FRAME_LEN);
        let again = ArtDmx::decode(&frame).unwrap();
        assert_eq!(again.data, packet.data);
        assert_eq!(again.port_address, packet.port_address);
    }
});
