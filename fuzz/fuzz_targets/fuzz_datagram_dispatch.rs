#![no_main]

use artnet_transport::{classify_datagram, Inbound};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Inbound::Dmx(update) = classify_datagram(data) {
        assert!(!update.channel_data().is_empty());
        assert!(update.channel_data().len() <= 512);
    }
});
