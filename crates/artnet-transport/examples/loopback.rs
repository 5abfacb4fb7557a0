//! Send a short DMX fade to a receiver on the same machine.
//!
//! Usage:
//!   cargo run -p artnet-transport --example loopback

use artnet_transport::{DmxOptions, DmxUpdate, Receiver, Sender};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Listen on an ephemeral loopback port instead of 6454 so the example
    // never clashes with a running lighting desk.
    let receiver = Receiver::bind(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)).await?;
    let mut updates = receiver.subscribe();
    let sender = Sender::connect(receiver.local_addr()).await?;

    for (i, level) in (0..=255u8).step_by(51).enumerate() {
        let update = DmxUpdate::from_parts(0, 0, 1, vec![level; 8])?;
        let options = DmxOptions {
            sequence: i as u8 + 1,
            ..DmxOptions::default()
        };
        sender.send(&update, options).await?;
    }

    while let Ok(Some(update)) =
        tokio::time::timeout(Duration::from_millis(500), updates.recv()).await
    {
        println!("{update}");
    }

    receiver.shutdown().await;
    Ok(())
}
