use artnet_core::{DmxOptions, DmxUpdate, ARTNET_PORT};
use artnet_tools::{parse_channel_data, PortAddressArg};
use artnet_transport::Sender;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "artnet-send")]
struct Args {
    /// Node host name or IP; broadcast addresses are allowed.
    #[arg(long)]
    target: String,
    #[arg(long, default_value_t = ARTNET_PORT)]
    port: u16,
    #[command(flatten)]
    address: PortAddressArg,
    /// Channel values, e.g. `255,0,128`.
    #[arg(long)]
    data: String,
    #[arg(long, default_value_t = 14)]
    protocol_version: u16,
    /// Starting sequence number; 0 disables sequencing. Non-zero values
    /// advance 1..=255 on each repeat.
    #[arg(long, default_value_t = 0)]
    sequence: u8,
    #[arg(long, default_value_t = 0)]
    physical: u8,
    /// Number of frames to send.
    #[arg(long, default_value_t = 1)]
    repeat: u32,
    #[arg(long, default_value_t = 25)]
    interval_ms: u64,
}

fn next_sequence(sequence: u8) -> u8 {
    match sequence {
        0 => 0,
        255 => 1,
        n => n + 1,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let channel_data = parse_channel_data(&args.data)?;
    let update = DmxUpdate::new(args.address.into_port_address()?, channel_data)?;
    let sender = Sender::connect_host(&args.target, args.port).await?;
    let mut options = DmxOptions {
        protocol_version: args.protocol_version,
        sequence: args.sequence,
        physical: args.physical,
    };

    let mut ticker = tokio::time::interval(Duration::from_millis(args.interval_ms.max(1)));
    for _ in 0..args.repeat {
        ticker.tick().await;
        sender.send(&update, options).await?;
        options.sequence = next_sequence(options.sequence);
    }
    log::info!(
        "sent {} frame(s) for universe {} to {}",
        args.repeat,
        update.port_address(),
        sender.destination()
    );
    sender.close();
    Ok(())
}
