use artnet_core::ARTNET_PORT;
use artnet_transport::Receiver;
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Parser, Debug)]
#[command(name = "artnet-listen")]
struct Args {
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    bind: IpAddr,
    #[arg(long, default_value_t = ARTNET_PORT)]
    port: u16,
    /// Only accept datagrams from this node.
    #[arg(long)]
    source: Option<SocketAddr>,
    /// Only print updates for this flat universe.
    #[arg(long)]
    universe: Option<u16>,
    /// Exit after this many printed updates.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    count: Option<u64>,
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut builder = Receiver::builder().bind_addr(SocketAddr::new(args.bind, args.port));
    if let Some(source) = args.source {
        builder = builder.source(source);
    }
    let receiver = builder.bind().await?;
    let mut updates = receiver.subscribe();
    eprintln!(
        "Listening for ArtDmx on {} (Ctrl+C to stop)...",
        receiver.local_addr()
    );

    let mut printed = 0u64;
    while let Some(update) = updates.recv().await {
        if args.universe.is_some_and(|u| u != update.universe()) {
            continue;
        }
        if args.json {
            println!("{}", serde_json::to_string(&update)?);
        } else {
            println!("{update}");
        }
        printed += 1;
        if args.count.is_some_and(|limit| printed >= limit) {
            break;
        }
    }

    receiver.shutdown().await;
    Ok(())
}
