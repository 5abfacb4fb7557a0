//! Art-Net DMX over UDP on tokio.
//!
//! [`Receiver`] listens on a port and publishes every valid ArtDmx frame as a
//! [`DmxUpdate`](artnet_core::DmxUpdate); [`Sender`] frames updates and
//! transmits them to one destination.
//!
//! ```ignore
//! let receiver = Receiver::builder().port(6454).bind().await?;
//! let mut updates = receiver.subscribe();
//! while let Some(update) = updates.recv().await {
//!     println!("{update}");
//! }
//! ```

pub mod dispatch;
pub mod error;
pub mod receiver;
pub mod sender;

pub use artnet_core::packet::ARTNET_PORT;
pub use artnet_core::{DmxOptions, DmxUpdate, PortAddress};
pub use dispatch::{classify_datagram, Inbound};
pub use error::TransportError;
pub use receiver::{Receiver, ReceiverBuilder, ReceiverState, Subscription};
pub use sender::{Sender, SenderBuilder};
