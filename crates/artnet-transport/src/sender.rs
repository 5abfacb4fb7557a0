use crate::TransportError;
use artnet_core::packet::dmx::encode_dmx;
use artnet_core::packet::ARTNET_PORT;
use artnet_core::{DmxOptions, DmxUpdate};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::{lookup_host, UdpSocket};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Builder for [`Sender`].
#[derive(Debug, Clone)]
pub struct SenderBuilder {
    destination: SocketAddr,
    bind_addr: SocketAddr,
    broadcast: bool,
}

impl SenderBuilder {
    pub fn new(destination: SocketAddr) -> Self {
        Self {
            destination,
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            broadcast: true,
        }
    }

    /// Local address to send from. Defaults to an ephemeral port on all
    /// interfaces.
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Allow broadcast destinations. On by default.
    pub fn broadcast(mut self, enabled: bool) -> Self {
        self.broadcast = enabled;
        self
    }

    pub async fn bind(self) -> Result<Sender, TransportError> {
        let socket = UdpSocket::bind(self.bind_addr).await?;
        socket.set_broadcast(self.broadcast)?;
        let (shutdown, _) = watch::channel(false);
        Ok(Sender {
            socket: Mutex::new(Some(Arc::new(socket))),
            destination: self.destination,
            shutdown,
        })
    }
}

/// Sends ArtDmx frames to a single destination.
///
/// Sends are independent: two concurrent calls may reach the wire in either
/// order. Await one before issuing the next when order matters.
#[derive(Debug)]
pub struct Sender {
    socket: Mutex<Option<Arc<UdpSocket>>>,
    destination: SocketAddr,
    shutdown: watch::Sender<bool>,
}

impl Sender {
    /// Binds an ephemeral socket that sends to `destination`.
    pub async fn connect(destination: SocketAddr) -> Result<Self, TransportError> {
        SenderBuilder::new(destination).bind().await
    }

    /// Resolves `host` and sends to the first address found.
    pub async fn connect_host(host: &str, port: u16) -> Result<Self, TransportError> {
        let destination = lookup_host((host, port))
            .await?
            .next()
            .ok_or_else(|| TransportError::NoAddress(host.to_string()))?;
        Self::connect(destination).await
    }

    /// Sends to `host` on the standard Art-Net port.
    pub async fn connect_default_port(host: &str) -> Result<Self, TransportError> {
        Self::connect_host(host, ARTNET_PORT).await
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        let socket = self.socket()?;
        Ok(socket.local_addr()?)
    }

    pub fn is_closed(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Encodes `update` and hands it to the OS. Resolves once the datagram is
    /// queued; UDP gives no delivery confirmation.
    pub async fn send(
        &self,
        update: &DmxUpdate,
        options: DmxOptions,
    ) -> Result<(), TransportError> {
        let socket = self.socket()?;
        let frame = encode_dmx(update, options)?;
        socket.send_to(&frame, self.destination).await?;
        Ok(())
    }

    pub async fn send_default(&self, update: &DmxUpdate) -> Result<(), TransportError> {
        self.send(update, DmxOptions::default()).await
    }

    /// Fire-and-forget send on a background task.
    ///
    /// Encoding happens before this returns. The spawned transmission is
    /// abandoned, and resolves `Ok(())`, if the sender is closed first.
    pub fn spawn_send(
        &self,
        update: DmxUpdate,
        options: DmxOptions,
    ) -> Result<JoinHandle<Result<(), TransportError>>, TransportError> {
        let socket = self.socket()?;
        let frame = encode_dmx(&update, options)?;
        let destination = self.destination;
        let mut shutdown_rx = self.shutdown.subscribe();

        Ok(tokio::spawn(async move {
            if *shutdown_rx.borrow() {
                return Ok(());
            }
            tokio::select! {
                _ = shutdown_rx.changed() => Ok(()),
                sent = socket.send_to(&frame, destination) => match sent {
                    Ok(_) => Ok(()),
                    Err(err) => {
                        log::warn!("artnet send to {destination} failed: {err}");
                        Err(TransportError::Io(err))
                    }
                },
            }
        }))
    }

    /// Cancels outstanding spawned sends and releases the socket. Safe to call
    /// more than once.
    pub fn close(&self) {
        self.shutdown.send_replace(true);
        self.slot().take();
    }

    fn socket(&self) -> Result<Arc<UdpSocket>, TransportError> {
        self.slot().as_ref().cloned().ok_or(TransportError::Closed)
    }

    fn slot(&self) -> MutexGuard<'_, Option<Arc<UdpSocket>>> {
        self.socket
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Sender {
    fn drop(&mut self) {
        self.close();
    }
}
