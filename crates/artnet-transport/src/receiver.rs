//! Long-running Art-Net receiver.
//!
//! A [`Receiver`] owns a UDP socket and a background task that turns inbound
//! ArtDmx frames into [`DmxUpdate`] events. Any number of [`Subscription`]s
//! can watch the event stream; publishing never waits on them.

use crate::dispatch::{classify_datagram, Inbound};
use crate::TransportError;
use artnet_core::packet::ARTNET_PORT;
use artnet_core::DmxUpdate;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

// Larger than any ArtDmx frame; other op-codes may be longer and are only
// inspected up to the op-code.
const MAX_DATAGRAM_LEN: usize = 1500;
const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Lifecycle of a [`Receiver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverState {
    /// Not yet bound. A [`Receiver`] handle never reports this.
    Idle,
    Listening,
    /// Terminal.
    Closed,
}

impl ReceiverState {
    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Listening,
            _ => Self::Closed,
        }
    }

    const fn to_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Listening => 1,
            Self::Closed => 2,
        }
    }
}

/// Builder for [`Receiver`].
#[derive(Debug, Clone)]
pub struct ReceiverBuilder {
    bind_addr: SocketAddr,
    source: Option<SocketAddr>,
    event_capacity: usize,
}

impl Default for ReceiverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiverBuilder {
    /// Listens on `0.0.0.0:6454` by default.
    pub fn new() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), ARTNET_PORT),
            source: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.bind_addr.set_port(port);
        self
    }

    /// Only accept datagrams from `peer`.
    pub fn source(mut self, peer: SocketAddr) -> Self {
        self.source = Some(peer);
        self
    }

    /// Events buffered per subscriber before the oldest are dropped.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Binds the socket and starts the receive loop on the current tokio
    /// runtime.
    pub async fn bind(self) -> Result<Receiver, TransportError> {
        let socket = UdpSocket::bind(self.bind_addr).await?;
        if let Some(peer) = self.source {
            socket.connect(peer).await?;
        }
        let local_addr = socket.local_addr()?;

        let state = Arc::new(AtomicU8::new(ReceiverState::Listening.to_u8()));
        let (events, _) = broadcast::channel(self.event_capacity);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run_receive_loop(
            socket,
            events.clone(),
            shutdown_rx,
            Arc::clone(&state),
        ));
        log::debug!("artnet receiver bound to {local_addr}");

        Ok(Receiver {
            local_addr,
            state,
            shutdown: shutdown_tx,
            events: Some(events),
            task: Some(task),
        })
    }
}

/// Background Art-Net receiver handle.
///
/// Dropping the handle stops the loop and releases the socket.
#[derive(Debug)]
pub struct Receiver {
    local_addr: SocketAddr,
    state: Arc<AtomicU8>,
    shutdown: watch::Sender<bool>,
    events: Option<broadcast::Sender<DmxUpdate>>,
    task: Option<JoinHandle<()>>,
}

impl Receiver {
    pub fn builder() -> ReceiverBuilder {
        ReceiverBuilder::new()
    }

    /// Shorthand for `Receiver::builder().bind_addr(addr).bind()`.
    pub async fn bind(addr: SocketAddr) -> Result<Self, TransportError> {
        ReceiverBuilder::new().bind_addr(addr).bind().await
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> ReceiverState {
        if *self.shutdown.borrow() {
            return ReceiverState::Closed;
        }
        ReceiverState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Starts a new subscription. It only sees events published after this
    /// call. Subscribing to a closed receiver yields an already-ended stream.
    pub fn subscribe(&self) -> Subscription {
        let rx = match &self.events {
            Some(events) => events.subscribe(),
            None => broadcast::channel(1).1,
        };
        Subscription { rx }
    }

    /// Stops the receive loop. Safe to call more than once.
    pub fn close(&mut self) {
        self.shutdown.send_replace(true);
        self.events = None;
    }

    /// Stops the receive loop and waits for it to release the socket.
    pub async fn shutdown(mut self) {
        self.close();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                log::debug!("artnet receiver task ended abnormally: {err}");
            }
        }
    }
}

impl Drop for Receiver {
    fn drop(&mut self) {
        self.close();
    }
}

/// A stream of [`DmxUpdate`]s from one [`Receiver`].
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<DmxUpdate>,
}

impl Subscription {
    /// Waits for the next update. Returns `None` once the receiver has shut
    /// down and every buffered update has been read.
    ///
    /// A subscription that falls more than the event capacity behind skips
    /// the oldest updates.
    pub async fn recv(&mut self) -> Option<DmxUpdate> {
        loop {
            match self.rx.recv().await {
                Ok(update) => return Some(update),
                Err(RecvError::Lagged(skipped)) => {
                    log::debug!("artnet subscription lagged, skipped {skipped} updates");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next buffered update without waiting.
    pub fn try_recv(&mut self) -> Option<DmxUpdate> {
        loop {
            match self.rx.try_recv() {
                Ok(update) => return Some(update),
                Err(TryRecvError::Lagged(skipped)) => {
                    log::debug!("artnet subscription lagged, skipped {skipped} updates");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}

/// Marks the receiver `Closed` however the loop exits.
struct ClosedOnExit(Arc<AtomicU8>);

impl Drop for ClosedOnExit {
    fn drop(&mut self) {
        self.0.store(ReceiverState::Closed.to_u8(), Ordering::Release);
    }
}

async fn run_receive_loop(
    socket: UdpSocket,
    events: broadcast::Sender<DmxUpdate>,
    mut shutdown_rx: watch::Receiver<bool>,
    state: Arc<AtomicU8>,
) {
    let _closed_on_exit = ClosedOnExit(state);
    let mut buf = [0u8; MAX_DATAGRAM_LEN];

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let received = tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
                continue;
            }
            received = socket.recv_from(&mut buf) => received,
        };

        let (n, source) = match received {
            Ok(v) => v,
            Err(err) => {
                log::debug!("artnet receiver recv error: {err}");
                continue;
            }
        };

        match classify_datagram(&buf[..n]) {
            Inbound::Dmx(update) => {
                // No subscribers is not an error; the update is dropped.
                let _ = events.send(update);
            }
            Inbound::NotArtNet => {
                log::trace!("ignoring non-Art-Net datagram from {source} ({n} bytes)");
            }
            Inbound::Unhandled(op_code) => {
                log::trace!("ignoring Art-Net {op_code:?} from {source}");
            }
            Inbound::Malformed(err) => {
                log::debug!("discarding malformed ArtDmx from {source}: {err}");
            }
            Inbound::InvalidAddress(err) => {
                log::debug!("discarding ArtDmx from {source}: {err}");
            }
        }
    }

    if let Ok(addr) = socket.local_addr() {
        log::debug!("artnet receiver on {addr} stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::{Receiver, ReceiverState};
    use artnet_core::packet::dmx::encode_dmx;
    use artnet_core::packet::ARTNET_ID;
    use artnet_core::{DmxOptions, DmxUpdate};
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::sync::Arc;
    use tokio::net::UdpSocket;
    use tokio::sync::watch;
    use tokio::time::{sleep, timeout, Duration};

    fn loopback() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    #[tokio::test]
    async fn listening_as_soon_as_bound() {
        let receiver = Receiver::bind(loopback()).await.unwrap();
        assert_eq!(receiver.state(), ReceiverState::Listening);
        receiver.shutdown().await;
    }

    #[tokio::test]
    async fn publishes_decoded_dmx() {
        let receiver = Receiver::bind(loopback()).await.unwrap();
        let mut sub = receiver.subscribe();
        let target = receiver.local_addr();
        let sender = UdpSocket::bind(loopback()).await.unwrap();

        let update = DmxUpdate::from_parts(1, 2, 3, vec![255, 0, 128]).unwrap();
        let frame = encode_dmx(&update, DmxOptions::default()).unwrap();
        sender.send_to(&frame, target).await.unwrap();

        let got = timeout(Duration::from_secs(2), sub.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got, update);
        assert_eq!(receiver.state(), ReceiverState::Listening);
    }

    #[tokio::test]
    async fn skips_garbage_and_keeps_listening() {
        let receiver = Receiver::bind(loopback()).await.unwrap();
        let mut sub = receiver.subscribe();
        let target = receiver.local_addr();
        let sender = UdpSocket::bind(loopback()).await.unwrap();

        let mut truncated = ARTNET_ID.to_vec();
        truncated.extend_from_slice(&[0x00, 0x50, 0x00, 0x0e, 0, 0, 0, 0, 0x00, 0x03, 1, 2]);
        let mut poll = ARTNET_ID.to_vec();
        poll.extend_from_slice(&[0x00, 0x20, 0x00, 0x0e, 0x06, 0x00]);

        sender.send_to(b"not art-net", target).await.unwrap();
        sender.send_to(&ARTNET_ID[..5], target).await.unwrap();
        sender.send_to(&truncated, target).await.unwrap();
        sender.send_to(&poll, target).await.unwrap();

        let update = DmxUpdate::from_universe(42, vec![9; 512]).unwrap();
        let frame = encode_dmx(&update, DmxOptions::default()).unwrap();
        sender.send_to(&frame, target).await.unwrap();

        let got = timeout(Duration::from_secs(2), sub.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got, update);
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn every_subscriber_sees_each_update() {
        let receiver = Receiver::bind(loopback()).await.unwrap();
        let mut first = receiver.subscribe();
        let mut second = receiver.subscribe();
        let sender = UdpSocket::bind(loopback()).await.unwrap();

        let update = DmxUpdate::from_universe(7, vec![1, 2]).unwrap();
        let frame = encode_dmx(&update, DmxOptions::default()).unwrap();
        sender.send_to(&frame, receiver.local_addr()).await.unwrap();

        for sub in [&mut first, &mut second] {
            let got = timeout(Duration::from_secs(2), sub.recv())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(got.universe(), 7);
        }
    }

    #[tokio::test]
    async fn close_is_idempotent_and_ends_subscriptions() {
        let mut receiver = Receiver::bind(loopback()).await.unwrap();
        let mut sub = receiver.subscribe();

        receiver.close();
        receiver.close();
        assert_eq!(receiver.state(), ReceiverState::Closed);

        let ended = timeout(Duration::from_secs(2), sub.recv()).await.unwrap();
        assert!(ended.is_none());

        let mut late = receiver.subscribe();
        assert!(late.recv().await.is_none());
        receiver.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_releases_socket() {
        let receiver = Receiver::bind(loopback()).await.unwrap();
        let addr = receiver.local_addr();
        receiver.shutdown().await;

        let rebound = UdpSocket::bind(addr).await;
        assert!(rebound.is_ok());
    }

    #[tokio::test]
    async fn source_filter_drops_other_peers() {
        let trusted = UdpSocket::bind(loopback()).await.unwrap();
        let other = UdpSocket::bind(loopback()).await.unwrap();
        let receiver = Receiver::builder()
            .bind_addr(loopback())
            .source(trusted.local_addr().unwrap())
            .bind()
            .await
            .unwrap();
        let mut sub = receiver.subscribe();
        let target = receiver.local_addr();

        let ignored = DmxUpdate::from_universe(1, vec![1]).unwrap();
        let accepted = DmxUpdate::from_universe(2, vec![2]).unwrap();
        other
            .send_to(&encode_dmx(&ignored, DmxOptions::default()).unwrap(), target)
            .await
            .unwrap();
        trusted
            .send_to(&encode_dmx(&accepted, DmxOptions::default()).unwrap(), target)
            .await
            .unwrap();

        let got = timeout(Duration::from_secs(2), sub.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got, accepted);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn subscribing_while_publishing_keeps_loop_alive() {
        let receiver = Arc::new(Receiver::bind(loopback()).await.unwrap());
        let target = receiver.local_addr();
        let (stop_tx, stop_rx) = watch::channel(false);

        let streamer = tokio::spawn(async move {
            let socket = UdpSocket::bind(loopback()).await.unwrap();
            let mut sent = 0u16;
            loop {
                let stopped = *stop_rx.borrow();
                if stopped {
                    break;
                }
                let update = DmxUpdate::from_universe(sent % 512, vec![sent as u8]).unwrap();
                let frame = encode_dmx(&update, DmxOptions::default()).unwrap();
                socket.send_to(&frame, target).await.unwrap();
                sent = sent.wrapping_add(1);
                sleep(Duration::from_millis(1)).await;
            }
        });

        let churn = {
            let receiver = Arc::clone(&receiver);
            tokio::spawn(async move {
                let mut held = Vec::new();
                for round in 0..500 {
                    let sub = receiver.subscribe();
                    if round % 3 == 0 {
                        held.push(sub);
                    }
                    if held.len() > 8 {
                        held.remove(0);
                    }
                    tokio::task::yield_now().await;
                }
            })
        };

        sleep(Duration::from_millis(20)).await;
        let mut mid_stream = receiver.subscribe();
        let got = timeout(Duration::from_secs(2), mid_stream.recv())
            .await
            .unwrap();
        assert!(got.is_some());

        churn.await.unwrap();
        let mut after_churn = receiver.subscribe();
        let got = timeout(Duration::from_secs(2), after_churn.recv())
            .await
            .unwrap();
        assert!(got.is_some());
        assert_eq!(receiver.state(), ReceiverState::Listening);

        stop_tx.send_replace(true);
        streamer.await.unwrap();
    }
}
