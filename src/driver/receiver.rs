use super::tasks::{message::RxMessage, udp_rx};
use crate::{
    codec::FrameEncoder,
    error::{Error, Result},
    playback::PlaybackSink,
    Config,
};
use flume::Sender;
use parking_lot::Mutex;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::UdpSocket;
use tracing::info;

/// Lifecycle of a receive socket.
///
/// `Unbound` and `Bound` only exist while [`LinkReceiver::bind`] runs: a
/// handle is always returned in `Listening`, and a failed bind returns an
/// error instead of a handle.
///
/// [`LinkReceiver::bind`]: struct.LinkReceiver.html#method.bind
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LinkState {
    Unbound,
    Bound,
    Listening,
    /// The socket has been released; the receiver will not restart.
    Closed,
}

/// Handle to a running radio-to-conference pipeline.
///
/// Inbound link frames are queued and, once per flush interval, encoded and
/// handed to the [`PlaybackSink`] as one batch. Dropping the handle closes the
/// socket.
///
/// [`PlaybackSink`]: ../playback/trait.PlaybackSink.html
#[derive(Debug)]
pub struct LinkReceiver {
    local_addr: SocketAddr,
    state: Arc<Mutex<LinkState>>,
    tx: Sender<RxMessage>,
}

impl LinkReceiver {
    /// Binds the inbound link port and starts listening.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn bind<E>(config: &Config, encoder: E, sink: Arc<dyn PlaybackSink>) -> Result<Self>
    where
        E: FrameEncoder + 'static,
    {
        let udp_socket = UdpSocket::bind((config.bind_host.as_str(), config.local_port))
            .await
            .map_err(Error::Bind)?;

        let local_addr = udp_socket.local_addr().map_err(Error::Bind)?;
        info!("Listening on {}.", local_addr);

        let (tx, rx) = flume::unbounded();

        let state = Arc::new(Mutex::new(LinkState::Listening));
        tokio::spawn(udp_rx::runner(
            rx,
            Arc::clone(&state),
            Box::new(encoder),
            sink,
            config.flush_interval,
            config.verbose,
            udp_socket,
        ));

        Ok(Self {
            local_addr,
            state,
            tx,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> LinkState {
        *self.state.lock()
    }

    /// Stops the pipeline and releases its socket.
    ///
    /// Frames still queued for the next flush are discarded.
    pub fn disconnect(&self) {
        let _ = self.tx.send(RxMessage::Poison);
    }
}

impl Drop for LinkReceiver {
    fn drop(&mut self) {
        self.disconnect();
    }
}
