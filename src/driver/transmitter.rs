use super::tasks::{
    message::TxMessage,
    udp_tx,
};
use crate::{
    error::{Error, Recipient, Result},
    id::SpeakerId,
    packet::LinkFrame,
    Config,
};
use flume::Sender;
use std::{
    io::{Error as IoError, ErrorKind as IoErrorKind},
    net::{Ipv4Addr, Ipv6Addr, SocketAddr},
};
use tokio::net::{lookup_host, UdpSocket};
use tracing::info;

/// Handle to a running conference-to-radio pipeline.
///
/// Every chunk of speaker audio triggers a flush: all audio buffered so far
/// is mixed, cut into link frames and sent as one keyed-up transmission
/// followed by an end-of-transmission frame. Dropping the handle closes the
/// socket.
#[derive(Debug)]
pub struct LinkTransmitter {
    remote_addr: SocketAddr,
    tx: Sender<TxMessage>,
}

impl LinkTransmitter {
    /// Resolves the link node and starts the pipeline.
    ///
    /// Must be called from within a tokio runtime. Fails with
    /// [`Error::InvalidChannelCount`] if `config.source_channels` is zero.
    pub async fn connect(config: &Config) -> Result<Self> {
        if config.source_channels == 0 {
            return Err(Error::InvalidChannelCount);
        }

        let remote_addr = lookup_host((config.target_host.as_str(), config.target_port))
            .await
            .map_err(Error::Transport)?
            .next()
            .ok_or_else(|| {
                Error::Transport(IoError::new(
                    IoErrorKind::NotFound,
                    format!("no address for {}", config.target_host),
                ))
            })?;

        let local_addr: SocketAddr = if remote_addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let udp_socket = UdpSocket::bind(local_addr).await.map_err(Error::Bind)?;
        udp_socket.connect(remote_addr).await.map_err(Error::Transport)?;
        info!("Sending link traffic to {}.", remote_addr);

        let header = LinkFrame {
            memory: config.memory,
            talkgroup: config.talkgroup,
            ..Default::default()
        };

        let (tx, rx) = flume::unbounded();

        tokio::spawn(udp_tx::runner(
            rx,
            header,
            config.initial_sequence,
            config.source_channels,
            config.verbose,
            udp_socket,
        ));

        Ok(Self { remote_addr, tx })
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// Queues a chunk of interleaved PCM from `speaker` and triggers a flush.
    pub fn voice_data(&self, speaker: impl Into<SpeakerId>, pcm: impl Into<Vec<u8>>) -> Result<()> {
        self.tx
            .send(TxMessage::Voice {
                speaker: speaker.into(),
                pcm: pcm.into(),
            })
            .map_err(|_| Error::InterconnectFailure(Recipient::Transmitter))
    }

    /// Whether the pipeline is still running.
    ///
    /// A send failure closes the socket and ends the pipeline for good.
    pub fn is_active(&self) -> bool {
        !self.tx.is_disconnected()
    }

    pub fn disconnect(&self) {
        let _ = self.tx.send(TxMessage::Poison);
    }
}

impl Drop for LinkTransmitter {
    fn drop(&mut self) {
        self.disconnect();
    }
}
