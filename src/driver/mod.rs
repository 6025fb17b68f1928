//! Runnable pipelines bridging one conferencing connection to a radio link.
//!
//! The two directions are independent tokio tasks. Each task owns all of its
//! mutable state (receive queue, speaker accumulator, sequence counter) and is
//! driven by messages from its handle, so no state is ever shared between a
//! handle and its task.

mod receiver;
pub(crate) mod tasks;
mod transmitter;

pub use self::{
    receiver::{LinkReceiver, LinkState},
    transmitter::LinkTransmitter,
};

use crate::{codec::FrameEncoder, error::Result, id::SpeakerId, playback::PlaybackSink, Config};
use std::sync::Arc;

/// Both directions of the bridge for one conferencing connection.
///
/// Create one when the conferencing side joins a channel, and drop it (or
/// call [`disconnect`]) when that connection goes away. A bridge whose
/// pipelines failed is not restarted: build a new one instead.
///
/// [`disconnect`]: #method.disconnect
#[derive(Debug)]
pub struct Bridge {
    receiver: LinkReceiver,
    transmitter: LinkTransmitter,
}

impl Bridge {
    /// Binds the inbound link port and opens the outbound link socket.
    pub async fn start<E>(config: Config, encoder: E, sink: Arc<dyn PlaybackSink>) -> Result<Self>
    where
        E: FrameEncoder + 'static,
    {
        let receiver = LinkReceiver::bind(&config, encoder, sink).await?;
        let transmitter = LinkTransmitter::connect(&config).await?;

        Ok(Self {
            receiver,
            transmitter,
        })
    }

    /// Forwards PCM received from a speaking participant toward the radio link.
    pub fn voice_data(&self, speaker: impl Into<SpeakerId>, pcm: impl Into<Vec<u8>>) -> Result<()> {
        self.transmitter.voice_data(speaker, pcm)
    }

    pub fn receiver(&self) -> &LinkReceiver {
        &self.receiver
    }

    pub fn transmitter(&self) -> &LinkTransmitter {
        &self.transmitter
    }

    /// Closes both link sockets.
    pub fn disconnect(&self) {
        self.receiver.disconnect();
        self.transmitter.disconnect();
    }
}
