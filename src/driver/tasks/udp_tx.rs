use super::message::*;
use crate::{
    constants::*,
    error::{Error, Result},
    id::SpeakerId,
    mix,
    packet::{AudioPayload, LinkFrame},
};
use flume::{Receiver, TryRecvError};
use std::collections::HashMap;
use tokio::net::UdpSocket;
use tracing::{debug, error, info, instrument, warn};

/// Mono audio buffered per speaker, waiting for the next flush.
#[derive(Debug, Default)]
pub(crate) struct SpeakerAccumulator {
    speakers: HashMap<SpeakerId, Vec<Vec<u8>>>,
}

impl SpeakerAccumulator {
    pub(crate) fn push(&mut self, speaker: SpeakerId, chunk: Vec<u8>) {
        self.speakers.entry(speaker).or_default().push(chunk);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }

    /// Empties the accumulator, returning one concatenated buffer per speaker.
    pub(crate) fn take(&mut self) -> Vec<Vec<u8>> {
        self.speakers
            .drain()
            .map(|(_, chunks)| chunks.concat())
            .collect()
    }
}

struct UdpTx {
    accumulator: SpeakerAccumulator,
    header: LinkFrame,
    rx: Receiver<TxMessage>,
    seq: u32,
    source_channels: usize,
    udp_socket: UdpSocket,
    verbose: bool,
}

impl UdpTx {
    #[instrument(skip(self))]
    async fn run(&mut self) {
        'runner: while let Ok(msg) = self.rx.recv_async().await {
            if !self.absorb(msg) {
                break;
            }

            // Chunks that queued up behind this one join the same flush.
            loop {
                match self.rx.try_recv() {
                    Ok(msg) =>
                        if !self.absorb(msg) {
                            break 'runner;
                        },
                    Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                }
            }

            if let Err(e) = self.flush().await {
                error!("Fatal UDP packet send error: {}.", e);
                break;
            }
        }
    }

    /// Applies one message to the accumulator. Returns `false` once told to stop.
    fn absorb(&mut self, msg: TxMessage) -> bool {
        match msg {
            TxMessage::Voice { speaker, pcm } =>
                match mix::downmix_interleaved(&pcm, self.source_channels) {
                    Ok(mono) => self.accumulator.push(speaker, mono),
                    Err(e) => warn!("Discarding audio from speaker {}: {}.", speaker, e),
                },
            TxMessage::Poison => return false,
        }

        true
    }

    async fn flush(&mut self) -> Result<()> {
        if self.accumulator.is_empty() {
            return Ok(());
        }

        let speakers = self.accumulator.take();
        let mixed = mix::downmix_sources(&speakers);

        if mixed.is_empty() {
            return Ok(());
        }

        let mixed = mix::pad_to_frame(mixed, AUDIO_PAYLOAD_LEN);
        let chunks = mix::reframe(&mixed, AUDIO_PAYLOAD_LEN)?;
        let first_seq = self.seq;

        for chunk in &chunks {
            let mut audio: AudioPayload = [0u8; AUDIO_PAYLOAD_LEN];
            audio.copy_from_slice(chunk);

            self.send(true, Some(audio)).await?;
        }

        self.send(false, None).await?;

        if self.verbose {
            info!(
                "Sent {} frames mixed from {} speakers (seq {}..={}).",
                chunks.len(),
                speakers.len(),
                first_seq,
                self.seq.wrapping_sub(1),
            );
        } else {
            debug!(
                "Sent {} frames mixed from {} speakers (seq {}..={}).",
                chunks.len(),
                speakers.len(),
                first_seq,
                self.seq.wrapping_sub(1),
            );
        }

        Ok(())
    }

    async fn send(&mut self, keyup: bool, audio: Option<AudioPayload>) -> Result<()> {
        let frame = LinkFrame {
            seq: self.seq,
            keyup,
            audio,
            ..self.header.clone()
        };
        self.seq = self.seq.wrapping_add(1);

        self.udp_socket
            .send(&frame.to_bytes())
            .await
            .map_err(Error::Transport)?;

        Ok(())
    }
}

#[instrument(skip(rx, header, udp_socket))]
pub(crate) async fn runner(
    rx: Receiver<TxMessage>,
    header: LinkFrame,
    initial_sequence: u32,
    source_channels: usize,
    verbose: bool,
    udp_socket: UdpSocket,
) {
    info!("UDP transmit handle started.");

    let mut tx_state = UdpTx {
        accumulator: SpeakerAccumulator::default(),
        header,
        rx,
        seq: initial_sequence,
        source_channels,
        udp_socket,
        verbose,
    };

    tx_state.run().await;

    info!("UDP transmit handle stopped.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_concatenates_in_arrival_order() {
        let mut acc = SpeakerAccumulator::default();
        let x = SpeakerId(7);

        acc.push(x, vec![1; 160]);
        acc.push(x, vec![2; 160]);
        acc.push(x, vec![3; 160]);

        let taken = acc.take();
        assert!(acc.is_empty());
        assert_eq!(taken.len(), 1);

        let expected = [vec![1u8; 160], vec![2; 160], vec![3; 160]].concat();
        assert_eq!(taken[0], expected);
    }

    #[test]
    fn take_yields_one_buffer_per_speaker() {
        let mut acc = SpeakerAccumulator::default();

        acc.push(SpeakerId(1), vec![1; 4]);
        acc.push(SpeakerId(2), vec![2; 8]);
        acc.push(SpeakerId(1), vec![1; 4]);

        let mut taken = acc.take();
        taken.sort();
        assert_eq!(taken, vec![vec![1; 8], vec![2; 8]]);
        assert!(acc.take().is_empty());
    }
}
