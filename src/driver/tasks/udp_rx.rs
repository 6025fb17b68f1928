use super::message::*;
use crate::{
    codec::FrameEncoder,
    constants::*,
    driver::LinkState,
    error::Result,
    packet::{self, AudioPayload},
    playback::{EncodedBatch, PlaybackSink},
};
use flume::Receiver;
use parking_lot::Mutex;
use std::{mem, net::SocketAddr, sync::Arc, time::Duration};
use tokio::{
    net::UdpSocket,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, error, info, instrument, warn};

struct UdpRx {
    encoder: Box<dyn FrameEncoder>,
    flush_interval: Duration,
    packet_buffer: [u8; LINK_PACKET_MAX],
    queue: Vec<AudioPayload>,
    rx: Receiver<RxMessage>,
    sink: Arc<dyn PlaybackSink>,
    udp_socket: UdpSocket,
    verbose: bool,
}

impl UdpRx {
    #[instrument(skip(self))]
    async fn run(&mut self) {
        let mut ticker = interval(self.flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                res = self.udp_socket.recv_from(&mut self.packet_buffer[..]) => match res {
                    Ok((len, addr)) => self.process_udp_message(len, addr),
                    Err(e) => {
                        error!("Fatal UDP receive error: {:?}.", e);
                        break;
                    },
                },
                _ = ticker.tick() => {
                    self.flush().await;
                }
                msg = self.rx.recv_async() => match msg {
                    Ok(RxMessage::Poison) | Err(_) => {
                        warn!("Closing link receive socket.");
                        break;
                    },
                },
            }
        }
    }

    fn process_udp_message(&mut self, len: usize, addr: SocketAddr) {
        // Bad datagrams only cost us that datagram.
        let frame = match packet::decode(&self.packet_buffer[..len]) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Dropping datagram from {}: {}.", addr, e);
                return;
            },
        };

        debug!(
            "Received {:?} frame (seq: {}, length: {}, keyup: {}).",
            frame.kind(),
            frame.seq,
            len,
            frame.keyup,
        );

        if let Some(audio) = frame.audio {
            self.queue.push(audio);
        }
    }

    async fn flush(&mut self) {
        if self.queue.is_empty() {
            return;
        }

        let queued = mem::take(&mut self.queue);
        let audio_len = queued.len() * AUDIO_PAYLOAD_LEN;

        let frames = match self.encode_all(&queued) {
            Ok(frames) => frames,
            Err(e) => {
                error!("Dropping batch of {} frames: {}.", queued.len(), e);
                return;
            },
        };

        if self.verbose {
            info!("PTT active (audio size {}).", audio_len);
        } else {
            debug!("PTT active (audio size {}).", audio_len);
        }

        self.sink.play(EncodedBatch::from(frames)).await;
    }

    fn encode_all(&mut self, queued: &[AudioPayload]) -> Result<Vec<Vec<u8>>> {
        queued
            .iter()
            .map(|audio| self.encoder.encode(&audio[..]))
            .collect()
    }
}

#[instrument(skip(rx, state, encoder, sink, udp_socket))]
pub(crate) async fn runner(
    rx: Receiver<RxMessage>,
    state: Arc<Mutex<LinkState>>,
    encoder: Box<dyn FrameEncoder>,
    sink: Arc<dyn PlaybackSink>,
    flush_interval: Duration,
    verbose: bool,
    udp_socket: UdpSocket,
) {
    info!("UDP receive handle started.");

    let mut rx_state = UdpRx {
        encoder,
        flush_interval,
        packet_buffer: [0u8; LINK_PACKET_MAX],
        queue: vec![],
        rx,
        sink,
        udp_socket,
        verbose,
    };

    rx_state.run().await;

    // Dropping the task state releases the socket.
    drop(rx_state);
    *state.lock() = LinkState::Closed;

    info!("UDP receive handle stopped.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::OpusFrameEncoder;
    use async_trait::async_trait;
    use tokio::time::{sleep, timeout};

    struct NullSink;

    #[async_trait]
    impl PlaybackSink for NullSink {
        async fn play(&self, _batch: EncodedBatch) {}
    }

    #[tokio::test]
    async fn socket_error_closes_the_receiver() {
        // A port nobody listens on once the placeholder is dropped.
        let gone = {
            let placeholder = UdpSocket::bind("127.0.0.1:0").await.unwrap();
            placeholder.local_addr().unwrap()
        };

        // Sending there leaves a pending "connection refused" on the socket,
        // reported by its next receive.
        let udp_socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        udp_socket.connect(gone).await.unwrap();
        udp_socket.send(&[0u8; 4]).await.unwrap();
        sleep(Duration::from_millis(50)).await;

        let local_addr = udp_socket.local_addr().unwrap();
        let state = Arc::new(Mutex::new(LinkState::Listening));
        let (_tx, rx) = flume::unbounded();

        let task = tokio::spawn(runner(
            rx,
            Arc::clone(&state),
            Box::new(OpusFrameEncoder::new().unwrap()),
            Arc::new(NullSink),
            Duration::from_millis(50),
            false,
            udp_socket,
        ));

        // Wake the receive path with a datagram from the connected peer.
        let peer = UdpSocket::bind(gone).await.unwrap();
        peer.send_to(&packet::encode(0, true, None), local_addr)
            .await
            .unwrap();

        timeout(Duration::from_secs(2), task)
            .await
            .expect("receiver kept running after a socket error")
            .unwrap();
        assert_eq!(*state.lock(), LinkState::Closed);
    }
}
