#![allow(dead_code)]

use async_trait::async_trait;
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{net::UdpSocket, time::timeout};
use usrp_bridge::{
    constants::AUDIO_PAYLOAD_LEN,
    packet,
    EncodedBatch,
    Error,
    FrameEncoder,
    LinkFrame,
    PlaybackSink,
    Result,
};

pub const WAIT: Duration = Duration::from_secs(2);

/// Encodes a payload as its first byte. Payloads starting with `0xFF` fail.
#[derive(Clone, Default)]
pub struct MarkerEncoder {
    pub calls: Arc<AtomicUsize>,
}

impl MarkerEncoder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FrameEncoder for MarkerEncoder {
    fn encode(&mut self, pcm: &[u8]) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if pcm[0] == 0xFF {
            return Err(Error::InvalidFrameSize {
                len: pcm.len(),
                frame_size: 0,
            });
        }

        Ok(pcm[..1].to_vec())
    }
}

pub struct ChannelSink(pub flume::Sender<EncodedBatch>);

#[async_trait]
impl PlaybackSink for ChannelSink {
    async fn play(&self, batch: EncodedBatch) {
        let _ = self.0.send(batch);
    }
}

pub fn sink() -> (Arc<dyn PlaybackSink>, flume::Receiver<EncodedBatch>) {
    let (tx, rx) = flume::unbounded();
    (Arc::new(ChannelSink(tx)), rx)
}

pub fn audio_frame(seq: u32, marker: u8) -> Vec<u8> {
    packet::encode(seq, true, Some(&[marker; AUDIO_PAYLOAD_LEN]))
}

/// Gathers batches until `n` frames have been played.
pub async fn collect_frames(rx: &flume::Receiver<EncodedBatch>, n: usize) -> Vec<Vec<u8>> {
    let mut frames = vec![];

    while frames.len() < n {
        let batch = timeout(WAIT, rx.recv_async())
            .await
            .expect("timed out waiting for a batch")
            .unwrap();

        assert!(!batch.is_empty());
        frames.extend(batch);
    }

    frames
}

pub async fn radio_node() -> UdpSocket {
    UdpSocket::bind("127.0.0.1:0").await.unwrap()
}

pub async fn recv_frame(socket: &UdpSocket) -> (usize, LinkFrame) {
    let mut buf = [0u8; 1024];

    let (len, _) = timeout(WAIT, socket.recv_from(&mut buf))
        .await
        .expect("timed out waiting for a link frame")
        .unwrap();

    (len, packet::decode(&buf[..len]).unwrap())
}

pub async fn recv_frames(socket: &UdpSocket, n: usize) -> Vec<LinkFrame> {
    let mut frames = Vec::with_capacity(n);

    for _ in 0..n {
        frames.push(recv_frame(socket).await.1);
    }

    frames
}

pub async fn assert_quiet(socket: &UdpSocket) {
    let mut buf = [0u8; 1024];

    assert!(timeout(Duration::from_millis(200), socket.recv_from(&mut buf))
        .await
        .is_err());
}
