//! The conferencing side of the receive path.

use async_trait::async_trait;
use std::vec::IntoIter;

/// One flush worth of compressed frames, in link arrival order.
///
/// Batches are single-use: iterating consumes them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EncodedBatch {
    frames: Vec<Vec<u8>>,
}

impl EncodedBatch {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Total size of the compressed frames, in bytes.
    pub fn byte_len(&self) -> usize {
        self.frames.iter().map(Vec::len).sum()
    }
}

impl From<Vec<Vec<u8>>> for EncodedBatch {
    fn from(frames: Vec<Vec<u8>>) -> Self {
        Self { frames }
    }
}

impl IntoIterator for EncodedBatch {
    type Item = Vec<u8>;
    type IntoIter = IntoIter<Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}

/// Playback target on the conferencing connection.
///
/// The receive pipeline awaits each call before handling further datagrams,
/// so implementations should hand the batch off rather than play it out in
/// real time.
#[async_trait]
pub trait PlaybackSink: Send + Sync {
    async fn play(&self, batch: EncodedBatch);
}
