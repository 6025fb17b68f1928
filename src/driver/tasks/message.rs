use crate::id::SpeakerId;

pub(crate) enum RxMessage {
    Poison,
}

pub(crate) enum TxMessage {
    /// Raw interleaved PCM from one speaker.
    Voice { speaker: SpeakerId, pcm: Vec<u8> },

    Poison,
}
