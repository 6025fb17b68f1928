//! Compressed-audio encoding of link audio for the conferencing side.

use crate::{constants::*, error::Result};
use audiopus::{coder::Encoder as OpusEncoder, Application as CodingMode, Channels};
use byteorder::{ByteOrder, LittleEndian};

/// Turns one fixed-size mono PCM frame into one compressed frame.
///
/// The receive pipeline calls this once per link audio payload, so
/// implementations are handed exactly [`AUDIO_PAYLOAD_LEN`] bytes of 16-bit
/// little-endian PCM at the link sample rate.
///
/// [`AUDIO_PAYLOAD_LEN`]: ../constants/constant.AUDIO_PAYLOAD_LEN.html
pub trait FrameEncoder: Send {
    fn encode(&mut self, pcm: &[u8]) -> Result<Vec<u8>>;
}

/// Opus encoder tuned for link audio: 8kHz mono speech.
pub struct OpusFrameEncoder {
    encoder: OpusEncoder,
    samples: [i16; LINK_FRAME_SAMPLES],
    packet: [u8; ENCODED_FRAME_MAX],
}

impl OpusFrameEncoder {
    pub fn new() -> Result<Self> {
        let encoder = OpusEncoder::new(LINK_SAMPLE_RATE, Channels::Mono, CodingMode::Voip)?;

        Ok(Self {
            encoder,
            samples: [0; LINK_FRAME_SAMPLES],
            packet: [0; ENCODED_FRAME_MAX],
        })
    }
}

impl std::fmt::Debug for OpusFrameEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpusFrameEncoder").finish()
    }
}

impl FrameEncoder for OpusFrameEncoder {
    fn encode(&mut self, pcm: &[u8]) -> Result<Vec<u8>> {
        let len = pcm.len() / 2;
        let samples = &mut self.samples[..len.min(LINK_FRAME_SAMPLES)];
        LittleEndian::read_i16_into(&pcm[..samples.len() * 2], samples);

        // Short input reaches libopus as-is and is rejected there.
        let written = self.encoder.encode(samples, &mut self.packet[..])?;

        Ok(self.packet[..written].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audiopus::coder::Decoder as OpusDecoder;

    #[test]
    fn encodes_one_link_frame() {
        let pcm = utils::make_pcm_sine(LINK_FRAME_SAMPLES);
        let mut encoder = OpusFrameEncoder::new().unwrap();

        let opus = encoder.encode(&pcm).unwrap();
        assert!(!opus.is_empty());

        let mut decoder = OpusDecoder::new(LINK_SAMPLE_RATE, Channels::Mono).unwrap();
        let mut out = [0i16; LINK_FRAME_SAMPLES];
        let decoded = decoder.decode(Some(&opus[..]), &mut out[..], false).unwrap();

        assert_eq!(decoded, LINK_FRAME_SAMPLES);
    }

    #[test]
    fn rejects_partial_frames() {
        let pcm = utils::make_pcm_sine(LINK_FRAME_SAMPLES / 3);
        let mut encoder = OpusFrameEncoder::new().unwrap();

        assert!(encoder.encode(&pcm).is_err());
    }
}
