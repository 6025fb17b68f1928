//! Constants affecting link framing, mixing and pipeline timing.

use audiopus::SampleRate;
use std::time::Duration;

/// Protocol tag opening every link frame.
pub const USRP_MAGIC: [u8; 4] = *b"USRP";

/// Size of the fixed link frame header.
pub const HEADER_LEN: usize = 32;

/// Sample rate of audio carried over the radio link.
pub const LINK_SAMPLE_RATE: SampleRate = SampleRate::Hz8000;

/// Sample rate of audio carried over the radio link.
pub const LINK_SAMPLE_RATE_RAW: usize = 8_000;

/// Number of audio frames/packets sent per second over the link.
pub const LINK_FRAME_RATE: usize = 50;

/// Number of mono samples in one link audio frame.
pub const LINK_FRAME_SAMPLES: usize = LINK_SAMPLE_RATE_RAW / LINK_FRAME_RATE;

/// Number of bytes in one link audio payload of 16-bit PCM.
pub const AUDIO_PAYLOAD_LEN: usize = LINK_FRAME_SAMPLES * std::mem::size_of::<i16>();

/// Size of a link frame carrying audio.
pub const VOICE_FRAME_LEN: usize = HEADER_LEN + AUDIO_PAYLOAD_LEN;

/// Largest datagram the receive pipeline will read.
///
/// Anything longer than a voice frame is rejected by the decoder, so only a
/// little headroom is needed to detect oversized payloads.
pub const LINK_PACKET_MAX: usize = 1024;

/// Interleaved channel count of conferencing PCM, as seen by the transmit path.
///
/// Conferencing audio arrives as 48kHz stereo. Averaging 12 interleaved samples
/// (6 stereo frames) yields one 8kHz mono sample in a single pass.
pub const DEFAULT_SOURCE_CHANNELS: usize = 12;

/// Length of time between receive-side batch flushes.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(250);

/// Upper bound on the size of one compressed frame.
pub const ENCODED_FRAME_MAX: usize = 1275;
