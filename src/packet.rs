//! The USRP link frame: a 32-byte header, optionally followed by 320 bytes of audio.
//!
//! | Offset | Size | Field     |
//! |--------|------|-----------|
//! | 0      | 4    | `USRP` tag |
//! | 4      | 4    | sequence  |
//! | 8      | 4    | memory    |
//! | 12     | 4    | keyup     |
//! | 16     | 4    | talkgroup |
//! | 20     | 4    | type      |
//! | 24     | 4    | mpxid     |
//! | 28     | 4    | reserved  |
//! | 32     | 320  | audio     |
//!
//! Header words are big-endian; audio samples are 16-bit little-endian PCM.

use crate::{
    constants::*,
    error::{FrameError, Result},
};
use byteorder::{ByteOrder, NetworkEndian};

/// A single link audio payload.
pub type AudioPayload = [u8; AUDIO_PAYLOAD_LEN];

/// Payload type tag carried in the header.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PacketType {
    #[default]
    Voice,
    DualToneMultiFrequency,
    Text,
}

impl TryFrom<u32> for PacketType {
    type Error = FrameError;

    fn try_from(value: u32) -> std::result::Result<Self, FrameError> {
        match value {
            0 => Ok(PacketType::Voice),
            1 => Ok(PacketType::DualToneMultiFrequency),
            2 => Ok(PacketType::Text),
            other => Err(FrameError::UnknownType(other)),
        }
    }
}

impl From<PacketType> for u32 {
    fn from(value: PacketType) -> Self {
        match value {
            PacketType::Voice => 0,
            PacketType::DualToneMultiFrequency => 1,
            PacketType::Text => 2,
        }
    }
}

/// What a received frame means for the transmission it belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrameKind {
    /// Metadata sent by a link node ahead of a transmission.
    Start,
    /// A frame of voice audio.
    Audio,
    /// Voice frame without payload, closing a transmission.
    End,
    /// A DTMF digit.
    Dtmf,
}

/// A decoded link frame.
///
/// The default is a voice frame with every header word zeroed and no audio.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LinkFrame {
    pub seq: u32,
    /// Radio-system channel/memory slot. Passed through untouched.
    pub memory: u32,
    /// Whether the sender's carrier is active (push-to-talk engaged).
    pub keyup: bool,
    /// Routing id. Passed through untouched.
    pub talkgroup: u32,
    pub packet_type: PacketType,
    pub mpxid: u32,
    pub reserved: u32,
    /// Present only on voice frames carrying audio.
    pub audio: Option<AudioPayload>,
}

impl LinkFrame {
    /// Parses a datagram into a frame.
    ///
    /// Voice frames must carry either no payload or exactly one audio payload.
    /// Trailing bytes of DTMF and text frames are not audio and are ignored.
    pub fn from_bytes(msg: &[u8]) -> Result<Self> {
        if msg.len() < HEADER_LEN {
            return Err(FrameError::TooShort(msg.len()).into());
        }

        if msg[..4] != USRP_MAGIC {
            return Err(FrameError::BadMagic.into());
        }

        let packet_type = PacketType::try_from(NetworkEndian::read_u32(&msg[20..24]))?;
        let payload = &msg[HEADER_LEN..];

        let audio = match (packet_type, payload.len()) {
            (PacketType::Voice, 0) => None,
            (PacketType::Voice, AUDIO_PAYLOAD_LEN) => {
                let mut audio = [0u8; AUDIO_PAYLOAD_LEN];
                audio.copy_from_slice(payload);
                Some(audio)
            },
            (PacketType::Voice, len) => return Err(FrameError::BadPayloadLength(len).into()),
            _ => None,
        };

        Ok(Self {
            seq: NetworkEndian::read_u32(&msg[4..8]),
            memory: NetworkEndian::read_u32(&msg[8..12]),
            keyup: NetworkEndian::read_u32(&msg[12..16]) != 0,
            talkgroup: NetworkEndian::read_u32(&msg[16..20]),
            packet_type,
            mpxid: NetworkEndian::read_u32(&msg[24..28]),
            reserved: NetworkEndian::read_u32(&msg[28..32]),
            audio,
        })
    }

    /// Serializes the frame: 32 bytes, or 352 bytes when audio is attached.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = HEADER_LEN + self.audio.map_or(0, |a| a.len());
        let mut buffer = vec![0u8; len];

        buffer[..4].copy_from_slice(&USRP_MAGIC);
        NetworkEndian::write_u32(&mut buffer[4..8], self.seq);
        NetworkEndian::write_u32(&mut buffer[8..12], self.memory);
        NetworkEndian::write_u32(&mut buffer[12..16], self.keyup.into());
        NetworkEndian::write_u32(&mut buffer[16..20], self.talkgroup);
        NetworkEndian::write_u32(&mut buffer[20..24], self.packet_type.into());
        NetworkEndian::write_u32(&mut buffer[24..28], self.mpxid);
        NetworkEndian::write_u32(&mut buffer[28..32], self.reserved);

        if let Some(audio) = &self.audio {
            buffer[HEADER_LEN..].copy_from_slice(audio);
        }

        buffer
    }

    pub fn kind(&self) -> FrameKind {
        match self.packet_type {
            PacketType::Voice if self.audio.is_some() => FrameKind::Audio,
            PacketType::Voice => FrameKind::End,
            PacketType::DualToneMultiFrequency => FrameKind::Dtmf,
            PacketType::Text => FrameKind::Start,
        }
    }
}

/// Builds a voice frame with every pass-through field left at zero.
pub fn encode(seq: u32, keyup: bool, audio: Option<&AudioPayload>) -> Vec<u8> {
    LinkFrame {
        seq,
        keyup,
        audio: audio.copied(),
        ..Default::default()
    }
    .to_bytes()
}

/// Parses a datagram into a frame. See [`LinkFrame::from_bytes`].
///
/// [`LinkFrame::from_bytes`]: struct.LinkFrame.html#method.from_bytes
pub fn decode(msg: &[u8]) -> Result<LinkFrame> {
    LinkFrame::from_bytes(msg)
}
