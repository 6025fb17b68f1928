use audiopus::Error as OpusError;
use std::{
    error::Error as StdError,
    fmt::{self, Display},
    io::Error as IoError,
};

/// The common result type between most library functions.
pub type Result<T> = std::result::Result<T, Error>;

/// The pipeline task a failed message was addressed to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Recipient {
    Receiver,
    Transmitter,
}

/// Reasons a datagram could not be read as a link frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrameError {
    /// Fewer bytes than a full header.
    TooShort(usize),
    /// The datagram does not open with the `USRP` tag.
    BadMagic,
    /// A voice frame whose payload is neither empty nor a full audio frame.
    BadPayloadLength(usize),
    /// A payload type tag outside of voice, DTMF and text.
    UnknownType(u32),
}

impl Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FrameError::TooShort(len) => write!(f, "datagram of {} bytes is shorter than a header", len),
            FrameError::BadMagic => f.write_str("missing USRP tag"),
            FrameError::BadPayloadLength(len) => write!(f, "audio payload of {} bytes", len),
            FrameError::UnknownType(kind) => write!(f, "unknown payload type {}", kind),
        }
    }
}

/// A common error enum returned by the bridge's codecs and pipelines.
#[derive(Debug)]
pub enum Error {
    /// An inbound datagram failed the link frame length/shape checks.
    MalformedFrame(FrameError),
    /// A buffer could not be split into whole frames.
    InvalidFrameSize { len: usize, frame_size: usize },
    /// A downmix was requested over zero channels.
    InvalidChannelCount,
    /// The listening socket could not be bound.
    Bind(IoError),
    /// A socket-level send or receive failed.
    Transport(IoError),
    /// The compressed-audio encoder rejected a frame.
    Encode(OpusError),
    /// A configuration value was missing or unreadable.
    Config { key: &'static str, reason: String },
    /// A pipeline task is no longer running to accept messages.
    InterconnectFailure(Recipient),
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Error::MalformedFrame(e)
    }
}

impl From<OpusError> for Error {
    fn from(e: OpusError) -> Self {
        Error::Encode(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedFrame(inner) => write!(f, "malformed link frame: {}", inner),
            Error::InvalidFrameSize { len, frame_size } => write!(
                f,
                "buffer of {} bytes is not a whole number of {}-byte frames",
                len, frame_size
            ),
            Error::InvalidChannelCount => f.write_str("channel count must be non-zero"),
            Error::Bind(inner) => write!(f, "failed to bind link socket: {}", inner),
            Error::Transport(inner) => write!(f, "link socket failure: {}", inner),
            Error::Encode(inner) => write!(f, "audio encoder failure: {}", inner),
            Error::Config { key, reason } => write!(f, "invalid configuration for {}: {}", key, reason),
            Error::InterconnectFailure(recipient) => {
                write!(f, "{:?} pipeline is no longer running", recipient)
            },
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Bind(inner) | Error::Transport(inner) => Some(inner),
            Error::Encode(inner) => Some(inner),
            _ => None,
        }
    }
}
