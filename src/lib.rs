//! usrp-bridge links a USRP radio network to a real-time voice conference.
//!
//! The radio side speaks the USRP link protocol: UDP datagrams made of a
//! 32-byte header and, for voice, 320 bytes of 8kHz mono 16-bit PCM. The
//! conferencing side hands over raw PCM per speaking participant and accepts
//! batches of compressed audio for playback.
//!
//! A [`Bridge`] owns both directions for one conferencing connection:
//!  * the [`LinkReceiver`] listens for link frames, queues their audio and,
//!    every 250ms, encodes the queue and hands it to a [`PlaybackSink`];
//!  * the [`LinkTransmitter`] buffers PCM per speaker, mixes the speakers
//!    down to a single mono signal and sends it as a sequenced run of
//!    keyed-up frames closed by an end-of-transmission frame.
//!
//! The frame codec ([`packet`]) and PCM conversions ([`mix`]) are usable on
//! their own.
//!
//! [`Bridge`]: driver::Bridge
//! [`LinkReceiver`]: driver::LinkReceiver
//! [`LinkTransmitter`]: driver::LinkTransmitter
//! [`PlaybackSink`]: playback::PlaybackSink
#![forbid(unsafe_code)]
#![warn(unused, rust_2018_idioms, clippy::unwrap_used, clippy::clone_on_ref_ptr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod codec;
mod config;
pub mod constants;
pub mod driver;
mod error;
mod id;
pub mod mix;
pub mod packet;
pub mod playback;

pub use crate::{
    codec::{FrameEncoder, OpusFrameEncoder},
    config::Config,
    driver::{Bridge, LinkReceiver, LinkState, LinkTransmitter},
    error::{Error, FrameError, Recipient, Result},
    id::SpeakerId,
    packet::{FrameKind, LinkFrame, PacketType},
    playback::{EncodedBatch, PlaybackSink},
};
