//! Conversion of conferencing PCM into link-ready mono frames.
//!
//! All buffers here are 16-bit little-endian PCM. Functions never mutate their
//! inputs: each stage hands a fresh buffer to the next.

use crate::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};
use std::{borrow::Cow, mem};

const SAMPLE_LEN: usize = mem::size_of::<i16>();

/// Left-pads `buffer` with silence up to `target_len` bytes.
///
/// Buffers already at (or beyond) `target_len` are returned untouched; this
/// never truncates.
pub fn pad_to(buffer: &[u8], target_len: usize) -> Cow<'_, [u8]> {
    if buffer.len() >= target_len {
        return Cow::Borrowed(buffer);
    }

    let mut out = vec![0u8; target_len];
    out[target_len - buffer.len()..].copy_from_slice(buffer);

    Cow::Owned(out)
}

/// Splits `buffer` into consecutive, non-overlapping `frame_size` chunks.
///
/// `buffer` must hold a whole number of frames.
pub fn reframe(buffer: &[u8], frame_size: usize) -> Result<Vec<&[u8]>> {
    if frame_size == 0 || buffer.len() % frame_size != 0 {
        return Err(Error::InvalidFrameSize {
            len: buffer.len(),
            frame_size,
        });
    }

    Ok(buffer.chunks_exact(frame_size).collect())
}

/// Averages interleaved multi-channel audio from one source down to mono.
///
/// Each output sample is the sum of one frame's `channels` samples divided by
/// `channels`, truncated toward zero. An incomplete trailing frame is ignored.
pub fn downmix_interleaved(buffer: &[u8], channels: usize) -> Result<Vec<u8>> {
    if channels == 0 {
        return Err(Error::InvalidChannelCount);
    }

    let frame_len = channels * SAMPLE_LEN;
    let frames = buffer.len() / frame_len;
    let mut out = vec![0u8; frames * SAMPLE_LEN];

    for (frame, sample) in buffer
        .chunks_exact(frame_len)
        .zip(out.chunks_exact_mut(SAMPLE_LEN))
    {
        let sum: i32 = frame
            .chunks_exact(SAMPLE_LEN)
            .map(|s| i32::from(LittleEndian::read_i16(s)))
            .sum();

        LittleEndian::write_i16(sample, (sum / channels as i32) as i16);
    }

    Ok(out)
}

/// Mixes complete mono signals from independent speakers.
///
/// Shorter signals are aligned to the end of the longest one via [`pad_to`].
/// At each position, only speakers producing a non-zero sample contribute to
/// the (truncating) average: a zero sample means that speaker is silent there.
/// Positions where every speaker is silent stay silent.
///
/// [`pad_to`]: fn.pad_to.html
pub fn downmix_sources<B: AsRef<[u8]>>(buffers: &[B]) -> Vec<u8> {
    let max_len = buffers
        .iter()
        .map(|b| b.as_ref().len())
        .max()
        .unwrap_or(0);

    let padded = buffers
        .iter()
        .map(|b| pad_to(b.as_ref(), max_len))
        .collect::<Vec<_>>();

    let mut out = vec![0u8; max_len];

    for (i, sample) in out.chunks_exact_mut(SAMPLE_LEN).enumerate() {
        let offset = i * SAMPLE_LEN;
        let mut sum = 0i32;
        let mut speaking = 0i32;

        for source in &padded {
            let value = LittleEndian::read_i16(&source[offset..offset + SAMPLE_LEN]);
            if value != 0 {
                sum += i32::from(value);
                speaking += 1;
            }
        }

        if speaking != 0 {
            LittleEndian::write_i16(sample, (sum / speaking) as i16);
        }
    }

    out
}

/// Right-pads `buffer` with silence to the next multiple of `frame_size`.
pub(crate) fn pad_to_frame(mut buffer: Vec<u8>, frame_size: usize) -> Vec<u8> {
    let rem = buffer.len() % frame_size;
    if rem != 0 {
        buffer.resize(buffer.len() + frame_size - rem, 0);
    }

    buffer
}
