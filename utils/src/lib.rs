use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::mem;

/// Writes `samples` as little-endian 16-bit PCM.
pub fn pcm_bytes(samples: &[i16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * mem::size_of::<i16>());

    for sample in samples {
        out.write_i16::<LittleEndian>(*sample).unwrap();
    }

    out
}

/// Reads little-endian 16-bit PCM back into samples.
///
/// A trailing odd byte is ignored.
pub fn pcm_samples(mut bytes: &[u8]) -> Vec<i16> {
    let mut out = Vec::with_capacity(bytes.len() / mem::size_of::<i16>());

    while let Ok(sample) = bytes.read_i16::<LittleEndian>() {
        out.push(sample);
    }

    out
}

pub fn make_pcm_sine(i16_len: usize) -> Vec<u8> {
    // set period to 100 samples.
    // amplitude = 10_000
    let samples = (0..i16_len)
        .map(|i| {
            let x_val = (i as f32) * 50.0 / std::f32::consts::PI;
            (x_val.sin() * 10_000.0) as i16
        })
        .collect::<Vec<_>>();

    pcm_bytes(&samples)
}

/// Repeats each sample of a mono signal across `channels` interleaved channels.
pub fn interleave(mono: &[u8], channels: usize) -> Vec<u8> {
    let sample_len = mem::size_of::<i16>();
    let mut out = vec![0u8; mono.len() * channels];

    for (mono_chunk, frame) in mono
        .chunks(sample_len)
        .zip(out.chunks_mut(channels * sample_len))
    {
        for channel in frame.chunks_mut(sample_len) {
            channel.copy_from_slice(mono_chunk);
        }
    }

    out
}
