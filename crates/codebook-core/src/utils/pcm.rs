//! Raw PCM byte buffer decoding
//!
//! The estimator receives its input as a caller-owned byte buffer tagged
//! with an endianness; everything downstream works on `i16` samples. A
//! trailing odd byte cannot form a sample and is silently dropped, matching
//! the silent drop of a trailing partial frame.

use crate::types::SampleEncoding;

/// Decode a raw mono 16-bit PCM byte buffer into samples
pub fn decode_samples(buffer: &[u8], encoding: SampleEncoding) -> Vec<i16> {
    let mut samples = Vec::with_capacity(buffer.len() / 2);

    for pair in buffer.chunks_exact(2) {
        let sample = match encoding {
            SampleEncoding::LittleEndian => i16::from_le_bytes([pair[0], pair[1]]),
            SampleEncoding::BigEndian => i16::from_be_bytes([pair[0], pair[1]]),
        };
        samples.push(sample);
    }

    samples
}
