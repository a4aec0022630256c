//! PCM transport codec
//!
//! The live API exchanges audio as base64-encoded, signed 16-bit
//! little-endian PCM. Capture frames go out as f32 samples scaled to i16;
//! inbound chunks come back as raw bytes that are de-interleaved per channel
//! and normalized to [-1, 1]. No resampling happens here: capture and
//! playback rates are pinned by the session configuration.

use crate::{DispatcherError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Decode a base64 payload into raw bytes
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(data)
        .map_err(|e| DispatcherError::CodecError(format!("Invalid base64 payload: {}", e)))
}

/// Encode raw bytes as base64 for transport
pub fn encode_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Convert f32 samples in [-1, 1] to PCM16-LE bytes
///
/// Out-of-range samples saturate at the i16 bounds.
pub fn encode_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let value = (sample * 32768.0) as i16;
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Encode a capture frame straight to its base64 wire form
pub fn encode_frame(samples: &[f32]) -> String {
    encode_base64(&encode_pcm16(samples))
}

/// A decoded, playable chunk of audio: one f32 buffer per channel
#[derive(Debug, Clone)]
pub struct AudioClip {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl AudioClip {
    /// Number of frames (samples per channel)
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_seconds(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Samples for one channel
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }
}

/// Interpret raw bytes as interleaved PCM16-LE frames and de-interleave
/// into per-channel f32 buffers normalized by 1/32768.
///
/// A trailing odd byte on a streaming chunk is ignored rather than treated
/// as fatal.
pub fn decode_audio_frames(bytes: &[u8], sample_rate: u32, channel_count: u16) -> Result<AudioClip> {
    if channel_count == 0 {
        return Err(DispatcherError::CodecError(
            "Channel count must be non-zero".to_string(),
        ));
    }

    let channel_count = channel_count as usize;
    let samples: Vec<i16> = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let frame_count = samples.len() / channel_count;

    let mut channels = vec![Vec::with_capacity(frame_count); channel_count];
    for frame in 0..frame_count {
        for (ch, buffer) in channels.iter_mut().enumerate() {
            buffer.push(samples[frame * channel_count + ch] as f32 / 32768.0);
        }
    }

    Ok(AudioClip {
        channels,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_round_trip() {
        let bytes = vec![0u8, 1, 127, 255, 64];
        let encoded = encode_base64(&bytes);
        assert_eq!(decode_base64(&encoded).unwrap(), bytes);
    }

    #[test]
    fn test_base64_rejects_garbage() {
        assert!(decode_base64("not base64 !!!").is_err());
    }

    #[test]
    fn test_encode_pcm16_scaling() {
        let bytes = encode_pcm16(&[0.0, 0.5, -0.5]);
        assert_eq!(bytes.len(), 6);
        let values: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|p| i16::from_le_bytes([p[0], p[1]]))
            .collect();
        assert_eq!(values[0], 0);
        assert_eq!(values[1], 16384);
        assert_eq!(values[2], -16384);
    }

    #[test]
    fn test_encode_pcm16_saturates() {
        let bytes = encode_pcm16(&[1.5, -1.5]);
        let values: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|p| i16::from_le_bytes([p[0], p[1]]))
            .collect();
        assert_eq!(values[0], i16::MAX);
        assert_eq!(values[1], i16::MIN);
    }

    #[test]
    fn test_decode_mono_normalization() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&16384i16.to_le_bytes());
        bytes.extend_from_slice(&(-32768i16).to_le_bytes());

        let clip = decode_audio_frames(&bytes, 24000, 1).unwrap();
        assert_eq!(clip.frame_count(), 2);
        assert_eq!(clip.channel_count(), 1);
        assert!((clip.channel(0)[0] - 0.5).abs() < 1e-6);
        assert!((clip.channel(0)[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_decode_stereo_deinterleaves() {
        let mut bytes = Vec::new();
        for value in [100i16, -100, 200, -200] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }

        let clip = decode_audio_frames(&bytes, 24000, 2).unwrap();
        assert_eq!(clip.frame_count(), 2);
        assert_eq!(clip.channel_count(), 2);
        assert!((clip.channel(0)[0] - 100.0 / 32768.0).abs() < 1e-6);
        assert!((clip.channel(1)[0] + 100.0 / 32768.0).abs() < 1e-6);
        assert!((clip.channel(0)[1] - 200.0 / 32768.0).abs() < 1e-6);
    }

    #[test]
    fn test_decode_ignores_trailing_byte() {
        let mut bytes = 0i16.to_le_bytes().to_vec();
        bytes.push(0xFF);
        let clip = decode_audio_frames(&bytes, 24000, 1).unwrap();
        assert_eq!(clip.frame_count(), 1);
    }

    #[test]
    fn test_duration() {
        let bytes = vec![0u8; 24000 * 2];
        let clip = decode_audio_frames(&bytes, 24000, 1).unwrap();
        assert!((clip.duration_seconds() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_capture_frame_round_trip() {
        let frame: Vec<f32> = (0..64).map(|i| (i as f32 / 64.0) - 0.5).collect();
        let wire = encode_frame(&frame);
        let bytes = decode_base64(&wire).unwrap();
        let clip = decode_audio_frames(&bytes, 16000, 1).unwrap();
        for (original, decoded) in frame.iter().zip(clip.channel(0)) {
            assert!((original - decoded).abs() < 1.0 / 32768.0 + 1e-6);
        }
    }
}
