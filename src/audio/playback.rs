//! Scheduled audio playback
//!
//! Reply audio arrives as independent chunks of unpredictable size and must
//! be stitched without gaps or overlaps. The scheduler keeps a monotonically
//! advancing next-start clock on the output timeline: each chunk starts at
//! `max(next_start, now)` and advances the clock by its own length, so
//! arrival jitter never reorders or overlaps playback. Every scheduled chunk
//! stays tracked as an in-flight voice until it finishes rendering, which is
//! what lets a barge-in stop all queued output at once.

use crate::audio::codec::AudioClip;
use std::sync::Arc;

/// One scheduled chunk on the output timeline
struct Voice {
    id: u64,
    start: u64,
    samples: Arc<Vec<f32>>,
}

impl Voice {
    fn end(&self) -> u64 {
        self.start + self.samples.len() as u64
    }
}

/// Gapless sequential scheduler for streamed audio chunks
pub struct PlaybackScheduler {
    sample_rate: u32,
    /// Output device time, in samples rendered so far
    clock: u64,
    /// Earliest start for the next scheduled chunk
    next_start: u64,
    voices: Vec<Voice>,
    next_id: u64,
}

impl PlaybackScheduler {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            clock: 0,
            next_start: 0,
            voices: Vec::new(),
            next_id: 0,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Current output-device time in samples
    pub fn now(&self) -> u64 {
        self.clock
    }

    pub fn now_seconds(&self) -> f64 {
        self.clock as f64 / self.sample_rate as f64
    }

    /// Number of chunks currently scheduled or playing
    pub fn in_flight(&self) -> usize {
        self.voices.len()
    }

    /// Schedule a chunk for playback; returns its start time in samples.
    ///
    /// Start time is never earlier than the device clock and never earlier
    /// than the end of the previously scheduled chunk.
    pub fn schedule(&mut self, clip: &AudioClip) -> u64 {
        let start = self.next_start.max(self.clock);
        let samples: Vec<f32> = clip.channel(0).to_vec();
        self.next_start = start + samples.len() as u64;

        self.voices.push(Voice {
            id: self.next_id,
            start,
            samples: Arc::new(samples),
        });
        self.next_id += 1;

        start
    }

    /// Stop all in-flight playback and reset the running clock.
    ///
    /// The device clock keeps advancing, so the next scheduled chunk starts
    /// at device-now rather than behind it.
    pub fn interrupt(&mut self) {
        self.voices.clear();
        self.next_start = 0;
    }

    /// Mix the next `out.len()` samples into `out`, advancing the device
    /// clock. Finished voices are dropped; returns their count.
    pub fn render(&mut self, out: &mut [f32]) -> usize {
        out.fill(0.0);

        let begin = self.clock;
        let end = begin + out.len() as u64;

        for voice in &self.voices {
            let overlap_start = voice.start.max(begin);
            let overlap_end = voice.end().min(end);
            if overlap_start >= overlap_end {
                continue;
            }

            let src_offset = (overlap_start - voice.start) as usize;
            let dst_offset = (overlap_start - begin) as usize;
            let len = (overlap_end - overlap_start) as usize;

            for i in 0..len {
                out[dst_offset + i] += voice.samples[src_offset + i];
            }
        }

        self.clock = end;

        let before = self.voices.len();
        self.voices.retain(|voice| voice.end() > end);
        before - self.voices.len()
    }
}

#[cfg(feature = "audio-io")]
pub use device::AudioOutput;

#[cfg(feature = "audio-io")]
mod device {
    use super::PlaybackScheduler;
    use crate::{DispatcherError, Result};
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use cpal::{Device, SampleRate, Stream, StreamConfig};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tracing::{error, info};

    /// Output device that drains a shared [`PlaybackScheduler`]
    pub struct AudioOutput {
        device: Device,
        config: StreamConfig,
        stream: Option<Stream>,
        scheduler: Arc<Mutex<PlaybackScheduler>>,
    }

    impl AudioOutput {
        /// Open the default output device at the fixed playback rate,
        /// draining the given scheduler
        pub fn new(sample_rate: u32, scheduler: Arc<Mutex<PlaybackScheduler>>) -> Result<Self> {
            let host = cpal::default_host();

            let device = host.default_output_device().ok_or_else(|| {
                DispatcherError::AudioDeviceError("No output device available".into())
            })?;

            info!(
                "Using output device: {}",
                device.name().unwrap_or_else(|_| "Unknown".to_string())
            );

            let channels = device
                .default_output_config()
                .map_err(|e| {
                    DispatcherError::AudioDeviceError(format!(
                        "Failed to get output config: {}",
                        e
                    ))
                })?
                .channels();

            // Rate is pinned to what the live API streams; no resampling.
            let config = StreamConfig {
                channels,
                sample_rate: SampleRate(sample_rate),
                buffer_size: cpal::BufferSize::Default,
            };

            Ok(Self {
                device,
                config,
                stream: None,
                scheduler,
            })
        }

        pub fn sample_rate(&self) -> u32 {
            self.config.sample_rate.0
        }

        /// Start the output stream
        pub fn start(&mut self) -> Result<()> {
            if self.stream.is_some() {
                return Ok(());
            }

            let channels = self.config.channels as usize;
            let scheduler = Arc::clone(&self.scheduler);
            let mut mono: Vec<f32> = Vec::new();

            let err_fn = |err| {
                error!("Audio output stream error: {}", err);
            };

            let stream = self
                .device
                .build_output_stream(
                    &self.config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        let frames = data.len() / channels;
                        mono.resize(frames, 0.0);
                        scheduler.lock().render(&mut mono);

                        for (frame, &sample) in mono.iter().enumerate() {
                            for ch in 0..channels {
                                data[frame * channels + ch] = sample;
                            }
                        }
                    },
                    err_fn,
                    None,
                )
                .map_err(|e| {
                    DispatcherError::AudioDeviceError(format!(
                        "Failed to build output stream: {}",
                        e
                    ))
                })?;

            stream.play().map_err(|e| {
                DispatcherError::AudioDeviceError(format!("Failed to start output stream: {}", e))
            })?;

            self.stream = Some(stream);
            info!("Started audio playback at {} Hz", self.config.sample_rate.0);
            Ok(())
        }

        /// Stop the output stream; safe to call when already stopped
        pub fn stop(&mut self) {
            if let Some(stream) = self.stream.take() {
                drop(stream);
                info!("Stopped audio playback");
            }
        }
    }

    impl Drop for AudioOutput {
        fn drop(&mut self) {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::codec::decode_audio_frames;

    fn clip(frames: usize) -> AudioClip {
        let bytes = vec![1u8; frames * 2];
        decode_audio_frames(&bytes, 24000, 1).unwrap()
    }

    #[test]
    fn test_sequential_chunks_are_gapless() {
        let mut scheduler = PlaybackScheduler::new(24000);

        let start_a = scheduler.schedule(&clip(100));
        let start_b = scheduler.schedule(&clip(250));
        let start_c = scheduler.schedule(&clip(50));

        assert_eq!(start_a, 0);
        assert_eq!(start_b, 100);
        assert_eq!(start_c, 350);
        assert_eq!(scheduler.in_flight(), 3);
    }

    #[test]
    fn test_never_schedules_into_the_past() {
        let mut scheduler = PlaybackScheduler::new(24000);
        scheduler.schedule(&clip(10));

        // Render well past the first chunk before the next arrives.
        let mut out = vec![0.0; 500];
        scheduler.render(&mut out);

        let start = scheduler.schedule(&clip(10));
        assert!(start >= scheduler.now() - 10);
        assert_eq!(start, 500);
    }

    #[test]
    fn test_no_overlap_under_jitter() {
        let mut scheduler = PlaybackScheduler::new(24000);
        let durations = [37usize, 512, 3, 999, 128];

        let mut prev_end = 0u64;
        let mut out = vec![0.0; 64];
        for (i, &frames) in durations.iter().enumerate() {
            let start = scheduler.schedule(&clip(frames));
            assert!(start >= prev_end, "chunk {} overlaps its predecessor", i);
            assert!(start >= scheduler.now());
            prev_end = start + frames as u64;

            // Arbitrary rendering between arrivals.
            if i % 2 == 0 {
                scheduler.render(&mut out);
            }
        }
    }

    #[test]
    fn test_interrupt_clears_voices_and_resets_clock() {
        let mut scheduler = PlaybackScheduler::new(24000);
        scheduler.schedule(&clip(1000));
        scheduler.schedule(&clip(1000));
        assert_eq!(scheduler.in_flight(), 2);

        let mut out = vec![0.0; 300];
        scheduler.render(&mut out);

        scheduler.interrupt();
        assert_eq!(scheduler.in_flight(), 0);

        // Next chunk starts at device-now, not at the stale running clock.
        let start = scheduler.schedule(&clip(10));
        assert_eq!(start, 300);
    }

    #[test]
    fn test_render_mixes_and_drops_finished_voices() {
        let mut scheduler = PlaybackScheduler::new(24000);
        scheduler.schedule(&clip(64));

        let mut out = vec![0.0; 64];
        let finished = scheduler.render(&mut out);
        assert_eq!(finished, 1);
        assert_eq!(scheduler.in_flight(), 0);
        // Non-silent samples actually landed in the buffer.
        assert!(out.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_render_silence_when_empty() {
        let mut scheduler = PlaybackScheduler::new(24000);
        let mut out = vec![1.0; 32];
        scheduler.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(scheduler.now(), 32);
    }
}
