/// Sound engine: procedural chiptune effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing). Synthesis itself has no
/// dependency on rodio and is always built.

use crate::domain::game::MAX_DISKS;
use crate::domain::peg::Disk;
use crate::sim::event::GameEvent;

const SAMPLE_RATE: u32 = 22050;

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};
    use tracing::warn;

    use super::synth;
    use crate::domain::game::MAX_DISKS;
    use crate::domain::peg::Disk;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        /// Pick blips, indexed by disk size (index 0 unused).
        sfx_pick: Vec<Arc<Vec<u8>>>,
        sfx_drop: Vec<Arc<Vec<u8>>>,
        sfx_return: Arc<Vec<u8>>,
        sfx_reject: Arc<Vec<u8>>,
        sfx_solved: Arc<Vec<u8>>,
    }

    fn per_disk(gen: fn(Disk) -> Vec<f32>) -> Vec<Arc<Vec<u8>>> {
        (0..=MAX_DISKS).map(|d| Arc::new(synth::make_wav(&gen(d.max(1))))).collect()
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "no audio output, sound disabled");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_pick: per_disk(synth::gen_pick),
                sfx_drop: per_disk(synth::gen_drop),
                sfx_return: Arc::new(synth::make_wav(&synth::gen_return())),
                sfx_reject: Arc::new(synth::make_wav(&synth::gen_reject())),
                sfx_solved: Arc::new(synth::make_wav(&synth::gen_solved())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        fn for_disk<'a>(bufs: &'a [Arc<Vec<u8>>], disk: Disk) -> Option<&'a Arc<Vec<u8>>> {
            bufs.get(disk as usize)
        }

        pub fn play_pick(&self, disk: Disk) {
            if let Some(buf) = Self::for_disk(&self.sfx_pick, disk) {
                self.play(buf);
            }
        }

        pub fn play_drop(&self, disk: Disk) {
            if let Some(buf) = Self::for_disk(&self.sfx_drop, disk) {
                self.play(buf);
            }
        }

        pub fn play_return(&self) { self.play(&self.sfx_return); }
        pub fn play_reject(&self) { self.play(&self.sfx_reject); }
        pub fn play_solved(&self) { self.play(&self.sfx_solved); }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_pick(&self, _disk: Disk) {}
    pub fn play_drop(&self, _disk: Disk) {}
    pub fn play_return(&self) {}
    pub fn play_reject(&self) {}
    pub fn play_solved(&self) {}
}

impl SoundEngine {
    /// Play whatever effect belongs to a session event.
    pub fn play_event(&self, event: &GameEvent) {
        match *event {
            GameEvent::DiskPicked { disk, .. } => self.play_pick(disk),
            GameEvent::DiskDropped { disk, .. } => self.play_drop(disk),
            GameEvent::DiskReturned { .. } => self.play_return(),
            GameEvent::MoveRejected { .. } => self.play_reject(),
            GameEvent::PuzzleSolved { .. } => self.play_solved(),
            _ => {}
        }
    }
}

/// Base pitch for a disk: the smallest disk sings highest.
fn disk_pitch(disk: Disk) -> f32 {
    let step = MAX_DISKS.saturating_sub(disk) as f32;
    // One whole tone per size step above G3.
    196.0 * 2f32.powf(step * 2.0 / 12.0)
}

// ════════════════════════════════════════════════════════════
//  Waveform generators: all produce Vec<f32> mono samples
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
mod synth {
    use std::f32::consts::PI;

    use super::{disk_pitch, SAMPLE_RATE};
    use crate::domain::peg::Disk;

    fn tone(freq: f32, duration: f32, volume: f32, decay: f32) -> impl Iterator<Item = f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n).map(move |i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = (1.0 - i as f32 / n as f32).powf(decay);
            // Sine plus a touch of 3rd harmonic for a retro edge
            let wave = (t * freq * 2.0 * PI).sin() * 0.75 + (t * freq * 3.0 * 2.0 * PI).sin() * 0.25;
            wave * env * volume
        })
    }

    /// Pick: short upward chirp from the disk's pitch.
    pub fn gen_pick(disk: Disk) -> Vec<f32> {
        let base = disk_pitch(disk);
        tone(base, 0.04, 0.25, 0.5).chain(tone(base * 1.5, 0.05, 0.25, 0.8)).collect()
    }

    /// Drop: a soft thud an octave below the pick.
    pub fn gen_drop(disk: Disk) -> Vec<f32> {
        let base = disk_pitch(disk) / 2.0;
        tone(base, 0.09, 0.35, 1.5).collect()
    }

    /// Put back: the drop without weight.
    pub fn gen_return() -> Vec<f32> {
        tone(330.0, 0.05, 0.15, 1.0).collect()
    }

    /// Refused press: low noisy buzz.
    pub fn gen_reject() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.14) as usize;
        let mut rng: u32 = 12345;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let square = if (t * 110.0).fract() < 0.5 { 1.0 } else { -1.0 };
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = 1.0 - i as f32 / n as f32;
                (square * 0.7 + noise * 0.3) * env * 0.2
            })
            .collect()
    }

    /// Solved: ascending fanfare C5 E5 G5 with a held C6.
    pub fn gen_solved() -> Vec<f32> {
        let mut samples: Vec<f32> = Vec::new();
        for freq in [523.0_f32, 659.0, 784.0] {
            samples.extend(tone(freq, 0.1, 0.3, 0.3));
        }
        samples.extend(tone(1047.0, 0.35, 0.3, 1.0));
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    pub fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

#[cfg(test)]
mod tests {
    use super::synth::*;
    use super::*;

    #[test]
    fn smaller_disks_sound_higher() {
        for d in 1..MAX_DISKS {
            assert!(disk_pitch(d) > disk_pitch(d + 1));
        }
        assert!((disk_pitch(MAX_DISKS) - 196.0).abs() < 0.01);
    }

    #[test]
    fn wav_header_is_consistent() {
        let samples = gen_pick(3);
        let wav = make_wav(&samples);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + samples.len() * 2);
        let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
        assert_eq!(data_size as usize, samples.len() * 2);
    }

    #[test]
    fn effects_stay_in_range() {
        let all = [gen_pick(1), gen_drop(7), gen_return(), gen_reject(), gen_solved()];
        for samples in all {
            assert!(!samples.is_empty());
            assert!(samples.iter().all(|s| s.abs() <= 1.0));
        }
    }
}
