//! Mono WAV files: sources for tables and samples, and rendered output.
//!
//! Voices only ever play one channel, so [`read_wav`] folds every frame down
//! to its channel average and [`write_wav`] always writes a single channel.

use crate::{Error, Result};
use core::fmt;
use core::str::FromStr;
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// Sample encoding of a written file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    /// 16-bit integer PCM.
    Int16,
    /// 24-bit integer PCM.
    Int24,
    /// 32-bit IEEE float, lossless for rendered output.
    #[default]
    Float32,
}

impl BitDepth {
    /// Depth for a bit count: 16, 24 or 32.
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            16 => Some(Self::Int16),
            24 => Some(Self::Int24),
            32 => Some(Self::Float32),
            _ => None,
        }
    }

    /// Bits per sample.
    pub fn bits(self) -> u16 {
        match self {
            Self::Int16 => 16,
            Self::Int24 => 24,
            Self::Float32 => 32,
        }
    }

    fn hound_spec(self, sample_rate: u32) -> hound::WavSpec {
        hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: self.bits(),
            sample_format: match self {
                Self::Float32 => SampleFormat::Float,
                Self::Int16 | Self::Int24 => SampleFormat::Int,
            },
        }
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl FromStr for BitDepth {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim()
            .parse::<u16>()
            .ok()
            .and_then(Self::from_bits)
            .ok_or_else(|| format!("unsupported bit depth '{s}' (expected 16, 24 or 32)"))
    }
}

/// How to write a rendered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Sample encoding.
    pub depth: BitDepth,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            depth: BitDepth::Float32,
        }
    }
}

/// Format of a file as it was found on disk, before the mono fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count of the file.
    pub channels: u16,
    /// Bits per stored sample.
    pub bits_per_sample: u16,
    /// Frames (samples per channel).
    pub frames: usize,
}

impl SourceInfo {
    /// Length in seconds.
    pub fn duration(&self) -> f32 {
        self.frames as f32 / self.sample_rate.max(1) as f32
    }
}

/// Full-scale value of an integer sample of `bits` bits.
fn int_scale(bits: u16) -> f32 {
    (1i64 << (bits.clamp(2, 32) - 1)) as f32
}

/// Fold interleaved samples into their per-frame channel average.
fn fold_to_mono<I>(samples: I, channels: usize, capacity: usize) -> Result<Vec<f32>>
where
    I: Iterator<Item = hound::Result<f32>>,
{
    let gain = 1.0 / channels as f32;
    let mut mono = vec![0.0f32; capacity];
    let mut count = 0;
    for (i, sample) in samples.enumerate() {
        let frame = i / channels;
        if frame >= mono.len() {
            mono.push(0.0);
        }
        mono[frame] += sample? * gain;
        count = i + 1;
    }
    mono.truncate(count.div_ceil(channels));
    Ok(mono)
}

/// Read a WAV file as mono `f32` samples in `[-1, 1]`.
///
/// A file with no frames is an error, since no voice can play it.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, SourceInfo)> {
    let path = path.as_ref();
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;
    let frames = reader.duration() as usize;

    let mono = match spec.sample_format {
        SampleFormat::Float => fold_to_mono(reader.samples::<f32>(), channels, frames)?,
        SampleFormat::Int => {
            let scale = int_scale(spec.bits_per_sample);
            let samples = reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale));
            fold_to_mono(samples, channels, frames)?
        }
    };
    if mono.is_empty() {
        return Err(Error::EmptyFile(path.to_path_buf()));
    }

    let info = SourceInfo {
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        frames: mono.len(),
    };
    tracing::debug!(
        path = %path.display(),
        frames = info.frames,
        sample_rate = info.sample_rate,
        channels = info.channels,
        "read wav"
    );
    Ok((mono, info))
}

/// Write mono samples. Integer depths clip to full scale.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let mut writer = WavWriter::create(path, spec.depth.hound_spec(spec.sample_rate))?;
    match spec.depth {
        BitDepth::Float32 => {
            for &sample in samples {
                writer.write_sample(sample)?;
            }
        }
        BitDepth::Int16 | BitDepth::Int24 => {
            let scale = int_scale(spec.depth.bits());
            for &sample in samples {
                writer.write_sample((sample * scale).clamp(-scale, scale - 1.0) as i32)?;
            }
        }
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn float_output_reads_back_exactly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f.wav");
        let data = vec![0.0, 0.5, -0.25, 1.0, -1.0];
        write_wav(&path, &data, WavSpec::default()).unwrap();
        let (read, info) = read_wav(&path).unwrap();
        assert_eq!(read, data);
        assert_eq!(info.sample_rate, 44100);
        assert_eq!(info.channels, 1);
        assert_eq!(info.frames, 5);
    }

    #[test]
    fn integer_output_is_within_one_step() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("i.wav");
        let data: Vec<f32> = (0..100).map(|i| (i as f32 * 0.1).sin() * 0.8).collect();
        let spec = WavSpec {
            sample_rate: 22050,
            depth: BitDepth::Int16,
        };
        write_wav(&path, &data, spec).unwrap();
        let (read, info) = read_wav(&path).unwrap();
        assert_eq!(info.sample_rate, 22050);
        assert_eq!(info.bits_per_sample, 16);
        for (a, b) in data.iter().zip(&read) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn stereo_folds_to_channel_average() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("s.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for (l, r) in [(1.0f32, 0.0f32), (0.5, 0.5), (-1.0, 0.0)] {
            writer.write_sample(l).unwrap();
            writer.write_sample(r).unwrap();
        }
        writer.finalize().unwrap();

        let (mono, info) = read_wav(&path).unwrap();
        assert_eq!(info.channels, 2);
        assert_eq!(info.frames, 3);
        assert_eq!(mono, vec![0.5, 0.5, -0.5]);
        assert!((info.duration() - 3.0 / 44100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("e.wav");
        write_wav(&path, &[], WavSpec::default()).unwrap();
        assert!(matches!(read_wav(&path), Err(Error::EmptyFile(_))));
    }

    #[test]
    fn bit_depth_parses_supported_counts() {
        assert_eq!("24".parse::<BitDepth>(), Ok(BitDepth::Int24));
        assert_eq!(BitDepth::from_bits(32), Some(BitDepth::Float32));
        assert!("8".parse::<BitDepth>().is_err());
        assert_eq!(BitDepth::Int16.to_string(), "16");
    }
}
