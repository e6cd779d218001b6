//! Pre-generated noise shared by percussion voices.
//!
//! Generating noise per sample costs a PRNG step per stream, and snare or clap
//! recipes read several independent streams at once. Instead every voice reads
//! from one [`NoiseBuffer`] filled once at construction. Each trigger picks a
//! random start offset with [`Xorshift32`], so consecutive hits never replay
//! the same grain pattern.
//!
//! The buffer is immutable after construction and reference counted, so any
//! number of voices (on any thread) can read it without synchronization.

use alloc::sync::Arc;
use alloc::vec::Vec;

/// Xorshift32 pseudo-random generator.
///
/// Three shifts and three XORs per step. Not suitable for anything but audio.
#[derive(Debug, Clone, Copy)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// Seed used when the caller passes 0 (xorshift has a fixed point at 0).
    const FALLBACK_SEED: u32 = 0x1234_5678;

    /// Create a generator from a seed. A zero seed is replaced.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Next raw 32-bit value.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Next value uniformly distributed in [-1, 1].
    #[inline]
    pub fn next_bipolar(&mut self) -> f32 {
        (self.next_u32() as i32 as f32) / (i32::MAX as f32)
    }

    /// Next index in `0..bound`. Returns 0 when `bound` is 0.
    #[inline]
    pub fn next_index(&mut self, bound: usize) -> usize {
        if bound == 0 {
            0
        } else {
            self.next_u32() as usize % bound
        }
    }
}

/// Immutable buffer of independent uniform samples in [-1, 1].
///
/// The length is always a power of two so wraparound indexing is a mask.
/// Cloning shares the underlying samples.
///
/// ```rust
/// use tambor_core::NoiseBuffer;
///
/// let noise = NoiseBuffer::new(1000, 42);
/// assert_eq!(noise.len(), 1024);
/// assert_eq!(noise.sample(3), noise.sample(3 + 1024));
/// ```
#[derive(Debug, Clone)]
pub struct NoiseBuffer {
    samples: Arc<[f32]>,
    mask: usize,
}

impl NoiseBuffer {
    /// Default length: 32768 samples (~0.74 s at 44.1 kHz).
    pub const DEFAULT_LEN: usize = 1 << 15;

    /// Fill a new buffer with `len` (rounded up to a power of two) samples.
    pub fn new(len: usize, seed: u32) -> Self {
        let len = len.max(1).next_power_of_two();
        let mut rng = Xorshift32::new(seed);
        let samples: Vec<f32> = (0..len).map(|_| rng.next_bipolar()).collect();

        #[cfg(feature = "tracing")]
        tracing::debug!("noise buffer: {len} samples, seed {seed:#x}");

        Self {
            samples: samples.into(),
            mask: len - 1,
        }
    }

    /// Buffer of [`Self::DEFAULT_LEN`] samples.
    pub fn with_seed(seed: u32) -> Self {
        Self::new(Self::DEFAULT_LEN, seed)
    }

    /// Read the sample at `index`, wrapping around the buffer end.
    #[inline]
    pub fn sample(&self, index: usize) -> f32 {
        self.samples[index & self.mask]
    }

    /// Number of samples in the buffer.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; a buffer holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True when both handles read the same allocation.
    pub fn shares_storage_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.samples, &other.samples)
    }
}

impl Default for NoiseBuffer {
    fn default() -> Self {
        Self::with_seed(0x9E37_79B9)
    }
}
