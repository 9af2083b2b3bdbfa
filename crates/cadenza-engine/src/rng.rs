//! Seedable random source threaded through every generator call.
//!
//! Generators take `&mut dyn RandomSource` so tests can inject scripted
//! sequences; production code uses [`ComposeRng`], a PCG32 stream whose
//! seed is derived per (section, track instance) with BLAKE3.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use cadenza_spec::hash::derive_stream_seed;

/// Source of uniform randomness for the engine.
pub trait RandomSource {
    /// Uniform value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// `true` with probability `p` (clamped to [0, 1]).
    fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.next_f64() < p
    }

    /// Uniform value in `[low, high)`; returns `low` when the range is empty.
    fn range_f64(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        low + self.next_f64() * (high - low)
    }

    /// Uniform value in `[-amount, amount)`.
    fn jitter(&mut self, amount: f64) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        self.range_f64(-amount, amount)
    }

    /// Uniform integer in `[low, high]` (inclusive).
    fn range_i32(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        let span = (high - low + 1) as f64;
        let offset = (self.next_f64() * span) as i32;
        low + offset.min(high - low)
    }

    /// Uniform index into a collection of `len` items. `len` must be > 0.
    fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index: len must be > 0");
        ((self.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
    }
}

/// PCG32-backed random source.
#[derive(Debug, Clone)]
pub struct ComposeRng {
    inner: Pcg32,
}

impl ComposeRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Stream for one generator invocation: a section index plus a salt
    /// naming the track instance (e.g. "melody-0").
    pub fn for_stream(seed: u64, section_index: u32, salt: &str) -> Self {
        Self::from_seed(derive_stream_seed(seed, section_index, salt))
    }
}

impl RandomSource for ComposeRng {
    fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

/// Replays a fixed sequence of values, cycling. Test helper.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct ScriptedRng {
    values: Vec<f64>,
    pos: usize,
}

#[cfg(test)]
impl ScriptedRng {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty());
        Self { values, pos: 0 }
    }

    /// Always returns the same value.
    pub(crate) fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRng {
    fn next_f64(&mut self) -> f64 {
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}
