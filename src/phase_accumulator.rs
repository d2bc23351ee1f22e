//! # Phase Accumulator
//!
//! A 32 bit phase accumulator is the heart of Direct Digital Synthesis (DDS). The accumulator holds the current
//! position within one waveform cycle, and is advanced by a fixed increment once per sample. Overflow past `2^32` is
//! the intended periodic wrap, so the accumulator is simply a wrapping `u32`.
//!
//! The increment is derived from the desired frequency and the sample rate:
//!
//! `increment = round(frequency * 2^32 / sample_rate)`
//!
//! and is only recomputed when the frequency changes, never inside the per-sample tick.

/// A 32 bit phase accumulator is represented here
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseAccumulator {
    sample_rate_hz: f32,
    accumulator: u32,
    increment: u32,
}

impl PhaseAccumulator {
    /// `PhaseAccumulator::new(sr)` is a new phase accumulator with sample rate `sr`, at phase zero and not moving
    pub fn new(sample_rate_hz: f32) -> Self {
        Self {
            sample_rate_hz,
            accumulator: 0,
            increment: 0,
        }
    }

    /// `pa.tick()` is the current phase, and then advances the phase accumulator by 1 tick
    ///
    /// Expected to be called at the sample rate.
    #[inline]
    pub fn tick(&mut self) -> u32 {
        let phase = self.accumulator;
        self.accumulator = self.accumulator.wrapping_add(self.increment);
        phase
    }

    /// `pa.set_frequency(f)` sets the frequency of the phase accumulator to frequency `f`
    ///
    /// Zero (or negative) frequencies stop the accumulator at its current phase.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.increment = increment_for(freq_hz, self.sample_rate_hz);
    }

    /// `pa.set_increment(i)` sets the raw per-tick increment, for when the increment was computed elsewhere
    pub fn set_increment(&mut self, increment: u32) {
        self.increment = increment;
    }

    /// `pa.increment()` is the raw per-tick increment
    pub fn increment(&self) -> u32 {
        self.increment
    }

    /// `pa.phase()` is the current raw phase word
    pub fn phase(&self) -> u32 {
        self.accumulator
    }

    /// `pa.index()` is the top 16 bits of the phase, used to index waveform tables and formulas
    #[inline]
    pub fn index(&self) -> u16 {
        index_of(self.accumulator)
    }

    // `pa.ramp()` is the current value of the phase accumulator as a number in `[0.0, 1.0)`
    pub fn ramp(&self) -> f32 {
        (self.accumulator as f64 / PHASE_RANGE) as f32
    }

    /// `pa.reset()` resets the phase accumulator to zero, the increment is retained
    pub fn reset(&mut self) {
        self.accumulator = 0;
    }
}

/// `increment_for(f, sr)` is the phase increment which makes a 32 bit accumulator cycle at `f` hertz when ticked at
/// `sr` hertz
///
/// Frequencies at or below zero (and NaN) give an increment of zero. Frequencies so high that the increment can't
/// fit in 32 bits saturate.
///
/// # Examples
///
/// ```
/// # use dds_voice::phase_accumulator::increment_for;
/// assert_eq!(increment_for(440.0, 44_100.0), 42_852_281);
/// assert_eq!(increment_for(0.0, 44_100.0), 0);
/// ```
pub fn increment_for(freq_hz: f32, sample_rate_hz: f32) -> u32 {
    if freq_hz.is_nan() || freq_hz <= 0.0 || sample_rate_hz.is_nan() || sample_rate_hz <= 0.0 {
        return 0;
    }
    // f64 keeps the full 32 bits of precision, float to int `as` casts saturate
    let exact = freq_hz as f64 * PHASE_RANGE / sample_rate_hz as f64;
    (exact + 0.5) as u32
}

/// `index_of(p)` is the top 16 bits of the phase word `p`
#[inline]
pub fn index_of(phase: u32) -> u16 {
    (phase >> (32 - NUM_INDEX_BITS)) as u16
}

/// The number of phase bits used as the waveform index
pub const NUM_INDEX_BITS: u32 = 16;

/// One full cycle of the accumulator, `2^32`
const PHASE_RANGE: f64 = 4_294_967_296.0;
