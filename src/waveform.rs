//! # Waveform Synthesizer
//!
//! Maps a 16 bit phase index and a waveform kind to a raw unsigned amplitude byte, centered on [`SILENCE`].
//!
//! The synthesizer is stateless. The only data it reads besides its arguments is the immutable sine table.
//!
//! Since this is a plain DDS oscillator no attempts at band-limiting are made, the harmonically rich waveforms
//! (square, sawtooth) will alias at high frequencies.

use core::fmt;

use crate::lookup_tables;

/// The output value which represents silence, the DC midpoint of every waveform
pub const SILENCE: u8 = 128;

/// Waveform kinds are represented here
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum WaveformKind {
    Square = 0,
    Triangle = 1,
    Sawtooth = 2,
    Sine = 3,
}

impl WaveformKind {
    /// All waveform kinds, in selection order
    pub const ALL: [WaveformKind; 4] = [
        WaveformKind::Square,
        WaveformKind::Triangle,
        WaveformKind::Sawtooth,
        WaveformKind::Sine,
    ];

    /// `kind.next()` is the kind after this one, wrapping from the last kind back to the first
    ///
    /// # Examples
    ///
    /// ```
    /// # use dds_voice::waveform::WaveformKind;
    /// assert_eq!(WaveformKind::Square.next(), WaveformKind::Triangle);
    /// assert_eq!(WaveformKind::Sine.next(), WaveformKind::Square);
    /// ```
    pub fn next(self) -> Self {
        match self {
            WaveformKind::Square => WaveformKind::Triangle,
            WaveformKind::Triangle => WaveformKind::Sawtooth,
            WaveformKind::Sawtooth => WaveformKind::Sine,
            WaveformKind::Sine => WaveformKind::Square,
        }
    }

    /// `kind.name()` is the human readable name of the kind
    pub fn name(self) -> &'static str {
        match self {
            WaveformKind::Square => "Square",
            WaveformKind::Triangle => "Triangle",
            WaveformKind::Sawtooth => "Sawtooth",
            WaveformKind::Sine => "Sine",
        }
    }
}

impl fmt::Display for WaveformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<WaveformKind> for u8 {
    fn from(kind: WaveformKind) -> Self {
        kind as u8
    }
}

impl TryFrom<u8> for WaveformKind {
    type Error = UnknownWaveform;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(WaveformKind::Square),
            1 => Ok(WaveformKind::Triangle),
            2 => Ok(WaveformKind::Sawtooth),
            3 => Ok(WaveformKind::Sine),
            _ => Err(UnknownWaveform(code)),
        }
    }
}

/// A raw waveform code which does not name any [`WaveformKind`]
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownWaveform(pub u8);

impl fmt::Display for UnknownWaveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown waveform code {}", self.0)
    }
}

/// `synthesize(k, i, d)` is the raw amplitude of waveform kind `k` at phase index `i`
///
/// # Arguments:
///
/// * `kind` - the waveform to generate
///
/// * `phase_index` - the position within one cycle, the full `u16` range spans one cycle
///
/// * `duty_cycle` - the fraction of the cycle spent high, in `[0.0, 1.0]`, only used by the square wave
#[inline]
pub fn synthesize(kind: WaveformKind, phase_index: u16, duty_cycle: f32) -> u8 {
    match kind {
        WaveformKind::Square => square(phase_index, duty_cycle),
        WaveformKind::Triangle => triangle(phase_index),
        WaveformKind::Sawtooth => sawtooth(phase_index),
        WaveformKind::Sine => sine(phase_index),
    }
}

/// `synthesize_code(c, i, d)` is like `synthesize` but takes a raw waveform code
///
/// Codes which don't name a waveform produce [`SILENCE`].
///
/// # Examples
///
/// ```
/// # use dds_voice::waveform::{synthesize_code, SILENCE};
/// assert_eq!(synthesize_code(2, 0xFF00, 0.5), 0xFF); // sawtooth
/// assert_eq!(synthesize_code(42, 0xFF00, 0.5), SILENCE);
/// ```
#[inline]
pub fn synthesize_code(code: u8, phase_index: u16, duty_cycle: f32) -> u8 {
    match WaveformKind::try_from(code) {
        Ok(kind) => synthesize(kind, phase_index, duty_cycle),
        Err(_) => SILENCE,
    }
}

/// `square(i, d)` is high for the first `d` fraction of the cycle and low for the rest
fn square(phase_index: u16, duty_cycle: f32) -> u8 {
    // NaN and negative duty cycles cast to a threshold of zero
    let threshold = (duty_cycle * PHASE_INDEX_RANGE) as u32;
    if (phase_index as u32) < threshold {
        u8::MAX
    } else {
        0
    }
}

/// `triangle(i)` ramps up over the first half of the cycle and back down over the second half
fn triangle(phase_index: u16) -> u8 {
    let phase = phase_index as u32;
    if phase < HALF_CYCLE {
        ((phase * 255) / (HALF_CYCLE - 1)) as u8
    } else {
        (255 - ((phase - HALF_CYCLE) * 255) / (HALF_CYCLE - 1)) as u8
    }
}

/// `sawtooth(i)` ramps up once over the whole cycle
fn sawtooth(phase_index: u16) -> u8 {
    (phase_index >> 8) as u8
}

/// `sine(i)` is the sine table entry selected by the top 8 bits of the phase index
fn sine(phase_index: u16) -> u8 {
    lookup_tables::SINE_TABLE[(phase_index >> 8) as usize]
}

/// The number of distinct phase indices in one cycle, as a float for duty cycle scaling
const PHASE_INDEX_RANGE: f32 = 65_536.0;

/// The phase index at the midpoint of the cycle
const HALF_CYCLE: u32 = 32_768;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_half_duty_is_high_for_exactly_the_first_half() {
        for i in 0..=u16::MAX {
            let expected = if (i as u32) < HALF_CYCLE { 255 } else { 0 };
            assert_eq!(synthesize(WaveformKind::Square, i, 0.5), expected, "i = {}", i);
        }
    }

    #[test]
    fn square_duty_moves_the_edge() {
        // a quarter of the cycle high
        assert_eq!(synthesize(WaveformKind::Square, 16_383, 0.25), 255);
        assert_eq!(synthesize(WaveformKind::Square, 16_384, 0.25), 0);

        // degenerate duty cycles are always-off and always-on
        assert_eq!(synthesize(WaveformKind::Square, 0, 0.0), 0);
        assert_eq!(synthesize(WaveformKind::Square, u16::MAX, 1.0), 255);
        assert_eq!(synthesize(WaveformKind::Square, 0, f32::NAN), 0);
    }

    #[test]
    fn triangle_rises_then_falls() {
        let mut last = synthesize(WaveformKind::Triangle, 0, 0.5);
        assert_eq!(last, 0);

        for i in 1..HALF_CYCLE as u16 {
            let val = synthesize(WaveformKind::Triangle, i, 0.5);
            assert!(last <= val, "i = {}", i);
            last = val;
        }

        // peak at the midpoint
        let peak = synthesize(WaveformKind::Triangle, HALF_CYCLE as u16, 0.5);
        assert_eq!(peak, 255);
        last = peak;

        for i in (HALF_CYCLE as u16 + 1)..=u16::MAX {
            let val = synthesize(WaveformKind::Triangle, i, 0.5);
            assert!(val <= last, "i = {}", i);
            last = val;
        }
        assert_eq!(last, 0);
    }

    #[test]
    fn triangle_ends_match() {
        assert_eq!(triangle(HALF_CYCLE as u16 - 1), 255);
        assert_eq!(triangle(1), 0);
        assert_eq!(triangle(u16::MAX), 0);
    }

    #[test]
    fn sawtooth_is_the_high_byte() {
        assert_eq!(synthesize(WaveformKind::Sawtooth, 0, 0.5), 0);
        assert_eq!(synthesize(WaveformKind::Sawtooth, 0x80FF, 0.5), 0x80);
        assert_eq!(synthesize(WaveformKind::Sawtooth, u16::MAX, 0.5), 255);

        let mut last = 0;
        for i in 0..=u16::MAX {
            let val = synthesize(WaveformKind::Sawtooth, i, 0.5);
            assert!(last <= val);
            last = val;
        }
    }

    #[test]
    fn sine_reads_the_table() {
        assert_eq!(synthesize(WaveformKind::Sine, 0, 0.5), 128);
        assert_eq!(synthesize(WaveformKind::Sine, 0x4000, 0.5), 255);
        assert_eq!(synthesize(WaveformKind::Sine, 0x40FF, 0.5), 255);
        assert_eq!(synthesize(WaveformKind::Sine, 0xC000, 0.5), 1);
    }

    #[test]
    fn unknown_codes_are_silent() {
        for code in 4..=u8::MAX {
            assert_eq!(synthesize_code(code, 0x4000, 0.5), SILENCE);
        }
    }

    #[test]
    fn codes_round_trip_through_kinds() {
        for kind in WaveformKind::ALL {
            assert_eq!(WaveformKind::try_from(u8::from(kind)), Ok(kind));
        }
        assert_eq!(WaveformKind::try_from(4), Err(UnknownWaveform(4)));
    }

    #[test]
    fn next_cycles_through_all_kinds() {
        let mut kind = WaveformKind::Square;
        for expected in WaveformKind::ALL.iter().cycle().skip(1).take(8) {
            kind = kind.next();
            assert_eq!(kind, *expected);
        }
    }
}
