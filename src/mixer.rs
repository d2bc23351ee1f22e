//! # Sample Mixer
//!
//! Applies the envelope level to a raw waveform byte. The deviation from the DC midpoint is scaled, not the raw byte
//! itself, so a level of zero is exactly [`SILENCE`] for every waveform.

use crate::{utils::round_to_u8, waveform::SILENCE};

/// `mix(r, l)` is the raw waveform byte `r` scaled around the midpoint by envelope level `l`
///
/// The result is `round((r - 128) * l + 128)` clamped to `[0, 255]`. A NaN level is silence.
///
/// # Examples
///
/// ```
/// # use dds_voice::mixer::mix;
/// assert_eq!(mix(255, 0.0), 128);
/// assert_eq!(mix(255, 1.0), 255);
/// assert_eq!(mix(0, 0.5), 64);
/// ```
#[inline]
pub fn mix(raw: u8, level: f32) -> u8 {
    if level.is_nan() {
        return SILENCE;
    }
    let deviation = raw as f32 - SILENCE as f32;
    round_to_u8(deviation * level + SILENCE as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::{synthesize, WaveformKind};

    #[test]
    fn zero_level_is_silence_for_every_raw_value() {
        for raw in 0..=u8::MAX {
            assert_eq!(mix(raw, 0.0), SILENCE);
        }
    }

    #[test]
    fn zero_level_is_silence_for_every_waveform() {
        for kind in WaveformKind::ALL {
            for i in (0..=u16::MAX).step_by(97) {
                assert_eq!(mix(synthesize(kind, i, 0.3), 0.0), SILENCE);
            }
        }
    }

    #[test]
    fn full_level_is_unchanged() {
        for raw in 0..=u8::MAX {
            assert_eq!(mix(raw, 1.0), raw);
        }
    }

    #[test]
    fn partial_levels_scale_around_the_midpoint() {
        assert_eq!(mix(255, 0.5), 192); // 127 * 0.5 + 128 = 191.5, rounds up
        assert_eq!(mix(0, 0.25), 96);
        assert_eq!(mix(128, 0.77), 128);
    }

    #[test]
    fn out_of_range_levels_are_clamped() {
        assert_eq!(mix(255, 3.0), 255);
        assert_eq!(mix(0, 3.0), 0);
        assert_eq!(mix(200, f32::NAN), SILENCE);
    }
}
