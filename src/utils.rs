use core::sync::atomic::{AtomicU32, Ordering};

#[cfg(test)]
/// `is_almost(v1, v2, e)` is true iff `v1` is within `e` of `v2`
pub fn is_almost(v1: f32, v2: f32, eps: f32) -> bool {
    fabs(v1 - v2) <= eps
}

#[cfg(test)]
/// `fabs(v)` is the absolute value of `v`
pub fn fabs(v: f32) -> f32 {
    if v < 0.0 {
        -v
    } else {
        v
    }
}

/// `clamp_unit(v)` is `v` clamped to `[0.0, 1.0]`, NaN maps to zero
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// `round_to_u8(v)` is `v` rounded half-up to the nearest integer in `[0, 255]`
///
/// `core` has no `f32::round`, but values clamped to be non-negative round correctly with `+ 0.5` and truncation.
pub fn round_to_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 255.0) + 0.5) as u8
}

/// An `f32` which may be shared between an interrupt and the main loop is represented here
///
/// The value is stored as its bit pattern in a single atomic word, so readers always see a whole value, never half of
/// an old value and half of a new one.
#[derive(Debug)]
pub struct AtomicF32 {
    bits: AtomicU32,
}

impl AtomicF32 {
    /// `AtomicF32::new(v)` is a new atomic float holding `v`
    pub const fn new(value: f32) -> Self {
        Self {
            bits: AtomicU32::new(value.to_bits()),
        }
    }

    /// `af.load(o)` is the stored value
    #[inline]
    pub fn load(&self, ordering: Ordering) -> f32 {
        f32::from_bits(self.bits.load(ordering))
    }

    /// `af.store(v, o)` replaces the stored value with `v`
    #[inline]
    pub fn store(&self, value: f32, ordering: Ordering) {
        self.bits.store(value.to_bits(), ordering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn almost_is_symmetric() {
        assert!(is_almost(1.0, 1.05, 0.1));
        assert!(is_almost(1.05, 1.0, 0.1));
        assert!(!is_almost(1.0, 1.2, 0.1));
    }

    #[test]
    fn clamp_unit_handles_out_of_range_and_nan() {
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_unit(0.25), 0.25);
        assert_eq!(clamp_unit(7.0), 1.0);
        assert_eq!(clamp_unit(f32::NAN), 0.0);
    }

    #[test]
    fn round_to_u8_rounds_half_up_and_saturates() {
        assert_eq!(round_to_u8(127.49), 127);
        assert_eq!(round_to_u8(127.5), 128);
        assert_eq!(round_to_u8(-3.0), 0);
        assert_eq!(round_to_u8(300.0), 255);
        assert_eq!(round_to_u8(254.6), 255);
    }

    #[test]
    fn atomic_float_stores_and_loads() {
        let af = AtomicF32::new(0.5);
        assert_eq!(af.load(Ordering::Relaxed), 0.5);
        af.store(-1.25, Ordering::Relaxed);
        assert_eq!(af.load(Ordering::Relaxed), -1.25);
    }
}
