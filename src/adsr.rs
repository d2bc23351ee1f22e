//! # Attack, Decay, Sustain, Release generator
//!
//! ## Acronyms used:
//!
//! - `ADSR`: Attack Decay Sustain Release generator
//!
//! ADSRs are a standard component of most synthesizers, used here to shape the loudness of the oscillator.
//!
//! This ADSR has four variable input parameters:
//!
//! - Attack time
//! - Decay time
//! - Sustain level
//! - Release time
//!
//! This ADSR responds to two types of time based events:
//!
//! - Note On events initiate an attack phase
//! - Note Off events initiate a release phase
//!
//! This ADSR has a single output:
//!
//! - The current level of the envelope in the range `[0.0, 1.0]`.
//!
//! The segments are straight lines. Time is integrated by the caller passing the elapsed time in seconds to
//! `update(dt)`, which is expected to happen at a control rate much slower than the audio sample rate, so the
//! envelope moves in coarser steps than the waveform.
//!
//! The release segment always ramps down from the sustain level, even when the note is released during the attack or
//! decay segments. A release during attack can therefore jump up or down to the sustain level before ramping to zero.

use core::fmt;

/// An ADSR envelope generator is represented here
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    params: EnvelopeParams,

    stage: Stage,

    // seconds since entering the current stage
    elapsed: f32,

    // in `[0.0, 1.0]`
    level: f32,
}

impl Adsr {
    /// `Adsr::new(p)` is a new ADSR with envelope parameters `p`, at rest with a level of zero
    pub fn new(params: EnvelopeParams) -> Self {
        Self {
            params,
            stage: Stage::Idle,
            elapsed: 0.0_f32,
            level: 0.0_f32,
        }
    }

    /// `adsr.note_on()` starts a new ATTACK phase from any stage
    ///
    /// The level is not touched until the next `update`, so attack ramps are re-triggered from zero.
    pub fn note_on(&mut self) {
        self.enter(Stage::Attack);
    }

    /// `adsr.note_off()` starts a RELEASE phase, unless the ADSR is already at rest
    pub fn note_off(&mut self) {
        match self.stage {
            Stage::Attack | Stage::Decay | Stage::Sustain | Stage::Release => self.enter(Stage::Release),
            Stage::Idle => (), // ignore the message, there is nothing to release
        }
    }

    /// `adsr.update(dt)` advances the envelope by `dt` seconds and recalculates the level
    ///
    /// Negative and NaN time steps are treated as zero.
    ///
    /// # Examples
    ///
    /// ```
    /// # use dds_voice::adsr::{Adsr, EnvelopeParams, Stage};
    /// let mut adsr = Adsr::new(EnvelopeParams::new(1.0, 0.5, 0.6, 2.0));
    ///
    /// adsr.note_on();
    /// adsr.update(0.5);
    /// assert_eq!(adsr.level(), 0.5);
    /// assert_eq!(adsr.stage(), Stage::Attack);
    /// ```
    pub fn update(&mut self, dt: f32) {
        if dt > 0.0 {
            self.elapsed += dt;
        }

        let sustain = self.params.sustain.0;

        match self.stage {
            Stage::Idle => self.level = 0.0,
            Stage::Attack => {
                let attack = self.params.attack.0;
                self.level = if 0.0 < attack {
                    (self.elapsed / attack).min(1.0)
                } else {
                    1.0
                };
                if 1.0 <= self.level {
                    self.enter(Stage::Decay);
                }
            }
            Stage::Decay => {
                let progress = progress(self.elapsed, self.params.decay.0);
                if 1.0 <= progress {
                    self.level = sustain;
                    self.enter(Stage::Sustain);
                } else {
                    // straight line from full scale down to the sustain level
                    self.level = 1.0 - progress * (1.0 - sustain);
                }
            }
            Stage::Sustain => self.level = sustain,
            Stage::Release => {
                let progress = progress(self.elapsed, self.params.release.0);
                if 1.0 <= progress {
                    self.level = 0.0;
                    self.enter(Stage::Idle);
                } else {
                    self.level = sustain * (1.0 - progress);
                }
            }
        }

        // holds no matter which branch ran
        self.level = self.level.max(0.0).min(1.0);
    }

    /// `adsr.level()` is the current level of the ADSR in `[0.0, 1.0]`
    pub fn level(&self) -> f32 {
        self.level
    }

    /// `adsr.stage()` is the stage the ADSR is currently in
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// `adsr.elapsed()` is the number of seconds since the current stage was entered
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// `adsr.params()` is the current set of envelope parameters
    pub fn params(&self) -> EnvelopeParams {
        self.params
    }

    /// `adsr.set_params(p)` replaces all four envelope parameters at once
    ///
    /// The stage, elapsed time, and level are untouched, new parameters take effect on the next `update`.
    pub fn set_params(&mut self, params: EnvelopeParams) {
        self.params = params;
    }

    /// `adsr.set_input(i)` sets the given ADSR input
    ///
    /// # Examples
    ///
    /// ```
    /// # use dds_voice::adsr;
    /// # let mut adsr = adsr::Adsr::new(adsr::EnvelopeParams::default());
    ///
    /// // set attack time to 30 milliseconds
    /// adsr.set_input(adsr::Input::Attack(0.03_f32.into()));
    ///
    /// // set decay time to 100 milliseconds
    /// adsr.set_input(adsr::Input::Decay(0.1_f32.into()));
    ///
    /// // set sustain level to 3/4 way up
    /// adsr.set_input(adsr::Input::Sustain(0.75_f32.into()));
    ///
    /// // set release time to 150 milliseconds
    /// adsr.set_input(adsr::Input::Release(0.15_f32.into()));
    /// ```
    pub fn set_input(&mut self, input: Input) {
        match input {
            Input::Attack(a) => self.params.attack = a,
            Input::Decay(d) => self.params.decay = d,
            Input::Sustain(s) => self.params.sustain = s,
            Input::Release(r) => self.params.release = r,
        }
    }

    /// `adsr.enter(s)` is a private helper to move into stage `s` with the stage timer zeroed
    fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        self.elapsed = 0.0;
    }
}

impl Default for Adsr {
    fn default() -> Self {
        Self::new(EnvelopeParams::default())
    }
}

/// `progress(e, p)` is the fraction of period `p` covered by `e` seconds, zero length periods are always complete
fn progress(elapsed: f32, period: f32) -> f32 {
    if 0.0 < period {
        elapsed / period
    } else {
        1.0
    }
}

/// The four ADSR parameters, applied together as one unit
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnvelopeParams {
    attack: TimePeriod,
    decay: TimePeriod,
    sustain: SustainLevel,
    release: TimePeriod,
}

impl EnvelopeParams {
    /// Quick attack and release for drum-like sounds
    pub const PERCUSSIVE: Self = Self {
        attack: TimePeriod(0.001),
        decay: TimePeriod(0.1),
        sustain: SustainLevel(0.3),
        release: TimePeriod(0.2),
    };

    /// Slow attack and release for pad sounds
    pub const PAD: Self = Self {
        attack: TimePeriod(1.0),
        decay: TimePeriod(0.5),
        sustain: SustainLevel(0.8),
        release: TimePeriod(2.0),
    };

    /// `EnvelopeParams::new(a, d, s, r)` is a new set of envelope params, each value clamped to its valid range
    ///
    /// # Arguments
    ///
    /// * `attack_sec`, `decay_sec`, `release_sec` - segment times in seconds, in `[0.0, MAX_TIME_PERIOD_SEC]`
    ///
    /// * `sustain_level` - the level held while the note is on, in `[0.0, 1.0]`
    pub fn new(attack_sec: f32, decay_sec: f32, sustain_level: f32, release_sec: f32) -> Self {
        Self {
            attack: attack_sec.into(),
            decay: decay_sec.into(),
            sustain: sustain_level.into(),
            release: release_sec.into(),
        }
    }

    /// `p.attack()` is the attack time in seconds
    pub fn attack(&self) -> f32 {
        self.attack.0
    }

    /// `p.decay()` is the decay time in seconds
    pub fn decay(&self) -> f32 {
        self.decay.0
    }

    /// `p.sustain()` is the sustain level in `[0.0, 1.0]`
    pub fn sustain(&self) -> f32 {
        self.sustain.0
    }

    /// `p.release()` is the release time in seconds
    pub fn release(&self) -> f32 {
        self.release.0
    }
}

impl Default for EnvelopeParams {
    /// Moderate times with the sustain level most of the way up
    fn default() -> Self {
        Self {
            attack: TimePeriod(0.1),
            decay: TimePeriod(0.2),
            sustain: SustainLevel(0.7),
            release: TimePeriod(0.3),
        }
    }
}

/// ADSR input types are represented here
///
/// A, D, and R are represented as positive-only time periods, S is represented as a number in `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Attack(TimePeriod),
    Decay(TimePeriod),
    Sustain(SustainLevel),
    Release(TimePeriod),
}

/// A time period in seconds is represented here
///
/// Time periods are non-negative with a max value in a pleasing range for users of the ADSR. A period of zero makes
/// its segment complete instantly.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimePeriod(f32);

impl From<f32> for TimePeriod {
    fn from(p: f32) -> Self {
        // `max` discards NaN in favor of the other argument
        Self(p.max(0.0_f32).min(MAX_TIME_PERIOD_SEC))
    }
}

/// A sustain level in the range `[0.0, 1.0]` is represented here
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SustainLevel(f32);

impl From<f32> for SustainLevel {
    fn from(val: f32) -> Self {
        Self(val.max(0.0_f32).min(1.0_f32))
    }
}

/// ADSR stages are represented here
///
/// An ADSR is in exactly one of these stages at any given time
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

impl Stage {
    /// `stage.name()` is the human readable name of the stage
    pub fn name(self) -> &'static str {
        match self {
            Stage::Idle => "Idle",
            Stage::Attack => "Attack",
            Stage::Decay => "Decay",
            Stage::Sustain => "Sustain",
            Stage::Release => "Release",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The maximum time period for an ADSR stage period
pub const MAX_TIME_PERIOD_SEC: f32 = 20.0_f32;
