//! # Single voice synthesizer
//!
//! A synth voice is driven from two places which run at very different rates:
//!
//! - The sample rate path, typically a timer or PWM wrap interrupt, asks for one output byte per sample period via
//!   [`SampleEngine::next_sample`]. It must never block, allocate, or log.
//!
//! - The control rate path, typically the main loop polling knobs and buttons around 1 kHz, changes parameters and
//!   integrates the envelope through a [`Controller`].
//!
//! The two halves are created together by [`Synth::split`] and share only the [`Synth`] block. Every field of the
//! block that the sample rate path reads is a single atomic word with exactly one writer (the controller), so the
//! interrupt always observes a whole old value or a whole new value, never a torn one.
//!
//! Multi-field updates never cross the boundary at all. The envelope parameters and the envelope state machine are
//! owned exclusively by the controller, so setting all four ADSR parameters or handling a note on/off is atomic with
//! respect to the interrupt by construction. The interrupt only ever sees the resulting envelope level, published as
//! one word after each change. Likewise the phase accumulator is owned exclusively by the sample engine.
//!
//! # Examples
//!
//! ```
//! use dds_voice::{synth::Synth, waveform::WaveformKind};
//!
//! let mut synth = Synth::new();
//! let (mut controller, mut engine) = synth.split(44_100.0);
//!
//! controller.select_waveform(WaveformKind::Sine);
//! controller.set_frequency(440.0);
//! controller.set_output_enabled(true);
//! controller.note_on();
//! controller.update(0.001);
//!
//! // typically called from the sample rate interrupt
//! let _sample: u8 = engine.next_sample();
//! ```
//!
//! On a microcontroller the `Synth` block usually needs a `'static` lifetime so the engine can be handed to an
//! interrupt handler, for example by placing it in a `static_cell::StaticCell` and splitting the `&'static mut`.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::{
    adsr::{Adsr, EnvelopeParams, Input, Stage},
    logging::{debug, info},
    mixer,
    phase_accumulator::{self, PhaseAccumulator},
    status::Status,
    utils::{clamp_unit, AtomicF32},
    waveform::{self, WaveformKind, SILENCE},
};

/// The state shared between the control rate and sample rate halves of a synth voice is represented here
///
/// Each field is written only by the [`Controller`] and read by the [`SampleEngine`].
#[derive(Debug)]
pub struct Synth {
    output_enabled: AtomicBool,

    // raw `WaveformKind` code
    waveform: AtomicU8,

    // phase increment derived from the frequency on the control side
    increment: AtomicU32,

    // in `[0.0, 1.0]`
    duty_cycle: AtomicF32,

    // most recent envelope level, in `[0.0, 1.0]`
    level: AtomicF32,
}

impl Synth {
    /// `Synth::new()` is a new shared block, silent until split
    pub const fn new() -> Self {
        Self {
            output_enabled: AtomicBool::new(false),
            waveform: AtomicU8::new(DEFAULT_WAVEFORM as u8),
            increment: AtomicU32::new(0),
            duty_cycle: AtomicF32::new(DEFAULT_DUTY_CYCLE),
            level: AtomicF32::new(0.0),
        }
    }

    /// `synth.split(sr)` is the control rate and sample rate halves of a voice running at sample rate `sr`
    ///
    /// The power-on defaults are published before the halves are returned: square wave at 440 Hz, half duty cycle,
    /// output disabled, and an idle envelope with the default parameters.
    ///
    /// Taking `&mut self` guarantees there is only ever one controller and one engine for a given block.
    pub fn split(&mut self, sample_rate_hz: f32) -> (Controller<'_>, SampleEngine<'_>) {
        let shared: &Synth = self;

        let controller = Controller::new(shared, sample_rate_hz);
        let engine = SampleEngine {
            shared,
            phase_accumulator: PhaseAccumulator::new(sample_rate_hz),
        };

        (controller, engine)
    }
}

impl Default for Synth {
    fn default() -> Self {
        Self::new()
    }
}

/// The control rate half of a synth voice is represented here
///
/// All inputs are clamped to their valid ranges, nothing is rejected.
#[derive(Debug)]
pub struct Controller<'a> {
    shared: &'a Synth,

    sample_rate_hz: f32,

    // copies of what was last published, so reads don't go through the atomics
    frequency_hz: f32,
    duty_cycle: f32,
    waveform: WaveformKind,
    output_enabled: bool,

    adsr: Adsr,
}

impl<'a> Controller<'a> {
    /// `Controller::new(s, sr)` is a private helper which builds a controller and publishes the defaults to `s`
    fn new(shared: &'a Synth, sample_rate_hz: f32) -> Self {
        let mut controller = Self {
            shared,
            sample_rate_hz,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            duty_cycle: DEFAULT_DUTY_CYCLE,
            waveform: DEFAULT_WAVEFORM,
            output_enabled: false,
            adsr: Adsr::default(),
        };

        controller.set_frequency(DEFAULT_FREQUENCY_HZ);
        controller.set_duty_cycle(DEFAULT_DUTY_CYCLE);
        controller.select_waveform(DEFAULT_WAVEFORM);
        controller.set_output_enabled(false);
        controller.publish_level();

        info!("synth voice ready at {} Hz sample rate", sample_rate_hz);

        controller
    }

    /// `ctrl.set_frequency(f)` sets the oscillator frequency to `f` hertz, clamped to
    /// `[MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ]`
    ///
    /// The phase increment is computed here, the sample rate path only loads it.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency_hz = freq_hz.max(MIN_FREQUENCY_HZ).min(MAX_FREQUENCY_HZ);
        let increment = phase_accumulator::increment_for(self.frequency_hz, self.sample_rate_hz);
        self.shared.increment.store(increment, Ordering::Relaxed);
    }

    /// `ctrl.set_duty_cycle(d)` sets the square wave duty cycle to `d`, clamped to `[0.0, 1.0]`
    ///
    /// The extremes give a constant high or low output; callers usually keep it within `[0.05, 0.95]`.
    pub fn set_duty_cycle(&mut self, duty_cycle: f32) {
        self.duty_cycle = clamp_unit(duty_cycle);
        self.shared.duty_cycle.store(self.duty_cycle, Ordering::Relaxed);
    }

    /// `ctrl.select_waveform(k)` switches the oscillator to waveform `k`
    ///
    /// The phase and envelope are untouched, selecting the current waveform again has no effect.
    pub fn select_waveform(&mut self, kind: WaveformKind) {
        if kind != self.waveform {
            debug!("waveform {}", kind);
        }
        self.waveform = kind;
        self.shared.waveform.store(kind.into(), Ordering::Relaxed);
    }

    /// `ctrl.next_waveform()` switches to the next waveform in selection order, and is the newly selected waveform
    pub fn next_waveform(&mut self) -> WaveformKind {
        let next = self.waveform.next();
        self.select_waveform(next);
        next
    }

    /// `ctrl.set_output_enabled(e)` turns the audio output on or off
    ///
    /// While disabled the engine emits silence and the phase does not advance.
    pub fn set_output_enabled(&mut self, enabled: bool) {
        if enabled != self.output_enabled {
            debug!("output {}", enabled);
        }
        self.output_enabled = enabled;
        self.shared.output_enabled.store(enabled, Ordering::Relaxed);
    }

    /// `ctrl.toggle_output()` flips the audio output on or off, and is the new state
    pub fn toggle_output(&mut self) -> bool {
        self.set_output_enabled(!self.output_enabled);
        self.output_enabled
    }

    /// `ctrl.set_envelope_params(p)` replaces all four envelope parameters as one unit
    ///
    /// # Examples
    ///
    /// ```
    /// # use dds_voice::{adsr::EnvelopeParams, synth::Synth};
    /// # let mut synth = Synth::new();
    /// # let (mut controller, _engine) = synth.split(44_100.0);
    /// controller.set_envelope_params(EnvelopeParams::new(0.01, 0.2, 0.5, 0.4));
    /// controller.set_envelope_params(EnvelopeParams::PERCUSSIVE);
    /// ```
    pub fn set_envelope_params(&mut self, params: EnvelopeParams) {
        debug!("envelope params {}", params);
        self.adsr.set_params(params);
    }

    /// `ctrl.set_envelope_input(i)` changes a single envelope parameter
    pub fn set_envelope_input(&mut self, input: Input) {
        self.adsr.set_input(input);
    }

    /// `ctrl.note_on()` starts the envelope attack
    pub fn note_on(&mut self) {
        debug!("note on");
        self.adsr.note_on();
        self.publish_level();
    }

    /// `ctrl.note_off()` starts the envelope release, unless the envelope is idle
    pub fn note_off(&mut self) {
        debug!("note off");
        self.adsr.note_off();
        self.publish_level();
    }

    /// `ctrl.update(dt)` advances the envelope by `dt` seconds and publishes the new level to the sample rate path
    ///
    /// Expected to be called periodically from the control loop with the time since the previous call.
    pub fn update(&mut self, dt: f32) {
        self.adsr.update(dt);
        self.publish_level();
    }

    /// `ctrl.envelope_level()` is the current envelope level in `[0.0, 1.0]`
    pub fn envelope_level(&self) -> f32 {
        self.adsr.level()
    }

    /// `ctrl.stage()` is the current envelope stage
    pub fn stage(&self) -> Stage {
        self.adsr.stage()
    }

    /// `ctrl.envelope_params()` is the current set of envelope parameters
    pub fn envelope_params(&self) -> EnvelopeParams {
        self.adsr.params()
    }

    /// `ctrl.waveform()` is the currently selected waveform
    pub fn waveform(&self) -> WaveformKind {
        self.waveform
    }

    /// `ctrl.frequency()` is the current (clamped) oscillator frequency in hertz
    pub fn frequency(&self) -> f32 {
        self.frequency_hz
    }

    /// `ctrl.duty_cycle()` is the current (clamped) square wave duty cycle
    pub fn duty_cycle(&self) -> f32 {
        self.duty_cycle
    }

    /// `ctrl.output_enabled()` is true iff the audio output is on
    pub fn output_enabled(&self) -> bool {
        self.output_enabled
    }

    /// `ctrl.sample_rate()` is the sample rate the voice was split for, in hertz
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate_hz
    }

    /// `ctrl.status()` is a snapshot of the voice for status reporting
    pub fn status(&self) -> Status {
        Status {
            waveform: self.waveform,
            frequency_hz: self.frequency_hz,
            duty_cycle: self.duty_cycle,
            output_enabled: self.output_enabled,
            envelope: self.adsr.params(),
            stage: self.adsr.stage(),
            level: self.adsr.level(),
        }
    }

    /// `ctrl.publish_level()` is a private helper which hands the envelope level to the sample rate path
    fn publish_level(&self) {
        self.shared.level.store(self.adsr.level(), Ordering::Relaxed);
    }
}

/// The sample rate half of a synth voice is represented here
#[derive(Debug)]
pub struct SampleEngine<'a> {
    shared: &'a Synth,
    phase_accumulator: PhaseAccumulator,
}

impl<'a> SampleEngine<'a> {
    /// `engine.next_sample()` is the next output byte, must be called once per sample period
    ///
    /// While the output is enabled the phase advances by one tick and the waveform is scaled by the most recently
    /// published envelope level. While disabled this is `SILENCE` and the phase holds.
    #[inline]
    pub fn next_sample(&mut self) -> u8 {
        let shared = self.shared;

        if !shared.output_enabled.load(Ordering::Relaxed) {
            return SILENCE;
        }

        self.phase_accumulator
            .set_increment(shared.increment.load(Ordering::Relaxed));
        let phase = self.phase_accumulator.tick();

        let raw = waveform::synthesize_code(
            shared.waveform.load(Ordering::Relaxed),
            phase_accumulator::index_of(phase),
            shared.duty_cycle.load(Ordering::Relaxed),
        );

        mixer::mix(raw, shared.level.load(Ordering::Relaxed))
    }

    /// `engine.fill(buf)` fills `buf` with consecutive samples, for DMA driven outputs which take a block at a time
    pub fn fill(&mut self, buf: &mut [u8]) {
        for sample in buf.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// `engine.phase()` is the current raw phase word, for diagnostics
    pub fn phase(&self) -> u32 {
        self.phase_accumulator.phase()
    }
}

/// The lowest frequency the controller accepts, in hertz
pub const MIN_FREQUENCY_HZ: f32 = 20.0_f32;

/// The highest frequency the controller accepts, in hertz
pub const MAX_FREQUENCY_HZ: f32 = 20_000.0_f32;

/// A typical audio sample rate, in hertz
pub const DEFAULT_SAMPLE_RATE_HZ: f32 = 44_100.0_f32;

/// The power-on oscillator frequency, in hertz
pub const DEFAULT_FREQUENCY_HZ: f32 = 440.0_f32;

/// The power-on square wave duty cycle
pub const DEFAULT_DUTY_CYCLE: f32 = 0.5_f32;

/// The power-on waveform
pub const DEFAULT_WAVEFORM: WaveformKind = WaveformKind::Square;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::is_almost;

    #[test]
    fn split_publishes_defaults() {
        let mut synth = Synth::new();
        let (controller, mut engine) = synth.split(DEFAULT_SAMPLE_RATE_HZ);

        assert_eq!(controller.waveform(), WaveformKind::Square);
        assert_eq!(controller.frequency(), 440.0);
        assert_eq!(controller.duty_cycle(), 0.5);
        assert!(!controller.output_enabled());
        assert_eq!(controller.stage(), Stage::Idle);
        assert_eq!(controller.envelope_params(), EnvelopeParams::default());

        // disabled output is silent and holds the phase
        for _ in 0..100 {
            assert_eq!(engine.next_sample(), SILENCE);
        }
        assert_eq!(engine.phase(), 0);
    }

    #[test]
    fn enabled_output_advances_the_phase_by_the_increment() {
        let mut synth = Synth::new();
        let (mut controller, mut engine) = synth.split(DEFAULT_SAMPLE_RATE_HZ);

        controller.set_output_enabled(true);
        engine.next_sample();
        engine.next_sample();
        assert_eq!(engine.phase(), 2 * 42_852_281);
    }

    #[test]
    fn idle_envelope_is_silent_even_when_enabled() {
        let mut synth = Synth::new();
        let (mut controller, mut engine) = synth.split(DEFAULT_SAMPLE_RATE_HZ);

        controller.set_output_enabled(true);
        for kind in WaveformKind::ALL {
            controller.select_waveform(kind);
            for _ in 0..500 {
                assert_eq!(engine.next_sample(), SILENCE);
            }
        }
    }

    #[test]
    fn full_level_reproduces_the_raw_waveform() {
        let mut synth = Synth::new();
        let (mut controller, mut engine) = synth.split(1_000.0);

        controller.set_envelope_params(EnvelopeParams::new(0.0, 0.0, 1.0, 0.0));
        controller.select_waveform(WaveformKind::Sawtooth);
        controller.set_frequency(20.0);
        controller.set_output_enabled(true);
        controller.note_on();
        controller.update(0.0);
        controller.update(0.0);
        assert_eq!(controller.stage(), Stage::Sustain);
        assert_eq!(controller.envelope_level(), 1.0);

        // 20 Hz at 1 kHz is 50 samples per cycle
        let mut last = engine.next_sample();
        assert_eq!(last, 0);
        for _ in 1..50 {
            let sample = engine.next_sample();
            assert!(last < sample);
            last = sample;
        }
        // wrapped into the next cycle
        assert!(engine.next_sample() < last);
    }

    #[test]
    fn samples_follow_the_published_envelope_level() {
        let mut synth = Synth::new();
        let (mut controller, mut engine) = synth.split(DEFAULT_SAMPLE_RATE_HZ);

        controller.set_envelope_params(EnvelopeParams::new(1.0, 0.5, 0.6, 2.0));
        controller.set_duty_cycle(1.0); // square wave stuck high
        controller.set_output_enabled(true);

        controller.note_on();
        controller.update(0.5);
        assert!(is_almost(controller.envelope_level(), 0.5, 0.0001));
        // 127 * 0.5 + 128 = 191.5
        assert_eq!(engine.next_sample(), 192);

        controller.update(0.5);
        assert_eq!(engine.next_sample(), 255);
    }

    #[test]
    fn inputs_are_clamped() {
        let mut synth = Synth::new();
        let (mut controller, _engine) = synth.split(DEFAULT_SAMPLE_RATE_HZ);

        controller.set_frequency(5.0);
        assert_eq!(controller.frequency(), MIN_FREQUENCY_HZ);
        controller.set_frequency(1.0e6);
        assert_eq!(controller.frequency(), MAX_FREQUENCY_HZ);
        controller.set_frequency(f32::NAN);
        assert_eq!(controller.frequency(), MIN_FREQUENCY_HZ);

        controller.set_duty_cycle(-0.1);
        assert_eq!(controller.duty_cycle(), 0.0);
        controller.set_duty_cycle(1.1);
        assert_eq!(controller.duty_cycle(), 1.0);
    }

    #[test]
    fn reselecting_the_same_waveform_changes_nothing() {
        let mut synth = Synth::new();
        let (mut controller, mut engine) = synth.split(DEFAULT_SAMPLE_RATE_HZ);

        controller.set_output_enabled(true);
        controller.select_waveform(WaveformKind::Triangle);
        controller.note_on();
        controller.update(0.05);
        for _ in 0..37 {
            engine.next_sample();
        }

        let phase = engine.phase();
        let level = controller.envelope_level();
        let stage = controller.stage();

        for _ in 0..5 {
            controller.select_waveform(WaveformKind::Triangle);
        }

        assert_eq!(engine.phase(), phase);
        assert_eq!(controller.envelope_level(), level);
        assert_eq!(controller.stage(), stage);
        assert_eq!(controller.waveform(), WaveformKind::Triangle);
    }

    #[test]
    fn next_waveform_and_toggle_output_act_like_buttons() {
        let mut synth = Synth::new();
        let (mut controller, _engine) = synth.split(DEFAULT_SAMPLE_RATE_HZ);

        assert_eq!(controller.next_waveform(), WaveformKind::Triangle);
        assert_eq!(controller.next_waveform(), WaveformKind::Sawtooth);
        assert_eq!(controller.next_waveform(), WaveformKind::Sine);
        assert_eq!(controller.next_waveform(), WaveformKind::Square);

        assert!(controller.toggle_output());
        assert!(!controller.toggle_output());
    }

    #[test]
    fn release_fades_output_back_to_silence() {
        let mut synth = Synth::new();
        let (mut controller, mut engine) = synth.split(DEFAULT_SAMPLE_RATE_HZ);

        controller.set_envelope_params(EnvelopeParams::new(0.0, 0.0, 0.8, 0.1));
        controller.set_duty_cycle(1.0);
        controller.set_output_enabled(true);
        controller.note_on();
        controller.update(0.001);
        controller.update(0.001);
        assert_eq!(controller.stage(), Stage::Sustain);
        assert!(SILENCE < engine.next_sample());

        controller.note_off();
        for _ in 0..200 {
            controller.update(0.001);
        }
        assert_eq!(controller.stage(), Stage::Idle);
        assert_eq!(engine.next_sample(), SILENCE);
    }

    #[test]
    fn fill_matches_repeated_next_sample() {
        let mut synth_a = Synth::new();
        let mut synth_b = Synth::new();
        let (mut ctrl_a, mut engine_a) = synth_a.split(DEFAULT_SAMPLE_RATE_HZ);
        let (mut ctrl_b, mut engine_b) = synth_b.split(DEFAULT_SAMPLE_RATE_HZ);

        fn prepare(ctrl: &mut Controller) {
            ctrl.select_waveform(WaveformKind::Sine);
            ctrl.set_frequency(1_234.0);
            ctrl.set_output_enabled(true);
            ctrl.note_on();
            ctrl.update(0.05);
        }
        prepare(&mut ctrl_a);
        prepare(&mut ctrl_b);

        let mut block = [0_u8; 64];
        engine_a.fill(&mut block);
        for sample in block {
            assert_eq!(sample, engine_b.next_sample());
        }
    }

    #[test]
    fn unknown_waveform_codes_are_silent() {
        let mut synth = Synth::new();
        let (mut controller, mut engine) = synth.split(DEFAULT_SAMPLE_RATE_HZ);

        controller.set_envelope_params(EnvelopeParams::new(0.0, 0.0, 1.0, 0.0));
        controller.set_output_enabled(true);
        controller.note_on();
        controller.update(0.0);

        // a corrupted code can only come from outside the controller
        engine.shared.waveform.store(200, Ordering::Relaxed);
        for _ in 0..100 {
            assert_eq!(engine.next_sample(), SILENCE);
        }
    }

    #[test]
    fn status_reflects_the_controller() {
        let mut synth = Synth::new();
        let (mut controller, _engine) = synth.split(DEFAULT_SAMPLE_RATE_HZ);

        controller.select_waveform(WaveformKind::Sine);
        controller.set_output_enabled(true);
        controller.note_on();

        let status = controller.status();
        assert_eq!(status.waveform, WaveformKind::Sine);
        assert!(status.output_enabled);
        assert_eq!(status.stage, Stage::Attack);
        assert_eq!(status.level, 0.0);
        assert_eq!(status.frequency_hz, 440.0);
    }
}
