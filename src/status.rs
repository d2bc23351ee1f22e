//! Voice status snapshots, for reporting over a serial port or a small display

use core::fmt::{self, Write};

use heapless::String;

use crate::{
    adsr::{EnvelopeParams, Stage},
    waveform::WaveformKind,
};

/// The capacity of a rendered status line, large enough for the longest possible line
pub const STATUS_LINE_CAPACITY: usize = 96;

/// A snapshot of a synth voice is represented here
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub waveform: WaveformKind,
    pub frequency_hz: f32,
    pub duty_cycle: f32,
    pub output_enabled: bool,
    pub envelope: EnvelopeParams,
    pub stage: Stage,
    pub level: f32,
}

impl Status {
    /// `status.to_line()` is the one line summary of the status in a fixed capacity string, no allocator needed
    ///
    /// # Examples
    ///
    /// ```
    /// # use dds_voice::synth::Synth;
    /// let mut synth = Synth::new();
    /// let (controller, _engine) = synth.split(44_100.0);
    ///
    /// let line = controller.status().to_line().unwrap();
    /// assert!(line.starts_with("Waveform: Square, Freq: 440.0Hz"));
    /// ```
    pub fn to_line(&self) -> Result<String<STATUS_LINE_CAPACITY>, fmt::Error> {
        let mut line = String::new();
        write!(line, "{}", self)?;
        Ok(line)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Waveform: {}, Freq: {:.1}Hz, Duty: {:.1}%, Output: {}, ADSR: {} ({:.1}%)",
            self.waveform,
            self.frequency_hz,
            self.duty_cycle * 100.0,
            if self.output_enabled { "ON" } else { "OFF" },
            self.stage,
            self.level * 100.0,
        )
    }
}
