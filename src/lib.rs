#![no_std]
#![doc = include_str!("../README.md")]

mod logging;

pub mod adsr;
mod lookup_tables;
pub mod mixer;
pub mod phase_accumulator;
pub mod status;
pub mod synth;
mod utils;
pub mod waveform;
