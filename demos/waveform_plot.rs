//! Plot out two cycles of every waveform at full envelope level
//!
//! Look in /images/ for the resulting plot.

use dds_voice::{adsr::EnvelopeParams, synth::Synth, waveform::WaveformKind};
use plotters::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sample_rate = 44_100.0_f32;
    let frequency = 441.0_f32;
    // 100 samples per cycle
    let num_points = 2 * (sample_rate / frequency) as usize;

    std::fs::create_dir_all("images")?;
    let root = BitMapBackend::new("images/waveform_plot.png", (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 2));

    for (panel, kind) in panels.iter().zip(WaveformKind::ALL) {
        let mut synth = Synth::new();
        let (mut controller, mut engine) = synth.split(sample_rate);

        // instant attack to a held full-scale level
        controller.set_envelope_params(EnvelopeParams::new(0.0, 0.0, 1.0, 0.0));
        controller.select_waveform(kind);
        controller.set_frequency(frequency);
        controller.set_duty_cycle(0.3);
        controller.set_output_enabled(true);
        controller.note_on();
        controller.update(0.0);
        controller.update(0.0);

        let mut chart = ChartBuilder::on(panel)
            .caption(kind.name(), ("Arial", 16).into_font())
            .x_label_area_size(25)
            .y_label_area_size(35)
            .build_cartesian_2d(0..num_points, 0u32..256u32)?;

        chart.configure_mesh().draw()?;

        chart.draw_series(LineSeries::new(
            (0..num_points).map(|x| (x, engine.next_sample() as u32)),
            RED,
        ))?;
    }

    root.present()?;

    Ok(())
}
