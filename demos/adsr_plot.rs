//! Plot out 2 seconds of ADSR action
//!
//! Look in /images/ for the resulting plot.
//!
//! Requires plotters lib: https://docs.rs/plotters/latest/plotters/.

use dds_voice::{adsr::EnvelopeParams, synth::Synth};
use plotters::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // the envelope runs at the control rate, not the audio rate
    let control_rate = 1_000.0_f32;
    let dt = 1.0 / control_rate;

    let mut synth = Synth::new();
    let (mut controller, _engine) = synth.split(44_100.0);

    // adjust these inputs to taste to see the result
    controller.set_envelope_params(EnvelopeParams::new(
        0.15, // attack, seconds
        0.3,  // decay, seconds
        0.5,  // sustain, in [0.0, 1.0]
        0.6,  // release, seconds
    ));

    // plot 2 seconds of the ADSR
    let num_points = 2 * control_rate as u32;
    // wait 100mSec to turn the note on, and then at time 1.2 seconds turn it back off
    let note_on_point = 100;
    let note_off_point = 1_200;

    std::fs::create_dir_all("images")?;
    let root = BitMapBackend::new("images/adsr_plot.png", (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("ADSR", ("Arial", 20).into_font())
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0f32..2f32, 0f32..1.05f32)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Level")
        .draw()?;

    // plot out the note signal in blue
    chart
        .draw_series(LineSeries::new(
            (0..num_points).map(|x| {
                let y = (note_on_point <= x && x < note_off_point) as u32 as f32;
                (x as f32 * dt, y)
            }),
            BLUE,
        ))?
        .label("Note on")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    // plot out the envelope level in red
    chart
        .draw_series(LineSeries::new(
            (0..num_points).map(|x| {
                if x == note_on_point {
                    controller.note_on();
                }
                if x == note_off_point {
                    controller.note_off();
                }
                controller.update(dt);

                (x as f32 * dt, controller.envelope_level())
            }),
            RED,
        ))?
        .label("Envelope level")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;

    Ok(())
}
