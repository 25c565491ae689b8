use std::{ops::Range, path::Path};

use plotters::{coord::Shift, prelude::*};

use crate::{
    error::PlotError,
    run::Frame,
    simulate::{Sample, Trajectory},
    types::Float,
};

fn plot_error<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> PlotError {
    PlotError(e.to_string())
}

/// Axis ranges covering θ and ω of the samples. Degenerate ranges are
/// widened so the chart always has some extent.
pub fn trajectory_ranges(samples: &[Sample]) -> (Range<Float>, Range<Float>) {
    let final_time = samples.last().map_or(0., |s| s.time);
    let min_y = samples
        .iter()
        .flat_map(|s| [s.theta, s.omega])
        .fold(Float::INFINITY, Float::min);
    let max_y = samples
        .iter()
        .flat_map(|s| [s.theta, s.omega])
        .fold(Float::NEG_INFINITY, Float::max);

    let x_range = 0.0..final_time.max(1e-3);
    let y_range = if min_y < max_y {
        min_y..max_y
    } else if min_y.is_finite() {
        min_y - 1.0..min_y + 1.0
    } else {
        -1.0..1.0
    };
    (x_range, y_range)
}

/// Axis ranges that fit the pendulum at any angle
pub fn frame_bounds(length: Float) -> (Range<Float>, Range<Float>) {
    (-1.1 * length..1.1 * length, -1.1 * length..0.1)
}

/// θ and ω against time, up to and including the stop index
pub fn draw_trajectory<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    trajectory: &Trajectory,
    stop_index: usize,
) -> Result<(), PlotError> {
    let samples: Vec<Sample> = trajectory.samples().take(stop_index + 1).collect();
    let (x_range, y_range) = trajectory_ranges(&samples);

    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(root)
        .caption("θ and ω vs. Time plot", ("sans-serif", 20))
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_error)?;

    chart.configure_mesh().draw().map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new(
            samples.iter().map(|s| (s.time, s.theta)),
            &BLUE,
        ))
        .map_err(plot_error)?
        .label("θ (rad)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            samples.iter().map(|s| (s.time, s.omega)),
            &RED,
        ))
        .map_err(plot_error)?
        .label("ω (rad/s)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)
}

/// Render the trajectory plot to a PNG file
pub fn plot_trajectory<P: AsRef<Path>>(
    path: P,
    trajectory: &Trajectory,
    stop_index: usize,
) -> Result<(), PlotError> {
    let root = BitMapBackend::new(path.as_ref(), (640, 480)).into_drawing_area();
    draw_trajectory(&root, trajectory, stop_index)
}

/// Rod and bob of a pendulum of the given length at one playback frame
pub fn draw_frame<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    frame: &Frame,
    length: Float,
) -> Result<(), PlotError> {
    let (x_range, y_range) = frame_bounds(length);
    let bob = (frame.bob.x, frame.bob.y);
    let pivot = 0.03 * length;

    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(root)
        .caption(format!("Time: {:.2}s", frame.time), ("sans-serif", 20))
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_error)?;

    chart.configure_mesh().draw().map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new([(0.0, 0.0), bob], BLUE.stroke_width(2)))
        .map_err(plot_error)?;
    chart
        .draw_series(std::iter::once(Circle::new(bob, 6, BLUE.filled())))
        .map_err(plot_error)?;
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(-pivot, -pivot), (pivot, pivot)],
            RED.filled(),
        )))
        .map_err(plot_error)?;

    root.present().map_err(plot_error)
}
