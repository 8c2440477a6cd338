use textplots::{Chart, Plot, Shape};
use thb::Thb;

/// Plots the height difference of every shot together with their mean.
pub fn plot_ascii(thb: &Thb) {
    let (shots, mean) = series(thb);
    if shots.is_empty() {
        log::warn!("{}; no height differences to plot", thb.visur_id);
        return;
    }
    println!(
        "{}: Höhendifferenz pro Messung [m], Mittel {:.4} m",
        thb.visur_id, thb.statistics.height_diff_m.overall.mean
    );
    #[allow(clippy::cast_precision_loss)]
    Chart::new(200, 80, 0.0, thb.shots.len() as f32)
        .lineplot(&Shape::Points(&shots))
        .lineplot(&Shape::Lines(&mean))
        .display();
}

/// Height differences by shot position, and the mean as a line across
/// the whole range. Shots without a height difference are left out.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn series(thb: &Thb) -> (Vec<(f32, f32)>, Vec<(f32, f32)>) {
    let shots: Vec<(f32, f32)> = thb
        .shots
        .iter()
        .enumerate()
        .filter(|(_, shot)| shot.height_diff_m.is_finite())
        .map(|(idx, shot)| (idx as f32, shot.height_diff_m as f32))
        .collect();
    let mean = thb.statistics.height_diff_m.overall.mean as f32;
    let mean = if mean.is_finite() {
        vec![(0.0, mean), (thb.shots.len() as f32, mean)]
    } else {
        Vec::new()
    };
    (shots, mean)
}
