use anyhow::{Context, Result};
use fitgraph_core::{FitnessReport, FitnessSeries};
use plotters::prelude::*;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

pub const X_LABEL: &str = "Generation";

const LINE_COLOR: RGBColor = RGBColor(0x88, 0x84, 0xd8);

/// Title, y-axis label and output file name of one fitness chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    pub title: &'static str,
    pub y_label: &'static str,
    pub file_name: &'static str,
}

pub const AVERAGE_FITNESS: ChartStyle = ChartStyle {
    title: "Average Fitness",
    y_label: "Average Fitness",
    file_name: "average-fitness.svg",
};

pub const HIGHEST_FITNESS: ChartStyle = ChartStyle {
    title: "Highest Fitness",
    y_label: "Highest Fitness",
    file_name: "highest-fitness.svg",
};

/// Write both fitness charts into `dir`, returning the files written.
pub fn render_report_charts(
    report: &FitnessReport,
    dir: &Path,
    size: (u32, u32),
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating chart dir {}", dir.display()))?;

    let mut written = Vec::with_capacity(2);
    for (series, style) in [
        (&report.average, AVERAGE_FITNESS),
        (&report.highest, HIGHEST_FITNESS),
    ] {
        let path = dir.join(style.file_name);
        render_fitness_chart(series, &style, &path, size)
            .with_context(|| format!("failed to render {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// Draw `series` as a line chart with point markers into an SVG file.
pub fn render_fitness_chart(
    series: &FitnessSeries,
    style: &ChartStyle,
    path: &Path,
    size: (u32, u32),
) -> Result<()> {
    let points: Vec<(usize, f64)> = series
        .points()
        .iter()
        .map(|point| (point.generation, point.value))
        .collect();
    let (x_range, y_range) = axis_ranges(series);

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(style.title, ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(style.y_label)
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), &LINE_COLOR))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, LINE_COLOR.filled())),
    )?;

    root.present()?;
    log::debug!("rendered {} points to {}", points.len(), path.display());
    Ok(())
}

/// Generation axis padded by one on each side; value axis padded by 5%.
fn axis_ranges(series: &FitnessSeries) -> (Range<usize>, Range<f64>) {
    let last_generation = series.last().map_or(1, |point| point.generation);
    let (lo, hi) = series.value_range().unwrap_or((0.0, 1.0));
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        (hi.abs() * 0.05).max(1.0)
    };
    (0..last_generation + 1, (lo - pad)..(hi + pad))
}
