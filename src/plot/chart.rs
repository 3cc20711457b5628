//! Plotters-powered SVG line charts.
//!
//! The x axis is the poll end date, carried as days since the common era so
//! Plotters can treat it as a plain `f64` range. Tick labels convert it back.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use plotters::prelude::*;

use crate::domain::{SideLabels, UnitSeries};
use crate::error::AppError;

/// Axis bounds for one chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl ChartBounds {
    /// Bounds covering every point of `series`, or `None` if it has no points.
    pub fn from_series(series: &UnitSeries) -> Option<Self> {
        let first = series.points.first()?;
        let mut x0 = day_number(first.end_date);
        let mut x1 = x0;
        let mut y_min: f64 = 0.0;
        let mut y_max: f64 = 0.0;

        for p in &series.points {
            let x = day_number(p.end_date);
            x0 = x0.min(x);
            x1 = x1.max(x);
            y_min = y_min.min(p.pct_a).min(p.pct_b).min(p.pct_other);
            y_max = y_max.max(p.pct_a).max(p.pct_b).max(p.pct_other);
        }

        // A single poll date still needs a non-empty range.
        if x1 - x0 < 1.0 {
            x0 -= 1.0;
            x1 += 1.0;
        }

        // Out-of-range shares (e.g. negative other) stay on the chart.
        let y0 = if y_min < 0.0 { y_min - 5.0 } else { 0.0 };
        let y1 = if y_max > 100.0 { y_max + 5.0 } else { (y_max + 5.0).min(100.0) };

        Some(Self {
            x: [x0, x1],
            y: [y0, y1],
        })
    }
}

fn day_number(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

fn format_day(v: f64) -> String {
    NaiveDate::from_num_days_from_ce_opt(v.round() as i32)
        .map(|d| d.format("%m-%d").to_string())
        .unwrap_or_default()
}

/// Render one state's series to an SVG file at `path`.
pub fn render_unit_chart(
    series: &UnitSeries,
    path: &Path,
    labels: &SideLabels,
    width: u32,
    height: u32,
) -> Result<(), AppError> {
    let bounds = ChartBounds::from_series(series)
        .ok_or_else(|| AppError::render(format!("No polls to chart for {}", series.code)))?;

    draw(series, path, labels, (width, height), bounds)
        .map_err(|e| AppError::render(format!("Failed to render chart '{}': {e}", path.display())))
}

fn draw(
    series: &UnitSeries,
    path: &Path,
    labels: &SideLabels,
    size: (u32, u32),
    bounds: ChartBounds,
) -> Result<(), Box<dyn Error>> {
    // Series arrive most-recent-first; lines read left to right.
    let mut points = series.points.clone();
    points.sort_by_key(|p| p.end_date);

    let a: Vec<(f64, f64)> = points.iter().map(|p| (day_number(p.end_date), p.pct_a)).collect();
    let b: Vec<(f64, f64)> = points.iter().map(|p| (day_number(p.end_date), p.pct_b)).collect();
    let other: Vec<(f64, f64)> = points.iter().map(|p| (day_number(p.end_date), p.pct_other)).collect();

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let [x0, x1] = bounds.x;
    let [y0, y1] = bounds.y;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} polls", series.code), ("sans-serif", 20))
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 40)
        .set_label_area_size(LabelAreaPosition::Bottom, 30)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("Poll end date")
        .y_desc("%")
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&|v| format_day(*v))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()?;

    let a_color = RGBColor(0, 0, 200);
    let b_color = RGBColor(200, 0, 0);
    let other_color = RGBColor(90, 90, 90);

    for (values, color, name) in [
        (&a, a_color, labels.a.as_str()),
        (&b, b_color, labels.b.as_str()),
        (&other, other_color, "Other"),
    ] {
        chart
            .draw_series(LineSeries::new(values.iter().copied(), &color))?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        chart.draw_series(values.iter().map(|&p| Circle::new(p, 3, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Recreate `dir` and render one chart per state with polls.
///
/// States without windowed polls are skipped. Returns the paths written.
pub fn render_all(
    series: &[UnitSeries],
    dir: &Path,
    labels: &SideLabels,
    width: u32,
    height: u32,
) -> Result<Vec<PathBuf>, AppError> {
    if dir.exists() {
        fs::remove_dir_all(dir)
            .map_err(|e| AppError::render(format!("Failed to clear plots dir '{}': {e}", dir.display())))?;
    }
    fs::create_dir_all(dir)
        .map_err(|e| AppError::render(format!("Failed to create plots dir '{}': {e}", dir.display())))?;

    let mut written = Vec::new();
    for s in series {
        if s.points.is_empty() {
            tracing::info!(state = %s.code, "no polls in window, skipping chart");
            continue;
        }
        let path = dir.join(format!("{}.svg", s.code));
        render_unit_chart(s, &path, labels, width, height)?;
        tracing::debug!(state = %s.code, path = %path.display(), "chart written");
        written.push(path);
    }

    tracing::info!(charts = written.len(), dir = %dir.display(), "plots complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesPoint;

    fn point(day: u32, a: f64, b: f64) -> SeriesPoint {
        SeriesPoint {
            end_date: NaiveDate::from_ymd_opt(2024, 8, day).unwrap(),
            pct_a: a,
            pct_b: b,
            pct_other: 100.0 - (a + b),
        }
    }

    fn series(code: &str, points: Vec<SeriesPoint>) -> UnitSeries {
        UnitSeries {
            code: code.to_string(),
            points,
        }
    }

    #[test]
    fn bounds_pad_single_day_and_cap_at_100() {
        let b = ChartBounds::from_series(&series("NC", vec![point(10, 97.0, 1.0)])).unwrap();
        assert_eq!(b.x[1] - b.x[0], 2.0);
        assert_eq!(b.y, [0.0, 100.0]);
        assert!(ChartBounds::from_series(&series("NC", vec![])).is_none());
    }

    #[test]
    fn bounds_extend_to_out_of_range_shares() {
        let b = ChartBounds::from_series(&series("OH", vec![point(3, 60.0, 50.0)])).unwrap();
        assert_eq!(b.y, [-15.0, 65.0]);

        let over = ChartBounds::from_series(&series("OH", vec![point(3, 102.0, 1.0)])).unwrap();
        assert_eq!(over.y, [-8.0, 107.0]);
    }

    #[test]
    fn day_labels_round_trip() {
        let d = NaiveDate::from_ymd_opt(2024, 10, 3).unwrap();
        assert_eq!(format_day(day_number(d)), "10-03");
    }

    #[test]
    fn render_all_skips_empty_and_replaces_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("plots");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stale.svg"), "old").unwrap();

        let all = vec![
            series("GA", vec![point(12, 47.0, 48.0), point(5, 46.0, 47.5), point(1, 45.0, 49.0)]),
            series("MT", vec![]),
        ];
        let written = render_all(&all, &dir, &SideLabels::default(), 640, 480).unwrap();

        assert_eq!(written, vec![dir.join("GA.svg")]);
        assert!(!dir.join("stale.svg").exists());
        assert!(!dir.join("MT.svg").exists());
        let svg = fs::read_to_string(dir.join("GA.svg")).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn empty_series_is_a_render_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = render_unit_chart(
            &series("MT", vec![]),
            &tmp.path().join("MT.svg"),
            &SideLabels::default(),
            640,
            480,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_RENDER);
    }
}
