//! Poll trend chart.
//!
//! Renders a series of [`DailySeriesPoint`]s as two line series over a
//! shared categorical date axis into an SVG string. The y-axis always runs
//! from 0 to 20 points above the largest visible value and only carries the
//! fixed ticks in [`Y_TICKS`]. Hover and legend toggling are driven from the
//! caller through [`ChartLayout`] and [`SeriesVisibility`].

use evc_data::polls::{DailySeriesPoint, TrackedCandidates};
use evc_utils::percent::format_percentage;
use log::debug;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt::Display;
use thiserror::Error;

pub const DEFAULT_TITLE: &str = "Gráfico para eleição presidencial";

/// Tick marks of the percentage axis.
pub const Y_TICKS: [f64; 3] = [20.0, 50.0, 80.0];

/// Space left above the largest value.
pub const HEADROOM: f64 = 20.0;

pub const COLOR_A: RGBColor = RGBColor(0x88, 0x84, 0xd8);
pub const COLOR_B: RGBColor = RGBColor(0x82, 0xca, 0x9d);
const GRID_COLOR: RGBColor = RGBColor(0xdd, 0xdd, 0xdd);

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart rendering failed: {0}")]
    Render(String),
}

fn render_err<E: Display>(e: E) -> ChartError {
    ChartError::Render(e.to_string())
}

/// Which of the two series are drawn (legend toggle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesVisibility {
    pub a: bool,
    pub b: bool,
}

impl Default for SeriesVisibility {
    fn default() -> Self {
        SeriesVisibility { a: true, b: true }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub candidates: TrackedCandidates,
    pub visible: SeriesVisibility,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            width: 800,
            height: 400,
            title: DEFAULT_TITLE.to_string(),
            candidates: TrackedCandidates::default(),
            visible: SeriesVisibility::default(),
        }
    }
}

/// Pixel geometry of a rendered chart, for hit-testing pointer positions.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    /// Horizontal pixel of each point, in series order.
    pub centers: Vec<i32>,
    pub plot_left: i32,
    pub plot_right: i32,
    pub y_max: f64,
}

impl ChartLayout {
    /// Index of the point closest to `pixel_x`, if the pointer is over the
    /// plotting area.
    pub fn nearest_point(&self, pixel_x: i32) -> Option<usize> {
        if pixel_x < self.plot_left || pixel_x > self.plot_right {
            return None;
        }
        self.centers
            .iter()
            .enumerate()
            .min_by_key(|(_, center)| (pixel_x - **center).abs())
            .map(|(i, _)| i)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    pub svg: String,
    pub layout: ChartLayout,
}

/// Upper bound of the y-axis: largest visible value plus [`HEADROOM`].
pub fn y_domain_max(points: &[DailySeriesPoint], visible: SeriesVisibility) -> f64 {
    let max = points
        .iter()
        .flat_map(|p| {
            [
                visible.a.then_some(p.candidate_a),
                visible.b.then_some(p.candidate_b),
            ]
        })
        .flatten()
        .fold(0.0, f64::max);
    max + HEADROOM
}

/// The fixed ticks that fall inside `[0, y_max]`.
///
/// The domain is never stretched to reach a tick, so when the largest value
/// is below 60 the axis shows fewer than three ticks (none below 0).
pub fn visible_ticks(y_max: f64) -> Vec<f64> {
    Y_TICKS.iter().copied().filter(|t| *t <= y_max).collect()
}

/// Tooltip text for one point: the date, then one line per visible series.
pub fn tooltip_lines(
    point: &DailySeriesPoint,
    candidates: &TrackedCandidates,
    visible: SeriesVisibility,
) -> Vec<String> {
    let mut lines = vec![point.date.clone()];
    if visible.a {
        lines.push(format!(
            "{}: {}",
            candidates.a.display_name,
            format_percentage(point.candidate_a)
        ));
    }
    if visible.b {
        lines.push(format!(
            "{}: {}",
            candidates.b.display_name,
            format_percentage(point.candidate_b)
        ));
    }
    lines
}

pub fn render_svg(
    points: &[DailySeriesPoint],
    options: &ChartOptions,
) -> Result<RenderedChart, ChartError> {
    let y_max = y_domain_max(points, options.visible);
    let segments = points.len().max(1) as u32;
    let mut svg = String::new();

    let layout = {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&options.title, ("sans-serif", 20).into_font())
            .margin(20)
            .x_label_area_size(30)
            .y_label_area_size(110)
            .build_cartesian_2d((0u32..segments).into_segmented(), 0f64..y_max)
            .map_err(render_err)?;

        let label_for = |value: &SegmentValue<u32>| match value {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => points
                .get(*i as usize)
                .map(|p| p.date.clone())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        };
        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_labels(points.len().clamp(1, 12))
            .x_label_formatter(&label_for)
            .y_label_formatter(&|_| String::new())
            .draw()
            .map_err(render_err)?;

        let (x_pixels, _) = chart.plotting_area().get_pixel_range();
        let tick_style = TextStyle::from(("sans-serif", 12).into_font())
            .pos(Pos::new(HPos::Right, VPos::Center));
        for tick in visible_ticks(y_max) {
            let (_, py) = chart.backend_coord(&(SegmentValue::CenterOf(0), tick));
            root.draw(&PathElement::new(
                vec![(x_pixels.start, py), (x_pixels.end, py)],
                GRID_COLOR.stroke_width(1),
            ))
            .map_err(render_err)?;
            root.draw(&Text::new(
                format_percentage(tick),
                (x_pixels.start - 6, py),
                tick_style.clone(),
            ))
            .map_err(render_err)?;
        }

        let series = [
            (
                options.visible.a,
                COLOR_A,
                &options.candidates.a.display_name,
                points.iter().map(|p| p.candidate_a).collect::<Vec<f64>>(),
            ),
            (
                options.visible.b,
                COLOR_B,
                &options.candidates.b.display_name,
                points.iter().map(|p| p.candidate_b).collect::<Vec<f64>>(),
            ),
        ];
        let mut labelled = false;
        for (visible, color, name, values) in series {
            if !visible || values.is_empty() {
                continue;
            }
            let coords: Vec<(SegmentValue<u32>, f64)> = values
                .iter()
                .enumerate()
                .map(|(i, v)| (SegmentValue::CenterOf(i as u32), *v))
                .collect();
            chart
                .draw_series(LineSeries::new(coords.clone(), color.stroke_width(2)))
                .map_err(render_err)?
                .label(name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            chart
                .draw_series(coords.into_iter().map(|c| Circle::new(c, 3, color.filled())))
                .map_err(render_err)?;
            labelled = true;
        }
        if labelled {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::LowerRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(render_err)?;
        }

        let centers = (0..points.len())
            .map(|i| chart.backend_coord(&(SegmentValue::CenterOf(i as u32), 0.0)).0)
            .collect();
        root.present().map_err(render_err)?;
        ChartLayout {
            centers,
            plot_left: x_pixels.start,
            plot_right: x_pixels.end,
            y_max,
        }
    };

    debug!("Rendered chart with {} points ({} bytes of SVG)", points.len(), svg.len());
    Ok(RenderedChart { svg, layout })
}
