//! Bar chart rendering.
//!
//! Renders one PNG bar chart per report using plotters: a segmented
//! categorical x-axis, optional per-bar value annotations, and a
//! configurable y-axis tick format (comma-grouped integers or a
//! millions suffix).

use crate::models::AxisFormat;
use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use std::path::Path;

/// Chart dimensions in pixels, matching a 12x8 inch figure at 100 dpi.
const CHART_SIZE: (u32, u32) = (1200, 800);

/// A bar chart description: one bar per (label, value) pair, in order.
#[derive(Debug, Clone)]
pub struct BarChart {
    /// Chart title, already including the quarter identifier.
    pub title: String,
    /// X-axis description.
    pub x_desc: String,
    /// Y-axis description.
    pub y_desc: String,
    /// Y-axis tick format.
    pub y_format: AxisFormat,
    /// Whether to annotate each bar with its value.
    pub annotate_bars: bool,
    /// Bars in display order.
    pub bars: Vec<(String, f64)>,
}

impl BarChart {
    /// Render the chart to a PNG file at `out_path`.
    ///
    /// The parent directory must already exist; re-rendering to the same
    /// path overwrites the previous image.
    pub fn render(&self, out_path: &Path) -> Result<()> {
        let root = BitMapBackend::new(out_path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let n = self.bars.len().max(1) as u32;
        let max_value = self
            .bars
            .iter()
            .map(|(_, value)| *value)
            .fold(0.0f64, f64::max);
        // Headroom above the tallest bar so annotations stay inside
        let y_max = if max_value > 0.0 { max_value * 1.15 } else { 1.0 };

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(150)
            .y_label_area_size(90)
            .build_cartesian_2d((0u32..n).into_segmented(), 0f64..y_max)?;

        let y_format = self.y_format;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(&self.x_desc)
            .y_desc(&self.y_desc)
            .x_labels(self.bars.len().max(1))
            .x_label_style(
                ("sans-serif", 13)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_label_formatter(&|segment| match segment {
                SegmentValue::Exact(index) | SegmentValue::CenterOf(index) => self
                    .bars
                    .get(*index as usize)
                    .map(|(label, _)| label.clone())
                    .unwrap_or_default(),
                SegmentValue::Last => String::new(),
            })
            .y_label_formatter(&move |value| format_axis_value(y_format, *value))
            .draw()?;

        chart
            .draw_series(self.bars.iter().enumerate().map(|(index, (_, value))| {
                let index = index as u32;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(index), 0.0),
                        (SegmentValue::Exact(index + 1), *value),
                    ],
                    BLUE.mix(0.6).filled(),
                );
                bar.set_margin(0, 0, 6, 6);
                bar
            }))
            .context("Failed to draw bars")?;

        if self.annotate_bars {
            let label_style = TextStyle::from(("sans-serif", 14).into_font())
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            chart
                .draw_series(self.bars.iter().enumerate().map(|(index, (_, value))| {
                    EmptyElement::at((SegmentValue::CenterOf(index as u32), *value))
                        + Text::new(group_thousands(*value), (0, -9), label_style.clone())
                }))
                .context("Failed to annotate bars")?;
        }

        root.present()
            .with_context(|| format!("Failed to write chart to {}", out_path.display()))?;
        Ok(())
    }
}

/// Format a y-axis tick value per the chart's axis format.
pub fn format_axis_value(format: AxisFormat, value: f64) -> String {
    match format {
        AxisFormat::Commas => group_thousands(value),
        AxisFormat::Millions => format!("{:.1}M", value * 1e-6),
    }
}

/// Format a value as a comma-grouped integer, e.g. 1234567 -> "1,234,567".
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
