//! @ai:module:intent Chart rendering for projected summary data
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator, ChartGeneratorTrait

use crate::config::ChartConfig;
use crate::error::{Error, Result};
use crate::report::projection::{ChartData, ChartStyle, Rgb};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::path::Path;

/// @ai:intent Trait for chart rendering
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Render one chart to a PNG file
    fn render(&self, data: &ChartData, output_path: &Path) -> Result<()>;
}

/// @ai:intent Renders projected chart data as PNG images
pub struct ChartGenerator {
    width: u32,
    height: u32,
    font_family: String,
}

impl ChartGenerator {
    /// @ai:intent Create a generator with the configured canvas
    /// @ai:effects pure
    pub fn new(config: &ChartConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            font_family: config.font_family.clone(),
        }
    }

    /// @ai:intent Draw into a canvas that lives only for this call
    /// @ai:effects fs:write
    fn draw(&self, data: &ChartData, output_path: &Path) -> anyhow::Result<()> {
        let root = BitMapBackend::new(output_path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let font = self.font_family.as_str();
        let label_font = (font, 15).into_font();
        let categories = &data.categories;
        let (y_lo, y_hi) = data.y_range();

        let mut chart = ChartBuilder::on(&root)
            .caption(data.title.as_str(), (font, 26))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(categories.len() as f64 - 0.5), y_lo..y_hi)?;

        chart
            .configure_mesh()
            .x_labels(categories.len().max(1))
            .x_desc(data.x_desc.as_str())
            .y_desc(data.y_desc.as_str())
            .label_style(label_font.clone())
            .axis_desc_style((font, 17).into_font())
            .x_label_formatter(&|x| category_label(categories, *x))
            .draw()?;

        for (i, series) in data.series.iter().enumerate() {
            let color = to_rgb(series.color);
            let offset = data.offset(i);
            let points: Vec<(f64, f64)> = series
                .values
                .iter()
                .enumerate()
                .map(|(x, y)| (x as f64 + offset, *y))
                .collect();

            match data.style {
                ChartStyle::Line => {
                    let anno = if series.dashed {
                        chart.draw_series(DashedLineSeries::new(points, 10, 6, color.stroke_width(2)))?
                    } else {
                        chart.draw_series(LineSeries::new(points, color.stroke_width(2)))?
                    };
                    anno.label(series.label.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
                }
                ChartStyle::GroupedBar { width } => {
                    let half = width / 2.0;
                    chart
                        .draw_series(points.iter().map(|&(x, y)| {
                            Rectangle::new([(x - half, 0.0), (x + half, y)], color.filled())
                        }))?
                        .label(series.label.as_str())
                        .legend(move |(x, y)| {
                            Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.filled())
                        });
                }
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(label_font)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Render a chart, removing the file if drawing fails partway
    /// @ai:effects fs:write
    fn render(&self, data: &ChartData, output_path: &Path) -> Result<()> {
        if let Err(e) = self.draw(data, output_path) {
            match std::fs::remove_file(output_path) {
                Ok(()) => tracing::debug!("Removed partial chart {}", output_path.display()),
                Err(rm) if rm.kind() == std::io::ErrorKind::NotFound => {}
                Err(rm) => tracing::warn!(
                    "Could not remove partial chart {}: {}",
                    output_path.display(),
                    rm
                ),
            }
            return Err(Error::Chart {
                chart: data.kind.to_string(),
                message: format!("{:#}", e),
            });
        }

        tracing::info!("Wrote {}", output_path.display());
        Ok(())
    }
}

fn to_rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// @ai:intent Label for an x tick; ticks between categories stay blank
/// @ai:effects pure
fn category_label(categories: &[String], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    categories.get(index as usize).cloned().unwrap_or_default()
}
