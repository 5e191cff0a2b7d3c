use crate::palette::{self, ColorPalette};
use crate::stats::{CorrelationMatrix, Histogram};
use crate::OutputFormat;
use anyhow::{Context, Result};
use image::ImageEncoder;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Fraction of a category slot covered by its bar
const BAR_WIDTH: f64 = 0.8;
/// Pixels reserved beside a heatmap for its color bar
const COLORBAR_WIDTH: i32 = 90;
const COLORBAR_STEPS: usize = 64;
const NAN_FILL: RGBColor = RGBColor(0xee, 0xee, 0xee);

/// Something that can draw itself on a drawing area
pub trait Chart {
    fn title(&self) -> &str;

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static;
}

/// Encoded chart image handed to a display sink
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub title: String,
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

/// Bar per category, height = number of occurrences
#[derive(Debug, Clone)]
pub struct CountChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub counts: Vec<(String, usize)>,
    pub palette: ColorPalette,
}

/// Histogram bars with a density curve scaled to counts
#[derive(Debug, Clone)]
pub struct HistogramChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub histogram: Histogram,
    pub density: Vec<(f64, f64)>,
    pub color: RGBColor,
}

/// Annotated correlation matrix with a color bar
#[derive(Debug, Clone)]
pub struct HeatmapChart {
    pub title: String,
    pub matrix: CorrelationMatrix,
}

/// Fixed-size drawing surface that renders a chart into PNG or SVG bytes
#[derive(Debug, Clone, Copy)]
pub struct Canvas {
    width: u32,
    height: u32,
    format: OutputFormat,
}

impl Canvas {
    pub fn new(width: u32, height: u32, format: OutputFormat) -> Self {
        Canvas { width, height, format }
    }

    /// Draw the chart on a white background and encode it
    pub fn render<C: Chart>(&self, chart: &C) -> Result<RenderedChart> {
        let bytes = match self.format {
            OutputFormat::Png => self.render_png(chart)?,
            OutputFormat::Svg => self.render_svg(chart)?,
        };

        Ok(RenderedChart {
            title: chart.title().to_string(),
            format: self.format,
            bytes,
        })
    }

    fn render_png<C: Chart>(&self, chart: &C) -> Result<Vec<u8>> {
        let mut buffer = vec![0u8; (self.width * self.height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).context("Failed to fill background")?;
            chart.draw(&root)?;
            root.present().context("Failed to present drawing")?;
        }

        let mut png_bytes = Vec::new();
        {
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(&buffer, self.width, self.height, image::ColorType::Rgb8)
                .context("Failed to encode PNG")?;
        }

        Ok(png_bytes)
    }

    fn render_svg<C: Chart>(&self, chart: &C) -> Result<Vec<u8>> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).context("Failed to fill background")?;
            chart.draw(&root)?;
            root.present().context("Failed to present drawing")?;
        }
        Ok(svg.into_bytes())
    }
}

impl Chart for CountChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        // An empty frame still gets one empty slot on the x axis
        let n = self.counts.len().max(1);
        let categories: Vec<String> = self.counts.iter().map(|(k, _)| k.clone()).collect();
        let y_max = self.counts.iter().map(|(_, c)| *c).max().unwrap_or(0) as f64;

        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .caption(&self.title, ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5..(n as f64 - 0.5), 0.0..padded_max(y_max))
            .context("Failed to build chart")?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|x| category_label(&categories, *x))
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()
            .context("Failed to draw mesh")?;

        for (idx, (_, count)) in self.counts.iter().enumerate() {
            let x_center = idx as f64;
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [
                        (x_center - BAR_WIDTH / 2.0, 0.0),
                        (x_center + BAR_WIDTH / 2.0, *count as f64),
                    ],
                    self.palette.color(idx).filled(),
                )))
                .context("Failed to draw bar")?;
        }

        Ok(())
    }
}

impl Chart for HistogramChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        let edges = &self.histogram.edges;
        let x_range = match edges.as_slice() {
            [first, .., last] => *first..*last,
            _ => 0.0..1.0,
        };

        let density_max = self.density.iter().map(|(_, y)| *y).fold(0.0f64, f64::max);
        let y_max = (self.histogram.max_count() as f64).max(density_max);

        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .caption(&self.title, ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, 0.0..padded_max(y_max))
            .context("Failed to build chart")?;

        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()
            .context("Failed to draw mesh")?;

        let bars = move |style: ShapeStyle| {
            self.histogram
                .counts
                .iter()
                .enumerate()
                .map(move |(i, &count)| {
                    Rectangle::new([(edges[i], 0.0), (edges[i + 1], count as f64)], style)
                })
        };

        chart
            .draw_series(bars(self.color.mix(0.5).filled()))
            .context("Failed to draw histogram bars")?;
        chart
            .draw_series(bars(self.color.stroke_width(1)))
            .context("Failed to draw histogram outline")?;

        if !self.density.is_empty() {
            chart
                .draw_series(LineSeries::new(
                    self.density.iter().copied(),
                    self.color.stroke_width(2),
                ))
                .context("Failed to draw density curve")?;
        }

        Ok(())
    }
}

impl Chart for HeatmapChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        let labels = &self.matrix.labels;
        let k = labels.len();
        if k == 0 {
            anyhow::bail!("Cannot create heatmap with no columns");
        }

        let (vmin, vmax) = value_range(&self.matrix.values);
        let normalize = |v: f64| (v - vmin) / (vmax - vmin);

        let width = root.dim_in_pixel().0 as i32;
        let (grid_area, bar_area) = root.split_horizontally(width - COLORBAR_WIDTH);

        let extent = -0.5..(k as f64 - 0.5);
        let mut chart = ChartBuilder::on(&grid_area)
            .margin(10)
            .caption(&self.title, ("sans-serif", 20))
            .x_label_area_size(60)
            .y_label_area_size(100)
            .build_cartesian_2d(extent.clone(), extent)
            .context("Failed to build chart")?;

        // Row 0 is drawn at the top
        let row_labels: Vec<String> = labels.iter().rev().cloned().collect();
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(k)
            .y_labels(k)
            .x_label_formatter(&|x| category_label(labels, *x))
            .y_label_formatter(&|y| category_label(&row_labels, *y))
            .draw()
            .context("Failed to draw mesh")?;

        for (r, row) in self.matrix.values.iter().enumerate() {
            let y = (k - 1 - r) as f64;
            for (c, &value) in row.iter().enumerate() {
                let x = c as f64;
                let (fill, text) = if value.is_nan() {
                    (NAN_FILL, "nan".to_string())
                } else {
                    (palette::magma(normalize(value)), format!("{:.2}", value))
                };
                let text_color = if palette::luminance(fill) > 0.5 { BLACK } else { WHITE };

                chart
                    .draw_series(std::iter::once(Rectangle::new(
                        [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                        fill.filled(),
                    )))
                    .context("Failed to draw heatmap cell")?;
                chart
                    .draw_series(std::iter::once(Text::new(
                        text,
                        (x, y),
                        ("sans-serif", 14)
                            .into_font()
                            .color(&text_color)
                            .pos(Pos::new(HPos::Center, VPos::Center)),
                    )))
                    .context("Failed to annotate heatmap cell")?;
            }
        }

        let mut bar = ChartBuilder::on(&bar_area)
            .margin(10)
            .margin_top(40)
            .x_label_area_size(60)
            .y_label_area_size(45)
            .build_cartesian_2d(0.0..1.0, vmin..vmax)
            .context("Failed to build color bar")?;

        bar.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_labels(5)
            .y_label_formatter(&|y| format!("{:.1}", y))
            .draw()
            .context("Failed to draw color bar axis")?;

        let step = (vmax - vmin) / COLORBAR_STEPS as f64;
        bar.draw_series((0..COLORBAR_STEPS).map(|i| {
            let lo = vmin + i as f64 * step;
            let t = (i as f64 + 0.5) / COLORBAR_STEPS as f64;
            Rectangle::new([(0.0, lo), (1.0, lo + step)], palette::magma(t).filled())
        }))
        .context("Failed to draw color bar")?;

        Ok(())
    }
}

/// Label for an integer tick on a categorical axis, empty elsewhere
fn category_label(categories: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    categories.get(idx as usize).cloned().unwrap_or_default()
}

/// Upper y bound leaving headroom above the tallest mark
fn padded_max(max: f64) -> f64 {
    if max <= 0.0 {
        1.0
    } else {
        max * 1.1
    }
}

/// Color scale limits from the finite values; falls back to [-1, 1]
fn value_range(values: &[Vec<f64>]) -> (f64, f64) {
    let finite = values.iter().flatten().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || min == max {
        (-1.0, 1.0)
    } else {
        (min, max)
    }
}
