//! The fixed list of charts produced after cleaning.
//!
//! Each [`Analysis`] pairs a precondition on the dataset with the chart it
//! renders and the message printed when the precondition fails. The list is
//! iterated in order by [`run_analyses`].

use crate::data::Dataset;
use crate::display::ChartSink;
use crate::error::EdaError;
use crate::graph::{Canvas, CountChart, HeatmapChart, HistogramChart, RenderedChart};
use crate::palette::{self, ColorPalette};
use crate::stats;
use crate::RenderOptions;
use anyhow::{Context, Result};
use plotters::style::RGBColor;
use std::io::{BufRead, Write};

/// Points on which the density overlay is evaluated
const DENSITY_GRID_POINTS: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub enum Precondition {
    /// The named column exists
    ColumnPresent(String),
    /// At least this many numeric columns exist
    MinNumericColumns(usize),
}

impl Precondition {
    pub fn is_satisfied(&self, ds: &Dataset) -> bool {
        match self {
            Precondition::ColumnPresent(name) => ds.has_column(name),
            Precondition::MinNumericColumns(n) => ds.numeric_columns().len() >= *n,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ChartKind {
    /// Bar per distinct value of a column
    Count { column: String, palette: ColorPalette },
    /// Histogram of a numeric column with a density overlay
    Histogram { column: String, color: RGBColor },
    /// Pearson correlation of all numeric columns
    CorrelationHeatmap,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Figure size in inches
    pub figure_size: (f64, f64),
    pub precondition: Precondition,
    pub chart: ChartKind,
    pub skip_message: String,
}

impl Analysis {
    fn count(title: &str, column: &str, x_label: &str, palette: ColorPalette, skip_subject: &str) -> Self {
        Analysis {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: "Count".to_string(),
            figure_size: (6.0, 4.0),
            precondition: Precondition::ColumnPresent(column.to_string()),
            chart: ChartKind::Count { column: column.to_string(), palette },
            skip_message: column_skip_message(column, skip_subject),
        }
    }

    fn histogram(title: &str, column: &str, color: RGBColor, skip_subject: &str) -> Self {
        Analysis {
            title: title.to_string(),
            x_label: column.to_string(),
            y_label: "Frequency".to_string(),
            figure_size: (8.0, 5.0),
            precondition: Precondition::ColumnPresent(column.to_string()),
            chart: ChartKind::Histogram { column: column.to_string(), color },
            skip_message: column_skip_message(column, skip_subject),
        }
    }

    fn correlation_heatmap() -> Self {
        Analysis {
            title: "Correlation Heatmap".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            figure_size: (8.0, 5.0),
            precondition: Precondition::MinNumericColumns(2),
            chart: ChartKind::CorrelationHeatmap,
            skip_message: "Not enough numeric columns for correlation heatmap.".to_string(),
        }
    }

    /// Compute the chart's data and encode it
    pub fn render(&self, ds: &Dataset, options: &RenderOptions) -> Result<RenderedChart> {
        let (width, height) = options.pixels(self.figure_size);
        let canvas = Canvas::new(width, height, options.format);

        match &self.chart {
            ChartKind::Count { column, palette } => {
                let col = ds
                    .column(column)
                    .ok_or_else(|| EdaError::ColumnNotFound(column.clone()))?;
                let chart = CountChart {
                    title: self.title.clone(),
                    x_label: self.x_label.clone(),
                    y_label: self.y_label.clone(),
                    counts: stats::value_counts(&col.labels()),
                    palette: palette.clone(),
                };
                canvas.render(&chart)
            }
            ChartKind::Histogram { column, color } => {
                let col = ds
                    .column(column)
                    .ok_or_else(|| EdaError::ColumnNotFound(column.clone()))?;
                // A column with nothing numeric left still gets its (empty) axes
                let values = col.numeric_values().unwrap_or_else(|| {
                    log::warn!("Column '{}' has no numeric values, histogram will be empty", column);
                    Vec::new()
                });

                let histogram = stats::histogram(&values);
                let scale = values.len() as f64 * histogram.bin_width();
                let (grid, density) = stats::kde(&values, DENSITY_GRID_POINTS, 0.0);
                let density = grid
                    .into_iter()
                    .zip(density)
                    .map(|(x, d)| (x, d * scale))
                    .collect();

                let chart = HistogramChart {
                    title: self.title.clone(),
                    x_label: self.x_label.clone(),
                    y_label: self.y_label.clone(),
                    histogram,
                    density,
                    color: *color,
                };
                canvas.render(&chart)
            }
            ChartKind::CorrelationHeatmap => {
                let chart = HeatmapChart {
                    title: self.title.clone(),
                    matrix: stats::correlation_matrix(ds),
                };
                canvas.render(&chart)
            }
        }
    }
}

fn column_skip_message(column: &str, subject: &str) -> String {
    format!("Column '{}' not found. Skipping {} plot.", column, subject)
}

/// Survival, class, gender, age, fare and port charts followed by the
/// correlation heatmap
pub fn standard_analyses() -> Vec<Analysis> {
    vec![
        Analysis::count(
            "Survival Distribution",
            "Survived",
            "Survived (0 = No, 1 = Yes)",
            ColorPalette::set2(),
            "survival distribution",
        ),
        Analysis::count(
            "Passenger Class Distribution",
            "Pclass",
            "Passenger Class",
            ColorPalette::set2(),
            "passenger class distribution",
        ),
        Analysis::count(
            "Gender Distribution",
            "Sex",
            "Gender",
            ColorPalette::set1(),
            "gender distribution",
        ),
        Analysis::histogram("Age Distribution", "Age", palette::BLUE, "age distribution"),
        Analysis::histogram("Fare Distribution", "Fare", palette::GREEN, "fare distribution"),
        Analysis::count(
            "Embarked Port Distribution",
            "Embarked",
            "Port of Embarkation",
            ColorPalette::pastel(),
            "embarked port distribution",
        ),
        Analysis::correlation_heatmap(),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Rendered(String),
    Skipped { title: String, message: String },
}

/// Rendered and skipped analyses, in execution order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisualizationReport {
    pub outcomes: Vec<AnalysisOutcome>,
}

impl VisualizationReport {
    pub fn rendered(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                AnalysisOutcome::Rendered(title) => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                AnalysisOutcome::Skipped { title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Render every analysis whose precondition holds, printing a skip message
/// for the rest. A render failure stops the run.
pub fn run_analyses<R: BufRead, W: Write, S: ChartSink>(
    ds: &Dataset,
    analyses: &[Analysis],
    options: &RenderOptions,
    sink: &mut S,
    input: &mut R,
    output: &mut W,
) -> Result<VisualizationReport> {
    let mut report = VisualizationReport::default();
    let mut shown = 0usize;

    for analysis in analyses {
        if !analysis.precondition.is_satisfied(ds) {
            writeln!(output, "{}", analysis.skip_message)?;
            log::debug!("Skipped '{}': {:?}", analysis.title, analysis.precondition);
            report.outcomes.push(AnalysisOutcome::Skipped {
                title: analysis.title.clone(),
                message: analysis.skip_message.clone(),
            });
            continue;
        }

        let chart = analysis
            .render(ds, options)
            .with_context(|| format!("Failed to render '{}'", analysis.title))?;
        log::info!("Rendered '{}' ({} bytes)", chart.title, chart.bytes.len());

        sink.show(shown, &chart, input, output)
            .with_context(|| format!("Failed to display '{}'", analysis.title))?;
        shown += 1;
        report.outcomes.push(AnalysisOutcome::Rendered(analysis.title.clone()));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_reader::read_csv;
    use crate::display::RecordingSink;
    use std::io::Cursor;

    fn run(ds: &Dataset, analyses: &[Analysis]) -> (VisualizationReport, RecordingSink, String) {
        let mut sink = RecordingSink::default();
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let report = run_analyses(ds, analyses, &RenderOptions::default(), &mut sink, &mut input, &mut out)
            .unwrap();
        (report, sink, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_standard_analyses_order() {
        let titles: Vec<String> = standard_analyses().into_iter().map(|a| a.title).collect();
        assert_eq!(
            titles,
            vec![
                "Survival Distribution",
                "Passenger Class Distribution",
                "Gender Distribution",
                "Age Distribution",
                "Fare Distribution",
                "Embarked Port Distribution",
                "Correlation Heatmap",
            ]
        );
    }

    #[test]
    fn test_missing_columns_are_skipped_without_rendering() {
        let ds = read_csv("Name\nBraund\nCumings\n".as_bytes()).unwrap();
        let (report, sink, out) = run(&ds, &standard_analyses());

        assert!(report.rendered().is_empty());
        assert_eq!(report.skipped().len(), 7);
        assert!(sink.titles.is_empty());
        assert!(out.contains("Column 'Survived' not found. Skipping survival distribution plot."));
        assert!(out.contains("Column 'Pclass' not found. Skipping passenger class distribution plot."));
        assert!(out.contains("Column 'Sex' not found. Skipping gender distribution plot."));
        assert!(out.contains("Column 'Age' not found. Skipping age distribution plot."));
        assert!(out.contains("Column 'Fare' not found. Skipping fare distribution plot."));
        assert!(out.contains("Column 'Embarked' not found. Skipping embarked port distribution plot."));
        assert!(out.ends_with("Not enough numeric columns for correlation heatmap.\n"));
    }

    #[test]
    fn test_heatmap_skipped_with_single_numeric_column() {
        let ds = read_csv("PassengerId,Sex\n1,male\n2,female\n".as_bytes()).unwrap();
        let heatmap = vec![Analysis::correlation_heatmap()];
        let (report, sink, out) = run(&ds, &heatmap);
        assert_eq!(report.skipped(), vec!["Correlation Heatmap"]);
        assert!(sink.titles.is_empty());
        assert_eq!(out, "Not enough numeric columns for correlation heatmap.\n");
    }

    #[test]
    fn test_present_columns_are_rendered() {
        let ds = read_csv("Survived,Age\n0,22\n1,38\n1,26\n0,35\n".as_bytes()).unwrap();
        let (report, sink, out) = run(&ds, &standard_analyses());
        assert_eq!(
            report.rendered(),
            vec!["Survival Distribution", "Age Distribution", "Correlation Heatmap"]
        );
        assert_eq!(sink.titles, report.rendered());
        assert!(!out.contains("Skipping survival"));
    }

    #[test]
    fn test_histogram_of_text_column_renders_empty_axes() {
        let ds = read_csv("Age\nyoung\nold\n".as_bytes()).unwrap();
        let analysis = Analysis::histogram("Age Distribution", "Age", palette::BLUE, "age distribution");
        let chart = analysis.render(&ds, &RenderOptions::default()).unwrap();
        assert_eq!(chart.title, "Age Distribution");
        assert!(!chart.bytes.is_empty());
    }

    #[test]
    fn test_all_missing_histogram_column_does_not_stop_the_run() {
        let mut ds = read_csv("Survived,Age,Fare\n0,,7.25\n1,,8.05\n1,,9.5\n".as_bytes()).unwrap();
        crate::clean::clean(&mut ds, &crate::clean::CleaningOptions::default());
        let (report, sink, out) = run(&ds, &standard_analyses());
        assert_eq!(
            report.rendered(),
            vec!["Survival Distribution", "Age Distribution", "Fare Distribution", "Correlation Heatmap"]
        );
        assert_eq!(sink.titles, report.rendered());
        assert!(!out.contains("Skipping age"));
    }

    #[test]
    fn test_figure_sizes() {
        let analyses = standard_analyses();
        assert_eq!(analyses[0].figure_size, (6.0, 4.0));
        assert_eq!(analyses[3].figure_size, (8.0, 5.0));
        assert_eq!(analyses[6].figure_size, (8.0, 5.0));
    }
}
