// Pipeline executor: acquire, inspect, clean, visualize

use crate::analysis::{self, Analysis, VisualizationReport};
use crate::clean::{self, CleaningOptions, CleaningReport};
use crate::display::ChartSink;
use crate::input::{self, AcquireOutcome};
use crate::inspect;
use crate::RenderOptions;
use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

pub const COMPLETION_MESSAGE: &str = "--- Titanic EDA Completed Successfully ---";

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Stop prompting after this many missing paths; `None` keeps asking
    pub max_attempts: Option<usize>,
    pub cleaning: CleaningOptions,
    pub render: RenderOptions,
    pub analyses: Vec<Analysis>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_attempts: None,
            cleaning: CleaningOptions::default(),
            render: RenderOptions::default(),
            analyses: analysis::standard_analyses(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub source: PathBuf,
    pub rows: usize,
    /// Column names after cleaning
    pub columns: Vec<String>,
    pub cleaning: CleaningReport,
    pub visualization: VisualizationReport,
}

#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    /// The user declined to name a file
    Aborted,
    Completed(PipelineReport),
}

/// Run the whole analysis against interactive streams.
///
/// Load failures come back as [`crate::error::EdaError::Load`] inside the
/// `anyhow` error; nothing here exits the process.
pub fn run<R: BufRead, W: Write, S: ChartSink>(
    input: &mut R,
    output: &mut W,
    cwd: &Path,
    options: &PipelineOptions,
    sink: &mut S,
) -> Result<PipelineOutcome> {
    let (source, mut dataset) = match input::acquire_dataset(input, output, cwd, options.max_attempts)? {
        AcquireOutcome::Aborted => return Ok(PipelineOutcome::Aborted),
        AcquireOutcome::Loaded { path, dataset } => (path, dataset),
    };
    writeln!(output, "Dataset loaded successfully!\n")?;

    writeln!(output, "--- Basic Information ---")?;
    writeln!(output, "{}", inspect::info_summary(&dataset))?;

    writeln!(output, "\n--- First {} Rows ---", inspect::PREVIEW_ROWS)?;
    writeln!(output, "{}", inspect::head_table(&dataset, inspect::PREVIEW_ROWS))?;

    writeln!(output, "\n--- Missing Values ---")?;
    writeln!(output, "{}", inspect::missing_summary(&dataset))?;

    let cleaning = clean::clean(&mut dataset, &options.cleaning);

    writeln!(output, "\n--- Cleaned Data Overview ---")?;
    writeln!(output, "{}", inspect::info_summary(&dataset))?;

    let visualization = analysis::run_analyses(
        &dataset,
        &options.analyses,
        &options.render,
        sink,
        input,
        output,
    )?;

    writeln!(output, "\n{}", COMPLETION_MESSAGE)?;
    output.flush()?;

    Ok(PipelineOutcome::Completed(PipelineReport {
        source,
        rows: dataset.row_count(),
        columns: dataset.column_names().into_iter().map(String::from).collect(),
        cleaning,
        visualization,
    }))
}
