//! Presenting rendered charts.
//!
//! A [`ChartSink`] receives each chart in order and returns once the chart
//! has been dismissed, so the next chart is not produced before that.

use crate::graph::RenderedChart;
use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

pub trait ChartSink {
    /// Present the `index`-th rendered chart. `input` and `output` are the
    /// interactive streams, for sinks that wait on the user.
    fn show<R: BufRead, W: Write>(
        &mut self,
        index: usize,
        chart: &RenderedChart,
        input: &mut R,
        output: &mut W,
    ) -> Result<()>;
}

/// Writes each chart as a numbered image file into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    pause: bool,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// With `pause` set, waits for Enter after each chart.
    pub fn new(dir: impl Into<PathBuf>, pause: bool) -> Self {
        Self {
            dir: dir.into(),
            pause,
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn file_name(index: usize, chart: &RenderedChart) -> String {
        format!("{:02}_{}.{}", index + 1, slug(&chart.title), chart.format.extension())
    }
}

impl ChartSink for DirectorySink {
    fn show<R: BufRead, W: Write>(
        &mut self,
        index: usize,
        chart: &RenderedChart,
        input: &mut R,
        output: &mut W,
    ) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create output directory {}", self.dir.display()))?;

        let path = self.dir.join(Self::file_name(index, chart));
        fs::write(&path, &chart.bytes)
            .with_context(|| format!("Failed to write chart to {}", path.display()))?;
        writeln!(output, "Saved '{}' to '{}'", chart.title, path.display())?;

        if self.pause {
            write!(output, "Press Enter to continue...")?;
            output.flush()?;
            let mut line = String::new();
            input.read_line(&mut line)?;
        }

        self.written.push(path);
        Ok(())
    }
}

/// Keeps the titles of the charts it is shown; used by tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub titles: Vec<String>,
    pub sizes: Vec<usize>,
}

impl ChartSink for RecordingSink {
    fn show<R: BufRead, W: Write>(
        &mut self,
        _index: usize,
        chart: &RenderedChart,
        _input: &mut R,
        _output: &mut W,
    ) -> Result<()> {
        self.titles.push(chart.title.clone());
        self.sizes.push(chart.bytes.len());
        Ok(())
    }
}

/// Lowercase file-name stem: alphanumerics kept, everything else collapsed to `_`
fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}
