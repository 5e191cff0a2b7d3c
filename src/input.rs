//! Interactive acquisition of the input file.
//!
//! The prompt loop is generic over its input and output streams so it can be
//! driven by a terminal or by tests.

use crate::csv_reader;
use crate::data::Dataset;
use crate::error::{EdaError, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

pub const PROMPT: &str =
    "Please enter the CSV file name (e.g., 'titanic.csv') or full path (or press Enter to exit): ";

/// Result of the prompt loop
#[derive(Debug)]
pub enum AcquireOutcome {
    /// A file was found and parsed
    Loaded { path: PathBuf, dataset: Dataset },
    /// The user submitted an empty line or closed the input
    Aborted,
}

/// Resolve user input against the working directory
pub fn resolve_path(input: &str, cwd: &Path) -> PathBuf {
    let candidate = Path::new(input);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        cwd.join(candidate)
    }
}

/// Prompt until an existing file is named, the user aborts, or `max_attempts`
/// missing paths have been entered.
///
/// A file that exists but fails to parse is returned as an error right away.
pub fn acquire_dataset<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    cwd: &Path,
    max_attempts: Option<usize>,
) -> Result<AcquireOutcome> {
    let mut misses = 0usize;

    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line)?;
        let entry = line.trim();

        if read == 0 || entry.is_empty() {
            writeln!(output, "No file name or path provided. Exiting.")?;
            log::info!("Input acquisition aborted by user");
            return Ok(AcquireOutcome::Aborted);
        }

        let path = resolve_path(entry, cwd);
        if path.exists() {
            writeln!(output, "Loading dataset from '{}'.", path.display())?;
            let dataset = csv_reader::read_csv_file(&path)?;
            log::info!(
                "Loaded {} rows x {} columns from {}",
                dataset.row_count(),
                dataset.column_count(),
                path.display()
            );
            return Ok(AcquireOutcome::Loaded { path, dataset });
        }

        writeln!(output, "Error: File '{}' not found. Please try again.", path.display())?;
        misses += 1;
        log::debug!("Missing input path {} (attempt {})", path.display(), misses);

        if let Some(limit) = max_attempts {
            if misses >= limit {
                return Err(EdaError::AttemptsExhausted(misses));
            }
        }
    }
}
