// CSV loading into a typed Dataset

use crate::data::Dataset;
use crate::error::{EdaError, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read a comma-separated file with a header row into a Dataset
pub fn read_csv_file(path: &Path) -> Result<Dataset> {
    let file = File::open(path).map_err(|e| EdaError::load(path, e.into()))?;
    read_csv(file).map_err(|e| EdaError::load(path, e))
}

/// Read CSV content from any reader
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(EdaError::EmptyFile);
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(rows.len() as u64 + 2);
        if record.len() != headers.len() {
            return Err(EdaError::RaggedRow {
                line,
                expected: headers.len(),
                found: record.len(),
            });
        }
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    log::debug!("Parsed {} columns and {} rows", headers.len(), rows.len());
    Dataset::from_records(headers, rows)
}
