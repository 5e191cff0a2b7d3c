// Read-only textual summaries of a Dataset

use crate::data::Dataset;
use std::collections::BTreeMap;

/// Number of rows shown by the preview
pub const PREVIEW_ROWS: usize = 5;

/// Schema summary: entry range, per-column non-null counts and dtypes
pub fn info_summary(ds: &Dataset) -> String {
    let mut lines = vec!["<class 'Dataset'>".to_string()];

    let rows = ds.row_count();
    if rows == 0 {
        lines.push("RangeIndex: 0 entries".to_string());
    } else {
        lines.push(format!("RangeIndex: {} entries, 0 to {}", rows, rows - 1));
    }

    if ds.column_count() == 0 {
        lines.push("Empty Dataset".to_string());
        return lines.join("\n");
    }

    lines.push(format!("Data columns (total {} columns):", ds.column_count()));

    let idx_width = 3.max(ds.column_count().to_string().len() + 1);
    let name_width = ds
        .columns()
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Column".len());
    let count_cells: Vec<String> = ds
        .columns()
        .iter()
        .map(|c| format!("{} non-null", c.non_null_count()))
        .collect();
    let count_width = count_cells
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max("Non-Null Count".len());

    let row = |idx: &str, name: &str, count: &str, dtype: &str| {
        format!(
            "{:<iw$}  {:<nw$}  {:<cw$}  {}",
            idx,
            name,
            count,
            dtype,
            iw = idx_width,
            nw = name_width,
            cw = count_width
        )
    };

    lines.push(row(" #", "Column", "Non-Null Count", "Dtype"));
    lines.push(row("---", "------", "--------------", "-----"));
    for (i, (col, count)) in ds.columns().iter().zip(&count_cells).enumerate() {
        lines.push(row(&format!(" {}", i), &col.name, count, col.dtype.dtype_name()));
    }

    let mut dtype_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for col in ds.columns() {
        *dtype_counts.entry(col.dtype.dtype_name()).or_default() += 1;
    }
    let dtypes: Vec<String> = dtype_counts
        .iter()
        .map(|(name, n)| format!("{}({})", name, n))
        .collect();
    lines.push(format!("dtypes: {}", dtypes.join(", ")));

    lines.join("\n")
}

/// First `n` rows as a right-aligned table with a leading index column
pub fn head_table(ds: &Dataset, n: usize) -> String {
    if ds.row_count() == 0 || ds.column_count() == 0 {
        return format!(
            "Empty Dataset\nColumns: [{}]\nIndex: []",
            ds.column_names().join(", ")
        );
    }

    let shown = n.min(ds.row_count());
    let idx_width = (shown - 1).to_string().len();

    let mut columns: Vec<(usize, Vec<String>)> = Vec::with_capacity(ds.column_count());
    for col in ds.columns() {
        let cells: Vec<String> = (0..shown).map(|r| col.display(r)).collect();
        let width = cells
            .iter()
            .map(|c| c.chars().count())
            .chain(std::iter::once(col.name.chars().count()))
            .max()
            .unwrap_or(0);
        columns.push((width, cells));
    }

    let mut lines = Vec::with_capacity(shown + 1);
    let mut header = " ".repeat(idx_width);
    for (col, (width, _)) in ds.columns().iter().zip(&columns) {
        header.push_str(&format!("  {:>w$}", col.name, w = *width));
    }
    lines.push(header);

    for r in 0..shown {
        let mut line = format!("{:<w$}", r, w = idx_width);
        for (width, cells) in &columns {
            line.push_str(&format!("  {:>w$}", cells[r], w = *width));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Per-column missing-value counts, one line per column
pub fn missing_summary(ds: &Dataset) -> String {
    let counts = ds.missing_counts();
    let name_width = counts.iter().map(|(n, _)| n.chars().count()).max().unwrap_or(0);
    let value_width = counts
        .iter()
        .map(|(_, c)| c.to_string().len())
        .max()
        .unwrap_or(1);

    let mut lines: Vec<String> = counts
        .iter()
        .map(|(name, count)| {
            format!("{:<nw$}    {:>vw$}", name, count, nw = name_width, vw = value_width)
        })
        .collect();
    lines.push("dtype: int64".to_string());
    lines.join("\n")
}
