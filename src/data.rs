use crate::error::{EdaError, Result};
use std::collections::HashSet;

/// Cell contents that are read as a missing value.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_na(cell: &str) -> bool {
    NA_VALUES.contains(&cell)
}

/// Inferred storage type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnType {
    Float,
    Integer,
    Text,
}

impl ColumnType {
    /// Name shown in schema summaries
    pub fn dtype_name(&self) -> &'static str {
        match self {
            ColumnType::Float => "float64",
            ColumnType::Integer => "int64",
            ColumnType::Text => "object",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Float | ColumnType::Integer)
    }
}

/// Cell storage for a column. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    pub values: ColumnValues,
}

impl Column {
    /// Build a column from raw CSV cells, inferring its type.
    ///
    /// A column is `Integer` when every cell is present and parses as `i64`,
    /// `Float` when every present cell parses as `f64`, and `Text` otherwise.
    /// A column with no present cells is `Text`.
    pub fn infer(name: impl Into<String>, cells: Vec<String>) -> Self {
        let name = name.into();
        let present: Vec<&str> = cells.iter().map(String::as_str).filter(|c| !is_na(c)).collect();
        let has_missing = present.len() < cells.len();

        let dtype = if present.is_empty() {
            ColumnType::Text
        } else if !has_missing && present.iter().all(|c| c.parse::<i64>().is_ok()) {
            ColumnType::Integer
        } else if present.iter().all(|c| c.parse::<f64>().is_ok()) {
            ColumnType::Float
        } else {
            ColumnType::Text
        };

        let values = if dtype.is_numeric() {
            ColumnValues::Numeric(
                cells
                    .iter()
                    .map(|c| if is_na(c) { None } else { c.parse::<f64>().ok() })
                    .collect(),
            )
        } else {
            ColumnValues::Text(
                cells
                    .into_iter()
                    .map(|c| if is_na(&c) { None } else { Some(c) })
                    .collect(),
            )
        };

        Column { name, dtype, values }
    }

    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let integral = values
            .iter()
            .all(|v| matches!(v, Some(x) if x.fract() == 0.0));
        Column {
            name: name.into(),
            dtype: if integral && !values.is_empty() { ColumnType::Integer } else { ColumnType::Float },
            values: ColumnValues::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Column {
            name: name.into(),
            dtype: ColumnType::Text,
            values: ColumnValues::Text(values),
        }
    }

    pub fn len(&self) -> usize {
        match &self.values {
            ColumnValues::Numeric(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        self.dtype.is_numeric()
    }

    pub fn missing_count(&self) -> usize {
        match &self.values {
            ColumnValues::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnValues::Text(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    pub fn non_null_count(&self) -> usize {
        self.len() - self.missing_count()
    }

    /// Present values of a numeric column, or `None` for text columns
    pub fn numeric_values(&self) -> Option<Vec<f64>> {
        match &self.values {
            ColumnValues::Numeric(v) => Some(v.iter().flatten().copied().collect()),
            ColumnValues::Text(_) => None,
        }
    }

    /// Present values rendered as labels, in row order
    pub fn labels(&self) -> Vec<String> {
        (0..self.len())
            .filter_map(|row| self.cell_label(row))
            .collect()
    }

    /// Cell as printed in previews, with `NaN` for missing values
    pub fn display(&self, row: usize) -> String {
        self.cell_label(row).unwrap_or_else(|| "NaN".to_string())
    }

    fn cell_label(&self, row: usize) -> Option<String> {
        match &self.values {
            ColumnValues::Numeric(v) => v.get(row).copied().flatten().map(|x| match self.dtype {
                ColumnType::Integer => format!("{}", x as i64),
                _ => format_float(x),
            }),
            ColumnValues::Text(v) => v.get(row).cloned().flatten(),
        }
    }
}

/// Format a float with up to six decimals, trailing zeros trimmed but keeping
/// at least one digit after the point.
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return if value.is_nan() { "NaN".to_string() } else if value > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    let mut s = format!("{:.6}", value);
    while s.ends_with('0') && !s.ends_with(".0") {
        s.pop();
    }
    if s == "-0.0" {
        s = "0.0".to_string();
    }
    s
}

/// An in-memory table of named, typed columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: usize,
}

impl Dataset {
    /// Build a dataset from a header row and string rows, inferring column types.
    pub fn from_records(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for h in &headers {
            if !seen.insert(h.as_str()) {
                return Err(EdaError::DuplicateColumn(h.clone()));
            }
        }

        let row_count = rows.len();
        let mut cells: Vec<Vec<String>> = headers.iter().map(|_| Vec::with_capacity(row_count)).collect();
        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != headers.len() {
                return Err(EdaError::RaggedRow {
                    line: idx as u64 + 2,
                    expected: headers.len(),
                    found: row.len(),
                });
            }
            for (col, cell) in cells.iter_mut().zip(row) {
                col.push(cell);
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::infer(name, values))
            .collect();

        Ok(Self { columns, rows: row_count })
    }

    /// Assemble a dataset from prepared columns; all columns must share a length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::new();
        for (idx, col) in columns.iter().enumerate() {
            if !seen.insert(col.name.as_str()) {
                return Err(EdaError::DuplicateColumn(col.name.clone()));
            }
            if col.len() != rows {
                return Err(EdaError::RaggedRow {
                    line: idx as u64 + 1,
                    expected: rows,
                    found: col.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub(crate) fn columns_mut(&mut self) -> impl Iterator<Item = &mut Column> {
        self.columns.iter_mut()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_numeric()).collect()
    }

    /// Remove a column by name; returns whether it was present.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| c.name != name);
        self.columns.len() != before
    }

    pub fn missing_count(&self, name: &str) -> Option<usize> {
        self.column(name).map(Column::missing_count)
    }

    pub fn missing_counts(&self) -> Vec<(&str, usize)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.missing_count()))
            .collect()
    }
}
