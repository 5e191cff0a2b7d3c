//! Missing-value imputation and removal of irrelevant columns.
//!
//! Numeric columns are filled with the mean of their present values.
//! Categorical columns are filled with their mode, or with a placeholder
//! when the column has no present values at all.

use crate::data::{ColumnType, ColumnValues, Dataset, format_float};
use std::collections::HashMap;
use std::fmt;

/// Cleaning configuration
#[derive(Debug, Clone)]
pub struct CleaningOptions {
    /// Columns removed after imputation, if present
    pub dropped_columns: Vec<String>,
    /// Fill value for categorical columns without a mode
    pub placeholder: String,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            dropped_columns: vec!["Cabin".to_string(), "Ticket".to_string()],
            placeholder: "Unknown".to_string(),
        }
    }
}

/// How a column's missing values were filled
#[derive(Debug, Clone, PartialEq)]
pub enum FillValue {
    Mean(f64),
    Mode(String),
    Placeholder(String),
}

impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillValue::Mean(v) => write!(f, "mean {}", format_float(*v)),
            FillValue::Mode(v) => write!(f, "mode '{}'", v),
            FillValue::Placeholder(v) => write!(f, "placeholder '{}'", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CleaningAction {
    Imputed {
        column: String,
        filled: usize,
        value: FillValue,
    },
    Dropped(String),
}

impl fmt::Display for CleaningAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleaningAction::Imputed { column, filled, value } => {
                write!(f, "Filled {} missing value(s) in '{}' with {}", filled, column, value)
            }
            CleaningAction::Dropped(column) => write!(f, "Dropped column '{}'", column),
        }
    }
}

/// Actions taken by [`clean`], in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleaningReport {
    pub actions: Vec<CleaningAction>,
}

impl CleaningReport {
    pub fn dropped(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                CleaningAction::Dropped(c) => Some(c.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn fill_for(&self, column: &str) -> Option<&FillValue> {
        self.actions.iter().find_map(|a| match a {
            CleaningAction::Imputed { column: c, value, .. } if c == column => Some(value),
            _ => None,
        })
    }
}

/// Arithmetic mean of present values
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}

/// Most frequent present value; ties go to the smallest value
pub fn mode(values: &[Option<String>]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values.iter().flatten() {
        *counts.entry(v.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|(va, ca), (vb, cb)| ca.cmp(cb).then_with(|| vb.cmp(va)))
        .map(|(v, _)| v.to_string())
}

/// Fill missing values and drop irrelevant columns in place
pub fn clean(ds: &mut Dataset, options: &CleaningOptions) -> CleaningReport {
    let mut report = CleaningReport::default();

    for col in ds.columns_mut() {
        let missing = col.missing_count();
        if missing == 0 {
            continue;
        }

        let value = match &mut col.values {
            ColumnValues::Numeric(values) => {
                let Some(m) = mean(values) else { continue };
                for v in values.iter_mut().filter(|v| v.is_none()) {
                    *v = Some(m);
                }
                col.dtype = ColumnType::Float;
                FillValue::Mean(m)
            }
            ColumnValues::Text(values) => {
                let (fill, text) = match mode(values) {
                    Some(m) => (FillValue::Mode(m.clone()), m),
                    None => (
                        FillValue::Placeholder(options.placeholder.clone()),
                        options.placeholder.clone(),
                    ),
                };
                for v in values.iter_mut().filter(|v| v.is_none()) {
                    *v = Some(text.clone());
                }
                fill
            }
        };

        let action = CleaningAction::Imputed {
            column: col.name.clone(),
            filled: missing,
            value,
        };
        log::info!("{}", action);
        report.actions.push(action);
    }

    for name in &options.dropped_columns {
        if ds.drop_column(name) {
            let action = CleaningAction::Dropped(name.clone());
            log::info!("{}", action);
            report.actions.push(action);
        } else {
            log::debug!("Column '{}' not present, nothing to drop", name);
        }
    }

    report
}
