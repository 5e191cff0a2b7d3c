// Column statistics behind the charts: counts, bins, density, correlation

use crate::data::{ColumnValues, Dataset};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Occurrences of each distinct label.
///
/// Labels are ordered numerically when every label parses as a number,
/// lexicographically otherwise.
pub fn value_counts(labels: &[String]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for s in labels {
        *counts.entry(s.as_str()).or_default() += 1;
    }

    let mut out: Vec<(String, usize)> = counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect();

    let all_numeric = out.iter().all(|(k, _)| k.parse::<f64>().is_ok());
    if all_numeric {
        out.sort_by(|(a, _), (b, _)| {
            let fa = a.parse::<f64>().unwrap_or(f64::NAN);
            let fb = b.parse::<f64>().unwrap_or(f64::NAN);
            fa.partial_cmp(&fb).unwrap_or(Ordering::Equal)
        });
    } else {
        out.sort_by(|(a, _), (b, _)| a.cmp(b));
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges, one more than the number of bins
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 1.0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bin count by the larger of Sturges' and Freedman-Diaconis' estimates
pub fn auto_bin_count(sorted: &[f64]) -> usize {
    let n = sorted.len();
    if n < 2 {
        return 1;
    }
    let range = sorted[n - 1] - sorted[0];
    if range <= 0.0 {
        return 1;
    }

    let sturges_width = range / ((n as f64).log2() + 1.0);
    let iqr = percentile(sorted, 0.75) - percentile(sorted, 0.25);
    let fd_width = 2.0 * iqr * (n as f64).powf(-1.0 / 3.0);

    let width = if fd_width > 0.0 { fd_width.min(sturges_width) } else { sturges_width };
    ((range / width).ceil() as usize).max(1)
}

/// Equal-width histogram over the data range; the last bin includes its right edge
pub fn histogram(values: &[f64]) -> Histogram {
    if values.is_empty() {
        return Histogram { edges: vec![], counts: vec![] };
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut min = sorted[0];
    let mut max = sorted[sorted.len() - 1];
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let bins = auto_bin_count(&sorted);
    let width = (max - min) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| min + i as f64 * width).collect();

    let mut counts = vec![0usize; bins];
    for &v in &sorted {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Histogram { edges, counts }
}

/// Linear-interpolated percentile of sorted data, `p` in [0, 1]
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    let n = sorted_data.len();
    if n == 0 { return 0.0; }
    if n == 1 { return sorted_data[0]; }

    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    if lower_idx == upper_idx {
        sorted_data[lower_idx]
    } else {
        let weight = rank - lower_idx as f64;
        sorted_data[lower_idx] * (1.0 - weight) + sorted_data[upper_idx] * weight
    }
}

/// Silverman's rule of thumb for bandwidth selection
pub fn silverman_bandwidth(data: &[f64]) -> f64 {
    let n = data.len() as f64;
    if n < 2.0 { return 1.0; }

    let mean = data.iter().sum::<f64>() / n;
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let iqr = percentile(&sorted, 0.75) - percentile(&sorted, 0.25);

    // h = 0.9 * min(std, IQR/1.34) * n^(-1/5)
    let scale = if iqr > 0.0 { std_dev.min(iqr / 1.34) } else { std_dev };
    if scale <= 0.0 { return 1.0; }
    0.9 * scale * n.powf(-0.2)
}

fn gaussian_kernel(u: f64) -> f64 {
    const SQRT_2PI: f64 = 2.5066282746310002;
    (-0.5 * u * u).exp() / SQRT_2PI
}

/// Gaussian KDE evaluated on `grid_points` evenly spaced points between the
/// data minimum and maximum, extended by `cut` bandwidths on each side.
/// Returns (grid, density); density integrates to one.
pub fn kde(data: &[f64], grid_points: usize, cut: f64) -> (Vec<f64>, Vec<f64>) {
    let n = data.len() as f64;
    if n == 0.0 || grid_points == 0 { return (vec![], vec![]); }

    let bandwidth = silverman_bandwidth(data);
    let min = data.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

    let start = min - cut * bandwidth;
    let end = max + cut * bandwidth;
    let range = end - start;
    if range <= 0.0 || grid_points == 1 {
        return (vec![min], vec![gaussian_kernel(0.0) / bandwidth]);
    }

    let step = range / (grid_points - 1) as f64;
    let mut grid = Vec::with_capacity(grid_points);
    let mut density = Vec::with_capacity(grid_points);

    for i in 0..grid_points {
        let x = start + i as f64 * step;
        grid.push(x);
        let d: f64 = data.iter().map(|&xi| gaussian_kernel((x - xi) / bandwidth)).sum();
        density.push(d / (n * bandwidth));
    }

    (grid, density)
}

/// Pearson correlation over paired samples; NaN when either side has zero variance
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let nf = n as f64;
    let mean_x = x[..n].iter().sum::<f64>() / nf;
    let mean_y = y[..n].iter().sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x[..n].iter().zip(&y[..n]) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major, `labels.len()` squared entries
    pub values: Vec<Vec<f64>>,
}

/// Pairwise Pearson correlation of the numeric columns, in column order.
/// Rows where either value is missing are skipped for that pair.
pub fn correlation_matrix(ds: &Dataset) -> CorrelationMatrix {
    let columns: Vec<(&str, &Vec<Option<f64>>)> = ds
        .columns()
        .iter()
        .filter_map(|c| match &c.values {
            ColumnValues::Numeric(v) => Some((c.name.as_str(), v)),
            ColumnValues::Text(_) => None,
        })
        .collect();

    let k = columns.len();
    let mut values = vec![vec![f64::NAN; k]; k];
    for i in 0..k {
        for j in i..k {
            let (xs, ys): (Vec<f64>, Vec<f64>) = columns[i]
                .1
                .iter()
                .zip(columns[j].1.iter())
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();
            let r = pearson(&xs, &ys);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        labels: columns.iter().map(|(n, _)| n.to_string()).collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_value_counts_numeric_order() {
        let counts = value_counts(&labels(&["3", "1", "3", "2", "10"]));
        assert_eq!(
            counts,
            vec![
                ("1".to_string(), 1),
                ("2".to_string(), 1),
                ("3".to_string(), 2),
                ("10".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_value_counts_text_order() {
        let counts = value_counts(&labels(&["male", "female", "male"]));
        assert_eq!(counts, vec![("female".to_string(), 1), ("male".to_string(), 2)]);
    }

    #[test]
    fn test_histogram_counts_sum_to_len() {
        let data: Vec<f64> = (0..100).map(|i| (i * 7 % 31) as f64).collect();
        let hist = histogram(&data);
        assert_eq!(hist.counts.iter().sum::<usize>(), 100);
        assert_eq!(hist.edges.len(), hist.counts.len() + 1);
        assert_eq!(hist.edges[0], 0.0);
        assert!((hist.edges[hist.edges.len() - 1] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_histogram_constant_values() {
        let hist = histogram(&[4.0, 4.0, 4.0]);
        assert_eq!(hist.counts, vec![3]);
        assert_eq!(hist.edges, vec![3.5, 4.5]);
    }

    #[test]
    fn test_auto_bin_count_small_samples() {
        assert_eq!(auto_bin_count(&[1.0]), 1);
        // Sturges: log2(4) + 1 = 3 bins; FD width is wider here
        assert_eq!(auto_bin_count(&[0.0, 1.0, 2.0, 3.0]), 3);
    }

    #[test]
    fn test_percentile() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&data, 0.5), 3.0);
        assert_eq!(percentile(&data, 0.25), 2.0);
        assert_eq!(percentile(&[], 0.5), 0.0);
    }

    #[test]
    fn test_kde_integrates_to_about_one() {
        let data = vec![1.0, 2.0, 2.5, 3.0, 7.0];
        let (grid, density) = kde(&data, 512, 3.0);
        let step = grid[1] - grid[0];
        let area: f64 = density.iter().sum::<f64>() * step;
        assert!((area - 1.0).abs() < 0.02, "area was {}", area);
    }

    #[test]
    fn test_pearson() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert!((pearson(&x, &x) - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &[8.0, 6.0, 4.0, 2.0]) + 1.0).abs() < 1e-12);
        assert!(pearson(&x, &[1.0, 1.0, 1.0, 1.0]).is_nan());
    }

    #[test]
    fn test_correlation_matrix_skips_text_columns() {
        let ds = Dataset::from_columns(vec![
            Column::numeric("a", vec![Some(1.0), Some(2.0), Some(3.0)]),
            Column::text("s", vec![Some("x".into()), Some("y".into()), Some("z".into())]),
            Column::numeric("b", vec![Some(3.0), Some(2.0), Some(1.0)]),
        ])
        .unwrap();
        let m = correlation_matrix(&ds);
        assert_eq!(m.labels, vec!["a", "b"]);
        assert!((m.values[0][1] + 1.0).abs() < 1e-12);
        assert!((m.values[1][1] - 1.0).abs() < 1e-12);
    }
}
