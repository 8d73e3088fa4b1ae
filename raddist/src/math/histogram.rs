use ndarray::{Array1, ArrayView1};

use crate::Error;

/// Find the bin containing `value`, i.e. the index `i` such that
/// `edges[i] <= value < edges[i + 1]`.
///
/// Values outside of the edges (including values equal to the last edge, and
/// NaN) are not part of any bin and give `None`.
#[inline]
pub fn bin_index(edges: &[f64], value: f64) -> Option<usize> {
    let (&first, &last) = (edges.first()?, edges.last()?);
    if !(value >= first && value < last) {
        return None;
    }

    // number of edges smaller or equal to value, at least 1 here
    let position = edges.partition_point(|&edge| edge <= value);
    return Some(position - 1);
}

/// Count how many `values` fall in each of the bins defined by `edges`.
///
/// The output contains `edges.len() - 1` entries. Values outside of the bins
/// are silently ignored.
pub fn histogram(values: &[f64], edges: &[f64]) -> Array1<f64> {
    let mut counts = Array1::<f64>::zeros(edges.len().saturating_sub(1));
    for &value in values {
        if let Some(bin) = bin_index(edges, value) {
            counts[bin] += 1.0;
        }
    }
    return counts;
}

/// Get the volume of the spherical shells between consecutive edges,
/// `4/3 π (r_{i+1}^3 - r_i^3)`.
pub fn shell_volumes(edges: &[f64]) -> Result<Array1<f64>, Error> {
    let volumes = edges.windows(2)
        .map(|w| 4.0 / 3.0 * std::f64::consts::PI * (w[1].powi(3) - w[0].powi(3)))
        .collect::<Array1<f64>>();

    if let Some(bin) = volumes.iter().position(|&volume| !(volume > 0.0)) {
        return Err(Error::Internal(format!(
            "degenerate bin between r={} and r={}", edges[bin], edges[bin + 1]
        )));
    }

    return Ok(volumes);
}

/// Normalize raw histogram `counts` by the corresponding `shell_volumes` and
/// by `number_density`.
pub fn normalize_counts(
    counts: ArrayView1<'_, f64>,
    shell_volumes: ArrayView1<'_, f64>,
    number_density: f64,
) -> Result<Array1<f64>, Error> {
    if !(number_density > 0.0) || !number_density.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "number density must be a positive finite number, got {}", number_density
        )));
    }

    if counts.len() != shell_volumes.len() {
        return Err(Error::Internal(format!(
            "got {} histogram counts but {} shell volumes", counts.len(), shell_volumes.len()
        )));
    }

    return Ok(&counts / &shell_volumes / number_density);
}

/// Histogram `distances` in the bins defined by `edges`, and normalize the
/// counts by the shell volume of each bin and by `number_density`.
///
/// This gives a density-like value for each bin; empty bins are 0.
pub fn normalize(distances: &[f64], edges: &[f64], number_density: f64) -> Result<Array1<f64>, Error> {
    let counts = histogram(distances, edges);
    let volumes = shell_volumes(edges)?;
    return normalize_counts(counts.view(), volumes.view(), number_density);
}
