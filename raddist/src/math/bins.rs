use crate::Error;

/// Get the edges of the bins used to histogram distances up to `cutoff` with
/// bins of width `bin_size`.
///
/// The edges are `0, bin_size, 2 * bin_size, ...`, with
/// `floor(cutoff / bin_size) + 2` values in total, so that the last bin
/// always contains `cutoff`. Each edge is computed as `i * bin_size` to avoid
/// accumulating rounding errors.
pub fn make_bins(cutoff: f64, bin_size: f64) -> Result<Vec<f64>, Error> {
    if !(bin_size > 0.0) || !bin_size.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "bin size must be a positive finite number, got {}", bin_size
        )));
    }

    if !(cutoff >= 0.0) || !cutoff.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "cutoff must be a non-negative finite number, got {}", cutoff
        )));
    }

    let n_edges = f64::floor(cutoff / bin_size) as usize + 2;
    let edges = (0..n_edges).map(|i| i as f64 * bin_size).collect::<Vec<_>>();

    if edges.windows(2).any(|w| !(w[0] < w[1])) {
        return Err(Error::InvalidParameter(format!(
            "bin size {} is too small to create distinct bins up to {}", bin_size, cutoff
        )));
    }

    return Ok(edges);
}
