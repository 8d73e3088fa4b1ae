//! Binning and histogram normalization shared by all radial distribution
//! calculators.

mod bins;
pub use self::bins::make_bins;

mod histogram;
pub use self::histogram::{bin_index, histogram, shell_volumes, normalize_counts, normalize};
