use ndarray::{Array1, ArrayView1};

use crate::{Error, System};

/// Values computed by a calculator for a single structure
#[derive(Debug, Clone, PartialEq)]
pub enum Features {
    /// A distribution function sampled on distance bins
    Distribution(Distribution),
    /// A flat feature vector, labeled by `CalculatorBase::feature_labels`
    Vector(Array1<f64>),
}

impl Features {
    /// Get the computed values as a flat array. For distributions this is the
    /// value of the distribution in each bin.
    pub fn values(&self) -> ArrayView1<'_, f64> {
        match self {
            Features::Distribution(distribution) => distribution.distribution.view(),
            Features::Vector(vector) => vector.view(),
        }
    }
}

/// A distribution function over distances
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    /// Distance associated with each bin
    pub distances: Array1<f64>,
    /// Value of the distribution in each bin
    pub distribution: Array1<f64>,
}

/// The actual implementation of a calculator. The [`crate::Calculator`]
/// struct wraps a `Box<dyn CalculatorBase>` and dispatches to it.
pub trait CalculatorBase: Send + Sync {
    /// Get the name of this Calculator
    fn name(&self) -> String;

    /// Get the parameters used to create this Calculator as a JSON string
    fn parameters(&self) -> String;

    /// Prepare this calculator using a set of training structures. The
    /// default implementation does nothing.
    fn fit(&mut self, systems: &[Box<dyn System>]) -> Result<(), Error> {
        let _ = systems;
        Ok(())
    }

    /// Get the names of the features produced by `compute`
    fn feature_labels(&self) -> Result<Vec<String>, Error>;

    /// References to cite when using this calculator, as BibTeX entries
    fn citations(&self) -> Vec<String>;

    /// People who implemented the original version of this descriptor
    fn implementors(&self) -> Vec<String>;

    /// Compute the features for a single `system`
    fn compute(&self, system: &mut dyn System) -> Result<Features, Error>;
}

mod rdf;
pub use self::rdf::{RadialDistribution, RadialDistributionParameters};

mod prdf;
pub use self::prdf::{PartialRadialDistribution, PartialRadialDistributionParameters};
pub use self::prdf::{Vocabulary, PairDistributions};

mod redf;
pub use self::redf::{ElectronicRadialDistribution, ElectronicRadialDistributionParameters};
