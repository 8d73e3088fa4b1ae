use ndarray::Array1;

use super::{CalculatorBase, Distribution, Features};

use crate::{Error, System};
use crate::math::{make_bins, normalize};
use crate::systems::check_ordered;

fn default_cutoff() -> f64 { 20.0 }
fn default_bin_size() -> f64 { 0.1 }

/// Parameters for the radial distribution function calculator
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RadialDistributionParameters {
    /// Largest distance to include in the distribution
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
    /// Width of the distance bins
    #[serde(default = "default_bin_size")]
    pub bin_size: f64,
}

impl Default for RadialDistributionParameters {
    fn default() -> Self {
        RadialDistributionParameters {
            cutoff: default_cutoff(),
            bin_size: default_bin_size(),
        }
    }
}

/// Radial distribution function (RDF) of a crystal structure.
///
/// The RDF is the number of neighbors found at each distance from the sites
/// of the structure, divided by the volume of the spherical shell at this
/// distance and by the number density of the structure. Every neighbor pair
/// is seen from both sites, and thus counted twice.
#[derive(Debug, Clone)]
pub struct RadialDistribution {
    parameters: RadialDistributionParameters,
}

impl RadialDistribution {
    /// Create a new radial distribution calculator, checking the parameters
    pub fn new(parameters: RadialDistributionParameters) -> Result<RadialDistribution, Error> {
        if !(parameters.cutoff > 0.0) || !parameters.cutoff.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "cutoff for RDF must be a positive finite number, got {}", parameters.cutoff
            )));
        }
        make_bins(parameters.cutoff, parameters.bin_size)?;

        Ok(RadialDistribution { parameters })
    }

    /// Get the parameters used to create this calculator
    pub fn parameters(&self) -> &RadialDistributionParameters {
        &self.parameters
    }

    /// Compute the radial distribution function of the given `system`.
    ///
    /// The returned distances are the start of each bin.
    #[time_graph::instrument(name = "RadialDistribution::compute")]
    pub fn compute(&self, system: &mut dyn System) -> Result<Distribution, Error> {
        check_ordered(system)?;

        let cell = system.cell()?;
        if cell.is_infinite() {
            return Err(Error::UnsupportedStructure(
                "the radial distribution function requires a periodic unit cell".into()
            ));
        }

        let n_sites = system.size()?;
        if n_sites == 0 {
            return Err(Error::UnsupportedStructure(
                "can not compute the radial distribution function of an empty structure".into()
            ));
        }
        let number_density = n_sites as f64 / cell.volume();

        system.compute_neighbors(self.parameters.cutoff)?;
        let mut distances = Vec::new();
        for site in 0..n_sites {
            distances.extend(system.neighbors(site)?.iter().map(|neighbor| neighbor.distance));
        }

        let edges = make_bins(self.parameters.cutoff, self.parameters.bin_size)?;
        let distribution = normalize(&distances, &edges, number_density)?;

        return Ok(Distribution {
            distances: edges[..edges.len() - 1].iter().copied().collect::<Array1<f64>>(),
            distribution,
        });
    }
}

impl CalculatorBase for RadialDistribution {
    fn name(&self) -> String {
        "radial distribution function".into()
    }

    fn parameters(&self) -> String {
        serde_json::to_string(&self.parameters).expect("failed to serialize to JSON")
    }

    fn feature_labels(&self) -> Result<Vec<String>, Error> {
        Ok(vec!["radial distribution function".into()])
    }

    fn citations(&self) -> Vec<String> {
        Vec::new()
    }

    fn implementors(&self) -> Vec<String> {
        vec!["Saurabh Bajaj".into()]
    }

    fn compute(&self, system: &mut dyn System) -> Result<Features, Error> {
        RadialDistribution::compute(self, system).map(Features::Distribution)
    }
}
