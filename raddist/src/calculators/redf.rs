use log::debug;
use ndarray::Array1;
use once_cell::sync::OnceCell;

use super::{CalculatorBase, Distribution, Features};

use crate::{Error, System};
use crate::systems::check_ordered;
use crate::systems::{PrimitiveCellFinder, NoPrimitiveReduction};
use crate::systems::{OxidationStateAssigner, SpeciesOxidationStates};

fn default_dr() -> f64 { 0.05 }

/// Parameters for the electronic radial distribution function calculator
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ElectronicRadialDistributionParameters {
    /// Largest distance to include in the distribution. If this is not set,
    /// the longest space diagonal of the first structure given to `compute`
    /// is used for this and all later structures.
    #[serde(default)]
    pub cutoff: Option<f64>,
    /// Width of the distance bins
    #[serde(default = "default_dr")]
    pub dr: f64,
}

impl Default for ElectronicRadialDistributionParameters {
    fn default() -> Self {
        ElectronicRadialDistributionParameters {
            cutoff: None,
            dr: default_dr(),
        }
    }
}

/// Electronic radial distribution function (ReDF) of a crystal structure, as
/// defined by Willighagen et al., Acta Cryst. B61, 29-36 (2005).
///
/// The ReDF is summed over all sites of the structure: each neighbor pair
/// `(i, j)` at distance `d` adds `q_i q_j / (N d)` to the bin containing `d`,
/// where `q` are the oxidation states of the sites and `N` the number of
/// sites. There is no normalization by shell volume.
///
/// Structures are first reduced to their primitive cell, and oxidation
/// states are assigned to every site, using the configured collaborators.
pub struct ElectronicRadialDistribution {
    parameters: ElectronicRadialDistributionParameters,
    /// cutoff actually used, either from the parameters or from the first
    /// structure
    cutoff: OnceCell<f64>,
    primitive: Box<dyn PrimitiveCellFinder>,
    oxidation_states: Box<dyn OxidationStateAssigner>,
}

impl std::fmt::Debug for ElectronicRadialDistribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElectronicRadialDistribution")
            .field("parameters", &self.parameters)
            .field("cutoff", &self.cutoff.get())
            .finish_non_exhaustive()
    }
}

impl ElectronicRadialDistribution {
    /// Create a new electronic radial distribution calculator, using no
    /// primitive cell reduction and the oxidation states already present on
    /// the species of the structures.
    pub fn new(parameters: ElectronicRadialDistributionParameters) -> Result<ElectronicRadialDistribution, Error> {
        if !(parameters.dr > 0.0) || !parameters.dr.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "width of bins for ReDF must be a positive finite number, got {}", parameters.dr
            )));
        }

        let cutoff = OnceCell::new();
        if let Some(value) = parameters.cutoff {
            if !(value > 0.0) || !value.is_finite() {
                return Err(Error::InvalidParameter(format!(
                    "cutoff for ReDF must be a positive finite number, got {}", value
                )));
            }
            let _ = cutoff.set(value);
        }

        Ok(ElectronicRadialDistribution {
            parameters,
            cutoff,
            primitive: Box::new(NoPrimitiveReduction),
            oxidation_states: Box::new(SpeciesOxidationStates),
        })
    }

    /// Use `finder` to reduce structures to their primitive cell
    #[must_use]
    pub fn with_primitive_finder(mut self, finder: impl PrimitiveCellFinder + 'static) -> Self {
        self.primitive = Box::new(finder);
        self
    }

    /// Use `assigner` to get the oxidation states of the sites
    #[must_use]
    pub fn with_oxidation_states(mut self, assigner: impl OxidationStateAssigner + 'static) -> Self {
        self.oxidation_states = Box::new(assigner);
        self
    }

    /// Get the parameters used to create this calculator
    pub fn parameters(&self) -> &ElectronicRadialDistributionParameters {
        &self.parameters
    }

    /// Get the cutoff used by this calculator, or `None` if it was not given
    /// in the parameters and no structure was processed yet.
    pub fn cutoff(&self) -> Option<f64> {
        self.cutoff.get().copied()
    }

    /// Compute the electronic radial distribution function of `system`.
    ///
    /// The returned distances are the center of each bin.
    #[time_graph::instrument(name = "ElectronicRadialDistribution::compute")]
    pub fn compute(&self, system: &mut dyn System) -> Result<Distribution, Error> {
        check_ordered(system)?;

        let primitive = self.primitive.find_primitive(system)?;
        let reduced: &dyn System = match &primitive {
            Some(primitive) => primitive,
            None => {
                debug!("no primitive cell found, using the structure as given");
                &*system
            }
        };
        let mut structure = self.oxidation_states.assign(reduced)?;

        // the cutoff is only derived from structures that can be computed
        let charges = structure.species()?.iter()
            .map(|species| species.oxidation_state().ok_or_else(|| Error::UnsupportedStructure(format!(
                "site {} does not have an oxidation state after assignment", species
            ))))
            .collect::<Result<Vec<_>, _>>()?;

        let cutoff = *self.cutoff.get_or_try_init(|| {
            let cell = structure.cell()?;
            if cell.is_infinite() {
                return Err(Error::UnsupportedStructure(
                    "can not guess the ReDF cutoff for a structure without unit cell".into()
                ));
            }

            let cutoff = cell.longest_diagonal();
            debug!("using the longest space diagonal as ReDF cutoff: {}", cutoff);
            Ok(cutoff)
        })?;

        let dr = self.parameters.dr;
        let n_bins = f64::floor(cutoff / dr) as usize + 1;
        let distances = (0..n_bins).map(|bin| (bin as f64 + 0.5) * dr).collect::<Array1<f64>>();
        let mut distribution = Array1::<f64>::zeros(n_bins);

        let n_sites = structure.size()?;
        structure.compute_neighbors(cutoff)?;

        for site in 0..n_sites {
            for neighbor in structure.neighbors(site)? {
                let bin = f64::floor(neighbor.distance / dr) as usize;
                if bin < n_bins {
                    distribution[bin] += charges[site] * charges[neighbor.site] / (n_sites as f64 * neighbor.distance);
                }
            }
        }

        return Ok(Distribution { distances, distribution });
    }
}

impl CalculatorBase for ElectronicRadialDistribution {
    fn name(&self) -> String {
        "electronic radial distribution function".into()
    }

    fn parameters(&self) -> String {
        serde_json::to_string(&self.parameters).expect("failed to serialize to JSON")
    }

    fn feature_labels(&self) -> Result<Vec<String>, Error> {
        Ok(vec!["electronic radial distribution function".into()])
    }

    fn citations(&self) -> Vec<String> {
        vec![
            "@article{title={Method for the computational comparison of crystal structures}, \
            volume={B61}, pages={29-36}, DOI={10.1107/S0108768104028344}, \
            journal={Acta Crystallographica Section B}, \
            author={Willighagen, E. L. and Wehrens, R. and Verwer, P. and de Gelder R. and Buydens, L. M. C.}, \
            year={2005}}".into()
        ]
    }

    fn implementors(&self) -> Vec<String> {
        vec!["Nils E. R. Zimmermann".into()]
    }

    fn compute(&self, system: &mut dyn System) -> Result<Features, Error> {
        ElectronicRadialDistribution::compute(self, system).map(Features::Distribution)
    }
}
